//! Data model for the discovery parsing and drafting pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The supported discovery document types.
///
/// The wire-level keys (`requests_for_production` and friends) are part of
/// the contract with the HTTP layer and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryKind {
    FormInterrogatories,
    SpecialInterrogatories,
    RequestsForProduction,
    RequestsForAdmission,
}

impl DiscoveryKind {
    pub const ALL: [DiscoveryKind; 4] = [
        DiscoveryKind::FormInterrogatories,
        DiscoveryKind::SpecialInterrogatories,
        DiscoveryKind::RequestsForProduction,
        DiscoveryKind::RequestsForAdmission,
    ];

    /// Wire-level type key used by the HTTP layer and the registry.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FormInterrogatories => "form_interrogatories",
            Self::SpecialInterrogatories => "special_interrogatories",
            Self::RequestsForProduction => "requests_for_production",
            Self::RequestsForAdmission => "requests_for_admission",
        }
    }

    /// Resolve a wire-level key back to a kind.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.key() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FormInterrogatories => "Form Interrogatories",
            Self::SpecialInterrogatories => "Special Interrogatories",
            Self::RequestsForProduction => "Requests for Production",
            Self::RequestsForAdmission => "Requests for Admission",
        }
    }

    /// Label prefixing each request in prompts and rendered documents,
    /// e.g. "REQUEST FOR PRODUCTION NO."
    pub fn request_label(&self) -> &'static str {
        match self {
            Self::FormInterrogatories => "FORM INTERROGATORY NO.",
            Self::SpecialInterrogatories => "SPECIAL INTERROGATORY NO.",
            Self::RequestsForProduction => "REQUEST FOR PRODUCTION NO.",
            Self::RequestsForAdmission => "REQUEST FOR ADMISSION NO.",
        }
    }

    /// Label prefixing each response, e.g. "RESPONSE TO REQUEST FOR
    /// PRODUCTION NO."
    pub fn response_label(&self) -> &'static str {
        match self {
            Self::FormInterrogatories => "RESPONSE TO FORM INTERROGATORY NO.",
            Self::SpecialInterrogatories => "RESPONSE TO SPECIAL INTERROGATORY NO.",
            Self::RequestsForProduction => "RESPONSE TO REQUEST FOR PRODUCTION NO.",
            Self::RequestsForAdmission => "RESPONSE TO REQUEST FOR ADMISSION NO.",
        }
    }
}

impl std::fmt::Display for DiscoveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Which two-step workflow a discovery type follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Parse, draft and format responses in a single pass.
    FormatResponses,
    /// Parse first, let the user pick standard dispositions, then render.
    ParseAndSelect,
}

/// One numbered request or interrogatory extracted from a discovery
/// document.
///
/// `number` is treated as an opaque string: interrogatories use dotted
/// numbering ("6.4") and numbers are only unique within one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryQuestion {
    pub number: String,
    pub text: String,
    #[serde(default)]
    pub subparts: Vec<String>,
    /// Drafted response, attached after the model output is decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl DiscoveryQuestion {
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
            subparts: Vec::new(),
            response: None,
        }
    }

    pub fn with_subparts(mut self, subparts: Vec<String>) -> Self {
        self.subparts = subparts;
        self
    }

    pub fn attach_response(&mut self, response: impl Into<String>) {
        self.response = Some(response.into());
    }

    /// Join key between a parsed question and the user-submitted
    /// selection for it. The `q_` prefix is a cross-boundary contract
    /// with the session store and must be preserved exactly.
    pub fn selection_key(&self) -> String {
        format!("q_{}", self.number)
    }
}

/// Case identification fields used in prompt headers and render contexts.
///
/// Every accessor falls back to "Unknown" so a sparsely-populated case
/// record still produces a usable prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseDetails {
    pub case_name: Option<String>,
    pub case_number: Option<String>,
    pub court: Option<String>,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub propounding_party: Option<String>,
    pub responding_party: Option<String>,
    pub counsel: Option<String>,
    pub trial_date: Option<String>,
}

impl CaseDetails {
    const UNKNOWN: &'static str = "Unknown";

    pub fn case_name(&self) -> &str {
        self.case_name.as_deref().unwrap_or(Self::UNKNOWN)
    }

    pub fn case_number(&self) -> &str {
        self.case_number.as_deref().unwrap_or(Self::UNKNOWN)
    }

    pub fn court(&self) -> &str {
        self.court.as_deref().unwrap_or(Self::UNKNOWN)
    }

    pub fn plaintiff(&self) -> &str {
        self.plaintiff.as_deref().unwrap_or(Self::UNKNOWN)
    }

    pub fn defendant(&self) -> &str {
        self.defendant.as_deref().unwrap_or(Self::UNKNOWN)
    }

    pub fn propounding_party(&self) -> &str {
        self.propounding_party.as_deref().unwrap_or(Self::UNKNOWN)
    }

    pub fn responding_party(&self) -> &str {
        self.responding_party.as_deref().unwrap_or(Self::UNKNOWN)
    }

    /// Display identifier used for suggested filenames.
    pub fn display_id(&self) -> String {
        match (&self.case_name, &self.case_number) {
            (Some(name), _) => name.clone(),
            (None, Some(number)) => number.clone(),
            (None, None) => Self::UNKNOWN.to_string(),
        }
    }
}

/// In-flight result of the parse step, held in the transient store
/// between "parse" and "generate document".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub questions: Vec<DiscoveryQuestion>,
    pub prompt: String,
    pub ai_response: Option<String>,
    pub ai_error: Option<String>,
    pub discovery_type: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl ParseResult {
    pub fn new(kind: DiscoveryKind) -> Self {
        Self {
            questions: Vec::new(),
            prompt: String::new(),
            ai_response: None,
            ai_error: None,
            discovery_type: kind.key().to_string(),
            display_name: kind.display_name().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Result for a pipeline run that produced nothing usable.
    pub fn failed(kind: DiscoveryKind, error: impl Into<String>) -> Self {
        let mut result = Self::new(kind);
        result.ai_error = Some(error.into());
        result
    }

    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}
