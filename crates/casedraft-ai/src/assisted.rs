//! AI-assisted request parsing.
//!
//! For document types whose layout defeats the regex stages (notably the
//! Judicial Council form interrogatories), the isolated section text is
//! handed to the model with instructions to both extract each numbered
//! item and draft its response in one pass.

use casedraft_core::{DiscoveryKind, DiscoveryQuestion};
use casedraft_parse::{isolate_section, normalize_text, patterns_for};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, warn};

use crate::client::ModelClient;
use crate::decode::decode_model_output;

/// Outcome of an assisted parse. Failure is represented, not raised:
/// an empty question list plus a human-readable error string.
#[derive(Debug, Clone)]
pub struct AssistedParse {
    pub questions: Vec<DiscoveryQuestion>,
    pub prompt: String,
    pub raw_response: Option<String>,
    pub error: Option<String>,
}

/// Parser that delegates item extraction and drafting to the model.
pub struct AssistedParser {
    kind: DiscoveryKind,
    client: Arc<dyn ModelClient>,
}

impl AssistedParser {
    pub fn new(kind: DiscoveryKind, client: Arc<dyn ModelClient>) -> Self {
        Self { kind, client }
    }

    pub fn kind(&self) -> DiscoveryKind {
        self.kind
    }

    /// Extract questions (with drafted responses) from raw document text.
    ///
    /// `case_json` is the serialized case record, `objections` the
    /// objection boilerplate split into lines; both are optional context.
    pub async fn parse(
        &self,
        raw_text: &str,
        case_json: Option<&str>,
        objections: &[String],
    ) -> AssistedParse {
        let patterns = patterns_for(self.kind);
        let text = normalize_text(raw_text);
        let section = isolate_section(patterns, &text);
        let prompt = self.extraction_prompt(section, case_json, objections);

        let raw_response = match self.client.generate(&prompt).await {
            Ok(output) => output,
            Err(err) => {
                error!(kind = %self.kind, error = %err, "Assisted parse model call failed");
                return AssistedParse {
                    questions: Vec::new(),
                    prompt,
                    raw_response: None,
                    error: Some(format!("model call failed: {}", err)),
                };
            }
        };

        match decode_model_output(&raw_response, self.kind) {
            Ok(items) => {
                let questions = items
                    .into_iter()
                    .map(|item| {
                        let mut question = DiscoveryQuestion::new(item.number, item.text)
                            .with_subparts(item.subparts);
                        if let Some(response) = item.response {
                            question.attach_response(response);
                        }
                        question
                    })
                    .collect();
                AssistedParse {
                    questions,
                    prompt,
                    raw_response: Some(raw_response),
                    error: None,
                }
            }
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "Assisted parse decoded nothing");
                AssistedParse {
                    questions: Vec::new(),
                    prompt,
                    raw_response: Some(raw_response),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn extraction_prompt(
        &self,
        section: &str,
        case_json: Option<&str>,
        objections: &[String],
    ) -> String {
        let mut prompt = String::new();
        let _ = writeln!(
            prompt,
            "The text below is from {} served in a civil case.",
            self.kind.display_name()
        );
        let _ = writeln!(
            prompt,
            "Extract every numbered item and draft a response to each. Reply with a JSON array \
             of objects with fields \"number\", \"text\", \"subparts\" and \"response\"."
        );
        let _ = writeln!(
            prompt,
            "Keep the numbering exactly as it appears in the document."
        );

        if let Some(case_json) = case_json {
            let _ = writeln!(prompt);
            let _ = writeln!(prompt, "Case data:");
            let _ = writeln!(prompt, "{}", case_json);
        }

        if !objections.is_empty() {
            let _ = writeln!(prompt);
            let _ = writeln!(prompt, "Available objections:");
            for objection in objections {
                let _ = writeln!(prompt, "- {}", objection);
            }
        }

        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Document text:");
        let _ = writeln!(prompt, "{}", section);
        prompt
    }
}
