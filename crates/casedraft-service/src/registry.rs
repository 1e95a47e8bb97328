//! Static registry of supported discovery document types.

use casedraft_core::{DiscoveryKind, WorkflowKind};
use lazy_static::lazy_static;

use crate::ServiceError;

/// Which parser the orchestrator runs for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// Regex-layered extraction, responses drafted in a second model call.
    Structured,
    /// Model extracts and drafts in one pass.
    AiAssisted,
}

/// Static per-type descriptor. Built once at process start; the labels
/// and template file names are external contracts.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryTypeConfig {
    pub kind: DiscoveryKind,
    pub template_file: &'static str,
    pub workflow: WorkflowKind,
    pub parser: ParserKind,
}

impl DiscoveryTypeConfig {
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    pub fn display_name(&self) -> &'static str {
        self.kind.display_name()
    }

    /// Standard-disposition ids offered during the select step. Empty
    /// for types whose workflow has no select step.
    pub fn dispositions(&self) -> &'static [&'static str] {
        match self.kind {
            DiscoveryKind::RequestsForProduction => {
                &["will_provide", "no_responsive_documents", "unable_to_comply", "no_text"]
            }
            DiscoveryKind::RequestsForAdmission => {
                &["admit", "deny", "unable_to_admit_or_deny", "no_text"]
            }
            _ => &[],
        }
    }
}

lazy_static! {
    static ref REGISTRY: Vec<DiscoveryTypeConfig> = vec![
        DiscoveryTypeConfig {
            kind: DiscoveryKind::FormInterrogatories,
            template_file: "form_interrogatories_response.docx",
            workflow: WorkflowKind::FormatResponses,
            // Judicial Council form layout defeats the regex stages.
            parser: ParserKind::AiAssisted,
        },
        DiscoveryTypeConfig {
            kind: DiscoveryKind::SpecialInterrogatories,
            template_file: "special_interrogatories_response.docx",
            workflow: WorkflowKind::FormatResponses,
            parser: ParserKind::Structured,
        },
        DiscoveryTypeConfig {
            kind: DiscoveryKind::RequestsForProduction,
            template_file: "requests_for_production_response.docx",
            workflow: WorkflowKind::ParseAndSelect,
            parser: ParserKind::Structured,
        },
        DiscoveryTypeConfig {
            kind: DiscoveryKind::RequestsForAdmission,
            template_file: "requests_for_admission_response.docx",
            workflow: WorkflowKind::ParseAndSelect,
            parser: ParserKind::Structured,
        },
    ];
}

/// Resolve a wire-level type key to its configuration.
pub fn lookup(type_key: &str) -> Result<&'static DiscoveryTypeConfig, ServiceError> {
    REGISTRY
        .iter()
        .find(|config| config.key() == type_key)
        .ok_or_else(|| ServiceError::UnsupportedType(type_key.to_string()))
}

/// All supported type keys.
pub fn list_types() -> Vec<&'static str> {
    REGISTRY.iter().map(|config| config.key()).collect()
}

/// Type keys following the given workflow.
pub fn list_types_by_workflow(workflow: WorkflowKind) -> Vec<&'static str> {
    REGISTRY
        .iter()
        .filter(|config| config.workflow == workflow)
        .map(|config| config.key())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_registered_once() {
        for kind in DiscoveryKind::ALL {
            let config = lookup(kind.key()).unwrap();
            assert_eq!(config.kind, kind);
        }
        assert_eq!(list_types().len(), DiscoveryKind::ALL.len());
    }

    #[test]
    fn test_unknown_key_error_names_it() {
        let err = lookup("bogus_type").unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedType(_)));
        assert!(err.to_string().contains("bogus_type"));
    }

    #[test]
    fn test_dispositions_only_for_select_workflow() {
        for config in DiscoveryKind::ALL.iter().map(|k| lookup(k.key()).unwrap()) {
            match config.workflow {
                WorkflowKind::ParseAndSelect => {
                    assert!(config.dispositions().contains(&"no_text"))
                }
                WorkflowKind::FormatResponses => assert!(config.dispositions().is_empty()),
            }
        }
        assert!(lookup("requests_for_admission")
            .unwrap()
            .dispositions()
            .contains(&"deny"));
    }

    #[test]
    fn test_workflow_partition() {
        let format = list_types_by_workflow(WorkflowKind::FormatResponses);
        let select = list_types_by_workflow(WorkflowKind::ParseAndSelect);
        assert_eq!(format.len() + select.len(), list_types().len());
        assert!(select.contains(&"requests_for_production"));
        assert!(format.contains(&"form_interrogatories"));
    }
}
