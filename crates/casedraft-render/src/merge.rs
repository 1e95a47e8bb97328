//! Merging drafted responses with user-selected standard dispositions.

use casedraft_core::{DiscoveryKind, DiscoveryQuestion};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::richtext::{Paragraph, ResponseDocument};

/// The phrase dividing a response into its objection portion and its
/// substantive portion. Part of the drafting convention, matched
/// literally.
const SUBJECT_TO_MARKER: &str = "Subject to and without waiving";

/// Sentence used when the model drafted nothing for a question.
const DEFAULT_RESPONSE: &str = "No objections found for this request.";

/// Sentence for a user-selected standard disposition, or None when the
/// selection adds no text (`no_text`, or an unrecognized id).
pub fn disposition_sentence(kind: DiscoveryKind, selection: &str) -> Option<&'static str> {
    match (kind, selection) {
        (DiscoveryKind::RequestsForProduction, "will_provide") => {
            Some("Plaintiff will produce responsive documents.")
        }
        (DiscoveryKind::RequestsForProduction, "no_responsive_documents") => Some(
            "After a diligent search and a reasonable inquiry, Plaintiff has no responsive \
             documents in their possession, custody, or control.",
        ),
        (DiscoveryKind::RequestsForProduction, "unable_to_comply") => {
            Some("Plaintiff is unable to comply with this request.")
        }
        (DiscoveryKind::RequestsForAdmission, "admit") => Some("Admitted."),
        (DiscoveryKind::RequestsForAdmission, "deny") => Some("Denied."),
        (DiscoveryKind::RequestsForAdmission, "unable_to_admit_or_deny") => Some(
            "Responding party has made a reasonable inquiry and the information known or readily \
             obtainable is insufficient to enable an admission or denial.",
        ),
        _ => None,
    }
}

/// Strip the markdown emphasis markers models like to insert.
fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "").replace('*', "")
}

/// Assembles the final rich-formatted response block.
#[derive(Debug, Clone, Copy)]
pub struct SelectionMerger {
    kind: DiscoveryKind,
}

impl SelectionMerger {
    pub fn new(kind: DiscoveryKind) -> Self {
        Self { kind }
    }

    /// Merge questions, drafted responses and user selections into the
    /// rendered response document, in original parse order.
    ///
    /// `responses` is keyed by question number; `selections` by the
    /// question's `q_`-prefixed selection key.
    pub fn merge(
        &self,
        questions: &[DiscoveryQuestion],
        responses: &BTreeMap<String, String>,
        selections: &HashMap<String, String>,
    ) -> ResponseDocument {
        let mut doc = ResponseDocument::new();

        for question in questions {
            let drafted = responses
                .get(&question.number)
                .map(String::as_str)
                .or(question.response.as_deref())
                .unwrap_or(DEFAULT_RESPONSE);
            let drafted = strip_emphasis(drafted);

            let selection = selections
                .get(&question.selection_key())
                .map(String::as_str)
                .unwrap_or("no_text");

            doc.push(Paragraph::header(format!(
                "{}{}:",
                self.kind.request_label(),
                question.number
            )));
            doc.push(Paragraph::indented(question.text.clone()));
            for (idx, subpart) in question.subparts.iter().enumerate() {
                let letter = (b'a' + (idx as u8 % 26)) as char;
                doc.push(Paragraph::indented(format!("({}) {}", letter, subpart)));
            }

            doc.push(Paragraph::header(format!(
                "{}{}:",
                self.kind.response_label(),
                question.number
            )));

            let (objection, subject_to) = split_at_marker(&drafted);
            if let Some(objection) = objection {
                doc.push(Paragraph::indented(objection));
            }
            if let Some(subject_to) = subject_to {
                doc.push(Paragraph::indented(subject_to));
            }

            if let Some(sentence) = disposition_sentence(self.kind, selection) {
                debug!(
                    number = %question.number,
                    selection = %selection,
                    "Appending standard disposition"
                );
                doc.push(Paragraph::indented(sentence));
            }
        }

        doc
    }
}

/// Split a response at the "Subject to and without waiving" marker into
/// the objection portion and the subject-to portion; either side may be
/// absent.
fn split_at_marker(response: &str) -> (Option<String>, Option<String>) {
    match response.find(SUBJECT_TO_MARKER) {
        Some(pos) => {
            let objection = response[..pos].trim();
            let subject_to = response[pos..].trim();
            (
                (!objection.is_empty()).then(|| objection.to_string()),
                (!subject_to.is_empty()).then(|| subject_to.to_string()),
            )
        }
        None => {
            let whole = response.trim();
            ((!whole.is_empty()).then(|| whole.to_string()), None)
        }
    }
}
