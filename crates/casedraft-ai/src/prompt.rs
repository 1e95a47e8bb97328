//! Prompt construction for response drafting.

use casedraft_core::{CaseDetails, DiscoveryKind, DiscoveryQuestion};
use std::fmt::Write;

/// How much of the objection boilerplate sheet is quoted into the prompt.
const OBJECTION_EXCERPT_CHARS: usize = 500;

/// First ~500 characters of the objection sheet, for prompt context.
pub fn objection_excerpt(objection_sheet: &str) -> String {
    objection_sheet.chars().take(OBJECTION_EXCERPT_CHARS).collect()
}

/// Builds the drafting prompt for one discovery type.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    kind: DiscoveryKind,
}

impl PromptBuilder {
    pub fn new(kind: DiscoveryKind) -> Self {
        Self { kind }
    }

    /// Compose the full drafting prompt.
    ///
    /// The question list is never truncated here; input-length limits are
    /// the caller's concern.
    pub fn build(
        &self,
        questions: &[DiscoveryQuestion],
        case: &CaseDetails,
        objection_sheet: &str,
    ) -> String {
        let mut prompt = String::new();

        let _ = writeln!(prompt, "DISCOVERY RESPONSE DRAFTING REQUEST");
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Case: {}", case.case_name());
        let _ = writeln!(prompt, "Case Number: {}", case.case_number());
        let _ = writeln!(prompt, "Court: {}", case.court());
        let _ = writeln!(prompt, "Propounding Party: {}", case.propounding_party());
        let _ = writeln!(prompt, "Responding Party: {}", case.responding_party());
        let _ = writeln!(prompt);

        let _ = writeln!(
            prompt,
            "You are drafting responses to {} served on the responding party.",
            self.kind.display_name()
        );
        let _ = writeln!(
            prompt,
            "Draft one response per item below. Begin each response with a line of the form \
             \"{}<number>:\" so it can be matched back to its request.",
            self.kind.response_label()
        );
        let _ = writeln!(
            prompt,
            "State any applicable objections first. If responding despite objections, open that \
             portion with \"Subject to and without waiving the foregoing objections\"."
        );

        let excerpt = objection_excerpt(objection_sheet);
        if !excerpt.trim().is_empty() {
            let _ = writeln!(prompt);
            let _ = writeln!(prompt, "Standard objection language (excerpt):");
            let _ = writeln!(prompt, "{}", excerpt.trim());
        }

        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "{}", self.type_instructions());
        let _ = writeln!(prompt);

        for question in questions {
            let _ = writeln!(
                prompt,
                "{}{}: {}",
                self.kind.request_label(),
                question.number,
                question.text
            );
            for (idx, subpart) in question.subparts.iter().enumerate() {
                let letter = (b'a' + (idx as u8 % 26)) as char;
                let _ = writeln!(prompt, "    {}. {}", letter, subpart);
            }
        }

        prompt
    }

    fn type_instructions(&self) -> &'static str {
        match self.kind {
            DiscoveryKind::RequestsForProduction => {
                "After any objections, state whether responsive documents will be produced, \
                 or that no responsive documents exist after a diligent search."
            }
            DiscoveryKind::RequestsForAdmission => {
                "Each response must answer \"Admitted\" or \"Denied\", or state that the \
                 responding party cannot admit or deny the matter after reasonable inquiry."
            }
            DiscoveryKind::FormInterrogatories | DiscoveryKind::SpecialInterrogatories => {
                "Answer each interrogatory fully and separately, addressing every lettered \
                 subpart in order."
            }
        }
    }
}
