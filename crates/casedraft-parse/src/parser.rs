//! The layered request parser: chain of extraction stages plus the
//! longest-run filter.

use casedraft_core::{DiscoveryKind, DiscoveryQuestion};
use tracing::{debug, warn};

use crate::patterns::patterns_for;
use crate::sections::{isolate_section, normalize_text};
use crate::stages::{block_pass, numbered_pass, structured_pass};

/// Regex-based parser for one discovery type.
#[derive(Debug, Clone, Copy)]
pub struct RequestParser {
    kind: DiscoveryKind,
}

impl RequestParser {
    pub fn new(kind: DiscoveryKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> DiscoveryKind {
        self.kind
    }

    /// Extract numbered questions from raw document text.
    ///
    /// Never fails: unrecognizable input yields an empty list. The first
    /// stage to find anything wins; earlier stages' misses are not also
    /// run.
    pub fn parse(&self, raw: &str) -> Vec<DiscoveryQuestion> {
        let patterns = patterns_for(self.kind);
        let text = normalize_text(raw);
        let section = isolate_section(patterns, &text);

        let mut questions = structured_pass(patterns, section);
        if questions.is_empty() {
            debug!(kind = %self.kind, "Structured pass found nothing, trying numbered pass");
            questions = numbered_pass(patterns, section);
        }
        if questions.is_empty() {
            debug!(kind = %self.kind, "Numbered pass found nothing, trying block pass");
            questions = block_pass(section);
        }

        if questions.is_empty() {
            warn!(kind = %self.kind, "No questions recognized in document");
            return questions;
        }

        if patterns.longest_run {
            questions = longest_contiguous_run(questions);
        }

        debug!(kind = %self.kind, count = questions.len(), "Parsed discovery questions");
        questions
    }
}

/// Keep only the longest run of consecutively-numbered questions.
///
/// Discards accidental matches from numbered definitions preambles. A
/// legitimately non-contiguous list (a withdrawn request number) loses
/// everything after the gap; that is a known limitation of the
/// heuristic. Questions with non-integer numbers bypass it entirely.
fn longest_contiguous_run(questions: Vec<DiscoveryQuestion>) -> Vec<DiscoveryQuestion> {
    let numbers: Option<Vec<u64>> = questions
        .iter()
        .map(|q| q.number.parse::<u64>().ok())
        .collect();
    let numbers = match numbers {
        Some(n) if n.len() > 1 => n,
        _ => return questions,
    };

    let mut best = (0usize, 1usize); // (start, len)
    let mut run_start = 0usize;
    for i in 1..numbers.len() {
        if numbers[i] != numbers[i - 1] + 1 {
            if i - run_start > best.1 {
                best = (run_start, i - run_start);
            }
            run_start = i;
        }
    }
    if numbers.len() - run_start > best.1 {
        best = (run_start, numbers.len() - run_start);
    }

    if best.1 < questions.len() {
        debug!(
            kept = best.1,
            dropped = questions.len() - best.1,
            "Longest-run filter discarded disjoint numbered group"
        );
    }
    questions
        .into_iter()
        .skip(best.0)
        .take(best.1)
        .collect()
}
