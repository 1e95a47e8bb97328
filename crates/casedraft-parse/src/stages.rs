//! The ordered extraction stages.
//!
//! Each stage is a pure function from section text to a list of
//! questions; the parser tries them in order and stops at the first
//! non-empty result, so a document is handled by exactly one stage.

use casedraft_core::DiscoveryQuestion;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::patterns::TypePatterns;

/// How many lines after a matched heading may be absorbed as
/// continuation text.
const MAX_CONTINUATION: usize = 10;

lazy_static! {
    /// A line that opens a new numbered item, ending continuation.
    static ref NUMBERED_HEAD: Regex = Regex::new(r"^\d+(?:\.\d+)?\s*[.):]").unwrap();
    /// Informal numbered-list item: "3. text" or "3) text"
    static ref LIST_ITEM: Regex = Regex::new(r"^(\d+)[.)]\s*(.*)$").unwrap();
    /// A line holding nothing but an integer
    static ref STANDALONE_NUMBER: Regex = Regex::new(r"^(\d+)\s*$").unwrap();
    /// First integer inside a text block
    static ref FIRST_INTEGER: Regex = Regex::new(r"\d+").unwrap();
    /// Blank-line block delimiter (tolerates whitespace-only lines)
    static ref BLOCK_SPLIT: Regex = Regex::new(r"\n\s*\n").unwrap();
    /// Lettered subpart marker: "(a)", "(b)", ...
    static ref SUBPART_MARKER: Regex = Regex::new(r"\(([a-z])\)\s*").unwrap();
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split lettered subparts out of a request body.
///
/// Returns the lead-in sentence and the subpart texts (markers stripped).
/// Bodies whose markers do not start at "(a)" are left intact: a stray
/// parenthesized letter mid-sentence is not a subpart list.
pub fn split_subparts(text: &str) -> (String, Vec<String>) {
    let markers: Vec<_> = SUBPART_MARKER.captures_iter(text).collect();
    let starts_at_a = markers
        .first()
        .map(|c| &c[1] == "a")
        .unwrap_or(false);
    if markers.len() < 2 || !starts_at_a {
        return (text.to_string(), Vec::new());
    }

    let positions: Vec<(usize, usize)> = SUBPART_MARKER
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let lead = collapse_ws(&text[..positions[0].0]);
    let mut subparts = Vec::with_capacity(positions.len());
    for (idx, &(_, body_start)) in positions.iter().enumerate() {
        let body_end = positions
            .get(idx + 1)
            .map(|&(next_start, _)| next_start)
            .unwrap_or(text.len());
        let body = collapse_ws(&text[body_start..body_end]);
        if !body.is_empty() {
            subparts.push(body);
        }
    }
    (lead, subparts)
}

fn is_item_line(patterns: &TypePatterns, line: &str) -> bool {
    patterns.items.iter().any(|re| re.is_match(line))
}

/// Absorb continuation lines after a matched item into `body`.
///
/// Stops at a blank line, a new item heading or a numbered line, and
/// never looks more than `MAX_CONTINUATION` lines ahead. Returns how many
/// lines were consumed.
fn absorb_continuation(
    patterns: &TypePatterns,
    lines: &[&str],
    start: usize,
    body: &mut String,
) -> usize {
    let mut consumed = 0;
    let end = lines.len().min(start + MAX_CONTINUATION);
    for line in &lines[start..end] {
        let next = line.trim();
        if next.is_empty() || is_item_line(patterns, next) || NUMBERED_HEAD.is_match(next) {
            break;
        }
        body.push(' ');
        body.push_str(next);
        consumed += 1;
    }
    consumed
}

fn finish_question(number: String, body: String) -> DiscoveryQuestion {
    let body = collapse_ws(&body);
    let (lead, subparts) = split_subparts(&body);
    DiscoveryQuestion::new(number, lead).with_subparts(subparts)
}

/// Stage 1: scan for the type's structured item headings.
pub fn structured_pass(patterns: &TypePatterns, section: &str) -> Vec<DiscoveryQuestion> {
    let lines: Vec<&str> = section.lines().collect();
    let mut questions = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        let caps = patterns.items.iter().find_map(|re| re.captures(line));
        match caps {
            Some(caps) => {
                let number = caps[1].to_string();
                let mut body = caps
                    .get(2)
                    .map(|g| g.as_str().to_string())
                    .unwrap_or_default();
                let consumed = absorb_continuation(patterns, &lines, i + 1, &mut body);
                trace!(number = %number, consumed, "Structured item matched");
                questions.push(finish_question(number, body));
                i += consumed + 1;
            }
            None => i += 1,
        }
    }
    questions
}

/// Stage 2: informally numbered lists ("1. text", or a bare integer line
/// followed by the text on the next line).
pub fn numbered_pass(patterns: &TypePatterns, section: &str) -> Vec<DiscoveryQuestion> {
    let lines: Vec<&str> = section.lines().collect();
    let mut questions = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(caps) = LIST_ITEM.captures(line) {
            let trailing = caps[2].trim().to_string();
            if !trailing.is_empty() {
                let number = caps[1].to_string();
                let mut body = trailing;
                let consumed = absorb_continuation(patterns, &lines, i + 1, &mut body);
                questions.push(finish_question(number, body));
                i += consumed + 1;
                continue;
            }
        }

        if let Some(caps) = STANDALONE_NUMBER.captures(line) {
            let next = lines.get(i + 1).map(|l| l.trim()).unwrap_or("");
            if !next.is_empty() && !STANDALONE_NUMBER.is_match(next) && !LIST_ITEM.is_match(next) {
                let number = caps[1].to_string();
                let mut body = next.to_string();
                let consumed = absorb_continuation(patterns, &lines, i + 2, &mut body);
                questions.push(finish_question(number, body));
                i += consumed + 2;
                continue;
            }
        }

        i += 1;
    }
    questions
}

/// Stage 3: aggressive fallback over whitespace-delimited blocks. The
/// first integer in a block is taken as the number, the remainder as
/// text.
pub fn block_pass(section: &str) -> Vec<DiscoveryQuestion> {
    let mut questions = Vec::new();

    for block in BLOCK_SPLIT.split(section) {
        let collapsed = collapse_ws(block);
        if collapsed.is_empty() {
            continue;
        }
        if let Some(m) = FIRST_INTEGER.find(&collapsed) {
            let number = m.as_str().to_string();
            let text = collapsed[m.end()..]
                .trim_start_matches(|c: char| c == '.' || c == ':' || c == ')' || c == '-')
                .trim()
                .to_string();
            if !text.is_empty() {
                questions.push(finish_question(number, text));
            }
        }
    }
    questions
}
