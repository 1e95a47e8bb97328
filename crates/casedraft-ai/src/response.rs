//! Line-oriented parsing of drafted responses out of model output.

use casedraft_core::DiscoveryKind;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

lazy_static! {
    /// Secondary number extraction, used when the split-based extraction
    /// yields something that is not a number.
    static ref LABEL_NUMBER: Regex = Regex::new(r"NO\.\s*([0-9][0-9.]*)").unwrap();
}

fn looks_like_number(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.chars().any(|c| c.is_ascii_digit())
}

/// Pull the question number (and any same-line text after the colon) out
/// of a label line such as "RESPONSE TO REQUEST FOR PRODUCTION NO.3: foo".
///
/// Primary extraction is the text between "NO." and the next ":". When
/// that is not a plausible number, a regex pass is attempted; a number is
/// never invented, so both failing means the line is skipped.
pub(crate) fn number_and_rest(line: &str) -> Option<(String, Option<String>)> {
    let after = line.split("NO.").nth(1)?;
    let (candidate, rest) = match after.split_once(':') {
        Some((num, rest)) => (num.trim().to_string(), Some(rest.trim().to_string())),
        None => (after.trim().to_string(), None),
    };

    if looks_like_number(&candidate) {
        return Some((candidate, rest));
    }

    match LABEL_NUMBER.captures(line) {
        Some(caps) => Some((caps[1].trim_end_matches('.').to_string(), rest)),
        None => {
            warn!(line = %line, "Could not extract question number from label line");
            None
        }
    }
}

/// Decode the model's free text into question-number → response-text.
///
/// Two-marker state machine: a response-label line opens a capture, a
/// bare request-label line (no "RESPONSE TO") closes it, everything else
/// is appended verbatim to the open capture.
pub fn parse_responses(raw: &str, kind: DiscoveryKind) -> BTreeMap<String, String> {
    let request_label = kind.request_label();
    let response_label = kind.response_label();

    let mut responses = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    let flush = |current: &mut Option<(String, String)>,
                 responses: &mut BTreeMap<String, String>| {
        if let Some((number, body)) = current.take() {
            responses.insert(number, body.trim_end().to_string());
        }
    };

    for line in raw.lines() {
        if line.contains(response_label) {
            flush(&mut current, &mut responses);
            match number_and_rest(line) {
                Some((number, rest)) => {
                    let mut body = String::new();
                    if let Some(rest) = rest {
                        if !rest.is_empty() {
                            body.push_str(&rest);
                            body.push('\n');
                        }
                    }
                    current = Some((number, body));
                }
                None => {
                    // Known fragility: the number could not be recovered,
                    // so this response is dropped rather than invented.
                }
            }
        } else if line.contains(request_label) {
            // A new request heading ends the prior response capture
            // without opening a new one.
            flush(&mut current, &mut responses);
        } else if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    flush(&mut current, &mut responses);

    responses
}
