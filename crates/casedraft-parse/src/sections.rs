//! Section isolation: cut the substantive request section out of the
//! surrounding caption, definitions and signature boilerplate.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::patterns::TypePatterns;

lazy_static! {
    /// Signature-block markers that end the substantive section.
    static ref TRAILER: Regex =
        Regex::new(r"(?im)^\s*(?:DATED:|RESPECTFULLY SUBMITTED)").unwrap();
}

/// Normalize line endings once, at the top of the pipeline.
pub fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Locate the start of the substantive section and discard everything
/// before it, plus any trailing signature block.
///
/// Resolution order: type-specific heading, then the looser keyword
/// search, then the full text unchanged.
pub fn isolate_section<'a>(patterns: &TypePatterns, text: &'a str) -> &'a str {
    let start = patterns
        .headings
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.start())
        .or_else(|| {
            patterns.loose_heading.find(text).map(|m| {
                debug!("No structured heading found, using loose keyword match");
                // Back up to the start of the matched line so the heading
                // line itself survives.
                text[..m.start()].rfind('\n').map(|i| i + 1).unwrap_or(0)
            })
        })
        .unwrap_or_else(|| {
            debug!("No heading found, parsing full text");
            0
        });

    let section = &text[start..];
    match TRAILER.find(section) {
        Some(m) => &section[..m.start()],
        None => section,
    }
}
