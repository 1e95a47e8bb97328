//! Extraction of numbered requests from discovery document text.
//!
//! Uploaded discovery documents arrive as messy extracted text: caption
//! pages, definitions preambles, inconsistent heading styles and signature
//! blocks surround the actual numbered requests. This crate isolates the
//! substantive section and then runs an ordered chain of extraction
//! stages (structured heading patterns, a simple numbered-list pass and
//! an aggressive block pass), stopping at the first stage that finds
//! anything.
//!
//! Parsing never fails: unrecognizable input yields an empty list and a
//! warning, and the caller decides how to surface that.

pub mod parser;
pub mod patterns;
pub mod sections;
pub mod stages;

pub use parser::RequestParser;
pub use patterns::{patterns_for, TypePatterns};
pub use sections::{isolate_section, normalize_text};
pub use stages::split_subparts;
