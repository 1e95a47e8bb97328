//! Minimal rich-text model for rendered responses.
//!
//! The layout is a legal-drafting convention: bold and underlined
//! headers, tab-indented body paragraphs, a fixed font. The template
//! renderer maps this structure onto the Office document.

use serde::{Deserialize, Serialize};

/// Font applied to the whole response block, by drafting convention.
pub const RESPONSE_FONT: &str = "Times New Roman";

/// One styled run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub underline: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            underline: false,
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            underline: true,
        }
    }
}

/// One paragraph; `indented` renders with a leading tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    #[serde(default)]
    pub indented: bool,
}

impl Paragraph {
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::header(text)],
            indented: false,
        }
    }

    pub fn indented(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            indented: true,
        }
    }

    fn plain_text(&self) -> String {
        let body: String = self.runs.iter().map(|r| r.text.as_str()).collect();
        if self.indented {
            format!("\t{}", body)
        } else {
            body
        }
    }
}

/// The assembled response block for one rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDocument {
    pub font: String,
    pub paragraphs: Vec<Paragraph>,
}

impl ResponseDocument {
    pub fn new() -> Self {
        Self {
            font: RESPONSE_FONT.to_string(),
            paragraphs: Vec::new(),
        }
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Flattened text form, for previews and logging.
    pub fn to_plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

impl Default for ResponseDocument {
    fn default() -> Self {
        Self::new()
    }
}
