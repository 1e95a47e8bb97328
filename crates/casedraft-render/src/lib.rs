//! Response formatting and document rendering support.
//!
//! Takes parsed questions, drafted responses and the user's standard
//! disposition selections, and assembles the rich-formatted response
//! document plus the flat context that the Office template renderer
//! consumes. The renderer itself is a boundary trait; template field
//! names are an external contract burned into the template files.

pub mod context;
pub mod merge;
pub mod richtext;
pub mod renderer;

pub use context::RenderContext;
pub use merge::{disposition_sentence, SelectionMerger};
pub use renderer::{TemplateRenderer, TextTemplateRenderer};
pub use richtext::{Paragraph, ResponseDocument, TextRun};

/// Error types for rendering operations
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateMissing(String),

    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
