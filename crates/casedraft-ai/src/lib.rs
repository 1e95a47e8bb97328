//! Generative-model integration for the discovery pipeline.
//!
//! Covers the outbound half (prompt construction and the model client
//! boundary) and the inbound half (decoding whatever shape the model
//! answered with back into per-question responses). The model is treated
//! as a black box that returns text; everything here is tolerant of the
//! several output shapes observed in practice.

pub mod assisted;
pub mod client;
pub mod decode;
pub mod prompt;
pub mod response;

pub use assisted::{AssistedParse, AssistedParser};
pub use client::{HttpModelClient, ModelClient, ScriptedModelClient};
pub use decode::{decode_model_output, DecodedItem};
pub use prompt::{objection_excerpt, PromptBuilder};
pub use response::parse_responses;

/// Error types for model-facing operations
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no choices")]
    EmptyCompletion,

    #[error("Could not decode model output: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AiError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
    }
}
