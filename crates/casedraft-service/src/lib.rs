//! Discovery pipeline orchestration.
//!
//! Hosts the static document-type registry, the text-extractor boundary
//! and the orchestrator that sequences parse → prompt → model →
//! response decode for the HTTP layer's two-step workflow.

pub mod extract;
pub mod orchestrator;
pub mod registry;
pub mod upload;

pub use extract::{PlainTextExtractor, TextExtractor};
pub use orchestrator::DiscoveryService;
pub use registry::{list_types, list_types_by_workflow, lookup, DiscoveryTypeConfig, ParserKind};
pub use upload::TempUpload;

/// Error types for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Unsupported discovery type: {0}")]
    UnsupportedType(String),

    #[error("Template not found: {0}")]
    TemplateMissing(String),

    #[error("Rendering failed: {0}")]
    Rendering(#[from] casedraft_render::RenderError),

    #[error("Store error: {0}")]
    Core(#[from] casedraft_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_names_the_key() {
        let err = ServiceError::UnsupportedType("bogus_type".to_string());
        assert!(err.to_string().contains("bogus_type"));
    }
}
