//! Core types and shared infrastructure for the casedraft discovery stack.
//!
//! This crate holds the data model that flows through the parsing and
//! drafting pipeline (questions, case details, parse results), the
//! discovery-type taxonomy, the application configuration, and the
//! transient store that carries a parse result between the parse step
//! and the render step of the two-step workflow.

pub mod config;
pub mod store;
pub mod types;

pub use config::{CasedraftConfig, ModelConfig};
pub use store::{parse_result_key, MemoryParseStore, MemoryStoreConfig, ParseStore};
pub use types::{CaseDetails, DiscoveryKind, DiscoveryQuestion, ParseResult, WorkflowKind};

/// Error types for core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Store("entry too large".to_string());
        assert!(err.to_string().contains("Store error"));
    }
}
