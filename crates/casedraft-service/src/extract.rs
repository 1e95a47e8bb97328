//! Text-extractor boundary.
//!
//! PDF and DOCX extraction proper live outside this workspace; the
//! pipeline only needs "file in, text or nothing out". `None` means the
//! file was unreadable, which downstream treats as zero questions found,
//! never as an error surfaced to the user.

use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

use crate::Result;

/// Converts an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<Option<String>>;
}

/// Extractor for already-plain-text files, the default for tests and
/// local development.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not read uploaded document");
                Ok(None)
            }
        }
    }
}
