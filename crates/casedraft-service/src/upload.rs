//! Scoped temporary upload files.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;

/// An uploaded document written to a unique temporary path.
///
/// The file is removed when the guard drops, so every exit path of the
/// pipeline (success, parse failure or error) cleans up after itself.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write the uploaded bytes to a unique file under `dir`.
    pub fn write(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<Self> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin");
        let path = dir.join(format!("upload-{}.{}", Uuid::new_v4(), extension));
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote temp upload");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "Failed to remove temp upload");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let upload = TempUpload::write(dir.path(), "requests.pdf", b"content").unwrap();
            assert!(upload.path().exists());
            assert_eq!(upload.path().extension().unwrap(), "pdf");
            upload.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_unique_paths_per_upload() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempUpload::write(dir.path(), "doc.pdf", b"a").unwrap();
        let b = TempUpload::write(dir.path(), "doc.pdf", b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
