//! Per-request staging area for uploads and generated artifacts.
//!
//! Each request gets a fresh, never-reused temporary tree with an
//! `input/` directory for uploaded files and an `output/` directory the
//! pipeline writes its per-page artifacts into. The whole tree is removed
//! when the [`StagingArea`] goes out of scope — on success, error, and
//! panic paths alike — so concurrent requests can never observe each
//! other's files and nothing leaks across requests.

use crate::error::OcrError;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// A request-exclusive `{input, output}` directory pair.
///
/// Dropping the value deletes the tree recursively. Deletion failures are
/// logged at `warn` and never escalated; cleanup must not mask the
/// request's primary result or error.
pub struct StagingArea {
    // Option so Drop can take ownership and report close() failures.
    root: Option<TempDir>,
    input: PathBuf,
    output: PathBuf,
}

impl StagingArea {
    /// Create a fresh staging tree with empty `input/` and `output/`
    /// directories.
    pub fn acquire() -> Result<Self, OcrError> {
        let root = TempDir::with_prefix("ocr-bridge-")
            .map_err(|source| OcrError::Staging { source })?;
        let input = root.path().join("input");
        let output = root.path().join("output");
        std::fs::create_dir(&input).map_err(|source| OcrError::Staging { source })?;
        std::fs::create_dir(&output).map_err(|source| OcrError::Staging { source })?;
        debug!("staging area at {}", root.path().display());
        Ok(Self {
            root: Some(root),
            input,
            output,
        })
    }

    /// Directory holding the staged uploads.
    pub fn input_dir(&self) -> &Path {
        &self.input
    }

    /// Directory the pipeline artifacts are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    /// Write one uploaded file under `input/`, using only the file-name
    /// component of the client-supplied name so uploads cannot escape the
    /// staging tree.
    ///
    /// Two uploads with the same name in one request overwrite each
    /// other, last write wins, as in the reference server.
    pub async fn stage_file(&self, name: &str, bytes: &Bytes) -> Result<PathBuf, OcrError> {
        let safe_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        let path = self.input.join(safe_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| OcrError::Staging { source })?;
        debug!("staged {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            let path = root.path().to_path_buf();
            if let Err(e) = root.close() {
                warn!("failed to remove staging area {}: {}", path.display(), e);
            }
        }
    }
}
