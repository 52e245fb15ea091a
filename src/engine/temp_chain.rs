//! Chain of intermediate files for one video
//!
//! Each encoder pass reads the chain head and appends its output. All
//! produced files live in one scratch directory owned by the chain, which is
//! removed on [`TempChain::cleanup`] or when the chain is dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;

#[derive(Debug)]
pub struct TempChain {
    original: PathBuf,
    produced: Vec<PathBuf>,
    dir: Option<TempDir>,
}

impl TempChain {
    /// Create a chain for `original` with a fresh scratch directory under
    /// `scratch_root`
    pub fn new(original: &Path, scratch_root: &Path) -> Result<Self, DomainError> {
        std::fs::create_dir_all(scratch_root).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create scratch directory {}: {}",
                scratch_root.display(),
                e
            ))
        })?;

        let stem = original
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", stem))
            .tempdir_in(scratch_root)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp directory: {}", e)))?;
        debug!("TEMP: Scratch directory {}", dir.path().display());

        Ok(Self {
            original: original.to_path_buf(),
            produced: Vec::new(),
            dir: Some(dir),
        })
    }

    /// Latest produced file, or the original before any pass ran
    pub fn head(&self) -> &Path {
        self.produced.last().unwrap_or(&self.original)
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Number of passes recorded so far
    pub fn len(&self) -> usize {
        self.produced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.produced.is_empty()
    }

    /// Record a produced file as the new head
    pub fn append(&mut self, path: PathBuf) {
        debug!("TEMP: New head {}", path.display());
        self.produced.push(path);
    }

    /// Path for the next pass: `<n>_<step><suffix>` in the scratch directory.
    ///
    /// The suffix defaults to the head's extension.
    pub fn next_path(&self, step: &str, suffix: Option<&str>) -> Result<PathBuf, DomainError> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| DomainError::FsFail("temp chain used after cleanup".to_string()))?;

        let suffix = match suffix {
            Some(s) => s.to_string(),
            None => self
                .head()
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        };

        Ok(dir
            .path()
            .join(format!("{}_{}{}", self.produced.len() + 1, step, suffix)))
    }

    /// Delete every produced file and the scratch directory. Safe to call
    /// more than once.
    pub fn cleanup(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let path = dir.path().to_path_buf();
        if let Err(e) = dir.close() {
            warn!("TEMP: Failed to remove {}: {}", path.display(), e);
        } else {
            debug!("TEMP: Removed {}", path.display());
        }
        self.produced.clear();
    }
}

impl Drop for TempChain {
    fn drop(&mut self) {
        self.cleanup();
    }
}
