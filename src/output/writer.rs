//! Output file writer implementation

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::errors::DomainError;

/// Copies the final intermediate file to its destination
#[derive(Debug, Clone, Default)]
pub struct OutputWriter {
    out_dir: Option<PathBuf>,
    overwrite: bool,
}

impl OutputWriter {
    /// `out_dir` defaults to the input's directory
    pub fn new(out_dir: Option<PathBuf>, overwrite: bool) -> Self {
        Self { out_dir, overwrite }
    }

    /// Destination for `produced`, named after the input's stem with the
    /// produced file's extension.
    ///
    /// Without overwrite an existing file is never replaced; `_1`, `_2`, ...
    /// is appended to the stem until the name is free.
    pub fn destination(&self, input: &Path, produced: &Path) -> PathBuf {
        let dir = self
            .out_dir
            .clone()
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = produced
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let candidate = dir.join(format!("{}{}", stem, suffix));
        if self.overwrite || !candidate.exists() {
            return candidate;
        }

        (1..)
            .map(|n| dir.join(format!("{}_{}{}", stem, n, suffix)))
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }

    /// Copy `produced` to its destination and return the final path.
    ///
    /// The copy goes to a hidden sibling first and is renamed into place.
    /// With overwrite, the input is deleted when the result landed elsewhere.
    pub fn write_output(&self, input: &Path, produced: &Path) -> Result<PathBuf, DomainError> {
        let destination = self.destination(input, produced);

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DomainError::FsFail("Invalid output file path".to_string()))?;
        let staging = destination.with_file_name(format!(".tmp_{}", file_name));

        info!("Writing output file: {}", destination.display());
        std::fs::copy(produced, &staging).map_err(|e| {
            DomainError::FsFail(format!("Failed to copy {}: {}", produced.display(), e))
        })?;
        std::fs::rename(&staging, &destination).map_err(|e| {
            let _ = std::fs::remove_file(&staging);
            DomainError::FsFail(format!("Failed to move output into place: {}", e))
        })?;

        if self.overwrite && !same_file(&destination, input) {
            debug!("Delete: {}", input.display());
            std::fs::remove_file(input).map_err(|e| {
                DomainError::FsFail(format!("Failed to delete {}: {}", input.display(), e))
            })?;
        }

        Ok(destination)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
