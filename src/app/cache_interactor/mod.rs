// Cache interactor - Lists or empties the scratch directory

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::utils::format_file_size;

/// One entry below the cache directory
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Path relative to the cache directory
    pub path: PathBuf,
    /// Nesting level, 1 for direct children
    pub depth: usize,
    pub is_dir: bool,
    pub size_bytes: u64,
}

impl CacheEntry {
    /// Indented tree line, sizes shown for files only
    pub fn display_line(&self) -> String {
        let indent = "  ".repeat(self.depth.saturating_sub(1));
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.is_dir {
            format!("{}{}/", indent, name)
        } else {
            format!("{}{} ({})", indent, name, format_file_size(self.size_bytes))
        }
    }
}

/// Interactor for the cache use case
pub struct CacheInteractor {
    cache_dir: PathBuf,
}

impl CacheInteractor {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Every file and directory below the cache directory, depth first.
    /// A missing cache directory is empty.
    pub fn list(&self) -> Result<Vec<CacheEntry>, DomainError> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.cache_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| DomainError::FsFail(e.to_string()))?;
            let metadata = entry
                .metadata()
                .map_err(|e| DomainError::FsFail(e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(&self.cache_dir)
                .unwrap_or(entry.path())
                .to_path_buf();

            entries.push(CacheEntry {
                path: relative,
                depth: entry.depth(),
                is_dir: metadata.is_dir(),
                size_bytes: if metadata.is_file() { metadata.len() } else { 0 },
            });
        }
        debug!("CACHE: {} entries", entries.len());
        Ok(entries)
    }

    /// Remove everything inside the cache directory, keeping the directory.
    /// Returns the number of top-level entries removed.
    pub fn clear(&self) -> Result<usize, DomainError> {
        if !self.cache_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
            removed += 1;
        }
        info!("CACHE: Cleared {}", self.cache_dir.display());
        Ok(removed)
    }
}
