// Domain rules - Input validation applied before any processing starts

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;

/// File extensions accepted as video containers
pub const VIDEO_CONTAINERS: &[&str] = &[
    "3gp", "avi", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "mts", "ogv", "ts",
    "vob", "webm", "wmv",
];

/// Business rules for input files
pub struct InputRules;

impl InputRules {
    /// Check that a path exists, is a regular file and has a video container
    /// extension. Returns the absolute path.
    pub fn validate_video_file(path: &Path) -> Result<PathBuf, DomainError> {
        let display = path.display().to_string();

        if !path.is_file() {
            return Err(DomainError::FileNotFound(display));
        }

        if !Self::is_video_container(path) {
            return Err(DomainError::UnsupportedContainer(display));
        }

        std::path::absolute(path).map_err(DomainError::from)
    }

    /// Validate every input up front so that a bad argument aborts the batch
    /// before any file is touched
    pub fn validate_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DomainError> {
        paths.iter().map(|p| Self::validate_video_file(p)).collect()
    }

    /// Whether the extension is a known video container
    pub fn is_video_container(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_CONTAINERS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// Business rules for the clip subcommand
pub struct ClipRules;

impl ClipRules {
    /// Parse and validate `--start` and `--duration`
    pub fn parse_range(start: &str, duration: &str) -> Result<(ClockTime, ClockTime), DomainError> {
        let start = ClockTime::parse(start)
            .map_err(|_| DomainError::BadArgs("--start must be in format HH:MM:SS".to_string()))?;
        let duration = ClockTime::parse(duration).map_err(|_| {
            DomainError::BadArgs("--duration must be in format HH:MM:SS".to_string())
        })?;

        if duration.as_seconds() == 0 {
            return Err(DomainError::BadArgs(
                "--duration must be longer than zero".to_string(),
            ));
        }

        Ok((start, duration))
    }
}
