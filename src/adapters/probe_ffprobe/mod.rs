//! FFprobe adapter for media file probing
//!
//! Shells out to `ffprobe -v error -print_format json -show_format -show_streams`
//! and parses the document with [`crate::probe::parse_probe_output`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::domain::errors::DomainError;
use crate::domain::model::ProbeResult;
use crate::ports::ProbePort;
use crate::probe::parse_probe_output;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FFprobeAdapter {
    /// Use the ffprobe binary found on `PATH`
    pub fn new() -> Self {
        Self::with_binary(PathBuf::from("ffprobe"))
    }

    pub fn with_binary(ffprobe_path: PathBuf) -> Self {
        Self { ffprobe_path }
    }

    fn args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            path.display().to_string(),
        ]
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, DomainError> {
        debug!("PROBE: {}", path.display());
        let output = Command::new(&self.ffprobe_path)
            .args(Self::args(path))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!(
                    "failed to run {}: {}",
                    self.ffprobe_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("ffprobe exited with {} for {}", output.status, path.display())
            } else {
                stderr
            };
            return Err(DomainError::ProbeFail(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!("PROBE: {} bytes of JSON", stdout.len());
        parse_probe_output(&stdout, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_arguments_request_json() {
        let args = FFprobeAdapter::args(Path::new("/media/a.mkv"));
        assert_eq!(args.first().map(String::as_str), Some("-v"));
        // quiet would also silence the reason ffprobe gives for a failure
        assert_eq!(args.get(1).map(String::as_str), Some("error"));
        assert!(args.contains(&"-show_streams".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/media/a.mkv"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_probe_failure() {
        let adapter = FFprobeAdapter::with_binary(PathBuf::from("/nonexistent/ffprobe-binary"));
        let err = adapter.probe(Path::new("/media/a.mkv")).await.unwrap_err();
        assert!(matches!(err, DomainError::ProbeFail(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_ffprobe_reports_its_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ffprobe");
        std::fs::write(
            &script,
            "#!/bin/sh\necho \"$7: Invalid data found when processing input\" >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let adapter = FFprobeAdapter::with_binary(script);
        let err = adapter.probe(Path::new("/media/broken.mkv")).await.unwrap_err();
        match err {
            DomainError::ProbeFail(message) => assert_eq!(
                message,
                "/media/broken.mkv: Invalid data found when processing input"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
