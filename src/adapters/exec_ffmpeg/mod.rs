//! FFmpeg execution adapter
//!
//! Runs one ffmpeg pass with progress reporting on stdout and collects
//! stderr so a failure can be reported with ffmpeg's own diagnostic.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, trace};

use crate::domain::errors::DomainError;
use crate::engine::progress::{ProgressDisplay, ProgressParser};
use crate::ports::{EncodePort, EncodeRequest};

/// Lines of stderr kept for error messages
const STDERR_TAIL_LINES: usize = 5;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    ffmpeg_path: PathBuf,
    show_progress: bool,
}

impl FFmpegAdapter {
    /// Use the ffmpeg binary found on `PATH`
    pub fn new(show_progress: bool) -> Self {
        Self::with_binary(PathBuf::from("ffmpeg"), show_progress)
    }

    pub fn with_binary(ffmpeg_path: PathBuf, show_progress: bool) -> Self {
        Self {
            ffmpeg_path,
            show_progress,
        }
    }

    /// Request arguments plus the progress reporting flags
    fn process_args(request: &EncodeRequest) -> Vec<String> {
        let mut args = vec![
            "-progress".to_string(),
            "pipe:1".to_string(),
            "-nostats".to_string(),
        ];
        args.extend(request.command_args());
        args
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl EncodePort for FFmpegAdapter {
    async fn encode(&self, request: &EncodeRequest) -> Result<(), DomainError> {
        info!("{}", request.title);
        trace!("FFMPEG: {}", self.render_command(request));

        let mut child = Command::new(&self.ffmpeg_path)
            .args(Self::process_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DomainError::EncodeFail(format!(
                    "failed to run {}: {}",
                    self.ffmpeg_path.display(),
                    e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DomainError::EncodeFail("ffmpeg stdout unavailable".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DomainError::EncodeFail("ffmpeg stderr unavailable".to_string()))?;

        // Drain stderr concurrently so ffmpeg never blocks on a full pipe
        let stderr_task = tokio::spawn(async move {
            let mut buffer = String::new();
            let _ = stderr.read_to_string(&mut buffer).await;
            buffer
        });

        let parser = ProgressParser::new(request.duration_seconds);
        let display = if self.show_progress {
            ProgressDisplay::new(&request.title)
        } else {
            ProgressDisplay::hidden()
        };

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(event) = parser.parse_line(&line) {
                display.apply(event);
            }
        }

        let status = child.wait().await?;
        display.finish();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let tail = stderr_tail(&stderr);
            let message = if tail.is_empty() {
                format!("exited with {}", status)
            } else {
                tail
            };
            return Err(DomainError::EncodeFail(message));
        }

        debug!("FFMPEG: wrote {}", request.output.display());
        Ok(())
    }

    fn render_command(&self, request: &EncodeRequest) -> String {
        let mut parts = vec![self.ffmpeg_path.display().to_string()];
        parts.extend(request.command_args().into_iter().map(|arg| {
            if arg.contains(' ') || arg.contains('|') {
                format!("'{}'", arg)
            } else {
                arg
            }
        }));
        parts.join(" ")
    }
}
