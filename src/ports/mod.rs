// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::model::ProbeResult;

/// Flags placed before `-i` on every encoder invocation
pub const ENCODER_PREPEND: &[&str] = &["-y", "-hide_banner"];

/// Flags placed after the computed arguments on every encoder invocation
pub const ENCODER_APPEND: &[&str] = &["-max_muxing_queue_size", "9999"];

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and return its streams and container metadata.
    ///
    /// Fails with [`DomainError::ProbeFail`] carrying the probe tool's
    /// diagnostic text when the invocation fails or its output is unusable.
    async fn probe(&self, path: &Path) -> Result<ProbeResult, DomainError>;
}

/// One encoder pass
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Stream and codec arguments computed for this pass
    pub args: Vec<String>,
    /// Label shown next to the progress bar
    pub title: String,
    /// Duration of the input, used to turn encoder ticks into percentages
    pub duration_seconds: Option<f64>,
}

impl EncodeRequest {
    /// Full encoder argument list: prepend flags, input, pass arguments,
    /// append flags and the output path
    pub fn command_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ENCODER_PREPEND.iter().map(|s| s.to_string()).collect();
        args.push("-i".to_string());
        args.push(self.input.display().to_string());
        args.extend(self.args.iter().cloned());
        args.extend(ENCODER_APPEND.iter().map(|s| s.to_string()));
        args.push(self.output.display().to_string());
        args
    }
}

/// Port for the external encoder
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Run one pass to completion, writing `request.output`
    async fn encode(&self, request: &EncodeRequest) -> Result<(), DomainError>;

    /// Printable command line for dry runs
    fn render_command(&self, request: &EncodeRequest) -> String;
}

/// Port for a media-management service that can identify a file by name
#[async_trait]
pub trait MediaManagerPort: Send + Sync {
    /// Service name used in log lines
    fn name(&self) -> &str;

    /// External database ID (`tt...`) for a file name, if the service knows it.
    /// Transport and decoding failures are reported as `None`.
    async fn lookup_imdb_id(&self, file_name: &str) -> Option<String>;
}

/// Port for a metadata service that knows a title's original language
#[async_trait]
pub trait MetadataLookupPort: Send + Sync {
    /// Raw original-language code for an external database ID.
    /// Transport and decoding failures are reported as `None`.
    async fn original_language(&self, imdb_id: &str) -> Option<String>;
}
