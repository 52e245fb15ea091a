// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
///
/// Every variant except `BadArgs`, `UnsupportedContainer` and
/// `ConflictingCodecs` is fatal for the file being processed only; the batch
/// driver decides whether to continue with the next file.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// File not found
    #[error("File '{0}' does not exist")]
    FileNotFound(String),
    /// File extension is not a known video container
    #[error("File {0} is not a video file")]
    UnsupportedContainer(String),
    /// Both H.265 and VP9 were requested
    #[error("Cannot convert to both H265 and VP9")]
    ConflictingCodecs,
    /// ffprobe failed; carries the tool's diagnostic text verbatim
    #[error("{0}")]
    ProbeFail(String),
    /// No playable video stream
    #[error("No video streams found")]
    NoVideoStreams,
    /// No audio stream
    #[error("No audio streams found")]
    NoAudioStreams,
    /// Neither the container nor the first video stream report a duration
    #[error("Could not calculate video duration")]
    DurationUnknown,
    /// ffmpeg failed
    #[error("ffmpeg failed: {0}")]
    EncodeFail(String),
    /// File system operation failed
    #[error("File system error: {0}")]
    FsFail(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
