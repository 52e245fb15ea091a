//! vidscrub library
//!
//! Inspects, clips and cleans video files by driving `ffprobe` and `ffmpeg`.
//! The stream-selection policy in [`streams`] decides which audio, video and
//! subtitle tracks survive; [`engine`] turns those decisions into a chain of
//! encoder passes over temporary files.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod language;
pub mod output;
pub mod ports;
pub mod probe;
pub mod streams;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{ProbeResult, SelectionConfig, Stream, TargetCodec};
pub use error::{ScrubError, ScrubResult};
pub use language::LanguageCode;
