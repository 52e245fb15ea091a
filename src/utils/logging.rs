//! Logging setup: stderr output plus an optional log file

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::error::{ScrubError, ScrubResult};

/// Logging options resolved from CLI flags and settings
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// Mirror log lines into this file
    pub log_file: Option<PathBuf>,
}

/// Filter directive for a verbosity level: info by default, debug with one
/// `-v`, trace with two or more. Dependencies only log warnings.
pub fn filter_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,vidscrub={}", level)
}

/// Install the global subscriber. `RUST_LOG` replaces the verbosity-based
/// filter when set.
pub fn init_logging(config: &LoggingConfig) -> ScrubResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config.verbosity)));

    let file_layer = match &config.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}

fn open_log_file(path: &Path) -> ScrubResult<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ScrubError::InvalidConfig {
            message: format!("cannot open log file {}: {}", path.display(), e),
        })
}
