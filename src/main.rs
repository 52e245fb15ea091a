//! vidscrub CLI
//!
//! Inspect, clip and clean video files with ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! vidscrub inspect "Movie (2001).mkv"
//! vidscrub clip --start 00:10:00 --duration 00:00:30 "Movie (2001).mkv"
//! vidscrub clean --downmix --langs eng,fre --h265 "Movie (2001).mkv"
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

use vidscrub::cli::{commands, Cli};
use vidscrub::config_initialization::initialize_settings;
use vidscrub::output;
use vidscrub::utils::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match initialize_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let logging = LoggingConfig {
        verbosity: cli.verbose,
        log_file: settings.log_target().map(|p| p.to_path_buf()),
    };
    if let Err(e) = init_logging(&logging) {
        output::error(&e.to_string());
        return ExitCode::FAILURE;
    }
    debug!(
        "Settings: languages {:?}, cache {}",
        settings.keep_languages,
        settings.cache_dir.display()
    );

    match commands::execute(cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
