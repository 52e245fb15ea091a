//! CLI module for vidscrub
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{CacheArgs, CleanArgs, ClipArgs, InspectArgs};

/// vidscrub - Inspect, clip and clean video files with ffmpeg
///
/// Removes unwanted audio and subtitle tracks, puts streams in a sensible
/// order, adds stereo downmixes and optionally converts to H265 or VP9.
#[derive(Parser, Debug)]
#[command(name = "vidscrub")]
#[command(about = "Inspect, clip and clean video files with ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the ffmpeg commands instead of running them
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "VIDSCRUB_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the streams of video files
    Inspect(InspectArgs),
    /// Cut a segment out of video files without re-encoding
    Clip(ClipArgs),
    /// Filter, reorder and optionally convert video files
    Clean(CleanArgs),
    /// Show or clear the scratch directory
    Cache(CacheArgs),
}
