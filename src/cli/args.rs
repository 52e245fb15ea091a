//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Video files to inspect
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print the full ffprobe JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the clip command
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Video files to clip
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Start position (HH:MM:SS)
    #[arg(short, long, default_value = "00:00:00")]
    pub start: String,

    /// Length of the clip (HH:MM:SS)
    #[arg(short, long, default_value = "00:01:00")]
    pub duration: String,

    /// Output directory (default: next to the input)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Replace existing output instead of picking a new name
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Video files to clean
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output directory (default: next to the input)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Replace the input file with the cleaned result
    #[arg(long)]
    pub overwrite: bool,

    /// Add a stereo track when only surround audio is kept
    #[arg(long)]
    pub downmix: bool,

    /// Drop audio in the original language unless it is a kept language
    #[arg(long)]
    pub drop_original: bool,

    /// Keep every subtitle track
    #[arg(long)]
    pub keep_subs: bool,

    /// Keep commentary and SDH tracks
    #[arg(long)]
    pub keep_commentary: bool,

    /// Keep subtitles in kept languages even for local-language content
    #[arg(long)]
    pub keep_local_subs: bool,

    /// Drop subtitles in kept languages even for foreign-language content
    #[arg(long)]
    pub drop_local_subs: bool,

    /// Languages to keep, comma separated ISO-639 codes (overrides config)
    #[arg(long, value_delimiter = ',', value_name = "CODES")]
    pub langs: Option<Vec<String>>,

    /// Convert video to H265
    #[arg(long)]
    pub h265: bool,

    /// Convert video to VP9 in a WebM container
    #[arg(long)]
    pub vp9: bool,

    /// Scale video down to 1920 pixels wide
    #[arg(long = "1080p")]
    pub video_1080: bool,

    /// Convert or scale even when the video already satisfies the target
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the cache command
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Remove everything in the scratch directory
    #[arg(long)]
    pub clear: bool,
}
