//! Encoder argument builders for each pipeline stage
//!
//! Everything here is pure: a probe snapshot and the selection config go
//! in, an argument list and a title come out. [`crate::engine::VideoJob`]
//! decides whether a stage runs and invokes the encoder.

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{ClockTime, ProbeResult, SelectionConfig, TargetCodec};
use crate::engine::bitrate::BitrateTargets;
use crate::language::LanguageCode;
use crate::streams::{select_audio, select_subtitles, select_video};

/// Width above which the scale stage has work to do
pub const MAX_1080P_WIDTH: u32 = 1920;

/// One encoder pass: arguments, progress label and temp file naming
#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    pub step: &'static str,
    pub title: String,
    pub args: Vec<String>,
    /// Output container suffix, `None` keeps the input's
    pub suffix: Option<&'static str>,
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Cut `duration` from `start` without re-encoding
pub fn clip_plan(start: ClockTime, duration: ClockTime) -> StagePlan {
    let mut args = vec![
        "-ss".to_string(),
        start.to_string(),
        "-t".to_string(),
        duration.to_string(),
    ];
    args.extend(strings(&["-map", "0", "-c", "copy"]));

    StagePlan {
        step: "clip",
        title: "Clip video".to_string(),
        args,
        suffix: None,
    }
}

pub fn h265_plan(targets: &BitrateTargets) -> StagePlan {
    let args = vec![
        "-map".to_string(),
        "0".to_string(),
        "-c:v".to_string(),
        "libx265".to_string(),
        "-b:v".to_string(),
        format!("{}k", targets.target_kbps),
        "-minrate".to_string(),
        format!("{}k", targets.min_kbps),
        "-maxrate".to_string(),
        format!("{}k", targets.max_kbps),
        "-bufsize".to_string(),
        format!("{}k", targets.current_kbps),
        "-c:a".to_string(),
        "copy".to_string(),
        "-c:s".to_string(),
        "copy".to_string(),
    ];

    StagePlan {
        step: "h265",
        title: "Convert to H.265".to_string(),
        args,
        suffix: None,
    }
}

pub fn vp9_plan() -> StagePlan {
    StagePlan {
        step: "vp9",
        title: "Convert to vp9".to_string(),
        args: strings(&[
            "-map",
            "0",
            "-c:v",
            "libvpx-vp9",
            "-b:v",
            "0",
            "-crf",
            "30",
            "-c:a",
            "libvorbis",
            "-dn",
            "-map_chapters",
            "-1",
            "-c:s",
            "copy",
        ]),
        suffix: Some(".webm"),
    }
}

pub fn scale_1080p_plan() -> StagePlan {
    StagePlan {
        step: "1080p",
        title: "Convert to 1080p".to_string(),
        args: strings(&[
            "-map",
            "0",
            "-filter:v",
            "scale=width=1920:height=-2",
            "-c:a",
            "copy",
            "-c:s",
            "copy",
        ]),
        suffix: None,
    }
}

/// Stream-selection pass: kept video, audio and subtitles copied as they
/// are, plus any synthesized stereo tracks
pub fn process_plan(
    probe: &ProbeResult,
    config: &SelectionConfig,
    original_language: Option<&LanguageCode>,
) -> StagePlan {
    let video = select_video(&probe.video_streams());
    let audio = select_audio(&probe.audio_streams(), config, original_language);
    let subtitles = select_subtitles(&probe.subtitle_streams(), config, original_language);

    let title = process_title(config, !audio.map_args.is_empty(), !subtitles.is_empty());

    let mut args = video;
    args.extend(audio.map_args);
    args.extend(subtitles);
    args.extend(strings(&["-c", "copy"]));
    args.extend(audio.downmix_args);

    StagePlan {
        step: "process",
        title,
        args,
        suffix: None,
    }
}

/// Title for the stream-selection pass, listing the flags that shaped it
pub fn process_title(config: &SelectionConfig, has_audio: bool, has_subtitles: bool) -> String {
    let mut flags: Vec<&str> = Vec::new();

    if has_audio {
        if config.drop_original_audio {
            flags.push("drop original audio");
        }
        if config.keep_commentary {
            flags.push("keep commentary");
        }
        if config.downmix_stereo {
            flags.push("downmix to stereo");
        }
    }

    if has_subtitles {
        flags.push(if config.keep_all_subtitles {
            "keep subtitles"
        } else {
            "drop unwanted subtitles"
        });
        if config.keep_local_subtitles {
            flags.push("keep local subtitles");
        }
        if config.subs_drop_local {
            flags.push("drop local subtitles");
        }
    }

    if flags.is_empty() {
        "Process file".to_string()
    } else {
        format!("Process file ({})", flags.join(", "))
    }
}

/// Whether the first playable video stream is wider than 1080p
pub fn needs_scaling(probe: &ProbeResult, force: bool) -> Result<bool, DomainError> {
    let video = probe
        .primary_video_stream()
        .ok_or(DomainError::NoVideoStreams)?;
    let width = video.width.unwrap_or(0);
    debug!("1080P: width {}", width);
    Ok(force || width > MAX_1080P_WIDTH)
}

/// Whether the first playable video stream still needs converting
pub fn needs_conversion(
    probe: &ProbeResult,
    target: TargetCodec,
    force: bool,
) -> Result<bool, DomainError> {
    let video = probe
        .primary_video_stream()
        .ok_or(DomainError::NoVideoStreams)?;
    debug!("CONVERT: source codec {}", video.codec_name);
    Ok(force || !target.is_satisfied_by(&video.codec_name))
}
