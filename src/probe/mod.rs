//! ffprobe output parsing
//!
//! Turns the JSON document produced by
//! `ffprobe -v quiet -print_format json -show_format -show_streams` into a
//! [`ProbeResult`]. Every field except the stream index and type is optional
//! and missing values stay unknown instead of failing the parse.

use std::path::Path;

use serde::Deserialize;
use tracing::trace;

use crate::domain::errors::DomainError;
use crate::domain::model::{ChannelLayout, CodecType, ProbeResult, Stream};

pub mod inspector;

pub use inspector::render_stream_table;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    filename: Option<String>,
    format_name: Option<String>,
    duration: Option<String>,
    size: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    #[serde(default)]
    codec_type: String,
    #[serde(default)]
    codec_name: String,
    channels: Option<u32>,
    channel_layout: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    bit_rate: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    language: Option<String>,
    title: Option<String>,
    #[serde(rename = "BPS")]
    bps: Option<String>,
}

fn parse_number<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Parse an ffprobe JSON document for the file at `path`
pub fn parse_probe_output(json: &str, path: &Path) -> Result<ProbeResult, DomainError> {
    let raw: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFail(format!("ffprobe JSON parse error: {}", e)))?;
    let output: FfprobeOutput = serde_json::from_value(raw.clone())
        .map_err(|e| DomainError::ProbeFail(format!("ffprobe JSON parse error: {}", e)))?;

    let name = output
        .format
        .tags
        .title
        .clone()
        .or_else(|| {
            output
                .format
                .filename
                .as_deref()
                .and_then(|f| Path::new(f).file_name())
                .map(|f| f.to_string_lossy().into_owned())
        })
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let streams: Vec<Stream> = output.streams.into_iter().map(into_stream).collect();
    trace!("PROBE: {} streams in {}", streams.len(), path.display());

    Ok(ProbeResult {
        name,
        streams,
        duration_seconds: parse_number(output.format.duration.as_deref()),
        size_bytes: parse_number(output.format.size.as_deref()),
        format_name: output.format.format_name,
        title: output.format.tags.title,
        raw,
    })
}

fn into_stream(stream: FfprobeStream) -> Stream {
    let bitrate_bits = parse_number(stream.tags.bps.as_deref())
        .or_else(|| parse_number(stream.bit_rate.as_deref()));

    Stream {
        index: stream.index,
        codec_type: CodecType::from_ffprobe(&stream.codec_type),
        codec_name: stream.codec_name.to_ascii_lowercase(),
        language: stream.tags.language.filter(|l| !l.trim().is_empty()),
        title: stream.tags.title,
        channels: stream.channels,
        channel_layout: stream.channels.and_then(ChannelLayout::from_channels),
        layout_name: stream.channel_layout,
        width: stream.width,
        height: stream.height,
        duration: parse_number(stream.duration.as_deref()),
        bitrate_bits,
    }
}
