// Domain models - Core types and data structures

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::language::LanguageCode;

/// Codecs that ffprobe reports as video but which only carry cover art or
/// thumbnails. They are never mapped as video tracks.
pub const EXCLUDED_VIDEO_CODECS: &[&str] = &["mjpeg", "mjpg", "png"];

/// Video codecs that count as already converted for an H.265 target
pub const H265_CODECS: &[&str] = &["hevc", "vp9"];

static COMMENTARY_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)commentary|sdh|description").expect("commentary pattern is valid")
});

/// Kind of elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Other,
}

impl CodecType {
    /// Map ffprobe's `codec_type` string
    pub fn from_ffprobe(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            _ => CodecType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Other => "other",
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio channel layouts relevant to downmixing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelLayout {
    Mono,
    Stereo,
    Surround5_1,
    Surround7_1,
}

impl ChannelLayout {
    /// Derive a layout from a raw channel count.
    ///
    /// Five channels are treated as 5.1 and seven as 7.1; any other
    /// unmapped count has no layout.
    pub fn from_channels(channels: u32) -> Option<Self> {
        match channels {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            5 | 6 => Some(ChannelLayout::Surround5_1),
            7 | 8 => Some(ChannelLayout::Surround7_1),
            _ => None,
        }
    }

    /// Nominal channel count of the layout
    pub fn channel_count(&self) -> u32 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
            ChannelLayout::Surround5_1 => 6,
            ChannelLayout::Surround7_1 => 8,
        }
    }
}

/// One elementary stream as reported by ffprobe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stream {
    /// Position in the container, used verbatim in `-map 0:<index>`
    pub index: usize,
    pub codec_type: CodecType,
    pub codec_name: String,
    pub language: Option<String>,
    pub title: Option<String>,
    pub channels: Option<u32>,
    pub channel_layout: Option<ChannelLayout>,
    /// ffprobe's own layout name, e.g. "5.1(side)"
    pub layout_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration: Option<f64>,
    pub bitrate_bits: Option<u64>,
}

impl Stream {
    /// Create a stream with only the identifying fields set
    pub fn new(index: usize, codec_type: CodecType, codec_name: impl Into<String>) -> Self {
        Self {
            index,
            codec_type,
            codec_name: codec_name.into(),
            language: None,
            title: None,
            channels: None,
            channel_layout: None,
            layout_name: None,
            width: None,
            height: None,
            duration: None,
            bitrate_bits: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self.channel_layout = ChannelLayout::from_channels(channels);
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Language tag, treating an empty tag as absent
    pub fn language_tag(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.trim().is_empty())
    }

    /// Whether the stream is explicitly tagged as undetermined
    pub fn is_undetermined(&self) -> bool {
        self.language_tag()
            .is_some_and(|lang| lang.trim().eq_ignore_ascii_case("und"))
    }

    /// Parsed language tag, if it is a valid ISO-639 code
    pub fn language_code(&self) -> Option<LanguageCode> {
        self.language_tag().and_then(LanguageCode::parse)
    }

    /// Whether the title marks a commentary, SDH or audio-description track
    pub fn is_commentary(&self) -> bool {
        self.title
            .as_deref()
            .is_some_and(|title| COMMENTARY_TITLE.is_match(title))
    }

    /// Whether the codec is a cover-art/thumbnail codec
    pub fn is_excluded_video(&self) -> bool {
        let codec = self.codec_name.to_ascii_lowercase();
        EXCLUDED_VIDEO_CODECS.contains(&codec.as_str())
    }

    /// A video stream that is an actual playable track
    pub fn is_playable_video(&self) -> bool {
        self.codec_type == CodecType::Video && !self.is_excluded_video()
    }
}

/// Snapshot of one ffprobe invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeResult {
    /// Container title, ffprobe filename, or file stem, in that order
    pub name: String,
    pub streams: Vec<Stream>,
    pub duration_seconds: Option<f64>,
    pub size_bytes: Option<u64>,
    pub format_name: Option<String>,
    pub title: Option<String>,
    /// The unmodified ffprobe document
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl ProbeResult {
    /// Streams of one kind, in probe order
    pub fn streams_of(&self, codec_type: CodecType) -> Vec<Stream> {
        self.streams
            .iter()
            .filter(|s| s.codec_type == codec_type)
            .cloned()
            .collect()
    }

    pub fn video_streams(&self) -> Vec<Stream> {
        self.streams_of(CodecType::Video)
    }

    pub fn audio_streams(&self) -> Vec<Stream> {
        self.streams_of(CodecType::Audio)
    }

    pub fn subtitle_streams(&self) -> Vec<Stream> {
        self.streams_of(CodecType::Subtitle)
    }

    /// Video streams excluding cover art
    pub fn playable_video_streams(&self) -> Vec<Stream> {
        self.streams
            .iter()
            .filter(|s| s.is_playable_video())
            .cloned()
            .collect()
    }

    /// First playable video stream
    pub fn primary_video_stream(&self) -> Option<&Stream> {
        self.streams.iter().find(|s| s.is_playable_video())
    }

    /// Container duration, falling back to the first playable video stream
    pub fn effective_duration(&self) -> Option<f64> {
        self.duration_seconds
            .filter(|d| *d > 0.0)
            .or_else(|| {
                self.primary_video_stream()
                    .and_then(|s| s.duration)
                    .filter(|d| *d > 0.0)
            })
    }
}

/// Target video codec for the conversion stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetCodec {
    H265,
    Vp9,
}

impl TargetCodec {
    /// Resolve the two mutually exclusive codec flags
    pub fn from_flags(h265: bool, vp9: bool) -> Result<Option<Self>, DomainError> {
        match (h265, vp9) {
            (true, true) => Err(DomainError::ConflictingCodecs),
            (true, false) => Ok(Some(TargetCodec::H265)),
            (false, true) => Ok(Some(TargetCodec::Vp9)),
            (false, false) => Ok(None),
        }
    }

    /// Whether a stream in `codec_name` needs no conversion for this target
    pub fn is_satisfied_by(&self, codec_name: &str) -> bool {
        let codec = codec_name.to_ascii_lowercase();
        match self {
            TargetCodec::H265 => H265_CODECS.contains(&codec.as_str()),
            TargetCodec::Vp9 => codec == "vp9",
        }
    }
}

/// User intents for one invocation of the clean pipeline.
///
/// Built once from config and CLI flags and passed by reference into every
/// policy function; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionConfig {
    /// Ordered, de-duplicated languages to keep
    pub keep_languages: Vec<LanguageCode>,
    pub drop_original_audio: bool,
    pub keep_commentary: bool,
    pub downmix_stereo: bool,
    pub keep_all_subtitles: bool,
    pub keep_local_subtitles: bool,
    pub subs_drop_local: bool,
    pub force: bool,
    pub target_codec: Option<TargetCodec>,
    pub scale_to_1080p: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            keep_languages: LanguageCode::parse("eng").into_iter().collect(),
            drop_original_audio: false,
            keep_commentary: false,
            downmix_stereo: false,
            keep_all_subtitles: false,
            keep_local_subtitles: false,
            subs_drop_local: false,
            force: false,
            target_codec: None,
            scale_to_1080p: false,
        }
    }
}

impl SelectionConfig {
    /// Parse a list of language codes, keeping first-seen order
    pub fn parse_languages<S: AsRef<str>>(codes: &[S]) -> Result<Vec<LanguageCode>, DomainError> {
        let mut languages: Vec<LanguageCode> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if code.is_empty() {
                continue;
            }
            let parsed = LanguageCode::parse(code).ok_or_else(|| {
                DomainError::BadArgs(format!("'{}' is not an ISO-639 language code", code))
            })?;
            if !languages.contains(&parsed) {
                languages.push(parsed);
            }
        }
        Ok(languages)
    }

    /// Whether the stream language should count as a kept language
    pub fn keeps_language(&self, code: &LanguageCode) -> bool {
        self.keep_languages.contains(code)
    }

    /// Whether any stage needs the original language
    pub fn needs_original_language(&self) -> bool {
        !self.drop_original_audio || !self.subs_drop_local
    }
}

/// Wall-clock position or length in `HH:MM:SS` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockTime {
    /// Parse exactly `HH:MM:SS` with two digits per field
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let bad = || DomainError::BadArgs(format!("'{}' must be in format HH:MM:SS", value));

        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 3
            || parts
                .iter()
                .any(|p| p.len() != 2 || !p.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(bad());
        }

        let hours = parts[0].parse::<u32>().map_err(|_| bad())?;
        let minutes = parts[1].parse::<u32>().map_err(|_| bad())?;
        let seconds = parts[2].parse::<u32>().map_err(|_| bad())?;

        if minutes >= 60 || seconds >= 60 {
            return Err(bad());
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn as_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
