// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod http_metadata;
pub mod probe_ffprobe;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use http_metadata::{RadarrAdapter, SonarrAdapter, TmdbAdapter};
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::{Settings, TomlConfigAdapter};
