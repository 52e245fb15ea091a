//! Stream selection policy
//!
//! Pure functions that decide which streams survive a pass and produce the
//! ffmpeg arguments for it. Each function sees the streams of one class in
//! probe order, the immutable [`SelectionConfig`](crate::domain::model::SelectionConfig)
//! and the resolved original language; none of them touch the file system
//! or spawn processes.
//!
//! Emitted `-map` arguments always reference the original container index
//! and follow probe order within a class.

pub mod audio_mapper;
pub mod downmix;
pub mod mapper;
pub mod subtitle_processor;
pub mod video;

pub use audio_mapper::{select_audio, AudioSelection};
pub use downmix::downmix_to_stereo;
pub use mapper::ReorderPlan;
pub use subtitle_processor::select_subtitles;
pub use video::select_video;

/// `-map 0:<index>` for one input stream
pub fn map_args(index: usize) -> [String; 2] {
    ["-map".to_string(), format!("0:{}", index)]
}

/// Indices referenced by `-map 0:<n>` pairs, in order
pub fn mapped_indices(args: &[String]) -> Vec<usize> {
    args.windows(2)
        .filter(|pair| pair[0] == "-map")
        .filter_map(|pair| pair[1].strip_prefix("0:"))
        .filter_map(|index| index.parse().ok())
        .collect()
}
