//! Encode orchestration: stage arguments, temp files, progress and the
//! per-video job that sequences them

pub mod bitrate;
pub mod progress;
pub mod stages;
pub mod temp_chain;
pub mod video_job;

pub use bitrate::BitrateTargets;
pub use progress::{ProgressDisplay, ProgressEvent, ProgressParser};
pub use stages::StagePlan;
pub use temp_chain::TempChain;
pub use video_job::{JobContext, VideoJob};
