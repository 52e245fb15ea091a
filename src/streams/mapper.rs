//! Stream reorder planning

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{CodecType, ProbeResult};
use crate::streams::map_args;

/// Target layout of a container: playable video, then audio, then subtitles
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    pub video: Vec<usize>,
    pub audio: Vec<usize>,
    pub subtitles: Vec<usize>,
}

impl ReorderPlan {
    /// Group stream indices by class, keeping probe order inside each class.
    ///
    /// Cover art and thumbnails are left out. A container without playable
    /// video or without audio cannot be processed at all.
    pub fn from_probe(probe: &ProbeResult) -> Result<Self, DomainError> {
        let video: Vec<usize> = probe
            .playable_video_streams()
            .iter()
            .map(|s| s.index)
            .collect();
        let audio: Vec<usize> = probe
            .streams_of(CodecType::Audio)
            .iter()
            .map(|s| s.index)
            .collect();
        let subtitles: Vec<usize> = probe
            .streams_of(CodecType::Subtitle)
            .iter()
            .map(|s| s.index)
            .collect();

        if video.is_empty() {
            return Err(DomainError::NoVideoStreams);
        }
        if audio.is_empty() {
            return Err(DomainError::NoAudioStreams);
        }

        Ok(Self {
            video,
            audio,
            subtitles,
        })
    }

    fn ordered(&self) -> impl Iterator<Item = usize> + '_ {
        self.video
            .iter()
            .chain(self.audio.iter())
            .chain(self.subtitles.iter())
            .copied()
    }

    /// True when the planned order would change nothing
    pub fn is_identity(&self) -> bool {
        self.ordered()
            .enumerate()
            .all(|(position, index)| position == index)
    }

    /// `-c copy` followed by one `-map` per stream in planned order
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-c".to_string(), "copy".to_string()];
        args.extend(self.ordered().flat_map(map_args));
        debug!("REORDER: {:?}", args);
        args
    }
}
