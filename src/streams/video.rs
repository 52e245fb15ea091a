//! Video stream selection

use tracing::trace;

use crate::domain::model::Stream;
use crate::streams::map_args;

/// Map every video stream except cover art and thumbnails
pub fn select_video(streams: &[Stream]) -> Vec<String> {
    let args: Vec<String> = streams
        .iter()
        .filter(|stream| !stream.is_excluded_video())
        .flat_map(|stream| map_args(stream.index))
        .collect();

    trace!("PROCESS VIDEO: {:?}", args);
    args
}
