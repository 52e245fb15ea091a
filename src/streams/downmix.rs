//! Stereo downmix planning

use tracing::{debug, trace};

use crate::domain::model::{ChannelLayout, Stream};
use crate::streams::map_args;

/// Weighted 5.1 to stereo pan followed by loudness normalization
pub const SURROUND5_DOWNMIX_FILTER: &str = "pan=stereo|FL=FC+0.30*FL+0.30*FLC+0.30*BL+0.30*SL+0.60*LFE|FR=FC+0.30*FR+0.30*FRC+0.30*BR+0.30*SR+0.60*LFE,loudnorm";

const DOWNMIX_CODEC: &str = "aac";
const DOWNMIX_BITRATE: &str = "256k";
const DOWNMIX_SAMPLE_RATE: &str = "48000";
const DOWNMIX_TITLE: &str = "title=2.0";

/// Build arguments that synthesize stereo tracks when none exist.
///
/// Every 5.1 stream gets a filtered AAC stereo copy. Only when there is
/// still no stereo track afterwards are 7.1 streams downmixed, by channel
/// count alone. New output indices count from zero across all synthesized
/// tracks.
pub fn downmix_to_stereo(kept: &[Stream]) -> Vec<String> {
    let mut args = Vec::new();
    let mut new_index = 0usize;
    let mut has_stereo = false;
    let mut surround5 = Vec::new();
    let mut surround7 = Vec::new();

    for stream in kept {
        match stream.channel_layout {
            Some(ChannelLayout::Stereo) => has_stereo = true,
            Some(ChannelLayout::Surround5_1) => surround5.push(stream),
            Some(ChannelLayout::Surround7_1) => surround7.push(stream),
            Some(ChannelLayout::Mono) | None => {}
        }
    }

    if !has_stereo && !surround5.is_empty() {
        for stream in surround5 {
            debug!("PROCESS AUDIO: Creating 2 channel track from 5.1 stream #{}", stream.index);
            args.extend(map_args(stream.index));
            args.extend([
                format!("-c:a:{}", new_index),
                DOWNMIX_CODEC.to_string(),
                format!("-ac:a:{}", new_index),
                "2".to_string(),
                format!("-b:a:{}", new_index),
                DOWNMIX_BITRATE.to_string(),
                format!("-filter:a:{}", new_index),
                SURROUND5_DOWNMIX_FILTER.to_string(),
                format!("-ar:a:{}", new_index),
                DOWNMIX_SAMPLE_RATE.to_string(),
                format!("-metadata:s:a:{}", new_index),
                DOWNMIX_TITLE.to_string(),
            ]);
            new_index += 1;
            has_stereo = true;
        }
    }

    if !has_stereo && !surround7.is_empty() {
        for stream in surround7 {
            debug!("PROCESS AUDIO: Creating 2 channel track from 7.1 stream #{}", stream.index);
            args.extend(map_args(stream.index));
            args.extend([
                format!("-c:a:{}", new_index),
                DOWNMIX_CODEC.to_string(),
                format!("-ac:a:{}", new_index),
                "2".to_string(),
                format!("-b:a:{}", new_index),
                DOWNMIX_BITRATE.to_string(),
                format!("-metadata:s:a:{}", new_index),
                DOWNMIX_TITLE.to_string(),
            ]);
            new_index += 1;
        }
    }

    trace!("PROCESS AUDIO: Downmix command: {:?}", args);
    args
}
