//! Audio stream selection and stereo downmix planning

use tracing::{debug, trace, warn};

use crate::domain::model::{SelectionConfig, Stream};
use crate::language::LanguageCode;
use crate::streams::{downmix_to_stereo, map_args};

/// Outcome of audio selection for one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioSelection {
    /// `-map` pairs for the kept streams, in probe order
    pub map_args: Vec<String>,
    /// Streams that survived selection
    pub kept: Vec<Stream>,
    /// Extra synthesized stereo tracks, empty unless downmixing was requested
    /// and needed
    pub downmix_args: Vec<String>,
    /// True when every stream would have been dropped and all were restored
    pub used_failsafe: bool,
}

/// Languages whose audio is kept: the configured list plus the original
/// language, unless the user asked to drop it
pub fn audio_keep_languages(
    config: &SelectionConfig,
    original_language: Option<&LanguageCode>,
) -> Vec<LanguageCode> {
    let mut languages = config.keep_languages.clone();

    if !config.drop_original_audio {
        if let Some(original) = original_language {
            if !languages.contains(original) {
                languages.push(original.clone());
            }
        }
    }

    languages
}

/// Decide which audio streams to keep.
///
/// Untagged streams are always kept. Commentary is dropped unless requested.
/// Streams tagged `und` or with a kept language survive. If that would leave
/// no audio at all, every stream is kept instead.
pub fn select_audio(
    streams: &[Stream],
    config: &SelectionConfig,
    original_language: Option<&LanguageCode>,
) -> AudioSelection {
    let languages = audio_keep_languages(config, original_language);
    let mut selection = AudioSelection::default();

    for stream in streams {
        if stream.language_tag().is_none() {
            debug!("PROCESS AUDIO: Keep stream #{} (no language tag)", stream.index);
            keep(&mut selection, stream);
            continue;
        }

        if !config.keep_commentary && stream.is_commentary() {
            trace!("PROCESS AUDIO: Remove stream #{} [commentary]", stream.index);
            continue;
        }

        let wanted = stream.is_undetermined()
            || stream
                .language_code()
                .is_some_and(|code| languages.contains(&code));

        if wanted {
            keep(&mut selection, stream);
            continue;
        }

        trace!("PROCESS AUDIO: Remove stream #{}", stream.index);
    }

    if selection.kept.is_empty() && !streams.is_empty() {
        warn!("PROCESS AUDIO: All audio streams would be removed, keeping every stream");
        for stream in streams {
            keep(&mut selection, stream);
        }
        selection.used_failsafe = true;
    }

    if config.downmix_stereo {
        selection.downmix_args = downmix_to_stereo(&selection.kept);
    }

    trace!("PROCESS AUDIO: {:?}", selection.map_args);
    selection
}

fn keep(selection: &mut AudioSelection, stream: &Stream) {
    selection.map_args.extend(map_args(stream.index));
    selection.kept.push(stream.clone());
}
