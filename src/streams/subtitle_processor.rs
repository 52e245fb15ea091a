//! Subtitle stream selection

use tracing::trace;

use crate::domain::model::{SelectionConfig, Stream};
use crate::language::LanguageCode;
use crate::streams::map_args;

/// Decide which subtitle streams to keep.
///
/// With `subs_drop_local` and neither keep flag, nothing is kept. Otherwise
/// commentary/SDH is dropped unless requested, `keep_all_subtitles` keeps
/// the rest, `keep_local_subtitles` keeps `und` and kept-language streams,
/// and by default kept-language subtitles survive only when the original
/// language is not one the user wants to hear.
///
/// Only explicitly tagged streams take part in the language rules.
pub fn select_subtitles(
    streams: &[Stream],
    config: &SelectionConfig,
    original_language: Option<&LanguageCode>,
) -> Vec<String> {
    let mut args = Vec::new();

    if config.subs_drop_local && !config.keep_all_subtitles && !config.keep_local_subtitles {
        trace!("PROCESS SUBTITLES: Dropping all subtitle streams");
        return args;
    }

    let languages = &config.keep_languages;
    let original_is_wanted = original_language.is_some_and(|orig| languages.contains(orig));

    for stream in streams {
        if !config.keep_commentary && stream.is_commentary() {
            trace!("PROCESS SUBTITLES: Remove stream #{} [commentary]", stream.index);
            continue;
        }

        if config.keep_all_subtitles {
            args.extend(map_args(stream.index));
            continue;
        }

        if stream.language_tag().is_some() {
            let local = stream.is_undetermined()
                || stream
                    .language_code()
                    .is_some_and(|code| languages.contains(&code));

            if config.keep_local_subtitles && local {
                trace!("PROCESS SUBTITLES: Keep stream #{} (local language)", stream.index);
                args.extend(map_args(stream.index));
                continue;
            }

            if !config.subs_drop_local && !languages.is_empty() && !original_is_wanted && local {
                trace!("PROCESS SUBTITLES: Keep stream #{} (original language)", stream.index);
                args.extend(map_args(stream.index));
                continue;
            }
        }

        trace!("PROCESS SUBTITLES: Remove stream #{}", stream.index);
    }

    trace!("PROCESS SUBTITLES: {:?}", args);
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CodecType;
    use crate::streams::mapped_indices;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::parse(code).unwrap()
    }

    fn sub(index: usize, language: &str) -> Stream {
        Stream::new(index, CodecType::Subtitle, "subrip").with_language(language)
    }

    #[test]
    fn drop_local_without_keep_flags_drops_everything() {
        let config = SelectionConfig {
            subs_drop_local: true,
            ..SelectionConfig::default()
        };
        let streams = vec![
            sub(2, "eng"),
            sub(3, "und"),
            Stream::new(4, CodecType::Subtitle, "ass"),
            sub(5, "eng").with_title("Forced"),
        ];

        for original in [None, Some(lang("ja")), Some(lang("en"))] {
            assert!(select_subtitles(&streams, &config, original.as_ref()).is_empty());
        }
    }

    #[test]
    fn default_drops_local_subs_when_original_is_wanted() {
        let streams = vec![sub(3, "eng")];
        let args = select_subtitles(&streams, &SelectionConfig::default(), Some(&lang("en")));
        assert!(args.is_empty());
    }

    #[test]
    fn default_keeps_local_subs_for_foreign_original() {
        let streams = vec![sub(3, "eng"), sub(4, "und"), sub(5, "jpn")];
        let args = select_subtitles(&streams, &SelectionConfig::default(), Some(&lang("ja")));
        assert_eq!(mapped_indices(&args), vec![3, 4]);
    }

    #[test]
    fn unresolved_original_keeps_local_subs() {
        let streams = vec![sub(3, "eng"), sub(4, "fre")];
        let args = select_subtitles(&streams, &SelectionConfig::default(), None);
        assert_eq!(mapped_indices(&args), vec![3]);
    }

    #[test]
    fn keep_all_keeps_everything_but_commentary() {
        let config = SelectionConfig {
            keep_all_subtitles: true,
            subs_drop_local: true,
            ..SelectionConfig::default()
        };
        let streams = vec![
            sub(3, "eng"),
            sub(4, "fre"),
            Stream::new(5, CodecType::Subtitle, "ass"),
            sub(6, "eng").with_title("SDH"),
        ];
        let args = select_subtitles(&streams, &config, Some(&lang("en")));
        assert_eq!(mapped_indices(&args), vec![3, 4, 5]);
    }

    #[test]
    fn keep_local_keeps_wanted_languages_regardless_of_original() {
        let config = SelectionConfig {
            keep_local_subtitles: true,
            ..SelectionConfig::default()
        };
        let streams = vec![sub(3, "eng"), sub(4, "und"), sub(5, "fre")];
        let args = select_subtitles(&streams, &config, Some(&lang("en")));
        assert_eq!(mapped_indices(&args), vec![3, 4]);
    }

    #[test]
    fn commentary_subtitles_need_keep_commentary() {
        let streams = vec![sub(3, "eng").with_title("Commentary")];
        let config = SelectionConfig {
            keep_local_subtitles: true,
            ..SelectionConfig::default()
        };
        assert!(select_subtitles(&streams, &config, None).is_empty());

        let config = SelectionConfig {
            keep_local_subtitles: true,
            keep_commentary: true,
            ..SelectionConfig::default()
        };
        assert_eq!(mapped_indices(&select_subtitles(&streams, &config, None)), vec![3]);
    }

    #[test]
    fn untagged_subtitles_only_survive_keep_all() {
        let streams = vec![Stream::new(3, CodecType::Subtitle, "subrip")];
        let args = select_subtitles(&streams, &SelectionConfig::default(), Some(&lang("ja")));
        assert!(args.is_empty());
    }
}
