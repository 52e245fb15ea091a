//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::adapters::toml_config::{Settings, TomlConfigAdapter};
use crate::cli::{CleanArgs, Cli};
use crate::domain::errors::DomainError;
use crate::domain::model::{SelectionConfig, TargetCodec};
use crate::error::ScrubResult;

const ENV_PREFIX: &str = "VIDSCRUB_";

/// Build settings following precedence: CLI > Env > File > Defaults
pub fn initialize_settings(cli: &Cli) -> ScrubResult<Settings> {
    let mut settings = TomlConfigAdapter::new(cli.config.clone()).load()?;

    let env_overrides = apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    apply_cli_overrides(&mut settings, cli);
    settings.validate()?;
    Ok(settings)
}

/// Apply `VIDSCRUB_<KEY>` values on top of file settings.
///
/// Returns how many keys were overridden.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));
    let mut overrides = 0;

    if let Some(value) = get("KEEP_LANGUAGES") {
        settings.keep_languages = split_list(&value);
        overrides += 1;
    }

    let strings: [(&str, &mut String); 5] = [
        ("RADARR_URL", &mut settings.radarr_url),
        ("RADARR_API_KEY", &mut settings.radarr_api_key),
        ("SONARR_URL", &mut settings.sonarr_url),
        ("SONARR_API_KEY", &mut settings.sonarr_api_key),
        ("TMDB_API_KEY", &mut settings.tmdb_api_key),
    ];
    for (key, target) in strings {
        if let Some(value) = get(key) {
            *target = value;
            overrides += 1;
        }
    }

    if let Some(value) = get("LOG_TO_FILE") {
        match parse_bool(&value) {
            Some(flag) => {
                settings.log_to_file = flag;
                overrides += 1;
            }
            None => warn!("Ignoring {}LOG_TO_FILE='{}': not a boolean", ENV_PREFIX, value),
        }
    }

    if let Some(value) = get("LOG_FILE") {
        settings.log_file = Some(PathBuf::from(value));
        overrides += 1;
    }

    if let Some(value) = get("CACHE_DIR") {
        settings.cache_dir = PathBuf::from(value);
        overrides += 1;
    }

    overrides
}

/// Global CLI flags that map onto settings
pub fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(path) = &cli.log_file {
        debug!("CLI override: log_file = {}", path.display());
        settings.log_file = Some(path.clone());
        settings.log_to_file = true;
    }
}

/// Combine settings and `clean` flags into the selection policy input
pub fn selection_config(
    settings: &Settings,
    args: &CleanArgs,
) -> Result<SelectionConfig, DomainError> {
    let target_codec = TargetCodec::from_flags(args.h265, args.vp9)?;

    let languages = match &args.langs {
        Some(langs) => SelectionConfig::parse_languages(langs)?,
        None => SelectionConfig::parse_languages(&settings.keep_languages)?,
    };

    Ok(SelectionConfig {
        keep_languages: languages,
        drop_original_audio: args.drop_original,
        keep_commentary: args.keep_commentary,
        downmix_stereo: args.downmix,
        keep_all_subtitles: args.keep_subs,
        keep_local_subtitles: args.keep_local_subs,
        subs_drop_local: args.drop_local_subs,
        force: args.force,
        target_codec,
        scale_to_1080p: args.video_1080,
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
