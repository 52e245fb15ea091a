// TOML config adapter - Settings loaded from a TOML file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::SelectionConfig;
use crate::error::{ScrubError, ScrubResult};

const APP_DIR: &str = "vidscrub";
const CONFIG_FILE: &str = "config.toml";

/// Persistent settings, every key optional in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// ISO-639 codes whose audio and subtitles are wanted
    pub keep_languages: Vec<String>,
    pub radarr_url: String,
    pub radarr_api_key: String,
    pub sonarr_url: String,
    pub sonarr_api_key: String,
    pub tmdb_api_key: String,
    pub log_to_file: bool,
    pub log_file: Option<PathBuf>,
    /// Scratch space for intermediate files
    pub cache_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keep_languages: vec!["eng".to_string()],
            radarr_url: String::new(),
            radarr_api_key: String::new(),
            sonarr_url: String::new(),
            sonarr_api_key: String::new(),
            tmdb_api_key: String::new(),
            log_to_file: false,
            log_file: None,
            cache_dir: default_cache_dir(),
        }
    }
}

/// `<user cache dir>/vidscrub`, or a directory under the system temp dir
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// `<user config dir>/vidscrub/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> ScrubResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check service URLs, their keys and the language list
    pub fn validate(&self) -> ScrubResult<()> {
        validate_service("radarr", &self.radarr_url, &self.radarr_api_key)?;
        validate_service("sonarr", &self.sonarr_url, &self.sonarr_api_key)?;

        SelectionConfig::parse_languages(&self.keep_languages).map_err(|e| {
            ScrubError::InvalidConfig {
                message: format!("keep_languages: {}", e),
            }
        })?;

        if self.log_to_file && self.log_file.is_none() {
            return Err(ScrubError::InvalidConfig {
                message: "log_file is required when log_to_file is enabled".to_string(),
            });
        }

        Ok(())
    }

    /// Log file to write, if file logging is on
    pub fn log_target(&self) -> Option<&Path> {
        if self.log_to_file {
            self.log_file.as_deref()
        } else {
            None
        }
    }
}

fn validate_service(name: &str, url: &str, api_key: &str) -> ScrubResult<()> {
    if url.is_empty() {
        return Ok(());
    }

    let parsed = reqwest::Url::parse(url).map_err(|e| ScrubError::InvalidConfig {
        message: format!("{}_url '{}' is not a valid URL: {}", name, url, e),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrubError::InvalidConfig {
            message: format!("{}_url '{}' must use http or https", name, url),
        });
    }
    if api_key.is_empty() {
        return Err(ScrubError::InvalidConfig {
            message: format!("{}_api_key is required when {}_url is set", name, name),
        });
    }
    Ok(())
}

/// Loads [`Settings`] from an explicit path or the default location
#[derive(Debug, Clone, Default)]
pub struct TomlConfigAdapter {
    explicit_path: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// `explicit_path` comes from `--config` or `VIDSCRUB_CONFIG`
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }

    /// Read the settings file.
    ///
    /// A missing default file yields defaults; a missing file the user
    /// named explicitly is an error.
    pub fn load(&self) -> ScrubResult<Settings> {
        let (path, explicit) = match &self.explicit_path {
            Some(path) => (path.clone(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => {
                    debug!("No config directory on this platform, using defaults");
                    return Ok(Settings::default());
                }
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ScrubError::ConfigRead {
                    path: path.display().to_string(),
                    message: "file does not exist".to_string(),
                });
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ScrubError::ConfigRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!("Loading configuration from: {}", path.display());
        Settings::from_toml(&content)
    }
}
