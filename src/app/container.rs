use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::http_metadata::http_client;
use crate::adapters::toml_config::Settings;
use crate::adapters::{FFmpegAdapter, FFprobeAdapter, RadarrAdapter, SonarrAdapter, TmdbAdapter};
use crate::app::{CacheInteractor, CleanInteractor, ClipInteractor, InspectInteractor};
use crate::engine::JobContext;
use crate::error::ScrubResult;
use crate::language::LanguageResolver;
use crate::ports::{EncodePort, MediaManagerPort, MetadataLookupPort, ProbePort};

/// Wires adapters to ports and hands out interactors
pub struct AppContainer {
    ctx: JobContext,
    cache_dir: PathBuf,
}

impl AppContainer {
    /// Production wiring: ffprobe/ffmpeg on `PATH` and whichever metadata
    /// services are configured
    pub fn from_settings(settings: &Settings, dry_run: bool) -> ScrubResult<Self> {
        let resolver = build_resolver(settings)?;
        Ok(Self::with_ports(
            Arc::new(FFprobeAdapter::new()),
            Arc::new(FFmpegAdapter::new(true)),
            resolver,
            settings.cache_dir.clone(),
            dry_run,
        ))
    }

    pub fn with_ports(
        probe: Arc<dyn ProbePort>,
        encoder: Arc<dyn EncodePort>,
        resolver: LanguageResolver,
        cache_dir: PathBuf,
        dry_run: bool,
    ) -> Self {
        let ctx = JobContext {
            probe,
            encoder,
            resolver: Arc::new(resolver),
            scratch_root: cache_dir.clone(),
            dry_run,
        };
        Self { ctx, cache_dir }
    }

    pub fn inspect_interactor(&self) -> InspectInteractor {
        InspectInteractor::new(Arc::clone(&self.ctx.probe))
    }

    pub fn clip_interactor(&self) -> ClipInteractor {
        ClipInteractor::new(self.ctx.clone())
    }

    pub fn clean_interactor(&self) -> CleanInteractor {
        CleanInteractor::new(self.ctx.clone())
    }

    pub fn cache_interactor(&self) -> CacheInteractor {
        CacheInteractor::new(self.cache_dir.clone())
    }
}

/// A service with an empty URL or key is left out entirely
fn build_resolver(settings: &Settings) -> ScrubResult<LanguageResolver> {
    let client = http_client()?;
    let mut managers: Vec<Arc<dyn MediaManagerPort>> = Vec::new();

    if !settings.radarr_url.is_empty() && !settings.radarr_api_key.is_empty() {
        managers.push(Arc::new(RadarrAdapter::new(
            client.clone(),
            settings.radarr_url.as_str(),
            settings.radarr_api_key.as_str(),
        )));
    }
    if !settings.sonarr_url.is_empty() && !settings.sonarr_api_key.is_empty() {
        managers.push(Arc::new(SonarrAdapter::new(
            client.clone(),
            settings.sonarr_url.as_str(),
            settings.sonarr_api_key.as_str(),
        )));
    }

    let metadata: Option<Arc<dyn MetadataLookupPort>> = if settings.tmdb_api_key.is_empty() {
        None
    } else {
        Some(Arc::new(TmdbAdapter::new(client, settings.tmdb_api_key.as_str())))
    };

    debug!(
        "LANGUAGE: {} media managers, metadata lookup {}",
        managers.len(),
        if metadata.is_some() { "enabled" } else { "disabled" }
    );
    Ok(LanguageResolver::new(managers, metadata))
}
