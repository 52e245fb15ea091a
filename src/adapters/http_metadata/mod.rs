//! HTTP metadata adapters: Radarr, Sonarr and TMDB
//!
//! Every lookup is best effort. Network errors, bad status codes and
//! unexpected payloads are logged as warnings and produce `None`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ports::{MediaManagerPort, MetadataLookupPort};

/// Per-request timeout for every metadata service
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Shared client with the service timeout applied
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(HTTP_TIMEOUT).build()
}

async fn get_json(client: &Client, service: &str, url: &str, query: &[(&str, &str)]) -> Option<Value> {
    let response = match client.get(url).query(query).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("{} request failed: {}", service, e);
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("{} returned {}", service, response.status());
        return None;
    }

    match response.json::<Value>().await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} returned an unreadable body: {}", service, e);
            None
        }
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `movie.imdbId` from a Radarr parse response
pub fn radarr_imdb_id(body: &Value) -> Option<String> {
    non_empty(body.pointer("/movie/imdbId"))
}

/// `series.imdbId` from a Sonarr parse response
pub fn sonarr_imdb_id(body: &Value) -> Option<String> {
    non_empty(body.pointer("/series/imdbId"))
}

/// Original language from a TMDB find response, movies before tv
pub fn tmdb_original_language(body: &Value) -> Option<String> {
    ["movie_results", "tv_results"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|first| non_empty(first.get("original_language")))
    })
}

fn parse_endpoint(base_url: &str) -> String {
    format!("{}/api/v3/parse", base_url.trim_end_matches('/'))
}

/// Radarr movie manager
#[derive(Debug, Clone)]
pub struct RadarrAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RadarrAdapter {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl MediaManagerPort for RadarrAdapter {
    fn name(&self) -> &str {
        "Radarr"
    }

    async fn lookup_imdb_id(&self, file_name: &str) -> Option<String> {
        let query = [("apikey", self.api_key.as_str()), ("title", file_name)];
        let body = get_json(&self.client, self.name(), &parse_endpoint(&self.base_url), &query).await?;
        let id = radarr_imdb_id(&body);
        debug!("Radarr: {} -> {:?}", file_name, id);
        id
    }
}

/// Sonarr series manager
#[derive(Debug, Clone)]
pub struct SonarrAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SonarrAdapter {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl MediaManagerPort for SonarrAdapter {
    fn name(&self) -> &str {
        "Sonarr"
    }

    async fn lookup_imdb_id(&self, file_name: &str) -> Option<String> {
        let query = [("apikey", self.api_key.as_str()), ("title", file_name)];
        let body = get_json(&self.client, self.name(), &parse_endpoint(&self.base_url), &query).await?;
        let id = sonarr_imdb_id(&body);
        debug!("Sonarr: {} -> {:?}", file_name, id);
        id
    }
}

/// TMDB lookup by IMDb id
#[derive(Debug, Clone)]
pub struct TmdbAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbAdapter {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: TMDB_BASE_URL.to_string(),
        }
    }

    fn find_endpoint(&self, imdb_id: &str) -> String {
        format!("{}/find/{}", self.base_url, imdb_id)
    }
}

#[async_trait]
impl MetadataLookupPort for TmdbAdapter {
    async fn original_language(&self, imdb_id: &str) -> Option<String> {
        let query = [
            ("api_key", self.api_key.as_str()),
            ("language", "en-US"),
            ("external_source", "imdb_id"),
        ];
        let body = get_json(&self.client, "TMDB", &self.find_endpoint(imdb_id), &query).await?;
        let language = tmdb_original_language(&body);
        debug!("TMDB: {} -> {:?}", imdb_id, language);
        language
    }
}
