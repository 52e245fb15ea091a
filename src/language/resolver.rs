//! Original-language resolution
//!
//! A video's original language is looked up once: an external database ID
//! is taken from the file name or recovered from the media managers, then
//! the metadata service is asked for the language of that ID. Every failure
//! along the way means "unresolved", never an error.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use crate::language::LanguageCode;
use crate::ports::{MediaManagerPort, MetadataLookupPort};

static IMDB_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tt\d+").expect("valid regex"));

/// Codes some metadata services report that are not ISO-639
const LANGUAGE_QUIRKS: &[(&str, &str)] = &[("cn", "zh")];

/// External database ID embedded in a file stem, e.g. `Movie (2001) tt0123456`
pub fn imdb_id_from_stem(stem: &str) -> Option<String> {
    IMDB_ID.find(stem).map(|m| m.as_str().to_string())
}

/// Turn a service-reported code into a [`LanguageCode`]
pub fn normalize_language(raw: &str) -> Option<LanguageCode> {
    let raw = raw.trim().to_ascii_lowercase();
    let fixed = LANGUAGE_QUIRKS
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| *to)
        .unwrap_or(raw.as_str());

    LanguageCode::parse(fixed)
}

/// Lookup chain over the configured services
#[derive(Clone, Default)]
pub struct LanguageResolver {
    managers: Vec<Arc<dyn MediaManagerPort>>,
    metadata: Option<Arc<dyn MetadataLookupPort>>,
}

impl LanguageResolver {
    /// Managers are asked in order; the first ID found wins
    pub fn new(
        managers: Vec<Arc<dyn MediaManagerPort>>,
        metadata: Option<Arc<dyn MetadataLookupPort>>,
    ) -> Self {
        Self { managers, metadata }
    }

    /// A resolver that never finds anything
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Resolve the original language of the video at `path`
    pub async fn resolve(&self, path: &Path) -> Option<LanguageCode> {
        let stem = path.file_stem()?.to_string_lossy();
        let file_name = path.file_name()?.to_string_lossy();

        let imdb_id = match imdb_id_from_stem(&stem) {
            Some(id) => {
                trace!("LANGUAGE: Found ID {} in file name", id);
                Some(id)
            }
            None => self.query_managers(&file_name).await,
        };

        let Some(imdb_id) = imdb_id else {
            debug!("LANGUAGE: No external ID for {}", file_name);
            return None;
        };

        let Some(metadata) = &self.metadata else {
            debug!("LANGUAGE: No metadata service configured");
            return None;
        };

        let Some(raw) = metadata.original_language(&imdb_id).await else {
            debug!("LANGUAGE: Could not find original language for {}", file_name);
            return None;
        };
        trace!("LANGUAGE: Metadata service reports '{}' for {}", raw, imdb_id);

        let language = normalize_language(&raw);
        if language.is_none() {
            debug!("LANGUAGE: '{}' is not a known language code", raw);
        }
        language
    }

    async fn query_managers(&self, file_name: &str) -> Option<String> {
        for manager in &self.managers {
            if let Some(id) = manager.lookup_imdb_id(file_name).await {
                if !id.is_empty() {
                    trace!("LANGUAGE: {} identified {} as {}", manager.name(), file_name, id);
                    return Some(id);
                }
            }
        }
        None
    }
}

/// Original language of one video, resolved at most once.
///
/// An unresolved outcome is remembered as well, so a video whose lookup
/// failed is not retried during the same session.
#[derive(Debug, Default)]
pub struct OriginalLanguage {
    cell: OnceCell<Option<LanguageCode>>,
}

impl OriginalLanguage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve on first use, return the remembered value afterwards
    pub async fn get(&self, resolver: &LanguageResolver, path: &Path) -> Option<&LanguageCode> {
        self.cell
            .get_or_init(|| resolver.resolve(path))
            .await
            .as_ref()
    }

    /// The remembered value, if resolution has already run
    pub fn cached(&self) -> Option<&Option<LanguageCode>> {
        self.cell.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeManager {
        name: &'static str,
        id: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeManager {
        fn new(name: &'static str, id: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                id,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MediaManagerPort for FakeManager {
        fn name(&self) -> &str {
            self.name
        }

        async fn lookup_imdb_id(&self, _file_name: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.id.map(str::to_string)
        }
    }

    struct FakeMetadata {
        language: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeMetadata {
        fn new(language: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                language,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MetadataLookupPort for FakeMetadata {
        async fn original_language(&self, imdb_id: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(imdb_id.starts_with("tt"));
            self.language.map(str::to_string)
        }
    }

    #[test]
    fn imdb_id_is_found_anywhere_in_stem() {
        assert_eq!(imdb_id_from_stem("Movie (1999) {tt0133093}"), Some("tt0133093".to_string()));
        assert_eq!(imdb_id_from_stem("tt42"), Some("tt42".to_string()));
        assert_eq!(imdb_id_from_stem("Movie (1999)"), None);
    }

    #[test]
    fn chinese_quirk_is_remapped() {
        assert_eq!(normalize_language("cn"), LanguageCode::parse("zh"));
        assert_eq!(normalize_language("EN"), LanguageCode::parse("eng"));
        assert_eq!(normalize_language("xx"), None);
        assert_eq!(normalize_language("mk").map(|c| c.to_string()), Some("mkd".to_string()));
    }

    #[tokio::test]
    async fn id_in_file_name_skips_managers() {
        let manager = FakeManager::new("radarr", Some("tt1"));
        let metadata = FakeMetadata::new(Some("ja"));
        let resolver = LanguageResolver::new(vec![manager.clone()], Some(metadata.clone()));

        let language = resolver.resolve(Path::new("/media/Movie tt0245429.mkv")).await;
        assert_eq!(language, LanguageCode::parse("jpn"));
        assert_eq!(manager.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn managers_are_asked_in_order() {
        let first = FakeManager::new("radarr", None);
        let second = FakeManager::new("sonarr", Some("tt777"));
        let third = FakeManager::new("other", Some("tt888"));
        let metadata = FakeMetadata::new(Some("fr"));
        let resolver = LanguageResolver::new(
            vec![first.clone(), second.clone(), third.clone()],
            Some(metadata),
        );

        let language = resolver.resolve(Path::new("/media/Show S01E01.mkv")).await;
        assert_eq!(language, LanguageCode::parse("fra"));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
        assert_eq!(third.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_id_or_language_is_unresolved() {
        let metadata = FakeMetadata::new(Some("en"));
        let resolver = LanguageResolver::new(vec![FakeManager::new("radarr", None)], Some(metadata.clone()));
        assert_eq!(resolver.resolve(Path::new("/media/Unknown.mkv")).await, None);
        assert_eq!(metadata.calls.load(Ordering::SeqCst), 0);

        let resolver = LanguageResolver::new(vec![], Some(FakeMetadata::new(None)));
        assert_eq!(resolver.resolve(Path::new("/media/Movie tt1.mkv")).await, None);

        let resolver = LanguageResolver::new(vec![], Some(FakeMetadata::new(Some("zz"))));
        assert_eq!(resolver.resolve(Path::new("/media/Movie tt1.mkv")).await, None);

        assert_eq!(LanguageResolver::disabled().resolve(Path::new("/media/Movie tt1.mkv")).await, None);
    }

    #[tokio::test]
    async fn original_language_is_resolved_once() {
        let metadata = FakeMetadata::new(None);
        let resolver = LanguageResolver::new(vec![], Some(metadata.clone()));
        let original = OriginalLanguage::new();
        let path = Path::new("/media/Movie tt1.mkv");

        assert!(original.cached().is_none());
        assert_eq!(original.get(&resolver, path).await, None);
        assert_eq!(original.get(&resolver, path).await, None);
        assert_eq!(original.cached(), Some(&None));
        assert_eq!(metadata.calls.load(Ordering::SeqCst), 1);
    }
}
