//! Sources of encoded tile payloads.

mod file_cache;
pub use file_cache::FileCacheController;

use async_trait::async_trait;
use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::error::{OrteliusError, TileLoadError};

/// Source of a url for a data key.
pub trait UrlSource<Key: ?Sized>: (Fn(&Key) -> String) + MaybeSend + MaybeSync {}
impl<Key: ?Sized, T: Fn(&Key) -> String> UrlSource<Key> for T where T: MaybeSend + MaybeSync {}

/// Persistent cache for downloaded payloads.
pub trait PersistentCacheController<Key: ?Sized, Data>: MaybeSend + MaybeSync {
    /// Returns the stored entry, if any.
    fn get(&self, key: &Key) -> Option<Data>;

    /// Stores the entry.
    fn insert(&self, key: &Key, data: &Data) -> Result<(), OrteliusError>;
}

/// Asynchronous retrieval of encoded tile payloads.
///
/// `Ok(None)` reports an empty or not-modified response: the resource exists
/// but there is nothing new to decode, and the caller keeps whatever payload
/// it already produced. Retry and backoff policies live behind this
/// interface, not in the tile lifecycle.
#[async_trait]
pub trait FileSource: MaybeSend + MaybeSync {
    /// Loads the resource at `url`.
    async fn load(&self, url: &str) -> Result<Option<Bytes>, TileLoadError>;
}

/// File source that retrieves resources with HTTP GET requests.
///
/// This source can load tiles from any protocol that uses separate GET
/// requests for each tile: OSM tile protocol, OGC Tile Map Service (TMS),
/// ArcGis TileService, etc.
///
/// If constructed with a [`PersistentCacheController`] it caches the loaded
/// payloads and only requests a resource from the network when it is not in
/// the cache. In offline mode the cache is the only source of data; the url
/// is still required to identify cache entries.
///
/// # Example
///
/// ```no_run
/// use ortelius::source::{FileSource, RestFileSource};
///
/// let source = RestFileSource::new(None, false).expect("failed to create source");
///
/// # tokio_test::block_on(async {
/// let payload = source
///     .load("https://tile.openstreetmap.org/3/5/3.png")
///     .await
///     .expect("failed to load tile");
/// # });
/// ```
pub struct RestFileSource {
    http_client: reqwest::Client,
    cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
    offline_mode: bool,
}

impl RestFileSource {
    /// Creates a new source.
    pub fn new(
        cache: Option<Box<dyn PersistentCacheController<str, Bytes>>>,
        offline_mode: bool,
    ) -> Result<Self, OrteliusError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("ortelius/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            cache,
            offline_mode,
        })
    }

    async fn load_from_web(&self, url: &str) -> Result<Option<Bytes>, TileLoadError> {
        log::info!("Loading {url}");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|_| TileLoadError::Network)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TileLoadError::DoesNotExist);
        }
        if status == reqwest::StatusCode::NO_CONTENT || status == reqwest::StatusCode::NOT_MODIFIED
        {
            return Ok(None);
        }
        if !status.is_success() {
            log::info!("Failed to load {url}: {status}");
            return Err(TileLoadError::Network);
        }

        let bytes = response.bytes().await.map_err(|_| TileLoadError::Network)?;
        if bytes.is_empty() {
            return Ok(None);
        }

        Ok(Some(bytes))
    }
}

#[async_trait]
impl FileSource for RestFileSource {
    async fn load(&self, url: &str) -> Result<Option<Bytes>, TileLoadError> {
        if let Some(cache) = &self.cache {
            if let Some(data) = cache.get(url) {
                log::trace!("Cache hit for url {url}");
                return Ok(Some(data));
            }
        }

        if self.offline_mode {
            return Err(TileLoadError::DoesNotExist);
        }

        let bytes = self.load_from_web(url).await?;

        if let (Some(cache), Some(bytes)) = (&self.cache, &bytes) {
            if let Err(error) = cache.insert(url, bytes) {
                log::warn!("Failed to write persistent cache entry: {error:?}");
            }
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct MemoryCache(Mutex<std::collections::HashMap<String, Bytes>>);

    impl PersistentCacheController<str, Bytes> for MemoryCache {
        fn get(&self, key: &str) -> Option<Bytes> {
            self.0.lock().expect("lock is poisoned").get(key).cloned()
        }

        fn insert(&self, key: &str, data: &Bytes) -> Result<(), OrteliusError> {
            self.0
                .lock()
                .expect("lock is poisoned")
                .insert(key.to_string(), data.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn cached_entries_are_served_without_network() {
        let cache = MemoryCache(Mutex::new(
            [("https://tiles.test/3/5/3.png".to_string(), Bytes::from_static(b"payload"))]
                .into_iter()
                .collect(),
        ));
        let source =
            RestFileSource::new(Some(Box::new(cache)), true).expect("failed to create source");

        let loaded = source
            .load("https://tiles.test/3/5/3.png")
            .await
            .expect("failed to load");
        assert_eq!(loaded, Some(Bytes::from_static(b"payload")));
    }

    #[tokio::test]
    async fn offline_mode_misses_report_does_not_exist() {
        let cache = MemoryCache(Mutex::new(Default::default()));
        let source =
            RestFileSource::new(Some(Box::new(cache)), true).expect("failed to create source");

        let result = source.load("https://tiles.test/3/5/3.png").await;
        assert_eq!(result, Err(TileLoadError::DoesNotExist));
    }
}
