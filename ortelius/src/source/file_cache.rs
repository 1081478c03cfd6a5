use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::debug;

use crate::error::OrteliusError;
use crate::source::PersistentCacheController;

/// Stores cached payloads as a set of files in the specified folder, with
/// file paths generated from the source urls.
///
/// Currently, there is no eviction mechanism.
pub struct FileCacheController {
    folder_path: PathBuf,
}

impl FileCacheController {
    /// Creates a cache rooted at the given directory, creating it if it does
    /// not exist. Each entry is stored in a nested folder structure derived
    /// from its url, with the scheme and query parameters removed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, OrteliusError> {
        std::fs::create_dir_all(path.as_ref()).map_err(|error| {
            OrteliusError::Generic(format!(
                "failed to initialize file cache folder {:?}: {error}",
                path.as_ref()
            ))
        })?;

        Ok(Self {
            folder_path: path.as_ref().into(),
        })
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        let stripped = stripped.split('?').next().unwrap_or(stripped);

        self.folder_path.join(Path::new(stripped))
    }
}

impl PersistentCacheController<str, Bytes> for FileCacheController {
    fn get(&self, key: &str) -> Option<Bytes> {
        std::fs::read(self.cache_path(key)).ok().map(Into::into)
    }

    fn insert(&self, key: &str, data: &Bytes) -> Result<(), OrteliusError> {
        let file_path = self.cache_path(key);
        let folder = file_path.parent().ok_or_else(|| {
            OrteliusError::Generic(format!("cache path {file_path:?} has no parent folder"))
        })?;
        std::fs::create_dir_all(folder)?;

        debug!("Saving entry {key} to the cache file {file_path:?}");
        std::fs::write(&file_path, data)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache() -> FileCacheController {
        let root = std::env::temp_dir().join(format!("ortelius-cache-{}", std::process::id()));
        FileCacheController::new(root).expect("failed to create cache")
    }

    #[test]
    fn cache_path_strips_scheme_and_parameters() {
        let cache = test_cache();
        let path = cache.cache_path("https://tiles.test/3/5/3.png?token=secret");
        assert_eq!(
            path,
            cache.folder_path.join("tiles.test").join("3/5/3.png")
        );
    }

    #[test]
    fn entries_round_trip_through_the_file_system() {
        let cache = test_cache();
        let key = "https://tiles.test/9/1/7.png";

        assert_eq!(cache.get(key), None);
        cache
            .insert(key, &Bytes::from_static(b"tile bytes"))
            .expect("failed to insert");
        assert_eq!(cache.get(key), Some(Bytes::from_static(b"tile bytes")));
    }
}
