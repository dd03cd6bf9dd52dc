//! Process-wide memoization of visualization tile URLs.

use std::collections::HashMap;

use tokio::sync::RwLock;

use reducer_client::TileUrlInfo;

/// Cache key: the small parameter tuple a tile URL depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub dataset: &'static str,
    pub year: i32,
    pub season: String,
    pub color_scheme: String,
}

/// Bounded memoization cache with no eviction.
///
/// The key space is a handful of datasets × years × seasons × schemes, and
/// values are immutable for the process lifetime, so unbounded growth is not
/// a concern. Writes are idempotent: concurrent inserts of the same key
/// produce the same value, and the first one wins.
pub struct TileUrlCache {
    inner: RwLock<HashMap<TileKey, TileUrlInfo>>,
}

impl TileUrlCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &TileKey) -> Option<TileUrlInfo> {
        self.inner.read().await.get(key).cloned()
    }

    /// Write-if-absent; returns the cached value either way.
    pub async fn insert(&self, key: TileKey, info: TileUrlInfo) -> TileUrlInfo {
        let mut guard = self.inner.write().await;
        guard.entry(key).or_insert(info).clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for TileUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(season: &str) -> TileKey {
        TileKey {
            dataset: "groundwater",
            year: 2017,
            season: season.to_string(),
            color_scheme: "red_blue".to_string(),
        }
    }

    fn info(url: &str) -> TileUrlInfo {
        TileUrlInfo {
            tile_url: url.to_string(),
            attribution: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = TileUrlCache::new();
        assert!(cache.get(&key("summer")).await.is_none());

        cache.insert(key("summer"), info("https://tiles/a")).await;
        assert_eq!(
            cache.get(&key("summer")).await.unwrap().tile_url,
            "https://tiles/a"
        );
        assert!(cache.get(&key("winter")).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_is_write_if_absent() {
        let cache = TileUrlCache::new();
        cache.insert(key("summer"), info("https://tiles/first")).await;
        let kept = cache.insert(key("summer"), info("https://tiles/second")).await;

        assert_eq!(kept.tile_url, "https://tiles/first");
        assert_eq!(cache.len().await, 1);
    }
}
