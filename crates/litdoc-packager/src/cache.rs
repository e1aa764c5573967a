//! Bounded cache of fetched package assets.
//!
//! Maps a package name to its inline-embeddable encoding. The cache is
//! shared process-wide through an `Arc` and bounded by a capacity and an
//! optional time-to-live; which entry leaves when the cache is full is
//! decided by an injectable [`EvictionPolicy`].
//!
//! The lock is never held across a fetch. Two packaging calls racing on
//! the same uncached name may both fetch it; the second insert simply
//! replaces the first with an identical value.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// Bounds for a [`PackageCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of packages held. Zero disables caching.
    pub capacity: usize,
    /// How long an entry stays valid after insertion.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            ttl: None,
        }
    }
}

/// What an eviction policy gets to see about each cached entry.
#[derive(Debug, Clone)]
pub struct EntryStats<'a> {
    /// Package name.
    pub name: &'a str,
    /// When the entry was inserted.
    pub inserted_at: Instant,
    /// When the entry was last read or written.
    pub last_access: Instant,
    /// Number of cache hits served by the entry.
    pub hits: u64,
}

/// Chooses which entry to drop when the cache is full.
pub trait EvictionPolicy: Send + Sync {
    /// Index into `entries` of the entry to evict, or `None` to refuse
    /// the new insertion instead.
    fn victim(&self, entries: &[EntryStats<'_>]) -> Option<usize>;
}

/// Evict the entry that was read least recently.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastRecentlyUsed;

impl EvictionPolicy for LeastRecentlyUsed {
    fn victim(&self, entries: &[EntryStats<'_>]) -> Option<usize> {
        entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(i, _)| i)
    }
}

/// Evict the oldest insertion regardless of use.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstInFirstOut;

impl EvictionPolicy for FirstInFirstOut {
    fn victim(&self, entries: &[EntryStats<'_>]) -> Option<usize> {
        entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.inserted_at)
            .map(|(i, _)| i)
    }
}

struct CachedAsset {
    data_url: String,
    inserted_at: Instant,
    last_access: Instant,
    hits: u64,
}

/// Package name → encoded asset, bounded.
pub struct PackageCache {
    config: CacheConfig,
    policy: Box<dyn EvictionPolicy>,
    entries: Mutex<HashMap<String, CachedAsset>>,
}

impl PackageCache {
    /// Create a cache with least-recently-used eviction.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_policy(config, LeastRecentlyUsed)
    }

    /// Create a cache with a custom eviction policy.
    pub fn with_policy(config: CacheConfig, policy: impl EvictionPolicy + 'static) -> Self {
        Self {
            config,
            policy: Box::new(policy),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a package. Expired entries are dropped on the way.
    pub fn get(&self, name: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();

        if entries
            .get(name)
            .is_some_and(|asset| self.is_expired(asset, now))
        {
            entries.remove(name);
            debug!(package = name, "cache entry expired");
            return None;
        }

        let asset = entries.get_mut(name)?;
        asset.last_access = now;
        asset.hits += 1;
        Some(asset.data_url.clone())
    }

    /// Store an encoded package, evicting if the cache is full.
    pub fn insert(&self, name: &str, data_url: String) {
        if self.config.capacity == 0 {
            return;
        }

        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();

        if !entries.contains_key(name) && entries.len() >= self.config.capacity {
            entries.retain(|_, asset| !self.is_expired(asset, now));
        }

        if !entries.contains_key(name) && entries.len() >= self.config.capacity {
            let victim = {
                let stats: Vec<EntryStats<'_>> = entries
                    .iter()
                    .map(|(name, asset)| EntryStats {
                        name,
                        inserted_at: asset.inserted_at,
                        last_access: asset.last_access,
                        hits: asset.hits,
                    })
                    .collect();
                self.policy
                    .victim(&stats)
                    .and_then(|i| stats.get(i))
                    .map(|e| e.name.to_string())
            };

            match victim {
                Some(evicted) => {
                    entries.remove(&evicted);
                    debug!(package = %evicted, "evicted cached package");
                }
                None => return,
            }
        }

        entries.insert(
            name.to_string(),
            CachedAsset {
                data_url,
                inserted_at: now,
                last_access: now,
                hits: 0,
            },
        );
    }

    /// Number of entries currently held (expired ones included until touched).
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `name` is present and unexpired, without counting a hit.
    pub fn contains(&self, name: &str) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .get(name)
            .is_some_and(|asset| !self.is_expired(asset, Instant::now()))
    }

    fn is_expired(&self, asset: &CachedAsset, now: Instant) -> bool {
        self.config
            .ttl
            .is_some_and(|ttl| now.duration_since(asset.inserted_at) >= ttl)
    }
}

impl Default for PackageCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(capacity: usize) -> CacheConfig {
        CacheConfig {
            capacity,
            ttl: None,
        }
    }

    #[test]
    fn test_get_after_insert() {
        let cache = PackageCache::default();
        cache.insert("react", "data:a".into());
        assert_eq!(cache.get("react").as_deref(), Some("data:a"));
        assert_eq!(cache.get("vue"), None);
    }

    #[test]
    fn test_lru_evicts_least_recently_read() {
        let cache = PackageCache::new(bounded(2));
        cache.insert("a", "1".into());
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b", "2".into());
        std::thread::sleep(Duration::from_millis(2));

        // Touch "a" so "b" becomes the stalest.
        assert!(cache.get("a").is_some());
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("c", "3".into());

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_fifo_evicts_oldest_insert() {
        let cache = PackageCache::with_policy(bounded(2), FirstInFirstOut);
        cache.insert("a", "1".into());
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b", "2".into());
        std::thread::sleep(Duration::from_millis(2));

        assert!(cache.get("a").is_some());
        cache.insert("c", "3".into());

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_policy_may_refuse_insert() {
        struct Never;
        impl EvictionPolicy for Never {
            fn victim(&self, _: &[EntryStats<'_>]) -> Option<usize> {
                None
            }
        }

        let cache = PackageCache::with_policy(bounded(1), Never);
        cache.insert("a", "1".into());
        cache.insert("b", "2".into());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let cache = PackageCache::new(bounded(1));
        cache.insert("a", "1".into());
        cache.insert("a", "1".into());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("a"));
    }

    #[test]
    fn test_ttl_expires_entries() {
        let cache = PackageCache::new(CacheConfig {
            capacity: 4,
            ttl: Some(Duration::ZERO),
        });
        cache.insert("a", "1".into());
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = PackageCache::new(bounded(0));
        cache.insert("a", "1".into());
        assert!(cache.is_empty());
    }
}
