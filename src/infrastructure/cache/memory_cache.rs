//! In-process cache with per-entry expiry.

use super::service::{CacheResult, CacheService, DEFAULT_TTL, cache_key};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    expires_at: Instant,
}

/// Thread-safe in-memory cache mapping `url:<code>` to the target URL.
///
/// Backed by a DashMap so concurrent redirects rarely contend. Expired
/// entries are evicted lazily on lookup; [`MemoryCache::purge_expired`] can be
/// called to sweep the rest. Suitable for single-node deployments without
/// Redis.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Arc<DashMap<String, Entry>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        debug!("Using MemoryCache (TTL: {}s)", default_ttl.as_secs());
        Self {
            inner: Arc::new(DashMap::new()),
            default_ttl,
        }
    }

    /// Number of entries currently held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drops every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.inner.retain(|_, entry| entry.expires_at > now);
    }

    /// Spawns a task that calls [`MemoryCache::purge_expired`] every `every`.
    ///
    /// Lazy eviction only reaches codes that are looked up again; the sweep
    /// bounds memory held by entries nobody asks for. The task runs until the
    /// returned handle is aborted.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let before = cache.len();
                cache.purge_expired();
                debug!(evicted = before.saturating_sub(cache.len()), "Cache sweep");
            }
        })
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = cache_key(short_code);
        let now = Instant::now();

        let (found, result) = match self.inner.get(&key) {
            Some(entry) if entry.expires_at > now => (Some(entry.url.clone()), "hit"),
            Some(_) => (None, "expired"),
            None => (None, "miss"),
        };

        if result == "expired" {
            self.inner.remove_if(&key, |_, entry| entry.expires_at <= now);
        }

        debug!(code = short_code, result, "Cache lookup");
        metrics::counter!("cache_lookups_total", "backend" => "memory", "result" => result)
            .increment(1);

        Ok(found)
    }

    async fn set_url(
        &self,
        short_code: &str,
        target_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.inner.insert(
            cache_key(short_code),
            Entry {
                url: target_url.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
