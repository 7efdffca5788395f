//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, cache_key};
use crate::config::mask_connection_string;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache implementation for fast URL lookups.
///
/// Entries are stored as `url:<code> -> <target url>` with `SET ... EX`, so
/// Redis enforces the expiry. Uses `ConnectionManager` for connection reuse
/// and automatic reconnects. All operations are fail-open: errors are logged
/// but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl` - TTL applied when [`CacheService::set_url`] is called with `None`;
    ///   controlled via `CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl: Duration) -> CacheResult<Self> {
        info!("Connecting to Redis cache at {}", mask_connection_string(redis_url));

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis cache");

        Ok(Self {
            client: manager,
            default_ttl,
        })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        let (found, result) = match conn.get::<_, Option<String>>(cache_key(short_code)).await {
            Ok(found) => {
                let result = if found.is_some() { "hit" } else { "miss" };
                (found, result)
            }
            Err(e) => {
                warn!(code = short_code, error = %e, "Redis GET failed, treating as miss");
                (None, "error")
            }
        };

        debug!(code = short_code, result, "Cache lookup");
        metrics::counter!("cache_lookups_total", "backend" => "redis", "result" => result)
            .increment(1);

        Ok(found)
    }

    async fn set_url(
        &self,
        short_code: &str,
        target_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let mut conn = self.client.clone();
        // SET EX rejects a zero expiry.
        let ttl_seconds = ttl.unwrap_or(self.default_ttl).as_secs().max(1);

        if let Err(e) = conn
            .set_ex::<_, _, ()>(cache_key(short_code), target_url, ttl_seconds)
            .await
        {
            warn!(code = short_code, error = %e, "Redis SET failed, entry not cached");
        } else {
            debug!(code = short_code, ttl_seconds, "Cache fill");
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
