//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Namespace prefix for cached URL mappings.
pub const KEY_PREFIX: &str = "url:";

/// Default lifetime of a cached mapping.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Builds the cache key for a short code (`url:<code>`).
pub fn cache_key(short_code: &str) -> String {
    format!("{}{}", KEY_PREFIX, short_code)
}

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching short URL mappings.
///
/// Implementations must be thread-safe and fail open: an unreachable backend
/// behaves like an empty cache, and callers treat any error exactly like a
/// miss.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache with per-entry expiry
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the target URL for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss, expiry, or backend error (fail-open behavior)
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a URL mapping with an optional TTL.
    ///
    /// `None` uses the implementation's default TTL. Expiry is enforced by
    /// the cache itself.
    async fn set_url(
        &self,
        short_code: &str,
        target_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_uses_url_prefix() {
        assert_eq!(cache_key("ab12cd"), "url:ab12cd");
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        assert_eq!(DEFAULT_TTL.as_secs(), 3600);
    }
}
