//! Cache-aside redirect resolution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;

use super::click_publisher::{ClickPublisher, DeliveryOutcome};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Store,
}

/// Result of a successful lookup.
///
/// The background tasks keep running if their handles are dropped.
#[derive(Debug)]
pub struct Resolution {
    pub target_url: String,
    pub source: ResolutionSource,
    /// Cache write-back, present only when the URL came from the store.
    pub cache_fill: Option<JoinHandle<()>>,
    pub emission: JoinHandle<DeliveryOutcome>,
}

/// Resolves short codes: cache first, code store on miss.
///
/// Only the store read on a miss is awaited on the request path. The cache
/// write-back and click emission run as separate tasks whose failures are
/// logged and never reach the caller.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    publisher: ClickPublisher,
    cache_ttl: Duration,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        publisher: ClickPublisher,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            links,
            cache,
            publisher,
            cache_ttl,
        }
    }

    /// Resolves `code` to its target URL and schedules a click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes; no click is emitted.
    /// Store failures surface as [`AppError::Internal`]. Cache failures are
    /// treated as misses.
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        let cached = match self.cache.get_url(code).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(code, error = %e, "Cache read failed, falling back to store");
                None
            }
        };

        if let Some(target_url) = cached {
            tracing::debug!(code, "Cache hit");
            return Ok(Resolution {
                target_url,
                source: ResolutionSource::Cache,
                cache_fill: None,
                emission: self.publisher.emit(code),
            });
        }

        tracing::debug!(code, "Cache miss");

        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        let cache_fill = self.spawn_cache_fill(code, &link.target_url);

        Ok(Resolution {
            target_url: link.target_url,
            source: ResolutionSource::Store,
            cache_fill: Some(cache_fill),
            emission: self.publisher.emit(code),
        })
    }

    fn spawn_cache_fill(&self, code: &str, target_url: &str) -> JoinHandle<()> {
        let cache = self.cache.clone();
        let ttl = self.cache_ttl;
        let code = code.to_string();
        let target_url = target_url.to_string();

        tokio::spawn(async move {
            if let Err(e) = cache.set_url(&code, &target_url, Some(ttl)).await {
                tracing::warn!(code, error = %e, "Failed to populate cache");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ShortLink;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::bus::NullBus;
    use crate::infrastructure::cache::{MemoryCache, NullCache};
    use crate::infrastructure::sink::NullClickSink;
    use chrono::Utc;

    fn publisher() -> ClickPublisher {
        ClickPublisher::new(
            Arc::new(NullBus),
            Arc::new(NullClickSink),
            Duration::from_millis(100),
        )
    }

    fn link(code: &str, url: &str) -> ShortLink {
        ShortLink::new(1, code.to_string(), url.to_string(), Utc::now())
    }

    fn service(repo: MockLinkRepository, cache: Arc<dyn CacheService>) -> RedirectService {
        RedirectService::new(Arc::new(repo), cache, publisher(), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_cold_cache_reads_store_and_fills_cache() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "ab12cd")
            .times(1)
            .returning(|code| Ok(Some(link(code, "https://example.com"))));

        let cache = Arc::new(MemoryCache::new(Duration::from_secs(3600)));
        let service = service(repo, cache.clone());

        let resolution = service.resolve("ab12cd").await.unwrap();

        assert_eq!(resolution.target_url, "https://example.com");
        assert_eq!(resolution.source, ResolutionSource::Store);

        resolution.cache_fill.unwrap().await.unwrap();
        assert_eq!(
            cache.get_url("ab12cd").await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_warm_cache_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let cache = Arc::new(MemoryCache::new(Duration::from_secs(3600)));
        cache
            .set_url("ab12cd", "https://example.com", None)
            .await
            .unwrap();

        let resolution = service(repo, cache).resolve("ab12cd").await.unwrap();

        assert_eq!(resolution.target_url, "https://example.com");
        assert_eq!(resolution.source, ResolutionSource::Cache);
        assert!(resolution.cache_fill.is_none());
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(repo, Arc::new(NullCache)).resolve("zz9999").await;

        match result {
            Err(AppError::NotFound { details, .. }) => assert_eq!(details["code"], "zz9999"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_error_is_internal() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = service(repo, Arc::new(NullCache)).resolve("ab12cd").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_disabled_cache_always_reads_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(2)
            .returning(|code| Ok(Some(link(code, "https://example.com"))));

        let service = service(repo, Arc::new(NullCache));

        for _ in 0..2 {
            let resolution = service.resolve("ab12cd").await.unwrap();
            assert_eq!(resolution.source, ResolutionSource::Store);
            assert_eq!(
                resolution.emission.await.unwrap(),
                DeliveryOutcome::Dropped
            );
        }
    }
}
