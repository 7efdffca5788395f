//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and bus setup, consumer spawning, and
//! the Axum server lifecycle for both processes.

use crate::application::services::{AnalyticsService, ClickPublisher, LinkService, RedirectService};
use crate::config::{CacheBackend, Config, mask_connection_string};
use crate::domain::click_worker::run_click_consumer;
use crate::infrastructure::bus::{EventBus, NullBus, RedisBus};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgAggregateRepository, PgLinkRepository};
use crate::infrastructure::sink::{ClickSink, HttpClickSink, NullClickSink};
use crate::routes::{RateLimit, analytics_router, app_router};
use crate::state::{AnalyticsState, AppState};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// How often the in-memory cache drops expired entries.
const MEMORY_CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the redirect service.
///
/// Initializes:
/// - PostgreSQL connection pool for the code store, with migrations
/// - Cache backend (Redis, in-memory, or none)
/// - Event bus publisher and HTTP fallback sink
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// listener cannot bind. Cache, bus and fallback failures only degrade the
/// service.
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config, &config.database_url).await?;

    let cache = build_cache(&config).await;
    let bus = build_bus(&config).await;
    let sink = build_sink(&config);

    let publisher = ClickPublisher::new(bus.clone(), sink, config.fallback_timeout());
    let link_repository = Arc::new(PgLinkRepository::new(Arc::new(pool)));

    let state = AppState {
        link_service: Arc::new(LinkService::new(
            link_repository.clone(),
            config.public_base_url.clone(),
        )),
        redirect_service: Arc::new(RedirectService::new(
            link_repository,
            cache.clone(),
            publisher,
            config.cache_ttl(),
        )),
        cache,
        bus,
    };

    let app = app_router(
        state,
        RateLimit {
            per_second: config.rate_limit_per_second,
            burst: config.rate_limit_burst,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Redirect service listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Redirect service stopped");
    Ok(())
}

/// Runs the analytics service.
///
/// Initializes:
/// - PostgreSQL connection pool for the aggregation store, with migrations
/// - Bus consumer task (skipped when no bus is configured)
/// - Axum HTTP server with the ingestion and stats endpoints
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// listener cannot bind.
pub async fn run_analytics(config: Config) -> Result<()> {
    let pool = connect_database(&config, &config.analytics_database_url).await?;

    let bus = build_bus(&config).await;

    let repository = Arc::new(PgAggregateRepository::new(Arc::new(pool)));
    let analytics_service = Arc::new(AnalyticsService::new(repository));

    let consumer = tokio::spawn(run_click_consumer(
        bus.clone(),
        analytics_service.clone(),
        config.click_worker_concurrency,
    ));

    let state = AnalyticsState {
        analytics_service,
        bus,
    };

    let app = analytics_router(state);

    let addr: SocketAddr = config.analytics_listen_addr.parse().with_context(|| {
        format!(
            "Invalid ANALYTICS_LISTEN address '{}'",
            config.analytics_listen_addr
        )
    })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Analytics service listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    consumer.abort();
    tracing::info!("Analytics service stopped");
    Ok(())
}

/// Opens a pool with the configured limits and applies pending migrations.
pub async fn connect_database(config: &Config, url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(url)))?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let ttl = config.cache_ttl();

    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => match RedisCache::connect(redis_url, ttl).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        (CacheBackend::Memory, _) => {
            tracing::info!("Cache enabled (in-memory)");
            let cache = MemoryCache::new(ttl);
            cache.spawn_sweeper(MEMORY_CACHE_SWEEP_INTERVAL);
            Arc::new(cache)
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

async fn build_bus(config: &Config) -> Arc<dyn EventBus> {
    let Some(bus_url) = &config.event_bus_url else {
        tracing::info!("Event bus disabled");
        return Arc::new(NullBus::new());
    };

    match RedisBus::connect(bus_url).await {
        Ok(bus) => {
            tracing::info!("Event bus enabled (Redis pub/sub)");
            Arc::new(bus)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to event bus: {}. Bus path disabled.", e);
            Arc::new(NullBus::new())
        }
    }
}

fn build_sink(config: &Config) -> Arc<dyn ClickSink> {
    let Some(base_url) = &config.analytics_url else {
        tracing::info!("Fallback delivery disabled");
        return Arc::new(NullClickSink::new());
    };

    match HttpClickSink::new(base_url, config.fallback_timeout()) {
        Ok(sink) => {
            tracing::info!("Fallback delivery to {}", sink.endpoint());
            Arc::new(sink)
        }
        Err(e) => {
            tracing::warn!("Failed to build fallback client: {}. Fallback disabled.", e);
            Arc::new(NullClickSink::new())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
