//! Repository trait for the aggregation store.

use crate::domain::entities::{AggregateRecord, HourlyClicks, LinkMetadata, RecentClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Per-code click counters, mutated only by the click consumer.
///
/// # Concurrency
///
/// [`AggregateRepository::record_click`] is invoked concurrently for the same
/// code from both delivery paths with no external synchronization, so
/// implementations must apply it as a single atomic insert-or-update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAggregateRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AggregateRepository: Send + Sync {
    /// Counts one click for `code`, creating the record on first sight.
    ///
    /// `last_clicked` must never move backward.
    async fn record_click(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<AggregateRecord, AppError>;

    /// Inserts or refreshes link metadata without touching the counters.
    async fn upsert_metadata(&self, metadata: LinkMetadata) -> Result<AggregateRecord, AppError>;

    /// Finds the aggregate for a single code.
    async fn find_by_code(&self, code: &str) -> Result<Option<AggregateRecord>, AppError>;

    /// Number of codes with an aggregate record.
    async fn count_codes(&self) -> Result<i64, AppError>;

    /// Sum of all click counters.
    async fn count_clicks(&self) -> Result<i64, AppError>;

    /// Records with at least one click, most clicked first.
    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<AggregateRecord>, AppError>;

    /// Latest entries of the click log.
    async fn recent_clicks(&self, limit: i64) -> Result<Vec<RecentClick>, AppError>;

    /// Click counts bucketed by hour, for clicks at or after `since`.
    async fn hourly_clicks(&self, since: DateTime<Utc>) -> Result<Vec<HourlyClicks>, AppError>;

    /// All records, most recently first seen first.
    async fn list_all(&self) -> Result<Vec<AggregateRecord>, AppError>;
}
