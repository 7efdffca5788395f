//! Click aggregation and reporting service used by the analytics process.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{AggregateRecord, HourlyClicks, LinkMetadata, RecentClick};
use crate::domain::repositories::AggregateRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;
use crate::utils::url_validator::validate_target_url;

/// Number of entries in the most-clicked list.
pub const TOP_URLS_LIMIT: i64 = 10;

/// Number of entries in the recent clicks list.
pub const RECENT_CLICKS_LIMIT: i64 = 20;

/// Width of the hourly click histogram.
pub const CLICKS_WINDOW_HOURS: i64 = 24;

/// Dashboard snapshot returned by [`AnalyticsService::overview`].
#[derive(Debug, Clone)]
pub struct StatsOverview {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub top_urls: Vec<AggregateRecord>,
    pub recent_clicks: Vec<RecentClick>,
    pub clicks_over_time: Vec<HourlyClicks>,
    pub all_urls: Vec<AggregateRecord>,
}

/// Aggregates click events and serves statistics.
///
/// Both ingestion paths (bus subscription and `POST /api/events`) end up in
/// [`AnalyticsService::record_click`], so a click is counted the same way
/// whichever path delivered it.
pub struct AnalyticsService {
    repository: Arc<dyn AggregateRepository>,
}

impl AnalyticsService {
    pub fn new(repository: Arc<dyn AggregateRepository>) -> Self {
        Self { repository }
    }

    /// Counts one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty or malformed code; the
    /// aggregate is left untouched.
    pub async fn record_click(&self, event: &ClickEvent) -> Result<AggregateRecord, AppError> {
        if !is_valid_code(&event.code) {
            return Err(AppError::bad_request(
                "Invalid short code",
                json!({ "short_code": event.code }),
            ));
        }

        let record = self
            .repository
            .record_click(&event.code, event.clicked_at)
            .await?;

        tracing::debug!(
            code = %record.code,
            total_clicks = record.total_clicks,
            "Click recorded"
        );
        Ok(record)
    }

    /// Registers or refreshes a link's metadata without touching its counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed code or target URL.
    pub async fn register_link(&self, metadata: LinkMetadata) -> Result<AggregateRecord, AppError> {
        if !is_valid_code(&metadata.code) {
            return Err(AppError::bad_request(
                "Invalid short code",
                json!({ "short_code": metadata.code }),
            ));
        }

        validate_target_url(&metadata.target_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        self.repository.upsert_metadata(metadata).await
    }

    /// Retrieves the aggregate for one code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never clicked or registered.
    pub async fn get_record(&self, code: &str) -> Result<AggregateRecord, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Statistics not found", json!({ "code": code })))
    }

    /// Number of codes with an aggregate record.
    pub async fn count_urls(&self) -> Result<i64, AppError> {
        self.repository.count_codes().await
    }

    /// Builds the dashboard snapshot as of `now`.
    pub async fn overview(&self, now: DateTime<Utc>) -> Result<StatsOverview, AppError> {
        let since = now - Duration::hours(CLICKS_WINDOW_HOURS);

        let (total_urls, total_clicks, top_urls, recent_clicks, clicks_over_time, all_urls) = tokio::try_join!(
            self.repository.count_codes(),
            self.repository.count_clicks(),
            self.repository.top_by_clicks(TOP_URLS_LIMIT),
            self.repository.recent_clicks(RECENT_CLICKS_LIMIT),
            self.repository.hourly_clicks(since),
            self.repository.list_all(),
        )?;

        Ok(StatsOverview {
            total_urls,
            total_clicks,
            top_urls,
            recent_clicks,
            clicks_over_time,
            all_urls,
        })
    }
}
