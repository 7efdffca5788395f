//! DTOs for analytics statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::application::services::StatsOverview;
use crate::domain::entities::{AggregateRecord, HourlyClicks, MetadataStatus, RecentClick};

/// Aggregate for a single short code.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct UrlStatsResponse {
    pub short_code: String,
    pub long_url: Option<String>,
    pub total_clicks: i64,
    pub first_seen: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub metadata_status: MetadataStatus,
}

impl From<AggregateRecord> for UrlStatsResponse {
    fn from(record: AggregateRecord) -> Self {
        Self {
            short_code: record.code,
            long_url: record.target_url,
            total_clicks: record.total_clicks,
            first_seen: record.first_seen,
            last_clicked: record.last_clicked,
            title: record.title,
            description: record.description,
            favicon_url: record.favicon_url,
            metadata_status: record.status,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct RecentClickResponse {
    pub short_code: String,
    pub long_url: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl From<RecentClick> for RecentClickResponse {
    fn from(click: RecentClick) -> Self {
        Self {
            short_code: click.code,
            long_url: click.target_url,
            clicked_at: click.clicked_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HourlyClicksResponse {
    pub hour: DateTime<Utc>,
    pub clicks: i64,
}

impl From<HourlyClicks> for HourlyClicksResponse {
    fn from(bucket: HourlyClicks) -> Self {
        Self {
            hour: bucket.hour,
            clicks: bucket.count,
        }
    }
}

/// Dashboard snapshot for `GET /api/stats`.
#[derive(Debug, Serialize)]
pub struct StatsOverviewResponse {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub top_urls: Vec<UrlStatsResponse>,
    pub recent_clicks: Vec<RecentClickResponse>,
    pub clicks_over_time: Vec<HourlyClicksResponse>,
    pub all_urls: Vec<UrlStatsResponse>,
}

fn convert<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

impl From<StatsOverview> for StatsOverviewResponse {
    fn from(overview: StatsOverview) -> Self {
        Self {
            total_urls: overview.total_urls,
            total_clicks: overview.total_clicks,
            top_urls: convert(overview.top_urls),
            recent_clicks: convert(overview.recent_clicks),
            clicks_over_time: convert(overview.clicks_over_time),
            all_urls: convert(overview.all_urls),
        }
    }
}
