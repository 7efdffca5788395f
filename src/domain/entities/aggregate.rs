//! Analytics-side entities owned by the click consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of the external metadata enrichment for a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataStatus {
    #[default]
    Pending,
    Fetched,
    Failed,
}

impl MetadataStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetched => "fetched",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MetadataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "fetched" => Ok(Self::Fetched),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown metadata status '{}'", other)),
        }
    }
}

/// Per-code click counters plus enrichment metadata.
///
/// `target_url` stays `None` when the first click for a code arrives before
/// the link was registered with the analytics side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRecord {
    pub code: String,
    pub target_url: Option<String>,
    pub total_clicks: i64,
    pub first_seen: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub status: MetadataStatus,
}

impl AggregateRecord {
    /// Record created by the first observed click for `code`.
    pub fn first_click(code: impl Into<String>, clicked_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            target_url: None,
            total_clicks: 1,
            first_seen: clicked_at,
            last_clicked: Some(clicked_at),
            title: None,
            description: None,
            favicon_url: None,
            status: MetadataStatus::Pending,
        }
    }
}

/// Link metadata pushed by the creation flow / enrichment collaborator.
#[derive(Debug, Clone)]
pub struct LinkMetadata {
    pub code: String,
    pub target_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub status: MetadataStatus,
}

/// One entry of the click log, joined with the link's URL when known.
#[derive(Debug, Clone)]
pub struct RecentClick {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
    pub target_url: Option<String>,
}

/// Number of clicks within one hour bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyClicks {
    pub hour: DateTime<Utc>,
    pub count: i64,
}
