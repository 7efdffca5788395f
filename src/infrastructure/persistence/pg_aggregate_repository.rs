//! PostgreSQL implementation of the aggregation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{
    AggregateRecord, HourlyClicks, LinkMetadata, MetadataStatus, RecentClick,
};
use crate::domain::repositories::AggregateRepository;
use crate::error::AppError;

const RECORD_COLUMNS: &str = "short_code, long_url, total_clicks, first_seen, last_clicked, \
                              title, description, favicon_url, metadata_status";

#[derive(FromRow)]
struct AggregateRow {
    short_code: String,
    long_url: Option<String>,
    total_clicks: i64,
    first_seen: DateTime<Utc>,
    last_clicked: Option<DateTime<Utc>>,
    title: Option<String>,
    description: Option<String>,
    favicon_url: Option<String>,
    metadata_status: String,
}

impl TryFrom<AggregateRow> for AggregateRecord {
    type Error = AppError;

    fn try_from(row: AggregateRow) -> Result<Self, Self::Error> {
        let status = row.metadata_status.parse::<MetadataStatus>().map_err(|e| {
            AppError::internal("Corrupt aggregate record", json!({ "reason": e }))
        })?;

        Ok(AggregateRecord {
            code: row.short_code,
            target_url: row.long_url,
            total_clicks: row.total_clicks,
            first_seen: row.first_seen,
            last_clicked: row.last_clicked,
            title: row.title,
            description: row.description,
            favicon_url: row.favicon_url,
            status,
        })
    }
}

#[derive(FromRow)]
struct RecentClickRow {
    short_code: String,
    clicked_at: DateTime<Utc>,
    long_url: Option<String>,
}

#[derive(FromRow)]
struct HourlyRow {
    hour: DateTime<Utc>,
    count: i64,
}

fn into_records(rows: Vec<AggregateRow>) -> Result<Vec<AggregateRecord>, AppError> {
    rows.into_iter().map(AggregateRecord::try_from).collect()
}

/// PostgreSQL repository for click aggregates.
///
/// Clicks are counted with a single `INSERT ... ON CONFLICT DO UPDATE`, which
/// Postgres applies atomically per row, so concurrent clicks for one code
/// never lose an increment. The click log row is written in the same
/// transaction.
pub struct PgAggregateRepository {
    pool: Arc<PgPool>,
}

impl PgAggregateRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateRepository for PgAggregateRepository {
    async fn record_click(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<AggregateRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AggregateRow>(&format!(
            r#"
            INSERT INTO url_metadata (short_code, total_clicks, first_seen, last_clicked)
            VALUES ($1, 1, $2, $2)
            ON CONFLICT (short_code) DO UPDATE SET
                total_clicks = url_metadata.total_clicks + 1,
                first_seen = LEAST(url_metadata.first_seen, EXCLUDED.first_seen),
                last_clicked = GREATEST(url_metadata.last_clicked, EXCLUDED.last_clicked)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(clicked_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO click_events (short_code, clicked_at) VALUES ($1, $2)")
            .bind(code)
            .bind(clicked_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn upsert_metadata(&self, metadata: LinkMetadata) -> Result<AggregateRecord, AppError> {
        let row = sqlx::query_as::<_, AggregateRow>(&format!(
            r#"
            INSERT INTO url_metadata
                (short_code, long_url, first_seen, title, description, favicon_url, metadata_status)
            VALUES ($1, $2, NOW(), $3, $4, $5, $6)
            ON CONFLICT (short_code) DO UPDATE SET
                long_url = EXCLUDED.long_url,
                title = COALESCE(EXCLUDED.title, url_metadata.title),
                description = COALESCE(EXCLUDED.description, url_metadata.description),
                favicon_url = COALESCE(EXCLUDED.favicon_url, url_metadata.favicon_url),
                metadata_status = EXCLUDED.metadata_status
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(&metadata.code)
        .bind(&metadata.target_url)
        .bind(&metadata.title)
        .bind(&metadata.description)
        .bind(&metadata.favicon_url)
        .bind(metadata.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<AggregateRecord>, AppError> {
        let row = sqlx::query_as::<_, AggregateRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM url_metadata WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(AggregateRecord::try_from).transpose()
    }

    async fn count_codes(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_metadata")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_clicks(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(total_clicks), 0)::BIGINT FROM url_metadata")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<AggregateRecord>, AppError> {
        let rows = sqlx::query_as::<_, AggregateRow>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM url_metadata
            WHERE total_clicks > 0
            ORDER BY total_clicks DESC, short_code
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        into_records(rows)
    }

    async fn recent_clicks(&self, limit: i64) -> Result<Vec<RecentClick>, AppError> {
        let rows = sqlx::query_as::<_, RecentClickRow>(
            r#"
            SELECT ce.short_code, ce.clicked_at, um.long_url
            FROM click_events ce
            LEFT JOIN url_metadata um ON ce.short_code = um.short_code
            ORDER BY ce.clicked_at DESC, ce.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RecentClick {
                code: r.short_code,
                clicked_at: r.clicked_at,
                target_url: r.long_url,
            })
            .collect())
    }

    async fn hourly_clicks(&self, since: DateTime<Utc>) -> Result<Vec<HourlyClicks>, AppError> {
        let rows = sqlx::query_as::<_, HourlyRow>(
            r#"
            SELECT date_trunc('hour', clicked_at) AS hour, COUNT(*) AS count
            FROM click_events
            WHERE clicked_at >= $1
            GROUP BY hour
            ORDER BY hour
            "#,
        )
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| HourlyClicks {
                hour: r.hour,
                count: r.count,
            })
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<AggregateRecord>, AppError> {
        let rows = sqlx::query_as::<_, AggregateRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM url_metadata ORDER BY first_seen DESC, short_code"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        into_records(rows)
    }
}
