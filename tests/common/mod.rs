#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use linkpulse::application::services::{
    AnalyticsService, ClickPublisher, LinkService, RedirectService,
};
use linkpulse::domain::entities::{
    AggregateRecord, HourlyClicks, LinkMetadata, NewShortLink, RecentClick, ShortLink,
};
use linkpulse::domain::repositories::{AggregateRepository, LinkRepository};
use linkpulse::error::AppError;
use linkpulse::infrastructure::bus::{BusError, EventBus, MessageStream};
use linkpulse::infrastructure::cache::CacheService;
use linkpulse::infrastructure::sink::ClickSink;
use linkpulse::routes::analytics_router;
use linkpulse::state::{AnalyticsState, AppState};

pub const PUBLIC_BASE_URL: &str = "http://localhost:8000";
pub const CACHE_TTL: Duration = Duration::from_secs(3600);
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Code store kept in memory, counting reads so tests can tell whether a
/// resolution reached the store.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
    reads: AtomicUsize,
}

impl InMemoryLinkRepository {
    pub fn with_links(links: &[(&str, &str)]) -> Self {
        let repo = Self::default();
        for (code, url) in links {
            repo.insert(code, url);
        }
        repo
    }

    pub fn insert(&self, code: &str, url: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.links.insert(
            code.to_string(),
            ShortLink::new(id, code.to_string(), url.to_string(), Utc::now()),
        );
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_link.code }),
            )),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                let link = ShortLink::new(id, new_link.code, new_link.target_url, Utc::now());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.links.get(code).map(|l| l.clone()))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self.links.iter().map(|l| l.clone()).collect();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        links.truncate(limit.max(0) as usize);
        Ok(links)
    }
}

/// Aggregation store kept in memory. Per-key locking in `DashMap::entry`
/// gives the same atomic read-modify-write as the SQL upsert.
#[derive(Default)]
pub struct InMemoryAggregateRepository {
    records: DashMap<String, AggregateRecord>,
    log: Mutex<Vec<RecentClick>>,
}

impl InMemoryAggregateRepository {
    pub fn get(&self, code: &str) -> Option<AggregateRecord> {
        self.records.get(code).map(|r| r.clone())
    }

    pub fn list_all_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.records.iter().map(|r| r.key().clone()).collect();
        codes.sort();
        codes
    }

    pub fn list_is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_clicks(&self, code: &str) -> i64 {
        self.get(code).map(|r| r.total_clicks).unwrap_or(0)
    }
}

#[async_trait]
impl AggregateRepository for InMemoryAggregateRepository {
    async fn record_click(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
    ) -> Result<AggregateRecord, AppError> {
        let record = match self.records.entry(code.to_string()) {
            Entry::Occupied(mut existing) => {
                apply_click(existing.get_mut(), clicked_at);
                existing.get().clone()
            }
            Entry::Vacant(slot) => slot
                .insert(AggregateRecord::first_click(code, clicked_at))
                .clone(),
        };

        self.log.lock().unwrap().push(RecentClick {
            code: code.to_string(),
            clicked_at,
            target_url: record.target_url.clone(),
        });

        Ok(record)
    }

    async fn upsert_metadata(&self, metadata: LinkMetadata) -> Result<AggregateRecord, AppError> {
        let mut record = self
            .records
            .entry(metadata.code.clone())
            .or_insert_with(|| {
                let mut record = AggregateRecord::first_click(metadata.code.clone(), Utc::now());
                record.total_clicks = 0;
                record.last_clicked = None;
                record
            });

        record.target_url = Some(metadata.target_url);
        if metadata.title.is_some() {
            record.title = metadata.title;
        }
        if metadata.description.is_some() {
            record.description = metadata.description;
        }
        if metadata.favicon_url.is_some() {
            record.favicon_url = metadata.favicon_url;
        }
        record.status = metadata.status;

        Ok(record.clone())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<AggregateRecord>, AppError> {
        Ok(self.get(code))
    }

    async fn count_codes(&self) -> Result<i64, AppError> {
        Ok(self.records.len() as i64)
    }

    async fn count_clicks(&self) -> Result<i64, AppError> {
        Ok(self.records.iter().map(|r| r.total_clicks).sum())
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<AggregateRecord>, AppError> {
        let mut records: Vec<AggregateRecord> = self
            .records
            .iter()
            .filter(|r| r.total_clicks > 0)
            .map(|r| r.clone())
            .collect();
        records.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks).then(a.code.cmp(&b.code)));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn recent_clicks(&self, limit: i64) -> Result<Vec<RecentClick>, AppError> {
        let mut log = self.log.lock().unwrap().clone();
        log.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at));
        log.truncate(limit.max(0) as usize);
        Ok(log)
    }

    async fn hourly_clicks(&self, since: DateTime<Utc>) -> Result<Vec<HourlyClicks>, AppError> {
        use chrono::{DurationRound, TimeDelta};
        use std::collections::BTreeMap;

        let mut buckets: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();
        for click in self.log.lock().unwrap().iter() {
            if click.clicked_at >= since {
                let hour = click
                    .clicked_at
                    .duration_trunc(TimeDelta::hours(1))
                    .unwrap();
                *buckets.entry(hour).or_default() += 1;
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(hour, count)| HourlyClicks { hour, count })
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<AggregateRecord>, AppError> {
        Ok(self.records.iter().map(|r| r.clone()).collect())
    }
}

/// Same merge as the SQL upsert: one more click, `first_seen` only moves
/// back, `last_clicked` only moves forward.
fn apply_click(record: &mut AggregateRecord, clicked_at: DateTime<Utc>) {
    record.total_clicks += 1;
    record.first_seen = record.first_seen.min(clicked_at);
    record.last_clicked = Some(record.last_clicked.map_or(clicked_at, |last| last.max(clicked_at)));
}

/// Bus whose publishes always fail, forcing the fallback path.
pub struct FailingBus;

#[async_trait]
impl EventBus for FailingBus {
    async fn publish(&self, topic: &str, _payload: &str) -> Result<(), BusError> {
        Err(BusError::Publish {
            topic: topic.to_string(),
            reason: "connection refused".to_string(),
        })
    }

    async fn subscribe(&self, topic: &str) -> Result<MessageStream, BusError> {
        Err(BusError::Subscribe {
            topic: topic.to_string(),
            reason: "connection refused".to_string(),
        })
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Sink that records every delivered event's code.
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn codes(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClickSink for RecordingSink {
    async fn deliver(
        &self,
        event: &linkpulse::domain::click_event::ClickEvent,
    ) -> Result<(), linkpulse::infrastructure::sink::DeliveryError> {
        self.delivered.lock().unwrap().push(event.code.clone());
        Ok(())
    }
}

pub fn create_redirect_state(
    links: Arc<InMemoryLinkRepository>,
    cache: Arc<dyn CacheService>,
    bus: Arc<dyn EventBus>,
    sink: Arc<dyn ClickSink>,
) -> AppState {
    let publisher = ClickPublisher::new(bus.clone(), sink, DELIVERY_TIMEOUT);

    AppState {
        link_service: Arc::new(LinkService::new(links.clone(), PUBLIC_BASE_URL)),
        redirect_service: Arc::new(RedirectService::new(
            links,
            cache.clone(),
            publisher,
            CACHE_TTL,
        )),
        cache,
        bus,
    }
}

pub fn create_analytics_state(
    repo: Arc<InMemoryAggregateRepository>,
    bus: Arc<dyn EventBus>,
) -> AnalyticsState {
    AnalyticsState {
        analytics_service: Arc::new(AnalyticsService::new(repo)),
        bus,
    }
}

/// Serves the analytics router on an ephemeral local port.
pub async fn spawn_analytics_server(state: AnalyticsState) -> SocketAddr {
    use axum::ServiceExt;
    use axum::extract::Request;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = analytics_router(state);

    tokio::spawn(async move {
        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .await
            .unwrap();
    });

    addr
}
