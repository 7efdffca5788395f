//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, LinkService, RedirectService};
use crate::infrastructure::bus::EventBus;
use crate::infrastructure::cache::CacheService;

/// State of the redirect process, built once at startup.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub cache: Arc<dyn CacheService>,
    pub bus: Arc<dyn EventBus>,
}

/// State of the analytics process, built once at startup.
#[derive(Clone)]
pub struct AnalyticsState {
    pub analytics_service: Arc<AnalyticsService>,
    pub bus: Arc<dyn EventBus>,
}
