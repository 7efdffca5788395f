//! Business logic services for the application layer.

pub mod analytics_service;
pub mod click_publisher;
pub mod link_service;
pub mod redirect_service;

pub use analytics_service::{AnalyticsService, StatsOverview};
pub use click_publisher::{ClickPublisher, DEFAULT_DELIVERY_TIMEOUT, DeliveryOutcome};
pub use link_service::LinkService;
pub use redirect_service::{RedirectService, Resolution, ResolutionSource};
