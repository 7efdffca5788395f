//! Application layer services implementing business logic.
//!
//! Services consume repository and infrastructure traits and provide a clean
//! API for HTTP handlers and the click consumer.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and retrieval
//! - [`services::redirect_service::RedirectService`] - Cache-aside code resolution
//! - [`services::click_publisher::ClickPublisher`] - Bus-then-HTTP click emission
//! - [`services::analytics_service::AnalyticsService`] - Click aggregation and stats

pub mod services;
