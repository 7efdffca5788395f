//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.
//! `shorten`, `redirect` and `health_handler` serve the redirect process;
//! `events`, `links`, `stats` and `analytics_health_handler` serve the
//! analytics process.

pub mod events;
pub mod health;
pub mod links;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use events::events_handler;
pub use health::{analytics_health_handler, health_handler};
pub use links::register_link_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::{stats_handler, stats_overview_handler};
