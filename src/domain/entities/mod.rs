//! Core domain entities.
//!
//! - [`ShortLink`] - A short code and its target URL (code store)
//! - [`AggregateRecord`] - Per-code click counters (aggregation store)
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! `NewShortLink` for inserts, `LinkMetadata` for analytics registration.

pub mod aggregate;
pub mod link;

pub use aggregate::{AggregateRecord, HourlyClicks, LinkMetadata, MetadataStatus, RecentClick};
pub use link::{NewShortLink, ShortLink};
