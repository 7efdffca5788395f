//! Direct (non-bus) click delivery used as the publisher's fallback path.
//!
//! - [`HttpClickSink`] - HTTP POST to the analytics ingestion endpoint
//! - [`NullClickSink`] - Stand-in when no endpoint is configured

mod http_sink;
mod null_sink;
mod service;

pub use http_sink::{EVENTS_PATH, HttpClickSink};
pub use null_sink::NullClickSink;
pub use service::{ClickSink, DeliveryError};

#[cfg(test)]
pub use service::MockClickSink;
