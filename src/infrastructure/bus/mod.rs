//! Publish/subscribe transport for click events.
//!
//! Provides an [`EventBus`] trait with three implementations:
//! - [`RedisBus`] - Redis pub/sub, used in production
//! - [`InMemoryBus`] - tokio broadcast channel for single-process setups and tests
//! - [`NullBus`] - Stand-in when no bus address is configured
//!
//! None of them persist messages.

mod memory_bus;
mod null_bus;
mod redis_bus;
mod service;

pub use memory_bus::InMemoryBus;
pub use null_bus::NullBus;
pub use redis_bus::RedisBus;
pub use service::{BusError, CLICK_EVENTS_TOPIC, EventBus, MessageStream};

#[cfg(test)]
pub use service::MockEventBus;
