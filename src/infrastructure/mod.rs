//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching and event transport.
//!
//! # Modules
//!
//! - [`bus`] - Publish/subscribe transport (Redis, in-memory, no-op)
//! - [`cache`] - Caching abstractions (Redis, in-memory, no-op)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`sink`] - Direct HTTP delivery used as the bus fallback

pub mod bus;
pub mod cache;
pub mod persistence;
pub mod sink;
