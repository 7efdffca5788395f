//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Code store
//! - [`PgAggregateRepository`] - Click aggregates and click log

pub mod pg_aggregate_repository;
pub mod pg_link_repository;

pub use pg_aggregate_repository::PgAggregateRepository;
pub use pg_link_repository::PgLinkRepository;
