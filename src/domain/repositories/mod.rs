//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Code store (short code -> target URL)
//! - [`AggregateRepository`] - Click aggregation store
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod aggregate_repository;
pub mod link_repository;

pub use aggregate_repository::AggregateRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use aggregate_repository::MockAggregateRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
