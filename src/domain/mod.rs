//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the click event model
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click event wire model
//! - [`click_worker`] - Bus consumer for click events
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a code and returns 301
//! 2. [`crate::application::services::ClickPublisher`] publishes a
//!    [`click_event::ClickEvent`] to the bus, or POSTs it to the analytics
//!    service when the bus is unavailable
//! 3. [`click_worker::run_click_consumer`] or `POST /api/events` receives it
//! 4. The click is aggregated via [`repositories::AggregateRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
