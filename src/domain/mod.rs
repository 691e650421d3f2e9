//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Queued click model
//! - [`click_worker`] - Asynchronous click persistence
//!
//! # Click Processing Flow
//!
//! 1. A caller resolves a short code and builds a [`click_event::ClickEvent`]
//! 2. The event is pushed onto a bounded channel (non-blocking)
//! 3. [`click_worker::run_click_worker`] records it with retry
//! 4. The click is persisted via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
