//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose the operations callers use.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code allocation, lookup and stats
//! - [`services::click_service::ClickService`] - Click recording and counting

pub mod services;
