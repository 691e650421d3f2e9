//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the store behind the services. Implementations live
//! in `crate::infrastructure::persistence`; mocks are generated with `mockall`
//! for unit tests.
//!
//! - [`LinkRepository`] - Link creation, lookup and click aggregation
//! - [`ClickRepository`] - Click recording and counting

pub mod click_repository;
pub mod link_repository;
pub mod store_error;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use store_error::StoreError;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
