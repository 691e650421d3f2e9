//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`Click`] - A click event on a shortened link
//!
//! Records the store has not seen yet use the `New*` structs; the store
//! assigns ids and timestamps when persisting them.

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
