//! Composition of the engine with the persistence collaborators.
//!
//! Both services are stateless apart from configuration and a clock; the
//! store is passed to every call so the caller controls its lifetime and
//! any surrounding transaction.

mod links;
mod review;


pub use links::{LinkSync, LinkSyncReport};
pub use review::{DuePage, Page, ReviewService, StatusChange};
