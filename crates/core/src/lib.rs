//! Pure domain logic for the maintenance tracker.
//!
//! This crate has no database or HTTP dependencies. The persistence layer
//! (`sharptrack-db`) and the API layer (`sharptrack-api`) both build on the
//! types and functions defined here.

pub mod aggregation;
pub mod bulk;
pub mod cache;
pub mod error;
pub mod lifecycle;
pub mod schedule;
pub mod types;
