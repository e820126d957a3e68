//! Event scheduling
//!
//! Pending transitions are represented by the jobs themselves: each job's
//! due time is the moment of its next event.

pub mod store;

pub use store::{EventStore, StoreError};
