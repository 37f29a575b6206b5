//! Bulk deletion of every document in one collection.
//!
//! The run is split into two phases: enumerate the collection once, then
//! delete each listed document concurrently and collect one result per
//! document, so a partially failed batch reports exactly which deletes failed.

#[cfg(test)]
pub(crate) mod memory_store;
pub mod runner;
pub mod store;

pub use runner::{Cleanup, CleanupError, CleanupReport, DeleteFailure};
pub use store::DocumentStore;
