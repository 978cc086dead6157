//! Storage and derivation layer for the call-log pipeline.
//!
//! Loads validated CSV rows into an in-memory SQLite store, derives per-user
//! analytics and the ordered call log from it, and writes both as CSV.

pub mod aggregator;
pub mod loader;
pub mod orderer;
pub mod report;
pub mod store;

pub use calllog_core as core;
