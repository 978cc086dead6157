//! Runtime orchestration layer for the call-log pipeline.
//!
//! Wires the loader, aggregator, orderer and report writers into a single
//! straight-line run.

pub mod pipeline;

pub use calllog_core as core;
pub use calllog_data as data;
