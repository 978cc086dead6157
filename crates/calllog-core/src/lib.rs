//! Core types for the call-log reporting pipeline.
//!
//! Holds the entity models, row validation, the shared error type and the
//! CLI / file configuration. Nothing in this crate touches storage or
//! performs file I/O beyond reading the configuration file.

pub mod error;
pub mod models;
pub mod settings;
pub mod validation;

pub use error::{PipelineError, Result};
