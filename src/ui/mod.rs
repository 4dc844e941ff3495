//! # User Interface
//!
//! Colored terminal output for graph summaries and diagnostics.

pub mod log;

pub use log::{debug, error, header, info, success, warn, Log};
