//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod collections;
pub mod graph;
pub mod neighbors;
