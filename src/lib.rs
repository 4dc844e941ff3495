//! # mediagraph Library
//!
//! Similarity graphs over vectorized media collections (audio, image,
//! video, text). Combines nearest-neighbor distances and title grouping into
//! one deduplicated edge set for layout and rendering.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod storage;
pub mod ui;

pub use config::GraphConfig;
pub use error::{GraphError, StoreError};
pub use graph::{BuildStats, CancelToken, SimilarityGraphBuilder};
