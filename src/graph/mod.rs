//! # Similarity Graph
//!
//! Builds deduplicated, weighted, undirected graphs over a collection's
//! media objects from vector distances and title groups.

pub mod builder;
pub mod cancel;
pub mod merge;
pub mod semantic;

pub use builder::{BuildStats, SimilarityGraphBuilder};
pub use cancel::CancelToken;
pub use merge::EdgeSet;
pub use semantic::{find_semantic_edges, group_key};
