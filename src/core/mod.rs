//! Core domain types

pub mod edge;
pub mod embedding;
pub mod graph;
pub mod media;

pub use edge::{Edge, EdgeOrigin, PairKey};
pub use embedding::Embedding;
pub use graph::{Graph, GraphNode};
pub use media::{MediaMetadata, MediaObject, MediaProperties, MediaType};
