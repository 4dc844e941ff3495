//! Collection storage and the collaborator interfaces the graph builder consumes

pub mod local;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::core::MediaObject;
use crate::error::StoreError;

pub use local::{CollectionInfo, LocalStore};
pub use snapshot::{normalize_name, CollectionSnapshot, DataType, PropertyDef, StoredObject};

/// A nearest neighbor reported for a queried object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
	pub id: String,
	/// [0.0, 1.0], 0.0 = identical
	pub distance: f32,
}

impl Neighbor {
	pub fn new(id: impl Into<String>, distance: f32) -> Self {
		Self {
			id: id.into(),
			distance,
		}
	}
}

/// Bounds for a single neighbor query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborQuery {
	pub max_results: usize,
	pub max_distance: Option<f32>,
	/// Only rank objects with these ids; `None` ranks the whole collection
	pub candidates: Option<Arc<HashSet<String>>>,
}

impl NeighborQuery {
	pub fn new(max_results: usize, max_distance: Option<f32>) -> Self {
		Self {
			max_results,
			max_distance,
			candidates: None,
		}
	}

	pub fn within(mut self, candidates: Arc<HashSet<String>>) -> Self {
		self.candidates = Some(candidates);
		self
	}

	pub fn admits(&self, id: &str) -> bool {
		self.candidates.as_ref().map_or(true, |c| c.contains(id))
	}
}

/// Lists the working set of a collection
pub trait ObjectSource: Send + Sync {
	/// Up to `limit` objects, or `StoreError::NotFound` for a missing collection
	fn list_objects(&self, collection: &str, limit: usize) -> Result<Vec<MediaObject>, StoreError>;
}

/// Answers nearest-neighbor queries for objects of a collection
pub trait NeighborIndex: Send + Sync {
	/// Closest neighbors first
	fn query_neighbors(
		&self,
		collection: &str,
		object_id: &str,
		query: &NeighborQuery,
	) -> Result<Vec<Neighbor>, StoreError>;
}
