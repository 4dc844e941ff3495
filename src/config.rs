//! Application configuration and constants

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::GraphError;

static CUSTOM_STORE_DIR: OnceLock<PathBuf> = OnceLock::new();

// === Graph Defaults ===
pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_DISTANCE_CEILING: f32 = 0.4;
pub const DEFAULT_SEMANTIC_DISTANCE: f32 = 0.3;
pub const MAX_SEMANTIC_DISTANCE: f32 = 0.35;

/// How often a waiting build checks for cancellation
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

// === Storage ===
pub const STORE_DIR: &str = "collections";
pub const STORE_DIR_ENV: &str = "MEDIAGRAPH_STORE_DIR";
pub const SNAPSHOT_EXT: &str = "msgpack";
pub const SNAPSHOT_JSON_EXT: &str = "json";

// === Output Defaults ===
pub const DEFAULT_TOP_EDGES: usize = 15;
pub const DEFAULT_NEIGHBORS: usize = 10;

/// Options for one similarity graph build
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
	/// Maximum number of neighbor queries in flight
	pub batch_size: usize,
	/// Vector edges above this distance are dropped
	pub distance_ceiling: Option<f32>,
	/// Keep only the k closest admitted neighbors per object
	pub max_neighbors_per_object: Option<usize>,
	/// Fixed distance assigned to title-group matches
	pub semantic_distance: f32,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			batch_size: DEFAULT_BATCH_SIZE,
			distance_ceiling: Some(DEFAULT_DISTANCE_CEILING),
			max_neighbors_per_object: None,
			semantic_distance: DEFAULT_SEMANTIC_DISTANCE,
		}
	}
}

impl GraphConfig {
	pub fn with_batch_size(mut self, batch_size: usize) -> Self {
		self.batch_size = batch_size;
		self
	}

	pub fn with_distance_ceiling(mut self, ceiling: Option<f32>) -> Self {
		self.distance_ceiling = ceiling;
		self
	}

	pub fn with_max_neighbors(mut self, max: Option<usize>) -> Self {
		self.max_neighbors_per_object = max;
		self
	}

	pub fn with_semantic_distance(mut self, distance: f32) -> Self {
		self.semantic_distance = distance;
		self
	}

	pub fn validate(&self) -> Result<(), GraphError> {
		let invalid = |msg: String| Err(GraphError::InvalidConfiguration(msg));

		if self.batch_size == 0 {
			return invalid("batch size must be at least 1".into());
		}
		if let Some(ceiling) = self.distance_ceiling {
			if !ceiling.is_finite() || !(0.0..=1.0).contains(&ceiling) {
				return invalid(format!("distance ceiling must be in [0.0, 1.0], got {}", ceiling));
			}
		}
		if self.max_neighbors_per_object == Some(0) {
			return invalid("max neighbors per object must be at least 1".into());
		}
		if !self.semantic_distance.is_finite()
			|| !(0.0..=MAX_SEMANTIC_DISTANCE).contains(&self.semantic_distance)
		{
			return invalid(format!(
				"semantic distance must be in [0.0, {}], got {}",
				MAX_SEMANTIC_DISTANCE, self.semantic_distance
			));
		}

		Ok(())
	}
}

pub fn set_store_dir(path: PathBuf) {
	let _ = CUSTOM_STORE_DIR.set(path);
}

/// Collection store directory (--store, MEDIAGRAPH_STORE_DIR, or ./collections)
pub fn store_dir() -> PathBuf {
	if let Some(custom) = CUSTOM_STORE_DIR.get() {
		crate::ui::debug(&format!("Using custom store dir: {}", custom.display()));
		return custom.clone();
	}

	if let Ok(env_path) = std::env::var(STORE_DIR_ENV) {
		if !env_path.trim().is_empty() {
			crate::ui::debug(&format!("Using {}: {}", STORE_DIR_ENV, env_path));
			return PathBuf::from(env_path);
		}
	}

	PathBuf::from(STORE_DIR)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = GraphConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.batch_size, 10);
		assert_eq!(config.distance_ceiling, Some(0.4));
		assert_eq!(config.semantic_distance, 0.3);
	}

	#[test]
	fn rejects_zero_batch() {
		assert!(matches!(
			GraphConfig::default().with_batch_size(0).validate(),
			Err(GraphError::InvalidConfiguration(_))
		));
	}

	#[test]
	fn rejects_bad_thresholds() {
		for ceiling in [-0.1, 1.5, f32::NAN] {
			let config = GraphConfig::default().with_distance_ceiling(Some(ceiling));
			assert!(config.validate().is_err(), "ceiling {} accepted", ceiling);
		}
		assert!(GraphConfig::default().with_max_neighbors(Some(0)).validate().is_err());
		assert!(GraphConfig::default().with_semantic_distance(0.5).validate().is_err());
		assert!(GraphConfig::default().with_semantic_distance(-0.01).validate().is_err());
	}

	#[test]
	fn ceiling_and_top_k_are_optional() {
		let config = GraphConfig::default()
			.with_distance_ceiling(None)
			.with_max_neighbors(Some(5))
			.with_semantic_distance(0.0);
		assert!(config.validate().is_ok());
	}
}
