//! Error types for graph building and collection stores

use thiserror::Error;

/// Failure reported by an object source or neighbor index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	#[error("collection '{0}' not found")]
	NotFound(String),

	#[error("{0}")]
	Transient(String),
}

/// Failure of a whole graph build.
///
/// Individual neighbor-query failures never appear here; they only reduce
/// the number of vector-derived edges.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("collection '{0}' not found")]
	CollectionNotFound(String),

	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	#[error("object source unavailable: {0}")]
	SourceUnavailable(String),

	#[error("graph build cancelled")]
	Cancelled,

	#[error("failed to start neighbor query workers: {0}")]
	WorkerPool(String),
}

impl From<StoreError> for GraphError {
	fn from(err: StoreError) -> Self {
		match err {
			StoreError::NotFound(name) => GraphError::CollectionNotFound(name),
			StoreError::Transient(reason) => GraphError::SourceUnavailable(reason),
		}
	}
}
