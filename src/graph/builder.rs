//! Similarity graph builder
//!
//! Lists a collection's working set, classifies it, and merges two edge
//! signals into one deduplicated graph:
//!
//! - semantic edges between objects whose titles share a base name
//! - vector edges from per-object nearest-neighbor queries
//!
//! Neighbor queries run on a worker pool of `batch_size` threads. Workers
//! only send results back over a channel; the building thread is the single
//! writer of the edge set, so no lock guards it.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::cancel::CancelToken;
use super::merge::EdgeSet;
use super::semantic::find_semantic_edges;
use crate::config::{GraphConfig, CANCEL_POLL_INTERVAL};
use crate::core::{Edge, EdgeOrigin, Graph, GraphNode, MediaObject};
use crate::error::{GraphError, StoreError};
use crate::storage::{Neighbor, NeighborIndex, NeighborQuery, ObjectSource};
use crate::ui;

/// Counters for one build
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildStats {
	pub objects: usize,
	pub queries: usize,
	pub failed_queries: usize,
	pub semantic_candidates: usize,
	pub vector_candidates: usize,
	pub edges: usize,
	pub elapsed_ms: u64,
}

struct QueryOutcome {
	object_id: String,
	result: Result<Vec<Neighbor>, StoreError>,
}

pub struct SimilarityGraphBuilder {
	objects: Arc<dyn ObjectSource>,
	neighbors: Arc<dyn NeighborIndex>,
	config: GraphConfig,
}

impl SimilarityGraphBuilder {
	pub fn new(objects: Arc<dyn ObjectSource>, neighbors: Arc<dyn NeighborIndex>, config: GraphConfig) -> Self {
		Self {
			objects,
			neighbors,
			config,
		}
	}

	/// Builder over a store that serves both listings and neighbor queries
	pub fn from_store<S>(store: Arc<S>, config: GraphConfig) -> Self
	where
		S: ObjectSource + NeighborIndex + 'static,
	{
		let objects: Arc<dyn ObjectSource> = store.clone();
		let neighbors: Arc<dyn NeighborIndex> = store;
		Self::new(objects, neighbors, config)
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn build(&self, collection: &str, limit: usize) -> Result<Graph, GraphError> {
		self.build_with_stats(collection, limit, &CancelToken::new())
			.map(|(graph, _)| graph)
	}

	pub fn build_cancellable(
		&self,
		collection: &str,
		limit: usize,
		cancel: &CancelToken,
	) -> Result<Graph, GraphError> {
		self.build_with_stats(collection, limit, cancel)
			.map(|(graph, _)| graph)
	}

	pub fn build_with_stats(
		&self,
		collection: &str,
		limit: usize,
		cancel: &CancelToken,
	) -> Result<(Graph, BuildStats), GraphError> {
		let start = Instant::now();
		let config = self.config;
		if limit == 0 {
			return Err(GraphError::InvalidConfiguration("limit must be at least 1".into()));
		}
		config.validate()?;

		if cancel.is_cancelled() {
			return Err(GraphError::Cancelled);
		}

		ui::debug(&format!("Listing up to {} objects from '{}'", limit, collection));
		let mut objects = self.objects.list_objects(collection, limit)?;
		objects.truncate(limit);

		let mut stats = BuildStats {
			objects: objects.len(),
			..Default::default()
		};

		if objects.is_empty() {
			ui::debug(&format!("Collection '{}' is empty", collection));
			stats.elapsed_ms = start.elapsed().as_millis() as u64;
			return Ok((Graph::empty(), stats));
		}

		let nodes: Vec<GraphNode> = objects.iter().map(GraphNode::classify).collect();

		let mut edges = EdgeSet::new();
		let semantic = find_semantic_edges(&objects, config.semantic_distance);
		stats.semantic_candidates = semantic.len();
		for edge in semantic {
			edges.offer(edge);
		}
		ui::debug(&format!(
			"{} semantic candidates, {} distinct pairs",
			stats.semantic_candidates,
			edges.len()
		));

		let members: HashSet<&str> = objects.iter().map(|o| o.id.as_str()).collect();
		let working_set: HashSet<String> = members.iter().map(|id| id.to_string()).collect();

		// One extra slot for an index that reports the queried object itself
		let max_results = config
			.max_neighbors_per_object
			.map_or(objects.len(), |k| k.saturating_add(1).min(objects.len()));
		let query = NeighborQuery::new(max_results, config.distance_ceiling).within(Arc::new(working_set));

		stats.queries = objects.len();
		self.fan_out(collection, &objects, query, config.batch_size, cancel, |outcome| {
			match outcome.result {
				Ok(neighbors) => {
					for edge in admit(&outcome.object_id, neighbors, &members, &config) {
						stats.vector_candidates += 1;
						edges.offer(edge);
					}
				}
				Err(e) => {
					stats.failed_queries += 1;
					ui::warn(&format!("Neighbor query failed for {}: {}", outcome.object_id, e));
				}
			}
		})?;

		let edges = edges.into_sorted();
		stats.edges = edges.len();
		stats.elapsed_ms = start.elapsed().as_millis() as u64;

		ui::debug(&format!(
			"Built graph: {} objects, {} edges ({} vector candidates, {} failed queries) in {}ms",
			stats.objects, stats.edges, stats.vector_candidates, stats.failed_queries, stats.elapsed_ms
		));

		Ok((Graph { objects: nodes, edges }, stats))
	}

	/// Run one neighbor query per object with at most `batch_size` in flight,
	/// handing each outcome to `merge` on the calling thread.
	///
	/// On cancellation this returns without waiting for running queries;
	/// their results are dropped with the channel.
	fn fan_out<F>(
		&self,
		collection: &str,
		objects: &[MediaObject],
		query: NeighborQuery,
		batch_size: usize,
		cancel: &CancelToken,
		mut merge: F,
	) -> Result<(), GraphError>
	where
		F: FnMut(QueryOutcome),
	{
		let pool = rayon::ThreadPoolBuilder::new()
			.num_threads(batch_size.min(objects.len()).max(1))
			.thread_name(|i| format!("neighbor-query-{}", i))
			.build()
			.map_err(|e| GraphError::WorkerPool(e.to_string()))?;

		let (tx, rx) = mpsc::channel();

		for object in objects {
			let tx = tx.clone();
			let index = Arc::clone(&self.neighbors);
			let collection = collection.to_string();
			let object_id = object.id.clone();
			let cancel = cancel.clone();
			let query = query.clone();

			pool.spawn(move || {
				if cancel.is_cancelled() {
					return;
				}

				let result = panic::catch_unwind(AssertUnwindSafe(|| {
					index.query_neighbors(&collection, &object_id, &query)
				}))
				.unwrap_or_else(|_| Err(StoreError::Transient("neighbor query panicked".into())));

				let _ = tx.send(QueryOutcome { object_id, result });
			});
		}
		drop(tx);

		loop {
			if cancel.is_cancelled() {
				ui::debug("Build cancelled, abandoning in-flight neighbor queries");
				return Err(GraphError::Cancelled);
			}

			match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
				Ok(outcome) => merge(outcome),
				Err(RecvTimeoutError::Timeout) => continue,
				Err(RecvTimeoutError::Disconnected) => break,
			}
		}

		// Workers skip queries once cancelled, so a late cancel means missing results
		if cancel.is_cancelled() {
			return Err(GraphError::Cancelled);
		}

		Ok(())
	}
}

/// Vector edges admitted from one neighbor-query result
fn admit(object_id: &str, neighbors: Vec<Neighbor>, members: &HashSet<&str>, config: &GraphConfig) -> Vec<Edge> {
	let mut admitted: Vec<Neighbor> = neighbors
		.into_iter()
		.filter(|n| n.id != object_id && members.contains(n.id.as_str()))
		.filter(|n| n.distance.is_finite())
		.filter(|n| config.distance_ceiling.map_or(true, |max| n.distance <= max))
		.collect();

	admitted.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
	if let Some(k) = config.max_neighbors_per_object {
		admitted.truncate(k);
	}

	admitted
		.into_iter()
		.filter_map(|n| Edge::new(object_id, &n.id, n.distance, EdgeOrigin::Vector))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn members<'a>(ids: &[&'a str]) -> HashSet<&'a str> {
		ids.iter().copied().collect()
	}

	#[test]
	fn admit_drops_self_strangers_and_far_neighbors() {
		let config = GraphConfig::default();
		let neighbors = vec![
			Neighbor::new("a", 0.0),
			Neighbor::new("b", 0.1),
			Neighbor::new("outsider", 0.05),
			Neighbor::new("c", 0.45),
			Neighbor::new("d", f32::NAN),
		];

		let edges = admit("a", neighbors, &members(&["a", "b", "c", "d"]), &config);
		assert_eq!(edges, vec![Edge::new("a", "b", 0.1, EdgeOrigin::Vector).unwrap()]);
	}

	#[test]
	fn admit_top_k_without_ceiling() {
		let config = GraphConfig::default()
			.with_distance_ceiling(None)
			.with_max_neighbors(Some(2));
		let neighbors = vec![
			Neighbor::new("d", 0.9),
			Neighbor::new("b", 0.7),
			Neighbor::new("c", 0.8),
		];

		let edges = admit("a", neighbors, &members(&["a", "b", "c", "d"]), &config);
		let targets: Vec<&str> = edges.iter().map(|e| e.target.as_str()).collect();
		assert_eq!(targets, vec!["b", "c"]);
	}

	#[test]
	fn admit_applies_both_policies() {
		let config = GraphConfig::default()
			.with_distance_ceiling(Some(0.5))
			.with_max_neighbors(Some(3));
		let neighbors = vec![
			Neighbor::new("b", 0.1),
			Neighbor::new("c", 0.2),
			Neighbor::new("d", 0.6),
		];

		let edges = admit("a", neighbors, &members(&["a", "b", "c", "d"]), &config);
		assert_eq!(edges.len(), 2);
	}
}
