//! Deduplicating edge set keyed by canonical pair

use std::collections::HashMap;

use crate::core::{Edge, EdgeOrigin, PairKey};

/// At most one edge per unordered pair, the closest one.
///
/// The result does not depend on the order in which candidates are offered.
#[derive(Debug, Default)]
pub struct EdgeSet {
	edges: HashMap<PairKey, Edge>,
}

impl EdgeSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Keep `candidate` if it beats the current edge for its pair.
	/// Returns whether it was kept.
	pub fn offer(&mut self, candidate: Edge) -> bool {
		let key = candidate.key();
		let keep = self
			.edges
			.get(&key)
			.map_or(true, |current| prefers(&candidate, current));

		if keep {
			self.edges.insert(key, candidate);
		}
		keep
	}

	pub fn len(&self) -> usize {
		self.edges.len()
	}

	/// Closest first
	pub fn into_sorted(self) -> Vec<Edge> {
		let mut edges: Vec<Edge> = self.edges.into_values().collect();
		edges.sort_by(|a, b| a.cmp_by_distance(b));
		edges
	}
}

/// Strictly lower distance wins; on a tie the semantic edge wins
fn prefers(candidate: &Edge, current: &Edge) -> bool {
	if candidate.distance < current.distance {
		return true;
	}
	candidate.distance == current.distance
		&& candidate.origin == EdgeOrigin::Semantic
		&& current.origin == EdgeOrigin::Vector
}
