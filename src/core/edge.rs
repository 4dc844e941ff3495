//! Undirected similarity edges

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which signal proposed an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOrigin {
	Vector,
	Semantic,
}

impl EdgeOrigin {
	pub fn as_str(&self) -> &'static str {
		match self {
			EdgeOrigin::Vector => "vector",
			EdgeOrigin::Semantic => "semantic",
		}
	}
}

impl fmt::Display for EdgeOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Order-independent identifier of an unordered id pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey(String, String);

impl PairKey {
	pub fn new(a: &str, b: &str) -> Self {
		if a <= b {
			Self(a.to_string(), b.to_string())
		} else {
			Self(b.to_string(), a.to_string())
		}
	}
}

impl fmt::Display for PairKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}<->{}", self.0, self.1)
	}
}

/// Similarity relation between two distinct objects.
///
/// Endpoints are stored in canonical order (`source < target`), so two edges
/// over the same pair always compare equal regardless of discovery direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub source: String,
	pub target: String,
	/// [0.0, 1.0], lower = more similar
	pub distance: f32,
	pub origin: EdgeOrigin,
}

impl Edge {
	/// Returns `None` for a self-loop
	pub fn new(a: &str, b: &str, distance: f32, origin: EdgeOrigin) -> Option<Self> {
		if a == b {
			return None;
		}

		let key = PairKey::new(a, b);
		Some(Self {
			source: key.0,
			target: key.1,
			distance: distance.clamp(0.0, 1.0),
			origin,
		})
	}

	pub fn key(&self) -> PairKey {
		PairKey::new(&self.source, &self.target)
	}

	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}

	/// Closest first, then by endpoints for a stable order
	pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
		self.distance
			.partial_cmp(&other.distance)
			.unwrap_or(Ordering::Equal)
			.then_with(|| self.source.cmp(&other.source))
			.then_with(|| self.target.cmp(&other.target))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pair_key_is_order_independent() {
		assert_eq!(PairKey::new("b", "a"), PairKey::new("a", "b"));
		assert_eq!(PairKey::new("b", "a").to_string(), "a<->b");
	}

	#[test]
	fn pair_key_does_not_collide_on_separator() {
		assert_ne!(PairKey::new("a<->b", "c"), PairKey::new("a", "b<->c"));
	}

	#[test]
	fn edge_is_canonical() {
		let edge = Edge::new("z", "a", 0.2, EdgeOrigin::Vector).unwrap();
		assert_eq!(edge.source, "a");
		assert_eq!(edge.target, "z");
		assert_eq!(edge.key(), PairKey::new("a", "z"));
	}

	#[test]
	fn self_loops_are_rejected() {
		assert!(Edge::new("a", "a", 0.0, EdgeOrigin::Semantic).is_none());
	}

	#[test]
	fn distance_is_clamped() {
		let edge = Edge::new("a", "b", 1.7, EdgeOrigin::Vector).unwrap();
		assert_eq!(edge.distance, 1.0);
	}
}
