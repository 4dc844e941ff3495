//! Title-group matching, independent of vectors

use std::collections::BTreeMap;

use crate::core::{Edge, EdgeOrigin, MediaObject};

/// Base name of a title: everything before the first `_`.
///
/// Titles without `_` are their own base name. Empty titles and titles
/// starting with `_` have no group.
pub fn group_key(title: &str) -> Option<&str> {
	let base = title.split('_').next().unwrap_or_default();
	if base.is_empty() {
		None
	} else {
		Some(base)
	}
}

/// One edge per unordered pair of objects sharing a group key
pub fn find_semantic_edges(objects: &[MediaObject], distance: f32) -> Vec<Edge> {
	let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
	for object in objects {
		if let Some(key) = group_key(&object.title) {
			groups.entry(key).or_default().push(&object.id);
		}
	}

	let mut edges = Vec::new();
	for members in groups.values().filter(|m| m.len() > 1) {
		for (i, a) in members.iter().enumerate() {
			for b in &members[i + 1..] {
				edges.extend(Edge::new(a, b, distance, EdgeOrigin::Semantic));
			}
		}
	}

	edges
}
