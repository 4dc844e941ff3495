//! Graph output handed to layout/rendering consumers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::edge::{Edge, EdgeOrigin};
use super::media::{MediaObject, MediaType};

/// A classified object in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub title: String,
	pub media_type: MediaType,
	/// Render color hint for `media_type`
	pub color: String,
}

impl GraphNode {
	pub fn classify(object: &MediaObject) -> Self {
		let media_type = object.media_type();
		Self {
			id: object.id.clone(),
			title: object.title.clone(),
			media_type,
			color: media_type.color().to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	pub objects: Vec<GraphNode>,
	/// Sorted ascending by distance
	pub edges: Vec<Edge>,
}

impl Graph {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.objects.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.objects.iter().find(|n| n.id == id)
	}

	/// Edges incident to `id`, closest first
	pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
		self.edges.iter().filter(move |e| e.touches(id))
	}

	pub fn type_counts(&self) -> BTreeMap<MediaType, usize> {
		let mut counts = BTreeMap::new();
		for node in &self.objects {
			*counts.entry(node.media_type).or_insert(0) += 1;
		}
		counts
	}

	pub fn origin_count(&self, origin: EdgeOrigin) -> usize {
		self.edges.iter().filter(|e| e.origin == origin).count()
	}

	/// Every edge endpoint refers to a listed object
	pub fn is_closed(&self) -> bool {
		let ids: HashSet<&str> = self.objects.iter().map(|n| n.id.as_str()).collect();
		self.edges
			.iter()
			.all(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
	}
}
