//! File-backed collection store with brute-force neighbor search

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::snapshot::{self, CollectionSnapshot};
use super::{Neighbor, NeighborIndex, NeighborQuery, ObjectSource};
use crate::config::{SNAPSHOT_EXT, SNAPSHOT_JSON_EXT};
use crate::core::{Embedding, MediaObject, MediaType};
use crate::error::StoreError;
use crate::ui;

/// Listing entry for a stored collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionInfo {
	pub name: String,
	pub description: String,
	pub objects: usize,
	pub media_types: Vec<MediaType>,
	pub path: PathBuf,
}

struct LoadedCollection {
	snapshot: CollectionSnapshot,
	embeddings: Vec<Embedding>,
	by_id: HashMap<String, usize>,
}

impl LoadedCollection {
	fn new(snapshot: CollectionSnapshot) -> Self {
		let embeddings = snapshot.objects.iter().map(|o| o.embedding()).collect();
		let by_id = snapshot
			.objects
			.iter()
			.enumerate()
			.map(|(idx, o)| (o.id.clone(), idx))
			.collect();

		Self {
			snapshot,
			embeddings,
			by_id,
		}
	}

	fn neighbors(&self, object_id: &str, query: &NeighborQuery) -> Result<Vec<Neighbor>, StoreError> {
		let Some(&idx) = self.by_id.get(object_id) else {
			return Err(StoreError::Transient(format!(
				"object '{}' not found in '{}'",
				object_id, self.snapshot.name
			)));
		};

		let origin = &self.embeddings[idx];
		if origin.is_empty() {
			return Ok(Vec::new());
		}

		let mut distances: Vec<(usize, f32)> = self
			.embeddings
			.iter()
			.enumerate()
			.filter(|(j, other)| *j != idx && other.dim() == origin.dim())
			.filter(|(j, _)| query.admits(&self.snapshot.objects[*j].id))
			.map(|(j, other)| (j, origin.distance(other)))
			.filter(|(_, d)| query.max_distance.map_or(true, |max| *d <= max))
			.collect();

		distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
		distances.truncate(query.max_results);

		Ok(distances
			.into_iter()
			.map(|(j, d)| Neighbor::new(self.snapshot.objects[j].id.clone(), d))
			.collect())
	}
}

/// Directory of collection snapshots, one file per collection.
///
/// Snapshots are read once per store handle and cached.
pub struct LocalStore {
	root: PathBuf,
	cache: RwLock<HashMap<String, Arc<LoadedCollection>>>,
}

impl LocalStore {
	pub fn open(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			cache: RwLock::new(HashMap::new()),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Existing snapshot file for a collection, MessagePack preferred
	pub fn resolve(&self, name: &str) -> Option<PathBuf> {
		[SNAPSHOT_EXT, SNAPSHOT_JSON_EXT]
			.into_iter()
			.map(|ext| snapshot::build_path(&self.root, name, ext))
			.find(|p| p.is_file())
	}

	pub fn exists(&self, name: &str) -> bool {
		self.resolve(name).is_some()
	}

	/// Write a collection snapshot, replacing any cached copy
	pub fn save_collection(&self, snap: &CollectionSnapshot) -> Result<PathBuf> {
		let path = snapshot::build_path(&self.root, &snap.name, SNAPSHOT_EXT);
		snapshot::save(snap, &path)?;

		let key = snapshot::normalize_name(&snap.name);
		self.cache
			.write()
			.unwrap_or_else(|e| e.into_inner())
			.remove(&key);

		Ok(path)
	}

	/// All readable collections in the store, sorted by name
	pub fn collections(&self) -> Result<Vec<CollectionInfo>> {
		let Ok(entries) = fs::read_dir(&self.root) else {
			ui::debug(&format!("Store directory not readable: {}", self.root.display()));
			return Ok(Vec::new());
		};

		let mut infos = Vec::new();

		for entry in entries.filter_map(|e| e.ok()) {
			let path = entry.path();
			if !path.is_file() || !snapshot::is_snapshot(&path) {
				continue;
			}

			match snapshot::load(&path) {
				Ok(snap) => infos.push(CollectionInfo {
					media_types: snap.media_types(),
					name: snap.name,
					description: snap.description,
					objects: snap.objects.len(),
					path,
				}),
				Err(e) => ui::debug(&format!("Skipping {}: {:#}", path.display(), e)),
			}
		}

		infos.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(infos)
	}

	/// Full snapshot of one collection
	pub fn snapshot(&self, name: &str) -> Result<CollectionSnapshot, StoreError> {
		Ok(self.load(name)?.snapshot.clone())
	}

	fn load(&self, name: &str) -> Result<Arc<LoadedCollection>, StoreError> {
		let key = snapshot::normalize_name(name);

		if let Some(loaded) = self.cache.read().unwrap_or_else(|e| e.into_inner()).get(&key) {
			return Ok(Arc::clone(loaded));
		}

		let path = self.resolve(&key).ok_or_else(|| StoreError::NotFound(key.clone()))?;
		let snap = snapshot::load(&path).map_err(|e| StoreError::Transient(format!("{:#}", e)))?;

		if !snap.is_current_version() {
			ui::debug(&format!("{} was written by v{}", path.display(), snap.version));
		}

		ui::debug(&format!("Loaded {} objects from {}", snap.objects.len(), path.display()));

		let loaded = Arc::new(LoadedCollection::new(snap));
		self.cache
			.write()
			.unwrap_or_else(|e| e.into_inner())
			.insert(key, Arc::clone(&loaded));

		Ok(loaded)
	}
}

impl ObjectSource for LocalStore {
	fn list_objects(&self, collection: &str, limit: usize) -> Result<Vec<MediaObject>, StoreError> {
		let loaded = self.load(collection)?;
		Ok(loaded
			.snapshot
			.objects
			.iter()
			.take(limit)
			.map(|o| o.to_media_object())
			.collect())
	}
}

impl NeighborIndex for LocalStore {
	fn query_neighbors(
		&self,
		collection: &str,
		object_id: &str,
		query: &NeighborQuery,
	) -> Result<Vec<Neighbor>, StoreError> {
		self.load(collection)?.neighbors(object_id, query)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;
	use crate::storage::{DataType, PropertyDef, StoredObject};

	fn seeded_store() -> (tempfile::TempDir, LocalStore) {
		let dir = tempfile::tempdir().unwrap();
		let store = LocalStore::open(dir.path());

		let snapshot = CollectionSnapshot::new("pets", "Pet pictures")
			.with_property(PropertyDef::new("title", DataType::Text))
			.with_property(PropertyDef::new("image", DataType::Blob))
			.with_object(StoredObject::new("a", "cat_01", vec![1.0, 0.0]))
			.with_object(StoredObject::new("b", "cat_02", vec![0.9, 0.1]))
			.with_object(StoredObject::new("c", "dog_01", vec![0.0, 1.0]))
			.with_object(StoredObject::new("d", "no vector", Vec::new()));
		store.save_collection(&snapshot).unwrap();

		(dir, store)
	}

	fn query(max_results: usize, max_distance: Option<f32>) -> NeighborQuery {
		NeighborQuery::new(max_results, max_distance)
	}

	#[test]
	fn resolves_lowercase_names() {
		let (_dir, store) = seeded_store();
		assert!(store.exists("pets"));
		assert!(store.exists("Pets"));
		assert!(!store.exists("birds"));
	}

	#[test]
	fn lists_up_to_limit() {
		let (_dir, store) = seeded_store();
		let objects = store.list_objects("pets", 2).unwrap();
		let ids: Vec<&str> = objects.iter().map(|o| o.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b"]);
	}

	#[test]
	fn missing_collection_is_not_found() {
		let (_dir, store) = seeded_store();
		assert_eq!(
			store.list_objects("birds", 10),
			Err(StoreError::NotFound("Birds".into()))
		);
	}

	#[test]
	fn neighbors_sorted_and_bounded() {
		let (_dir, store) = seeded_store();

		let all = store.query_neighbors("pets", "a", &query(10, None)).unwrap();
		let ids: Vec<&str> = all.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["b", "c"]);
		assert!(all[0].distance < 0.01);
		assert!((all[1].distance - 1.0).abs() < 1e-6);

		let close = store.query_neighbors("pets", "a", &query(10, Some(0.5))).unwrap();
		assert_eq!(close.len(), 1);

		let top = store.query_neighbors("pets", "a", &query(1, None)).unwrap();
		assert_eq!(top[0].id, "b");
	}

	#[test]
	fn candidates_restrict_ranking() {
		let (_dir, store) = seeded_store();
		let candidates: HashSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();

		let found = store
			.query_neighbors("pets", "a", &query(1, None).within(Arc::new(candidates)))
			.unwrap();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].id, "c");
	}

	#[test]
	fn object_without_vector_has_no_neighbors() {
		let (_dir, store) = seeded_store();
		assert!(store.query_neighbors("pets", "d", &query(10, None)).unwrap().is_empty());
	}

	#[test]
	fn unknown_object_is_transient() {
		let (_dir, store) = seeded_store();
		assert!(matches!(
			store.query_neighbors("pets", "zzz", &query(10, None)),
			Err(StoreError::Transient(_))
		));
	}

	#[test]
	fn collections_report_schema_media_types() {
		let (dir, store) = seeded_store();
		fs::write(dir.path().join("Junk.msgpack"), b"garbage").unwrap();
		fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

		let infos = store.collections().unwrap();
		assert_eq!(infos.len(), 1);
		assert_eq!(infos[0].name, "Pets");
		assert_eq!(infos[0].objects, 4);
		assert_eq!(infos[0].media_types, vec![MediaType::Image]);
	}

	#[test]
	fn corrupt_collection_is_transient() {
		let (dir, store) = seeded_store();
		fs::write(dir.path().join("Junk.msgpack"), b"garbage").unwrap();
		assert!(matches!(store.list_objects("junk", 10), Err(StoreError::Transient(_))));
	}

	#[test]
	fn save_invalidates_cache() {
		let (_dir, store) = seeded_store();
		assert_eq!(store.list_objects("pets", 10).unwrap().len(), 4);

		let smaller = CollectionSnapshot::new("pets", "")
			.with_object(StoredObject::new("x", "solo", vec![1.0]));
		store.save_collection(&smaller).unwrap();

		assert_eq!(store.list_objects("pets", 10).unwrap().len(), 1);
	}
}
