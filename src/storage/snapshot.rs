//! Collection snapshot file format and I/O

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{SNAPSHOT_EXT, SNAPSHOT_JSON_EXT};
use crate::core::{Embedding, MediaObject, MediaProperties, MediaType};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
	Text,
	Blob,
}

/// Schema entry of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
	pub name: String,
	pub data_type: DataType,
}

impl PropertyDef {
	pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
		Self {
			name: name.into(),
			data_type,
		}
	}
}

/// An object together with its precomputed vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default, rename = "mediaType", skip_serializing_if = "Option::is_none")]
	pub media_type: Option<String>,
	#[serde(default)]
	pub properties: MediaProperties,
	#[serde(default)]
	pub vector: Vec<f32>,
}

impl StoredObject {
	pub fn new(id: impl Into<String>, title: impl Into<String>, vector: Vec<f32>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			vector,
			..Default::default()
		}
	}

	pub fn to_media_object(&self) -> MediaObject {
		MediaObject {
			id: self.id.clone(),
			title: self.title.clone(),
			declared_type: self.media_type.clone(),
			properties: self.properties.clone(),
		}
	}

	pub fn embedding(&self) -> Embedding {
		Embedding::new(self.vector.clone())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
	pub version: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub properties: Vec<PropertyDef>,
	#[serde(default)]
	pub objects: Vec<StoredObject>,
}

impl CollectionSnapshot {
	pub fn new(name: &str, description: impl Into<String>) -> Self {
		Self {
			version: VERSION.to_string(),
			name: normalize_name(name),
			description: description.into(),
			properties: Vec::new(),
			objects: Vec::new(),
		}
	}

	pub fn with_property(mut self, property: PropertyDef) -> Self {
		self.properties.push(property);
		self
	}

	pub fn with_object(mut self, object: StoredObject) -> Self {
		self.objects.push(object);
		self
	}

	/// Media types a collection can hold, derived from its schema
	pub fn media_types(&self) -> Vec<MediaType> {
		let mut types = BTreeSet::new();

		for prop in &self.properties {
			let name = prop.name.to_lowercase();
			match prop.data_type {
				DataType::Blob => {
					for t in [MediaType::Audio, MediaType::Image, MediaType::Video] {
						if name.contains(t.as_str()) {
							types.insert(t);
						}
					}
				}
				DataType::Text => {
					if !name.contains("title") {
						types.insert(MediaType::Text);
					}
				}
			}
		}

		types.into_iter().collect()
	}

	pub fn is_current_version(&self) -> bool {
		self.version == VERSION
	}
}

/// Collection names are stored with an upper-case first character
pub fn normalize_name(name: &str) -> String {
	let name = name.trim();
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Build snapshot path for a collection
pub fn build_path(root: &Path, name: &str, ext: &str) -> PathBuf {
	root.join(format!("{}.{}", normalize_name(name), ext))
}

/// Save snapshot to disk, format chosen by extension
pub fn save(snapshot: &CollectionSnapshot, path: &Path) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).context("Failed to create store directory")?;
	}

	let bytes = if is_json(path) {
		serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?
	} else {
		rmp_serde::to_vec_named(snapshot).context("Failed to serialize snapshot")?
	};
	fs::write(path, bytes).context("Failed to write snapshot")?;

	Ok(())
}

/// Load snapshot from disk, format chosen by extension
pub fn load(path: &Path) -> Result<CollectionSnapshot> {
	let bytes = fs::read(path).context("Failed to read snapshot")?;

	let snapshot: CollectionSnapshot = if is_json(path) {
		serde_json::from_slice(&bytes).context("Failed to deserialize snapshot")?
	} else {
		rmp_serde::from_slice(&bytes).context("Failed to deserialize snapshot")?
	};

	if snapshot.name.is_empty() {
		bail!("Snapshot {} has no collection name", path.display());
	}

	Ok(snapshot)
}

pub fn is_snapshot(path: &Path) -> bool {
	matches!(
		path.extension().and_then(|s| s.to_str()),
		Some(SNAPSHOT_EXT) | Some(SNAPSHOT_JSON_EXT)
	)
}

fn is_json(path: &Path) -> bool {
	path.extension().and_then(|s| s.to_str()) == Some(SNAPSHOT_JSON_EXT)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_capitalized() {
		assert_eq!(normalize_name("cats"), "Cats");
		assert_eq!(normalize_name("Cats"), "Cats");
		assert_eq!(normalize_name(" éclair"), "Éclair");
		assert_eq!(normalize_name(""), "");
	}

	#[test]
	fn media_types_from_schema() {
		let snapshot = CollectionSnapshot::new("mixed", "")
			.with_property(PropertyDef::new("title", DataType::Text))
			.with_property(PropertyDef::new("imageContent", DataType::Blob))
			.with_property(PropertyDef::new("Audio", DataType::Blob))
			.with_property(PropertyDef::new("caption", DataType::Text));

		assert_eq!(
			snapshot.media_types(),
			vec![MediaType::Audio, MediaType::Image, MediaType::Text]
		);
	}

	#[test]
	fn title_only_schema_has_no_media_types() {
		let snapshot = CollectionSnapshot::new("empty", "")
			.with_property(PropertyDef::new("Title", DataType::Text));
		assert!(snapshot.media_types().is_empty());
	}

	#[test]
	fn save_and_load_both_formats() {
		let dir = tempfile::tempdir().unwrap();
		let snapshot = CollectionSnapshot::new("pets", "Pet pictures")
			.with_object(StoredObject::new("1", "cat_01", vec![1.0, 0.0]));

		for ext in [SNAPSHOT_EXT, SNAPSHOT_JSON_EXT] {
			let path = build_path(dir.path(), "pets", ext);
			save(&snapshot, &path).unwrap();
			let loaded = load(&path).unwrap();
			assert_eq!(loaded, snapshot);
			assert!(loaded.is_current_version());
		}
	}

	#[test]
	fn corrupt_snapshot_fails_to_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("Broken.msgpack");
		fs::write(&path, b"not msgpack at all").unwrap();
		assert!(load(&path).is_err());
	}
}
