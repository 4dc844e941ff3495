// Integration tests for the mediagraph binary

use std::path::Path;
use std::process::{Command, Output};

use mediagraph::storage::{CollectionSnapshot, DataType, LocalStore, PropertyDef, StoredObject};

fn mediagraph(store: &Path, args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_mediagraph"))
		.arg("--store")
		.arg(store)
		.args(args)
		.env("NO_COLOR", "1")
		.output()
		.expect("Failed to run mediagraph")
}

fn seed_store(root: &Path) {
	let store = LocalStore::open(root);
	let snapshot = CollectionSnapshot::new("pets", "Pet media")
		.with_property(PropertyDef::new("title", DataType::Text))
		.with_property(PropertyDef::new("image", DataType::Blob))
		.with_object(StoredObject::new("1", "cat_01", vec![1.0, 0.0, 0.0]))
		.with_object(StoredObject::new("2", "cat_02", vec![0.0, 1.0, 0.0]))
		.with_object(StoredObject::new("3", "dog_01", vec![0.0, 0.0, 1.0]))
		.with_object(StoredObject::new("4", "dog portrait", vec![0.05, 0.0, 1.0]));
	store.save_collection(&snapshot).expect("Failed to seed store");
}

#[test]
fn test_version_display() {
	let dir = tempfile::tempdir().unwrap();
	let output = mediagraph(dir.path(), &["--version"]);

	assert!(output.status.success(), "Version command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("mediagraph"), "Expected 'mediagraph' in version output");
}

#[test]
fn test_help_display() {
	let dir = tempfile::tempdir().unwrap();
	let output = mediagraph(dir.path(), &["--help"]);

	assert!(output.status.success(), "Help command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(
		stdout.contains("graph") && stdout.contains("collections"),
		"Expected graph and collections in help output"
	);
}

#[test]
fn test_graph_export_to_stdout() {
	let dir = tempfile::tempdir().unwrap();
	seed_store(dir.path());

	let output = mediagraph(dir.path(), &["graph", "-c", "pets", "--export", "-"]);
	assert!(output.status.success(), "Graph command failed: {}", String::from_utf8_lossy(&output.stderr));

	let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
	assert_eq!(json["collection"], "pets");
	assert_eq!(json["objects"].as_array().unwrap().len(), 4);

	let edges = json["edges"].as_array().unwrap();
	assert_eq!(edges.len(), 2);

	// dog_01 and "dog portrait" are nearly parallel vectors
	assert_eq!(edges[0]["source"], "3");
	assert_eq!(edges[0]["target"], "4");
	assert_eq!(edges[0]["origin"], "vector");

	assert_eq!(edges[1]["source"], "1");
	assert_eq!(edges[1]["target"], "2");
	assert_eq!(edges[1]["origin"], "semantic");
}

#[test]
fn test_graph_export_to_file() {
	let dir = tempfile::tempdir().unwrap();
	seed_store(dir.path());
	let out = dir.path().join("graph.json");

	let output = mediagraph(dir.path(), &["graph", "-c", "pets", "-e", out.to_str().unwrap()]);
	assert!(output.status.success(), "Graph command failed");

	let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
	assert_eq!(json["stats"]["objects"], 4);
	assert_eq!(json["config"]["batch_size"], 10);
}

#[test]
fn test_missing_collection_fails() {
	let dir = tempfile::tempdir().unwrap();
	seed_store(dir.path());

	let output = mediagraph(dir.path(), &["graph", "-c", "birds"]);
	assert!(!output.status.success(), "Expected failure for missing collection");

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("not found"), "Expected 'not found' in: {}", stderr);
}

#[test]
fn test_invalid_semantic_distance_fails() {
	let dir = tempfile::tempdir().unwrap();
	seed_store(dir.path());

	let output = mediagraph(dir.path(), &["graph", "-c", "pets", "--semantic-distance", "0.9"]);
	assert!(!output.status.success());

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("invalid configuration"), "Unexpected error: {}", stderr);
}

#[test]
fn test_collections_listing() {
	let dir = tempfile::tempdir().unwrap();
	seed_store(dir.path());

	let output = mediagraph(dir.path(), &["collections"]);
	assert!(output.status.success(), "Collections command failed");

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("Pets") && stderr.contains("4 objects"));
}

#[test]
fn test_neighbors_listing() {
	let dir = tempfile::tempdir().unwrap();
	seed_store(dir.path());

	let output = mediagraph(dir.path(), &["neighbors", "-c", "pets", "-i", "3", "-n", "1"]);
	assert!(output.status.success(), "Neighbors command failed");

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("dog portrait"));
	assert!(!stderr.contains("cat_01"));
}
