//! Neighbors command - inspect raw nearest-neighbor results for one object

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::*;

use crate::storage::{LocalStore, NeighborIndex, NeighborQuery};
use crate::ui;

pub fn run(store_dir: &Path, collection: &str, id: Option<&str>, limit: usize) -> Result<()> {
	let store = LocalStore::open(store_dir);
	let snapshot = store
		.snapshot(collection)
		.with_context(|| format!("Failed to open collection '{}'", collection))?;

	let object = match id {
		Some(id) => snapshot
			.objects
			.iter()
			.find(|o| o.id == id)
			.ok_or_else(|| anyhow!("object '{}' not found in '{}'", id, snapshot.name))?,
		None => snapshot
			.objects
			.first()
			.ok_or_else(|| anyhow!("collection '{}' is empty", snapshot.name))?,
	};

	let media_object = object.to_media_object();
	ui::info(&format!(
		"Neighbors of {} {} ({})",
		ui::log::media_badge(media_object.media_type()),
		object.title.bright_white(),
		object.id.dimmed()
	));

	let query = NeighborQuery::new(limit, None);
	let neighbors = store
		.query_neighbors(collection, &object.id, &query)
		.context("Neighbor query failed")?;

	if neighbors.is_empty() {
		ui::warn("No neighbors found");
		return Ok(());
	}

	ui::header("Results");

	for (i, neighbor) in neighbors.iter().enumerate() {
		let other = snapshot.objects.iter().find(|o| o.id == neighbor.id);
		let (badge, title) = match other {
			Some(o) => (
				ui::log::media_badge(o.to_media_object().media_type()).to_string(),
				ui::log::truncate(&o.title, 40),
			),
			None => (String::new(), neighbor.id.clone()),
		};

		eprintln!(
			"{}. {} {} {}",
			format!("{:2}", i + 1).bright_blue().bold(),
			badge,
			title.bright_white(),
			ui::log::distance_color(neighbor.distance, 1.0)
		);
	}

	Ok(())
}
