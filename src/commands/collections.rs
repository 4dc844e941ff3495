//! Collections command - list stored collections

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::storage::LocalStore;
use crate::ui;

pub fn run(store_dir: &Path) -> Result<()> {
	let store = LocalStore::open(store_dir);
	let infos = store.collections()?;

	if infos.is_empty() {
		ui::warn(&format!("No collections found in {}", store_dir.display()));
		return Ok(());
	}

	ui::success(&format!("{} collections in {}", infos.len(), store_dir.display()));

	for info in &infos {
		let types: Vec<String> = info
			.media_types
			.iter()
			.map(|t| ui::log::media_badge(*t).to_string())
			.collect();

		eprintln!(
			"\n{} {}",
			info.name.bright_cyan().bold(),
			format!("({} objects)", info.objects).dimmed()
		);

		if !info.description.is_empty() {
			eprintln!("  {}", info.description.dimmed());
		}
		if !types.is_empty() {
			eprintln!("  {}", types.join(" "));
		}
		ui::debug(&format!("  {}", info.path.display()));
	}

	Ok(())
}
