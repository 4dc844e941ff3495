//! Graph command - build, summarize and export a similarity graph

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

use crate::config::GraphConfig;
use crate::core::{EdgeOrigin, Graph, MediaType};
use crate::error::GraphError;
use crate::graph::{BuildStats, CancelToken, SimilarityGraphBuilder};
use crate::storage::LocalStore;
use crate::ui;

#[derive(Debug, Serialize)]
struct GraphExport<'a> {
	version: &'static str,
	timestamp: String,
	collection: &'a str,
	limit: usize,
	config: &'a GraphConfig,
	stats: &'a BuildStats,
	#[serde(flatten)]
	graph: &'a Graph,
}

pub fn run(
	store_dir: &Path,
	collection: &str,
	limit: usize,
	config: GraphConfig,
	top: usize,
	export: Option<&Path>,
) -> Result<()> {
	let store = Arc::new(LocalStore::open(store_dir));
	let builder = SimilarityGraphBuilder::from_store(Arc::clone(&store), config);

	ui::debug(&format!(
		"Building graph: collection={}, limit={}, batch={}, ceiling={:?}, k={:?}",
		collection, limit, config.batch_size, config.distance_ceiling, config.max_neighbors_per_object
	));

	let (graph, stats) = match builder.build_with_stats(collection, limit, &CancelToken::new()) {
		Ok(built) => built,
		Err(GraphError::CollectionNotFound(name)) => {
			ui::error(&format!("Collection '{}' not found in {}", name, store.root().display()));
			suggest_collections(&store);
			anyhow::bail!("collection '{}' not found", name);
		}
		Err(e) => return Err(e).context("Failed to build similarity graph"),
	};

	if let Some(export_path) = export {
		return export_graph(collection, limit, &config, &stats, &graph, export_path);
	}

	if graph.is_empty() {
		ui::warn(&format!("Collection '{}' has no objects", collection));
		return Ok(());
	}

	print_summary(&graph, &stats);
	print_edges(&graph, top, config.distance_ceiling.unwrap_or(1.0));

	Ok(())
}

fn suggest_collections(store: &LocalStore) {
	let Ok(infos) = store.collections() else { return };
	if infos.is_empty() {
		return;
	}

	let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
	ui::info(&format!("Available: {}", names.join(", ")));
}

fn export_graph(
	collection: &str,
	limit: usize,
	config: &GraphConfig,
	stats: &BuildStats,
	graph: &Graph,
	export_path: &Path,
) -> Result<()> {
	let export_data = GraphExport {
		version: env!("CARGO_PKG_VERSION"),
		timestamp: chrono::Utc::now().to_rfc3339(),
		collection,
		limit,
		config,
		stats,
		graph,
	};

	let json = serde_json::to_string_pretty(&export_data)?;

	if export_path.to_str() == Some("-") || export_path.as_os_str().is_empty() {
		println!("{}", json);
	} else {
		std::fs::write(export_path, json)
			.with_context(|| format!("Failed to write {}", export_path.display()))?;
		ui::success(&format!(
			"Exported {} objects and {} edges to {}",
			graph.objects.len(),
			graph.edges.len(),
			export_path.display()
		));
	}

	Ok(())
}

fn print_summary(graph: &Graph, stats: &BuildStats) {
	ui::success(&format!(
		"{} objects, {} edges in {}ms",
		graph.objects.len(),
		graph.edges.len(),
		stats.elapsed_ms
	));

	let counts = graph.type_counts();
	let breakdown: Vec<String> = MediaType::ALL
		.iter()
		.filter_map(|t| counts.get(t).map(|n| format!("{} {}", ui::log::media_badge(*t), n)))
		.collect();
	eprintln!("  {}", breakdown.join("  "));

	eprintln!(
		"  {} {}  {} {}",
		ui::log::origin_badge(EdgeOrigin::Vector),
		graph.origin_count(EdgeOrigin::Vector),
		ui::log::origin_badge(EdgeOrigin::Semantic),
		graph.origin_count(EdgeOrigin::Semantic)
	);

	if stats.failed_queries > 0 {
		ui::warn(&format!(
			"{} of {} neighbor queries failed (--verbose for details)",
			stats.failed_queries, stats.queries
		));
	}

	let isolated = graph
		.objects
		.iter()
		.filter(|n| graph.edges_of(&n.id).next().is_none())
		.count();
	if isolated > 0 {
		ui::debug(&format!("{} objects have no edges", isolated));
	}
}

fn print_edges(graph: &Graph, top: usize, max_distance: f32) {
	if graph.edges.is_empty() {
		ui::warn("No similar pairs found");
		return;
	}
	if top == 0 {
		return;
	}

	ui::header("Closest pairs");

	for (i, edge) in graph.edges.iter().take(top).enumerate() {
		let title = |id: &str| {
			graph
				.node(id)
				.map(|n| {
					let label = if n.title.is_empty() { id } else { n.title.as_str() };
					format!("{} {}", ui::log::media_badge(n.media_type), ui::log::truncate(label, 32).bright_white())
				})
				.unwrap_or_else(|| id.to_string())
		};

		eprintln!(
			"{}. {} {} {}  {} {}",
			format!("{:2}", i + 1).bright_blue().bold(),
			title(&edge.source),
			"↔".dimmed(),
			title(&edge.target),
			ui::log::distance_color(edge.distance, max_distance),
			ui::log::origin_badge(edge.origin).dimmed()
		);
	}

	if graph.edges.len() > top {
		eprintln!(
			"  {}",
			format!("... and {} more", graph.edges.len() - top).dimmed()
		);
	}
}
