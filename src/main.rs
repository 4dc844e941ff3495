//! mediagraph - similarity graphs over vectorized media collections
//!
//! Builds deduplicated graphs from nearest-neighbor distances and title
//! groups, and inspects the collections they are built from.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use mediagraph::cli::{Cli, Command};
use mediagraph::commands;
use mediagraph::config::{self, GraphConfig};
use mediagraph::ui;

fn main() {
	if let Err(e) = run() {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);
	if let Some(store) = cli.store {
		config::set_store_dir(store);
	}

	match cli.command {
		Command::Graph {
			collection,
			limit,
			batch_size,
			max_distance,
			no_ceiling,
			max_neighbors,
			semantic_distance,
			top,
			export,
		} => {
			let defaults = GraphConfig::default();
			let ceiling = if no_ceiling {
				None
			} else {
				max_distance.or(defaults.distance_ceiling)
			};

			let graph_config = defaults
				.with_batch_size(batch_size)
				.with_distance_ceiling(ceiling)
				.with_max_neighbors(max_neighbors)
				.with_semantic_distance(semantic_distance.unwrap_or(defaults.semantic_distance));

			let to_stdout = export.as_deref().and_then(|p| p.to_str()) == Some("-");
			if !to_stdout {
				ui::log::print_logo();
			}

			commands::graph::run(
				&config::store_dir(),
				&collection,
				limit,
				graph_config,
				top,
				export.as_deref(),
			)
		}
		Command::Collections => {
			ui::log::print_logo();
			commands::collections::run(&config::store_dir())
		}
		Command::Neighbors { collection, id, limit } => {
			commands::neighbors::run(&config::store_dir(), &collection, id.as_deref(), limit)
		}
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					ui::error(&format!("Unknown subcommand: {}", sub));
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}
