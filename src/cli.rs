use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_LIMIT, DEFAULT_NEIGHBORS, DEFAULT_TOP_EDGES};

fn parse_distance(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=1.0).contains(&val) {
		Err(format!("distance must be between 0.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn parse_positive(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid count", s))?;
	if val == 0 {
		Err("value must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.usage(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.literal(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.placeholder(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
		.valid(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
}

#[derive(Parser, Debug)]
#[command(
	name = "mediagraph",
	author,
	version,
	about = "Similarity graphs over vectorized media collections",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {graph}        {graph_args}          {graph_desc}
  {bin} {graph}        {export_args}   {export_desc}
  {bin} {collections}                          {collections_desc}
  {bin} {neighbors}    {neighbors_args}       {neighbors_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "mediagraph".bright_blue(),
		graph = "graph".yellow(),
		graph_args = "-c pets -n 50",
		graph_desc = "Build and summarize a graph".dimmed(),
		export_args = "-c pets --export -",
		export_desc = "Print graph JSON".dimmed(),
		collections = "collections".yellow(),
		collections_desc = "List stored collections".dimmed(),
		neighbors = "neighbors".yellow(),
		neighbors_args = "-c pets -i 42",
		neighbors_desc = "Nearest neighbors of an object".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Collection store directory (default: $MEDIAGRAPH_STORE_DIR or ./collections)
	#[arg(short = 's', long = "store", global = true, value_name = "DIR")]
	pub store: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Build the similarity graph of a collection
	Graph {
		/// Collection name
		#[arg(short = 'c', long = "collection")]
		collection: String,

		/// Maximum number of objects in the graph
		#[arg(short = 'n', long = "limit", default_value_t = DEFAULT_LIMIT, value_parser = parse_positive)]
		limit: usize,

		/// Maximum concurrent neighbor queries
		#[arg(short = 'b', long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_positive)]
		batch_size: usize,

		/// Drop vector edges above this distance (default: 0.4)
		#[arg(short = 'd', long = "max-distance", value_parser = parse_distance, conflicts_with = "no_ceiling")]
		max_distance: Option<f32>,

		/// Admit vector edges at any distance
		#[arg(long = "no-ceiling")]
		no_ceiling: bool,

		/// Keep only the k closest neighbors per object
		#[arg(short = 'k', long = "max-neighbors", value_parser = parse_positive)]
		max_neighbors: Option<usize>,

		/// Distance assigned to title matches (0.0-0.35, default: 0.3)
		#[arg(long = "semantic-distance", value_parser = parse_distance)]
		semantic_distance: Option<f32>,

		/// Number of closest edges to print
		#[arg(short = 't', long = "top", default_value_t = DEFAULT_TOP_EDGES)]
		top: usize,

		/// Write graph JSON to a file ('-' for stdout)
		#[arg(short = 'e', long = "export", value_name = "PATH")]
		export: Option<PathBuf>,
	},

	/// List stored collections
	Collections,

	/// Show nearest neighbors of one object
	Neighbors {
		/// Collection name
		#[arg(short = 'c', long = "collection")]
		collection: String,

		/// Object id (default: first object in the collection)
		#[arg(short = 'i', long = "id")]
		id: Option<String>,

		/// Number of neighbors
		#[arg(short = 'n', long = "limit", default_value_t = DEFAULT_NEIGHBORS, value_parser = parse_positive)]
		limit: usize,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
