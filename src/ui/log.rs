//! Unified logging system
//!
//! Everything goes to stderr so graph exports on stdout stay clean.

use colored::*;
use rand::RngExt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::{EdgeOrigin, MediaType};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
 ┌┬┐┌─┐┌┬┐┬┌─┐┌─┐┬─┐┌─┐┌─┐┬ ┬
 │││├┤  │││├─┤│ ┬├┬┘├─┤├─┘├─┤
 ┴ ┴└─┘─┴┘┴┴ ┴└─┘┴└─┴ ┴┴  ┴ ┴"#;

const SLOGANS: &[&str] = &[
	"Everything is connected (below 0.4)",
	"Six degrees of cat_01",
	"Nearest neighbors, furthest from boring",
	"Cosine is just vibes with a unit circle",
	"Yes, the podcast really does sound like the sunset",
	"Edges deduplicated, feelings not",
	"No self-loops were harmed",
	"dog_01 and dog_02 would like a word",
];

pub fn random_slogan() -> &'static str {
	let idx = rand::rng().random_range(0..SLOGANS.len());
	SLOGANS[idx]
}

pub fn print_logo() {
	eprintln!("{}", LOGO.bright_blue().bold());
	eprintln!("{}", random_slogan().dimmed().italic());
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	eprintln!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	eprintln!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	eprintln!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		eprintln!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	eprintln!("\n{}", text.bright_blue().bold());
}

/// Media type tag in its render color
pub fn media_badge(media_type: MediaType) -> ColoredString {
	let (r, g, b) = media_type.rgb();
	format!("{:<5}", media_type.as_str()).truecolor(r, g, b).bold()
}

pub fn origin_badge(origin: EdgeOrigin) -> ColoredString {
	match origin {
		EdgeOrigin::Vector => "vector".bright_cyan(),
		EdgeOrigin::Semantic => "semantic".bright_magenta(),
	}
}

/// Distance colored green (close) to red (far), relative to `max`
pub fn distance_color(distance: f32, max: f32) -> ColoredString {
	let text = format!("{:.3}", distance);
	let ratio = if max > 0.0 { (distance / max).clamp(0.0, 1.0) } else { 0.0 };

	let r = (255.0 * ratio) as u8;
	let g = (255.0 * (1.0 - ratio)) as u8;
	text.truecolor(r, g, 64)
}

/// Shorten long titles for single-line output
pub fn truncate(text: &str, max_len: usize) -> String {
	if text.chars().count() <= max_len {
		return text.to_string();
	}
	let head: String = text.chars().take(max_len.saturating_sub(3)).collect();
	format!("{}...", head)
}
