//! Environment-driven settings.
//!
//! Configuration is read once at startup from the process environment
//! (optionally seeded from a `.env` file) and carried in an explicit
//! [`Settings`] value; there is no ambient global configuration.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default set of extensions the storage layer is configured for.
///
/// The upload path deliberately does not enforce this set (a preserved
/// quirk of the original system); it is consulted only to log a warning.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "gif"];

/// Application settings, constructed once and injected into handlers
#[derive(Debug, Clone)]
pub struct Settings {
	/// Secret used for signing session material
	pub secret_key: String,
	/// Database connection URI (SQLite)
	pub database_url: String,
	/// Address the HTTP server binds to
	pub bind: String,
	/// Root directory for uploaded media files
	pub storage_dir: PathBuf,
	/// Nominal allowed-extension set (declared, not enforced on upload)
	pub allowed_extensions: HashSet<String>,
	/// Directory holding tera templates
	pub template_dir: String,
	/// File streamed by the resume download route
	pub resume_path: PathBuf,
	/// Debug mode flag
	pub debug: bool,
}

impl Settings {
	/// Load settings from the environment, seeding it from `.env` when present.
	///
	/// `SECRET_KEY` is required; everything else has a development default.
	pub fn from_env() -> Result<Self> {
		dotenv::dotenv().ok();

		let secret_key = std::env::var("SECRET_KEY")
			.map_err(|_| Error::Config("SECRET_KEY is not set".to_string()))?;

		let allowed_extensions = match std::env::var("FOLIO_ALLOWED_EXTENSIONS") {
			Ok(raw) => parse_list(&raw),
			Err(_) => DEFAULT_ALLOWED_EXTENSIONS
				.iter()
				.map(|s| s.to_string())
				.collect(),
		};

		Ok(Self {
			secret_key,
			database_url: env_or("DATABASE_URL", "sqlite://folio.db?mode=rwc"),
			bind: env_or("FOLIO_BIND", "127.0.0.1:8000"),
			storage_dir: PathBuf::from(env_or("FOLIO_STORAGE", "static/img")),
			allowed_extensions,
			template_dir: env_or("FOLIO_TEMPLATES", "templates"),
			resume_path: PathBuf::from(env_or("FOLIO_RESUME", "resume1.pdf")),
			debug: std::env::var("FOLIO_DEBUG").is_ok_and(|v| parse_bool(&v)),
		})
	}

	/// Settings suitable for tests: in-memory database, temp-free defaults.
	///
	/// # Examples
	///
	/// ```
	/// let settings = folio_core::Settings::for_tests();
	/// assert_eq!(settings.database_url, "sqlite::memory:");
	/// ```
	pub fn for_tests() -> Self {
		Self {
			secret_key: "test-secret".to_string(),
			database_url: "sqlite::memory:".to_string(),
			bind: "127.0.0.1:0".to_string(),
			storage_dir: PathBuf::from("static/img"),
			allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
				.iter()
				.map(|s| s.to_string())
				.collect(),
			template_dir: "templates".to_string(),
			resume_path: PathBuf::from("resume1.pdf"),
			debug: true,
		}
	}

	/// Whether an extension (case-insensitive) is in the configured set
	pub fn extension_allowed(&self, ext: &str) -> bool {
		self.allowed_extensions.contains(&ext.to_ascii_lowercase())
	}
}

fn env_or(key: &str, default: &str) -> String {
	std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated list into a lowercase set
fn parse_list(raw: &str) -> HashSet<String> {
	raw.split(',')
		.map(|item| item.trim().to_ascii_lowercase())
		.filter(|item| !item.is_empty())
		.collect()
}

fn parse_bool(raw: &str) -> bool {
	matches!(
		raw.trim().to_ascii_lowercase().as_str(),
		"1" | "true" | "yes" | "on"
	)
}
