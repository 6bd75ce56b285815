//! Settings for island panel auto-reveal.
//!
//! Islands are the groups of panels docked to the left, right and bottom edges
//! of a workbench window. When the feature is enabled, hovering an island's edge
//! reveals its panels as transient overlays and conceals them again after the
//! pointer leaves.
//!
//! # Settings File
//!
//! Settings are read from `$XDG_CONFIG_HOME/atoll/islands.toml` (or
//! `~/.config/atoll/islands.toml`). Every key is optional:
//!
//! ```toml
//! enabled = true
//! hover-activation-delay-ms = 150
//! auto-hide-delay-ms = 500
//! only-when-editor-focused = true
//! suppress-when-pinned = true
//! focus-retry-interval-ms = 200
//! max-focus-retries = 150
//! remember-multiple = true
//! ```
//!
//! Unknown keys do not fail parsing. They are collected in
//! [`ParsedSettings::warnings`] so the host can surface them at startup.

pub mod error;
mod settings;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigWarning, Result};
pub use settings::{IslandSettings, SettingsTransition};

/// Settings parsed from a file together with any non-fatal warnings.
#[derive(Debug, Clone, Default)]
pub struct ParsedSettings {
	/// The resolved settings, with defaults for absent keys.
	pub settings: IslandSettings,
	/// Non-fatal warnings encountered during parsing.
	pub warnings: Vec<ConfigWarning>,
}

impl IslandSettings {
	/// Parse a TOML string into settings.
	///
	/// Unknown keys are reported as warnings rather than errors. A known key
	/// holding a value of the wrong type fails with [`ConfigError::Toml`].
	pub fn parse(input: &str) -> Result<ParsedSettings> {
		let table: toml::Table = toml::from_str(input)?;
		let warnings = table
			.keys()
			.filter(|key| !IslandSettings::KEYS.contains(&key.as_str()))
			.map(|key| ConfigWarning::UnknownKey(key.clone()))
			.collect();
		let settings = toml::Value::Table(table).try_into()?;
		Ok(ParsedSettings { settings, warnings })
	}

	/// Load settings from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<ParsedSettings> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}
}

/// Returns the default settings file path under the user config directory.
pub fn default_config_path() -> Result<PathBuf> {
	let config_dir = dirs::config_dir()
		.or_else(|| dirs::home_dir().map(|home| home.join(".config")))
		.ok_or(ConfigError::MissingConfigDir)?;
	Ok(config_dir.join("atoll").join("islands.toml"))
}
