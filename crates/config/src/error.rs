//! Error types for settings parsing.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or a value of the wrong type.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a settings file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Neither a config directory nor a home directory could be resolved.
	#[error("no configuration directory available")]
	MissingConfigDir,
}

/// Non-fatal issue found while parsing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// A key that no setting reads; its value is ignored.
	UnknownKey(String),
}

impl fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnknownKey(key) => write!(f, "unknown setting '{key}' will be ignored"),
		}
	}
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
