//! Error types for registry operations and remembered-state persistence.

use std::path::PathBuf;

use thiserror::Error;

use crate::panel::PanelId;

/// Failure reported by the host panel registry.
///
/// The engine never propagates these; it logs them and resets the affected
/// panel's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// The panel no longer exists.
	#[error("panel '{0}' not found")]
	NotFound(PanelId),

	/// The host refused the operation.
	#[error("registry rejected {op} for panel '{id}': {reason}")]
	Rejected {
		/// Panel the operation targeted.
		id: PanelId,
		/// Operation name (`set_type`, `show`, `hide`, `activate`).
		op: &'static str,
		/// Host-provided explanation.
		reason: String,
	},
}

/// Errors surfaced when reading or writing the remembered-selection file.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Reading or writing the state file failed.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path of the state file or its temporary sibling.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The in-memory state could not be encoded.
	#[error("failed to encode remembered state: {0}")]
	Encode(#[from] serde_json::Error),

	/// Neither a state directory nor a home directory could be resolved.
	#[error("no state directory available")]
	MissingStateDir,
}
