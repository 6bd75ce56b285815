//! Panel identity and the registry-owned snapshot the engine reads.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::anchor::Anchor;

/// Stable identifier of a panel, as assigned by the host registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl From<&str> for PanelId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for PanelId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl Borrow<str> for PanelId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl Deref for PanelId {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PanelId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Presentation mode of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelType {
	/// Pinned to its island and reserving layout space.
	Docked,
	/// Detached into its own floating window.
	Floating,
	/// Slides over the content area and is concealed again automatically.
	Overlay,
}

impl PanelType {
	pub const fn as_str(self) -> &'static str {
		match self {
			PanelType::Docked => "docked",
			PanelType::Floating => "floating",
			PanelType::Overlay => "overlay",
		}
	}
}

/// Point-in-time view of a panel owned by the registry.
///
/// The engine never constructs panels on the host's behalf; it only reads these
/// snapshots and mutates type and visibility through [`crate::PanelRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRef {
	pub id: PanelId,
	pub anchor: Anchor,
	pub visible: bool,
	/// Pinned panels are excluded from ambient reveal when pin suppression is on.
	pub pinned: bool,
	pub available: bool,
	pub kind: PanelType,
}
