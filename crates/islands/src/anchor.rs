use std::fmt;

use serde::{Deserialize, Serialize};

/// Workbench edge that hosts one island of docked panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
	/// Left edge, typically file trees and project views.
	Left,
	/// Right edge, typically outlines or auxiliary tools.
	Right,
	/// Bottom edge, typically terminals and output panels.
	Bottom,
}

impl Anchor {
	/// Every anchor, in a stable order.
	pub const ALL: [Anchor; 3] = [Anchor::Left, Anchor::Right, Anchor::Bottom];

	pub const fn as_str(self) -> &'static str {
		match self {
			Anchor::Left => "left",
			Anchor::Right => "right",
			Anchor::Bottom => "bottom",
		}
	}
}

impl fmt::Display for Anchor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
