//! Host-facing seams: the panel registry and the focus oracle.
//!
//! The host window manager owns the actual panel components. The engine sees
//! them only through [`PanelRegistry`], which must enumerate panels in a stable
//! order; cross-panel operations (hide-all, toggle) follow that order.

use crate::anchor::Anchor;
use crate::error::RegistryError;
use crate::panel::{PanelId, PanelRef, PanelType};

/// Source of truth for panel existence, anchor, pin state, visibility and type.
pub trait PanelRegistry {
	/// Returns every panel id in enumeration order.
	fn list_ids(&self) -> Vec<PanelId>;

	/// Returns a snapshot of the panel, or `None` when it no longer exists.
	fn get(&self, id: &PanelId) -> Option<PanelRef>;

	/// Returns the panel currently holding activation (focus), if any.
	fn active_id(&self) -> Option<PanelId>;

	fn set_type(&mut self, id: &PanelId, kind: PanelType) -> Result<(), RegistryError>;

	fn show(&mut self, id: &PanelId) -> Result<(), RegistryError>;

	fn hide(&mut self, id: &PanelId) -> Result<(), RegistryError>;

	/// Shows the panel and brings it to front with input focus.
	fn activate(&mut self, id: &PanelId) -> Result<(), RegistryError>;

	fn anchor_of(&self, id: &PanelId) -> Option<Anchor> {
		self.get(id).map(|panel| panel.anchor)
	}

	fn is_visible(&self, id: &PanelId) -> bool {
		self.get(id).is_some_and(|panel| panel.visible)
	}

	fn is_pinned(&self, id: &PanelId) -> bool {
		self.get(id).is_some_and(|panel| panel.pinned)
	}

	fn is_available(&self, id: &PanelId) -> bool {
		self.get(id).is_some_and(|panel| panel.available)
	}

	/// Returns snapshots of every panel on `anchor`, in enumeration order.
	fn panels_on(&self, anchor: Anchor) -> Vec<PanelRef> {
		self.list_ids()
			.iter()
			.filter_map(|id| self.get(id))
			.filter(|panel| panel.anchor == anchor)
			.collect()
	}

	/// Returns the first available panel on `anchor` in enumeration order.
	fn first_available_on(&self, anchor: Anchor) -> Option<PanelRef> {
		self.panels_on(anchor)
			.into_iter()
			.find(|panel| panel.available)
	}
}

/// Answers whether the primary content area (the editor) holds input focus.
pub trait FocusOracle {
	fn is_primary_content_focused(&self) -> bool;
}

impl<F> FocusOracle for F
where
	F: Fn() -> bool,
{
	fn is_primary_content_focused(&self) -> bool {
		self()
	}
}
