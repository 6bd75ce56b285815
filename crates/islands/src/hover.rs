//! Edge hover zones.
//!
//! The host UI reports when the pointer enters or leaves the thin strip along
//! an island's edge. Entering reveals the island's remembered panels that may
//! be revealed by hover (or else its first such panel); leaving conceals
//! whatever that entry revealed.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::anchor::Anchor;
use crate::eligibility;
use crate::panel::{PanelId, PanelRef};
use crate::registry::PanelRegistry;
use crate::scheduler::{HideReason, RevealScheduler, RevealTrigger, ShowRequest};
use crate::store::RememberedSelections;

#[derive(Debug, Default)]
pub struct HoverZones {
	/// Panels requested by the last zone entry, per anchor.
	revealed: HashMap<Anchor, Vec<PanelId>>,
}

impl HoverZones {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn revealed_on(&self, anchor: Anchor) -> &[PanelId] {
		self.revealed.get(&anchor).map(Vec::as_slice).unwrap_or_default()
	}

	/// Pointer entered the hover zone of `anchor`.
	///
	/// Returns the ids a reveal was requested for.
	pub fn entered(
		&mut self,
		anchor: Anchor,
		registry: &dyn PanelRegistry,
		store: &RememberedSelections,
		scheduler: &mut RevealScheduler,
		now: Instant,
	) -> Vec<PanelId> {
		if !scheduler.settings().enabled {
			return Vec::new();
		}

		let panels = registry.panels_on(anchor);
		let managed_visible: Vec<PanelId> = panels
			.iter()
			.filter(|panel| panel.visible && scheduler.is_managed(&panel.id))
			.map(|panel| panel.id.clone())
			.collect();

		let candidates = if !managed_visible.is_empty() {
			managed_visible
		} else if panels.iter().any(|panel| panel.visible) {
			debug!(anchor = %anchor, "hover.island_already_open");
			self.revealed.remove(&anchor);
			return Vec::new();
		} else {
			let settings = scheduler.settings();
			let eligible = |panel: &PanelRef| eligibility::is_eligible(panel, settings, false);
			let remembered: Vec<PanelId> = store
				.remembered_ids(anchor)
				.into_iter()
				.filter(|id| panels.iter().any(|panel| &panel.id == id && eligible(panel)))
				.collect();
			if remembered.is_empty() {
				panels
					.iter()
					.find(|&panel| eligible(panel))
					.map(|panel| panel.id.clone())
					.into_iter()
					.collect()
			} else {
				remembered
			}
		};

		let requested: Vec<PanelId> = candidates
			.into_iter()
			.filter(|id| {
				matches!(
					scheduler.request_show(registry, id, RevealTrigger::HoverZone, now),
					ShowRequest::Scheduled { .. } | ShowRequest::AlreadyRevealed
				)
			})
			.collect();

		debug!(anchor = %anchor, requested = requested.len(), "hover.zone_entered");
		self.revealed.insert(anchor, requested.clone());
		requested
	}

	/// Pointer left the hover zone of `anchor`.
	///
	/// Requests a hide for every panel the matching entry asked to reveal and
	/// returns those ids.
	pub fn exited(&mut self, anchor: Anchor, scheduler: &mut RevealScheduler, now: Instant) -> Vec<PanelId> {
		let ids = self.revealed.remove(&anchor).unwrap_or_default();
		for id in &ids {
			scheduler.request_hide(id, HideReason::ZoneExit, now);
		}
		if !ids.is_empty() {
			debug!(anchor = %anchor, count = ids.len(), "hover.zone_exited");
		}
		ids
	}

	pub fn clear(&mut self) {
		self.revealed.clear();
	}
}
