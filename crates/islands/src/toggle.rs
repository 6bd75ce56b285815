//! Explicit open/close of a whole island.
//!
//! Toggling closes the island when anything is open on it, otherwise reopens
//! what was open last, otherwise opens the first available panel.

use std::time::Instant;

use tracing::{debug, warn};

use crate::anchor::Anchor;
use crate::panel::PanelId;
use crate::registry::PanelRegistry;
use crate::scheduler::{RevealScheduler, RevealTrigger, ShowRequest};
use crate::store::RememberedSelections;

/// What [`toggle_anchor`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
	/// Something was open; it was remembered and concealed.
	Closed {
		remembered: Vec<PanelId>,
		concealed: Vec<PanelId>,
	},
	/// The remembered set was brought back.
	Restored(Vec<PanelId>),
	/// Nothing was remembered; the first available panel was opened.
	Opened(PanelId),
	/// The island has no panel that can be opened.
	Empty,
}

/// Toggles the island on `anchor`.
///
/// Reopening activates the first panel and shows the rest. With the feature
/// enabled this goes through the scheduler as overlays (pin suppression
/// bypassed); with it disabled the panels open directly in their docked form.
pub fn toggle_anchor(
	anchor: Anchor,
	registry: &mut dyn PanelRegistry,
	store: &RememberedSelections,
	scheduler: &mut RevealScheduler,
	now: Instant,
) -> ToggleOutcome {
	let panels = registry.panels_on(anchor);
	let visible: Vec<PanelId> = panels
		.iter()
		.filter(|panel| panel.visible)
		.map(|panel| panel.id.clone())
		.collect();
	let active = registry
		.active_id()
		.filter(|id| registry.anchor_of(id) == Some(anchor));

	if !visible.is_empty() || active.is_some() {
		let candidates = if visible.is_empty() {
			active.iter().cloned().collect()
		} else if scheduler.settings().remember_multiple {
			visible.clone()
		} else {
			// Single-id mode keeps the focused panel when it is among the open ones.
			active
				.iter()
				.find(|id| visible.contains(id))
				.or(visible.first())
				.cloned()
				.into_iter()
				.collect()
		};
		let remembered = store.remember_ids(anchor, candidates);

		for panel in &panels {
			scheduler.cancel_pending(&panel.id);
		}
		for id in &visible {
			if scheduler.is_managed(id) {
				scheduler.conceal_now(registry, id);
			} else if let Err(error) = registry.hide(id) {
				warn!(anchor = %anchor, panel = %id, %error, "toggle.hide_failed");
			}
		}

		debug!(anchor = %anchor, remembered = remembered.len(), concealed = visible.len(), "toggle.closed");
		return ToggleOutcome::Closed {
			remembered,
			concealed: visible,
		};
	}

	let mut remembered: Vec<PanelId> = store
		.remembered_ids(anchor)
		.into_iter()
		.filter(|id| {
			registry
				.get(id)
				.is_some_and(|panel| panel.anchor == anchor && panel.available)
		})
		.collect();
	if !scheduler.settings().remember_multiple {
		remembered.truncate(1);
	}

	if !remembered.is_empty() {
		let restored = open(registry, scheduler, &remembered, now);
		debug!(anchor = %anchor, restored = restored.len(), "toggle.restored");
		return ToggleOutcome::Restored(restored);
	}

	let Some(first) = registry.first_available_on(anchor) else {
		debug!(anchor = %anchor, "toggle.empty");
		return ToggleOutcome::Empty;
	};
	if open(registry, scheduler, std::slice::from_ref(&first.id), now).is_empty() {
		return ToggleOutcome::Empty;
	}
	debug!(anchor = %anchor, panel = %first.id, "toggle.opened");
	ToggleOutcome::Opened(first.id)
}

/// Opens `ids`, the first one with focus. Returns the ids that were opened.
fn open(
	registry: &mut dyn PanelRegistry,
	scheduler: &mut RevealScheduler,
	ids: &[PanelId],
	now: Instant,
) -> Vec<PanelId> {
	let mut opened = Vec::with_capacity(ids.len());
	if scheduler.settings().enabled {
		for id in ids {
			let request = if opened.is_empty() {
				scheduler.request_show_focused(&*registry, id, RevealTrigger::Toggle, now)
			} else {
				scheduler.request_show(&*registry, id, RevealTrigger::Toggle, now)
			};
			if let ShowRequest::Scheduled { .. } | ShowRequest::AlreadyRevealed = request {
				opened.push(id.clone());
			}
		}
		return opened;
	}

	for (index, id) in ids.iter().enumerate() {
		let result = if index == 0 {
			registry.activate(id)
		} else {
			registry.show(id)
		};
		match result {
			Ok(()) => opened.push(id.clone()),
			Err(error) => warn!(panel = %id, %error, "toggle.open_failed"),
		}
	}
	opened
}
