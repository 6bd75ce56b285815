//! Per-window owner of the island engine.

use std::time::Instant;

use atoll_config::{IslandSettings, SettingsTransition};
use tracing::debug;

use crate::anchor::Anchor;
use crate::hover::HoverZones;
use crate::panel::PanelId;
use crate::registry::{FocusOracle, PanelRegistry};
use crate::scheduler::{HideReason, HideRequest, RevealScheduler, RevealTrigger, ShowRequest};
use crate::store::RememberedSelections;
use crate::toggle::{self, ToggleOutcome};

/// Input delivered to the island loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IslandEvent {
	HoverZoneEntered(Anchor),
	HoverZoneExited(Anchor),
	PanelPointerEntered(PanelId),
	PanelPointerExited(PanelId),
	Toggle(Anchor),
	/// Host asks for a reveal outside of hover or toggle.
	Show(PanelId),
	Hide(PanelId),
	/// Panels were added, removed, hidden or moved by the host.
	RegistryChanged,
	SettingsChanged(IslandSettings),
	ForceHideAll,
}

impl IslandEvent {
	pub const fn name(&self) -> &'static str {
		match self {
			IslandEvent::HoverZoneEntered(_) => "hover_zone_entered",
			IslandEvent::HoverZoneExited(_) => "hover_zone_exited",
			IslandEvent::PanelPointerEntered(_) => "panel_pointer_entered",
			IslandEvent::PanelPointerExited(_) => "panel_pointer_exited",
			IslandEvent::Toggle(_) => "toggle",
			IslandEvent::Show(_) => "show",
			IslandEvent::Hide(_) => "hide",
			IslandEvent::RegistryChanged => "registry_changed",
			IslandEvent::SettingsChanged(_) => "settings_changed",
			IslandEvent::ForceHideAll => "force_hide_all",
		}
	}
}

/// Owns the registry handle, focus oracle, scheduler, remembered selections
/// and hover zones of one workbench window.
///
/// Every method runs on the window's loop; nothing here is shared across
/// threads except the [`RememberedSelections`] handle.
pub struct IslandManager<R, F> {
	registry: R,
	focus: F,
	scheduler: RevealScheduler,
	store: RememberedSelections,
	hover: HoverZones,
}

impl<R, F> IslandManager<R, F>
where
	R: PanelRegistry,
	F: FocusOracle,
{
	pub fn new(registry: R, focus: F, settings: IslandSettings, store: RememberedSelections) -> Self {
		Self {
			registry,
			focus,
			scheduler: RevealScheduler::new(settings),
			store,
			hover: HoverZones::new(),
		}
	}

	pub fn registry(&self) -> &R {
		&self.registry
	}

	pub fn registry_mut(&mut self) -> &mut R {
		&mut self.registry
	}

	pub fn scheduler(&self) -> &RevealScheduler {
		&self.scheduler
	}

	pub fn store(&self) -> &RememberedSelections {
		&self.store
	}

	pub fn hover(&self) -> &HoverZones {
		&self.hover
	}

	pub fn settings(&self) -> &IslandSettings {
		self.scheduler.settings()
	}

	pub fn request_show(&mut self, id: &PanelId, trigger: RevealTrigger, now: Instant) -> ShowRequest {
		self.scheduler.request_show(&self.registry, id, trigger, now)
	}

	pub fn request_hide(&mut self, id: &PanelId, reason: HideReason, now: Instant) -> HideRequest {
		self.scheduler.request_hide(id, reason, now)
	}

	pub fn force_hide_all(&mut self) -> Vec<PanelId> {
		self.hover.clear();
		self.scheduler.force_hide_all(&mut self.registry)
	}

	pub fn toggle_anchor(&mut self, anchor: Anchor, now: Instant) -> ToggleOutcome {
		toggle::toggle_anchor(anchor, &mut self.registry, &self.store, &mut self.scheduler, now)
	}

	pub fn hover_zone_entered(&mut self, anchor: Anchor, now: Instant) -> Vec<PanelId> {
		self.hover
			.entered(anchor, &self.registry, &self.store, &mut self.scheduler, now)
	}

	pub fn hover_zone_exited(&mut self, anchor: Anchor, now: Instant) -> Vec<PanelId> {
		self.hover.exited(anchor, &mut self.scheduler, now)
	}

	pub fn panel_pointer_entered(&mut self, id: &PanelId) -> bool {
		self.scheduler.panel_pointer_entered(id)
	}

	pub fn panel_pointer_exited(&mut self, id: &PanelId, now: Instant) -> HideRequest {
		self.scheduler.panel_pointer_exited(id, now)
	}

	/// Reconciles managed state after the host changed its panels.
	pub fn registry_changed(&mut self) -> Vec<PanelId> {
		self.scheduler.sync_with_registry(&mut self.registry)
	}

	pub fn apply_settings(&mut self, settings: IslandSettings) -> SettingsTransition {
		let transition = self.scheduler.apply_settings(&mut self.registry, settings);
		if transition == SettingsTransition::Disabled {
			self.hover.clear();
		}
		transition
	}

	/// Runs elapsed timers. Returns how many fired.
	pub fn tick(&mut self, now: Instant) -> usize {
		self.scheduler.tick(&mut self.registry, &self.focus, now)
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		self.scheduler.next_deadline()
	}

	pub fn handle(&mut self, event: IslandEvent, now: Instant) {
		debug!(event = event.name(), "islands.event");
		match event {
			IslandEvent::HoverZoneEntered(anchor) => {
				self.hover_zone_entered(anchor, now);
			}
			IslandEvent::HoverZoneExited(anchor) => {
				self.hover_zone_exited(anchor, now);
			}
			IslandEvent::PanelPointerEntered(id) => {
				self.panel_pointer_entered(&id);
			}
			IslandEvent::PanelPointerExited(id) => {
				self.panel_pointer_exited(&id, now);
			}
			IslandEvent::Toggle(anchor) => {
				self.toggle_anchor(anchor, now);
			}
			IslandEvent::Show(id) => {
				self.request_show(&id, RevealTrigger::Api, now);
			}
			IslandEvent::Hide(id) => {
				self.request_hide(&id, HideReason::Api, now);
			}
			IslandEvent::RegistryChanged => {
				self.registry_changed();
			}
			IslandEvent::SettingsChanged(settings) => {
				self.apply_settings(settings);
			}
			IslandEvent::ForceHideAll => {
				self.force_hide_all();
			}
		}
	}

	/// Drops pending work and restores every managed panel's original type.
	pub fn shutdown(&mut self) {
		self.hover.clear();
		self.scheduler.shutdown(&mut self.registry);
	}

	pub fn into_parts(self) -> (R, RememberedSelections) {
		(self.registry, self.store)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::panel::PanelType;
	use crate::testing::{FakeRegistry, at, enabled_settings, id, init_tracing, panel};

	fn focused() -> bool {
		true
	}

	fn manager(registry: FakeRegistry) -> IslandManager<FakeRegistry, fn() -> bool> {
		IslandManager::new(
			registry,
			focused as fn() -> bool,
			enabled_settings(),
			RememberedSelections::new(),
		)
	}

	#[test]
	fn hover_then_pointer_exit_round_trip() {
		init_tracing();
		let now = Instant::now();
		let mut islands = manager(FakeRegistry::new().with(panel("outline", Anchor::Right)));

		islands.handle(IslandEvent::HoverZoneEntered(Anchor::Right), now);
		assert_eq!(islands.next_deadline(), Some(at(now, 150)));
		islands.tick(at(now, 150));
		assert_eq!(islands.registry().panel("outline").kind, PanelType::Overlay);

		// Pointer moves from the zone into the panel body.
		islands.handle(IslandEvent::HoverZoneExited(Anchor::Right), at(now, 200));
		islands.handle(IslandEvent::PanelPointerEntered(id("outline")), at(now, 210));
		assert_eq!(islands.next_deadline(), None);

		islands.handle(IslandEvent::PanelPointerExited(id("outline")), at(now, 400));
		islands.tick(at(now, 900));
		assert!(!islands.registry().panel("outline").visible);
		assert_eq!(islands.registry().panel("outline").kind, PanelType::Docked);
	}

	#[test]
	fn disabling_clears_hover_and_managed_state() {
		let now = Instant::now();
		let mut islands = manager(FakeRegistry::new().with(panel("tree", Anchor::Left)));
		islands.hover_zone_entered(Anchor::Left, now);
		islands.tick(at(now, 150));

		islands.handle(IslandEvent::SettingsChanged(IslandSettings::default()), at(now, 200));
		assert!(islands.hover().revealed_on(Anchor::Left).is_empty());
		assert_eq!(islands.scheduler().managed_count(), 0);
		assert!(!islands.registry().panel("tree").visible);
	}

	#[test]
	fn registry_change_releases_externally_hidden_panels() {
		let now = Instant::now();
		let mut islands = manager(FakeRegistry::new().with(panel("tree", Anchor::Left)));
		islands.handle(IslandEvent::Show(id("tree")), now);
		islands.tick(at(now, 150));

		islands.registry_mut().panel_mut("tree").visible = false;
		islands.handle(IslandEvent::RegistryChanged, at(now, 200));
		assert!(!islands.scheduler().is_managed("tree"));
		assert_eq!(islands.registry().panel("tree").kind, PanelType::Docked);
	}

	#[test]
	fn toggle_event_remembers_selection() {
		let now = Instant::now();
		let mut registry = FakeRegistry::new().with(panel("terminal", Anchor::Bottom));
		registry.panel_mut("terminal").visible = true;
		let mut islands = manager(registry);

		islands.handle(IslandEvent::Toggle(Anchor::Bottom), now);
		assert_eq!(islands.store().remembered_ids(Anchor::Bottom), vec![id("terminal")]);
		assert!(!islands.registry().panel("terminal").visible);
	}

	#[test]
	fn shutdown_keeps_panels_visible_but_restored() {
		let now = Instant::now();
		let mut islands = manager(FakeRegistry::new().with(panel("tree", Anchor::Left)));
		islands.handle(IslandEvent::Show(id("tree")), now);
		islands.tick(at(now, 150));
		islands.handle(IslandEvent::Hide(id("tree")), at(now, 160));

		islands.shutdown();
		let (registry, _) = islands.into_parts();
		assert!(registry.panel("tree").visible);
		assert_eq!(registry.panel("tree").kind, PanelType::Docked);
	}
}
