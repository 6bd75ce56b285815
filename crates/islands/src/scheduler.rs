//! Debounced reveal/conceal of island panels.
//!
//! [`RevealScheduler`] owns every piece of per-window mutable state the engine
//! needs: which panels it currently manages (and the type to restore them to),
//! the pending timer for each panel id, and which panel bodies carry a pointer
//! listener. Requests return immediately after arming or cancelling a timer; the
//! host loop later calls [`RevealScheduler::tick`] to run elapsed actions.
//!
//! # State Machine
//!
//! Per panel id:
//!
//! ```text
//! Idle -> PendingShow -> Revealed -> PendingHide -> Idle
//!                                    PendingHide -> PendingHide  (waiting for editor focus)
//! ```
//!
//! A reveal request for a panel that is already revealed never re-enters
//! `PendingShow`; it only cancels a pending hide.
//!
//! # Failure Handling
//!
//! Registry failures are logged and the panel's bookkeeping is dropped, leaving
//! it `Idle`. Nothing here is fatal to the host.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use atoll_config::{IslandSettings, SettingsTransition};
use tracing::{debug, warn};

use crate::eligibility::{self, Ineligible};
use crate::error::RegistryError;
use crate::panel::{PanelId, PanelRef, PanelType};
use crate::registry::{FocusOracle, PanelRegistry};
use crate::timers::{PendingTimers, TimerAction};

/// What caused a reveal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealTrigger {
	/// Pointer entered an island's edge zone.
	HoverZone,
	/// Pointer re-entered a revealed panel's body.
	PanelHover,
	/// Explicit user toggle of an island.
	Toggle,
	/// Programmatic request from the host.
	Api,
}

impl RevealTrigger {
	pub const fn as_str(self) -> &'static str {
		match self {
			RevealTrigger::HoverZone => "hover_zone",
			RevealTrigger::PanelHover => "panel_hover",
			RevealTrigger::Toggle => "toggle",
			RevealTrigger::Api => "api",
		}
	}

	/// Only an explicit toggle may force a pinned panel open.
	pub const fn bypasses_pin_suppression(self) -> bool {
		matches!(self, RevealTrigger::Toggle)
	}
}

/// What caused a conceal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
	/// Pointer left an island's edge zone.
	ZoneExit,
	/// Pointer left a revealed panel's body.
	PointerExit,
	/// Programmatic request from the host.
	Api,
}

impl HideReason {
	pub const fn as_str(self) -> &'static str {
		match self {
			HideReason::ZoneExit => "zone_exit",
			HideReason::PointerExit => "pointer_exit",
			HideReason::Api => "api",
		}
	}
}

/// Result of [`RevealScheduler::request_show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowRequest {
	/// A show timer is armed and fires at `deadline`.
	Scheduled { deadline: Instant },
	/// The panel is already revealed; any pending hide was cancelled.
	AlreadyRevealed,
	Ineligible(Ineligible),
	NotFound,
}

/// Result of [`RevealScheduler::request_hide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideRequest {
	/// A hide timer is armed and fires at `deadline`.
	Scheduled { deadline: Instant },
	/// The scheduler did not reveal this panel, so it will not conceal it.
	NotManaged,
	Disabled,
}

/// Where a panel id currently sits in the reveal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
	Idle,
	PendingShow,
	Revealed,
	PendingHide,
}

/// Restore information for a panel the scheduler revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedPanel {
	/// Type captured on first reveal; never overwritten while managed.
	pub original_type: PanelType,
	pub revealed_at: Instant,
}

#[derive(Debug)]
pub struct RevealScheduler {
	settings: IslandSettings,
	managed: HashMap<PanelId, ManagedPanel>,
	timers: PendingTimers,
	/// Panels whose body forwards pointer enter/exit to the scheduler.
	tracked: HashSet<PanelId>,
}

impl RevealScheduler {
	pub fn new(settings: IslandSettings) -> Self {
		Self {
			settings,
			managed: HashMap::new(),
			timers: PendingTimers::new(),
			tracked: HashSet::new(),
		}
	}

	pub fn settings(&self) -> &IslandSettings {
		&self.settings
	}

	pub fn is_managed(&self, id: &str) -> bool {
		self.managed.contains_key(id)
	}

	pub fn managed(&self, id: &str) -> Option<&ManagedPanel> {
		self.managed.get(id)
	}

	pub fn managed_count(&self) -> usize {
		self.managed.len()
	}

	/// Returns true when the panel body forwards pointer events.
	pub fn is_tracking(&self, id: &str) -> bool {
		self.tracked.contains(id)
	}

	pub fn pending_action(&self, id: &str) -> Option<TimerAction> {
		self.timers.get(id).map(|timer| timer.action)
	}

	pub fn pending_count(&self) -> usize {
		self.timers.len()
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		self.timers.next_deadline()
	}

	pub fn phase(&self, id: &str) -> PanelPhase {
		match (self.pending_action(id), self.is_managed(id)) {
			(Some(TimerAction::Show), _) => PanelPhase::PendingShow,
			(Some(TimerAction::Hide), _) => PanelPhase::PendingHide,
			(None, true) => PanelPhase::Revealed,
			(None, false) => PanelPhase::Idle,
		}
	}

	/// Schedules a reveal of `id` after the hover activation delay.
	///
	/// Re-requesting before the delay elapses restarts it. A pending hide for
	/// the same id is cancelled.
	pub fn request_show(
		&mut self,
		registry: &dyn PanelRegistry,
		id: &PanelId,
		trigger: RevealTrigger,
		now: Instant,
	) -> ShowRequest {
		self.schedule_show(registry, id, trigger, false, now)
	}

	/// Like [`request_show`](Self::request_show), but the panel is activated
	/// (brought to front with input focus) when the delay elapses.
	pub fn request_show_focused(
		&mut self,
		registry: &dyn PanelRegistry,
		id: &PanelId,
		trigger: RevealTrigger,
		now: Instant,
	) -> ShowRequest {
		self.schedule_show(registry, id, trigger, true, now)
	}

	fn schedule_show(
		&mut self,
		registry: &dyn PanelRegistry,
		id: &PanelId,
		trigger: RevealTrigger,
		focus: bool,
		now: Instant,
	) -> ShowRequest {
		let Some(panel) = registry.get(id) else {
			debug!(panel = %id, trigger = trigger.as_str(), "reveal.not_found");
			return ShowRequest::NotFound;
		};

		if let Err(reason) = eligibility::check(&panel, &self.settings, trigger.bypasses_pin_suppression()) {
			debug!(
				panel = %id,
				trigger = trigger.as_str(),
				reason = reason.as_str(),
				"reveal.ineligible"
			);
			return ShowRequest::Ineligible(reason);
		}

		if self.timers.cancel(id, TimerAction::Hide) {
			debug!(panel = %id, trigger = trigger.as_str(), "reveal.hide_cancelled");
		}

		// A managed panel the host has since hidden gets revealed again; its
		// captured original type is kept.
		if self.is_managed(id) && panel.visible {
			return ShowRequest::AlreadyRevealed;
		}

		let deadline = now + self.settings.hover_activation_delay();
		let replaced = if focus {
			self.timers.arm_focused_show(id.clone(), deadline)
		} else {
			self.timers.arm(id.clone(), TimerAction::Show, deadline, 0)
		};
		debug!(
			panel = %id,
			trigger = trigger.as_str(),
			delay_ms = self.settings.hover_activation_delay_ms,
			focus,
			restarted = replaced.is_some(),
			"reveal.show_scheduled"
		);
		ShowRequest::Scheduled { deadline }
	}

	/// Schedules a conceal of `id` after the auto-hide delay.
	///
	/// A pending show for `id` is always cancelled first, so a quick
	/// enter-then-leave never reveals anything. The hide itself is only armed
	/// for panels this scheduler revealed.
	pub fn request_hide(&mut self, id: &PanelId, reason: HideReason, now: Instant) -> HideRequest {
		if !self.settings.enabled {
			return HideRequest::Disabled;
		}

		if self.timers.cancel(id, TimerAction::Show) {
			debug!(panel = %id, reason = reason.as_str(), "reveal.show_cancelled");
		}

		if !self.is_managed(id) {
			return HideRequest::NotManaged;
		}

		let deadline = now + self.settings.auto_hide_delay();
		self.timers.arm(id.clone(), TimerAction::Hide, deadline, 0);
		debug!(
			panel = %id,
			reason = reason.as_str(),
			delay_ms = self.settings.auto_hide_delay_ms,
			"reveal.hide_scheduled"
		);
		HideRequest::Scheduled { deadline }
	}

	/// Cancels a pending hide for `id`, returning whether one was pending.
	pub fn cancel_hide(&mut self, id: &str) -> bool {
		self.timers.cancel(id, TimerAction::Hide)
	}

	/// Cancels whatever is pending for `id`.
	pub fn cancel_pending(&mut self, id: &str) -> bool {
		self.timers.cancel_any(id).is_some()
	}

	/// Pointer entered a revealed panel's body.
	pub fn panel_pointer_entered(&mut self, id: &PanelId) -> bool {
		if !self.is_tracking(id) {
			return false;
		}
		let cancelled = self.cancel_hide(id);
		if cancelled {
			debug!(panel = %id, "reveal.hide_cancelled_reentry");
		}
		cancelled
	}

	/// Pointer left a revealed panel's body.
	pub fn panel_pointer_exited(&mut self, id: &PanelId, now: Instant) -> HideRequest {
		if !self.is_tracking(id) {
			return HideRequest::NotManaged;
		}
		self.request_hide(id, HideReason::PointerExit, now)
	}

	/// Runs every action whose delay has elapsed at `now`.
	///
	/// Returns the number of timers that fired.
	pub fn tick(&mut self, registry: &mut dyn PanelRegistry, focus: &dyn FocusOracle, now: Instant) -> usize {
		let due = self.timers.take_due(now);
		let fired = due.len();
		for (id, timer) in due {
			match timer.action {
				TimerAction::Show => self.perform_show(registry, &id, timer.focus, now),
				TimerAction::Hide => self.perform_hide(registry, focus, &id, timer.deferrals, now),
			}
		}
		fired
	}

	fn perform_show(&mut self, registry: &mut dyn PanelRegistry, id: &PanelId, focus: bool, now: Instant) {
		let Some(panel) = registry.get(id) else {
			debug!(panel = %id, "reveal.not_found");
			self.forget(id);
			return;
		};
		if !self.settings.enabled || !panel.available {
			debug!(panel = %id, "reveal.show_abandoned");
			return;
		}

		let original_type = self.managed.get(id).map_or(panel.kind, |managed| managed.original_type);

		match reveal(registry, &panel, focus) {
			Ok(()) => {
				self.managed.entry(id.clone()).or_insert(ManagedPanel {
					original_type,
					revealed_at: now,
				});
				self.tracked.insert(id.clone());
				debug!(panel = %id, original = original_type.as_str(), focus, "reveal.show_commit");
			}
			Err(error) => {
				warn!(panel = %id, %error, "reveal.show_failed");
				if registry.get(id).is_some_and(|current| current.kind != original_type) {
					restore_type(registry, id, original_type);
				}
				self.forget(id);
			}
		}
	}

	fn perform_hide(
		&mut self,
		registry: &mut dyn PanelRegistry,
		focus: &dyn FocusOracle,
		id: &PanelId,
		deferrals: u32,
		now: Instant,
	) {
		if !self.is_managed(id) {
			return;
		}

		if self.settings.only_when_editor_focused && !focus.is_primary_content_focused() {
			if deferrals < self.settings.max_focus_retries {
				let deadline = now + self.settings.focus_retry_interval();
				self.timers.arm(id.clone(), TimerAction::Hide, deadline, deferrals + 1);
				debug!(panel = %id, attempt = deferrals + 1, "reveal.hide_deferred");
			} else {
				debug!(panel = %id, attempts = deferrals, "reveal.hide_abandoned");
			}
			return;
		}

		self.conceal_now(registry, id);
	}

	/// Restores `id` to its original type and hides it, bypassing delays and
	/// focus gating.
	///
	/// Returns `false` when the panel was not managed.
	pub fn conceal_now(&mut self, registry: &mut dyn PanelRegistry, id: &PanelId) -> bool {
		self.timers.cancel_any(id);
		self.tracked.remove(id);
		let Some(managed) = self.managed.remove(id) else {
			return false;
		};

		if registry.get(id).is_none() {
			debug!(panel = %id, "reveal.not_found");
			return true;
		}

		let result = registry
			.set_type(id, managed.original_type)
			.and_then(|()| registry.hide(id));
		match result {
			Ok(()) => debug!(panel = %id, restored = managed.original_type.as_str(), "reveal.hide_commit"),
			Err(error) => warn!(panel = %id, %error, "reveal.hide_failed"),
		}
		true
	}

	/// Cancels every pending timer and conceals every managed panel at once.
	///
	/// Panels are concealed in registry enumeration order. Returns the ids
	/// that were concealed.
	pub fn force_hide_all(&mut self, registry: &mut dyn PanelRegistry) -> Vec<PanelId> {
		let cancelled = self.timers.clear();
		let ids = self.managed_in_order(registry);
		for id in &ids {
			self.conceal_now(registry, id);
		}
		if cancelled > 0 || !ids.is_empty() {
			debug!(cancelled, concealed = ids.len(), "reveal.force_hide_all");
		}
		ids
	}

	/// Restores the original type of every managed panel without hiding it and
	/// clears all managed state.
	pub fn restore_all_types(&mut self, registry: &mut dyn PanelRegistry) {
		for id in self.managed_in_order(registry) {
			if let Some(managed) = self.managed.remove(&id)
				&& registry.get(&id).is_some()
			{
				restore_type(registry, &id, managed.original_type);
			}
		}
		self.managed.clear();
		self.tracked.clear();
	}

	/// Applies new settings, returning how the enabled state changed.
	///
	/// Switching the feature off conceals and restores every managed panel.
	pub fn apply_settings(&mut self, registry: &mut dyn PanelRegistry, settings: IslandSettings) -> SettingsTransition {
		let transition = self.settings.transition_to(&settings);
		self.settings = settings;
		if transition == SettingsTransition::Disabled {
			self.force_hide_all(registry);
			self.restore_all_types(registry);
		}
		debug!(?transition, "reveal.settings_applied");
		transition
	}

	/// Releases managed panels the host has hidden or removed on its own.
	///
	/// Their original type is restored and any pending timer is dropped.
	/// Returns the released ids in enumeration order.
	pub fn sync_with_registry(&mut self, registry: &mut dyn PanelRegistry) -> Vec<PanelId> {
		let stale: Vec<PanelId> = self
			.managed_in_order(registry)
			.into_iter()
			.filter(|id| !registry.is_visible(id))
			.collect();

		for id in &stale {
			self.timers.cancel_any(id);
			self.tracked.remove(id);
			if let Some(managed) = self.managed.remove(id)
				&& registry.get(id).is_some()
			{
				restore_type(registry, id, managed.original_type);
			}
			debug!(panel = %id, "reveal.released_after_external_hide");
		}
		stale
	}

	/// Drops all timers and pointer tracking and restores original types.
	pub fn shutdown(&mut self, registry: &mut dyn PanelRegistry) {
		self.timers.clear();
		self.tracked.clear();
		self.restore_all_types(registry);
	}

	fn forget(&mut self, id: &str) {
		self.timers.cancel_any(id);
		self.tracked.remove(id);
		self.managed.remove(id);
	}

	/// Managed ids in registry order, followed by ids the registry no longer knows.
	fn managed_in_order(&self, registry: &dyn PanelRegistry) -> Vec<PanelId> {
		let mut ordered: Vec<PanelId> = registry
			.list_ids()
			.into_iter()
			.filter(|id| self.managed.contains_key(id))
			.collect();
		let mut orphans: Vec<PanelId> = self
			.managed
			.keys()
			.filter(|id| !ordered.contains(id))
			.cloned()
			.collect();
		orphans.sort();
		ordered.extend(orphans);
		ordered
	}
}

fn reveal(registry: &mut dyn PanelRegistry, panel: &PanelRef, focus: bool) -> Result<(), RegistryError> {
	if panel.kind != PanelType::Overlay {
		registry.set_type(&panel.id, PanelType::Overlay)?;
	}
	if focus {
		registry.activate(&panel.id)
	} else {
		registry.show(&panel.id)
	}
}

fn restore_type(registry: &mut dyn PanelRegistry, id: &PanelId, kind: PanelType) {
	if let Err(error) = registry.set_type(id, kind) {
		warn!(panel = %id, %error, "reveal.restore_type_failed");
	}
}
