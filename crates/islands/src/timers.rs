//! Per-panel pending timers.
//!
//! Each panel id owns at most one [`PendingTimer`]. Arming a timer for an id that
//! already has one replaces it, so rapid re-requests restart the delay instead of
//! stacking. The host loop drives expiry by passing the current time to
//! [`PendingTimers::take_due`]; nothing here sleeps.

use std::collections::HashMap;
use std::time::Instant;

use crate::panel::PanelId;

/// Action a timer performs when it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
	Show,
	Hide,
}

impl TimerAction {
	pub const fn as_str(self) -> &'static str {
		match self {
			TimerAction::Show => "show",
			TimerAction::Hide => "hide",
		}
	}
}

/// A scheduled show or hide for one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
	pub action: TimerAction,
	pub deadline: Instant,
	/// How many times this hide has been re-armed while waiting for editor focus.
	pub deferrals: u32,
	/// A show that activates the panel (input focus) instead of only showing it.
	pub focus: bool,
	seq: u64,
}

#[derive(Debug, Default)]
pub struct PendingTimers {
	timers: HashMap<PanelId, PendingTimer>,
	next_seq: u64,
}

impl PendingTimers {
	pub fn new() -> Self {
		Self::default()
	}

	/// Arms a timer for `id`, returning the timer it replaced.
	pub fn arm(
		&mut self,
		id: PanelId,
		action: TimerAction,
		deadline: Instant,
		deferrals: u32,
	) -> Option<PendingTimer> {
		self.insert(id, action, deadline, deferrals, false)
	}

	/// Arms a show for `id` that activates the panel when it fires.
	pub fn arm_focused_show(&mut self, id: PanelId, deadline: Instant) -> Option<PendingTimer> {
		self.insert(id, TimerAction::Show, deadline, 0, true)
	}

	fn insert(
		&mut self,
		id: PanelId,
		action: TimerAction,
		deadline: Instant,
		deferrals: u32,
		focus: bool,
	) -> Option<PendingTimer> {
		self.next_seq = self.next_seq.wrapping_add(1);
		self.timers.insert(
			id,
			PendingTimer {
				action,
				deadline,
				deferrals,
				focus,
				seq: self.next_seq,
			},
		)
	}

	/// Cancels the pending timer for `id` only if it performs `action`.
	///
	/// Returns `false` when nothing matching was pending.
	pub fn cancel(&mut self, id: &str, action: TimerAction) -> bool {
		match self.timers.get(id) {
			Some(timer) if timer.action == action => {
				self.timers.remove(id);
				true
			}
			_ => false,
		}
	}

	/// Cancels whatever timer is pending for `id`.
	pub fn cancel_any(&mut self, id: &str) -> Option<PendingTimer> {
		self.timers.remove(id)
	}

	/// Cancels every timer, returning how many were pending.
	pub fn clear(&mut self) -> usize {
		let count = self.timers.len();
		self.timers.clear();
		count
	}

	pub fn get(&self, id: &str) -> Option<&PendingTimer> {
		self.timers.get(id)
	}

	pub fn len(&self) -> usize {
		self.timers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.timers.is_empty()
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		self.timers.values().map(|timer| timer.deadline).min()
	}

	/// Removes and returns every timer due at `now`.
	///
	/// Results are ordered by deadline, then by arm order, so equal deadlines
	/// fire in the order they were requested.
	pub fn take_due(&mut self, now: Instant) -> Vec<(PanelId, PendingTimer)> {
		let mut due: Vec<(PanelId, PendingTimer)> = self
			.timers
			.iter()
			.filter(|(_, timer)| timer.deadline <= now)
			.map(|(id, timer)| (id.clone(), *timer))
			.collect();
		due.sort_by_key(|(_, timer)| (timer.deadline, timer.seq));
		for (id, _) in &due {
			self.timers.remove(id);
		}
		due
	}
}
