use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global settings for transient island reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IslandSettings {
	/// Master switch. When off, hover never reveals and every managed panel is restored.
	pub enabled: bool,
	/// Delay between a reveal request and the panel appearing.
	pub hover_activation_delay_ms: u64,
	/// Delay between a conceal request and the panel disappearing.
	pub auto_hide_delay_ms: u64,
	/// Defer concealing until the primary content area holds input focus.
	pub only_when_editor_focused: bool,
	/// Pinned panels are not revealed by ambient hover.
	pub suppress_when_pinned: bool,
	/// Re-poll interval while a conceal waits for editor focus.
	pub focus_retry_interval_ms: u64,
	/// Maximum number of focus re-polls before a deferred conceal is abandoned.
	pub max_focus_retries: u32,
	/// Remember every panel concealed together rather than only the first.
	pub remember_multiple: bool,
}

impl IslandSettings {
	pub(crate) const KEYS: &'static [&'static str] = &[
		"enabled",
		"hover-activation-delay-ms",
		"auto-hide-delay-ms",
		"only-when-editor-focused",
		"suppress-when-pinned",
		"focus-retry-interval-ms",
		"max-focus-retries",
		"remember-multiple",
	];

	pub fn hover_activation_delay(&self) -> Duration {
		Duration::from_millis(self.hover_activation_delay_ms)
	}

	pub fn auto_hide_delay(&self) -> Duration {
		Duration::from_millis(self.auto_hide_delay_ms)
	}

	pub fn focus_retry_interval(&self) -> Duration {
		Duration::from_millis(self.focus_retry_interval_ms)
	}

	/// Classifies the change from `self` to `next` for settings-changed listeners.
	pub fn transition_to(&self, next: &Self) -> SettingsTransition {
		match (self.enabled, next.enabled) {
			(true, false) => SettingsTransition::Disabled,
			(false, true) => SettingsTransition::Enabled,
			_ if self == next => SettingsTransition::Unchanged,
			_ => SettingsTransition::Tuned,
		}
	}
}

impl Default for IslandSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			hover_activation_delay_ms: 150,
			auto_hide_delay_ms: 500,
			only_when_editor_focused: true,
			suppress_when_pinned: true,
			focus_retry_interval_ms: 200,
			max_focus_retries: 150,
			remember_multiple: true,
		}
	}
}

/// What a settings change means for the reveal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTransition {
	/// Nothing changed.
	Unchanged,
	/// The feature was switched on.
	Enabled,
	/// The feature was switched off; managed panels must be restored.
	Disabled,
	/// The feature stays in the same state but delays or flags changed.
	Tuned,
}
