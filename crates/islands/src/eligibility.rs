//! Decides whether a panel may be revealed automatically.

use atoll_config::IslandSettings;

use crate::panel::PanelRef;

/// Why a reveal request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
	/// The feature is globally off.
	Disabled,
	/// The host reports the panel as unavailable.
	Unavailable,
	/// The panel is pinned and pin suppression applies to this trigger.
	SuppressedPinned,
}

impl Ineligible {
	pub const fn as_str(self) -> &'static str {
		match self {
			Ineligible::Disabled => "disabled",
			Ineligible::Unavailable => "unavailable",
			Ineligible::SuppressedPinned => "suppressed_pinned",
		}
	}
}

/// Checks `panel` against the global settings.
///
/// `bypass_pin_suppression` is set for explicit user toggles only, so a user can
/// always force a pinned panel open while ambient hover cannot.
pub fn check(
	panel: &PanelRef,
	settings: &IslandSettings,
	bypass_pin_suppression: bool,
) -> Result<(), Ineligible> {
	if !settings.enabled {
		return Err(Ineligible::Disabled);
	}
	if !panel.available {
		return Err(Ineligible::Unavailable);
	}
	if settings.suppress_when_pinned && panel.pinned && !bypass_pin_suppression {
		return Err(Ineligible::SuppressedPinned);
	}
	Ok(())
}

pub fn is_eligible(panel: &PanelRef, settings: &IslandSettings, bypass_pin_suppression: bool) -> bool {
	check(panel, settings, bypass_pin_suppression).is_ok()
}
