//! Transient reveal of edge-docked panel islands.
//!
//! A workbench window groups its docked panels into islands along the left,
//! right and bottom edges. This crate hides those islands until the pointer
//! asks for them: hovering an edge reveals the island's panels as overlays
//! after a short delay, and leaving conceals them again and restores their
//! docked presentation.
//!
//! # Pieces
//!
//! - [`RevealScheduler`] debounces show and hide requests per panel and owns
//!   the restore information for every panel it revealed.
//! - [`RememberedSelections`] records which panels were open on an island when
//!   it was last closed, persisted as JSON.
//! - [`toggle_anchor`] closes or reopens a whole island.
//! - [`HoverZones`] turns edge enter/exit signals into scheduler requests.
//! - [`IslandManager`] bundles these for one window, and [`driver::run`] drives
//!   it on a tokio task.
//!
//! The host panel system is reached only through [`PanelRegistry`] and
//! [`FocusOracle`].

pub mod anchor;
pub mod driver;
pub mod eligibility;
pub mod error;
pub mod hover;
pub mod manager;
pub mod panel;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod timers;
pub mod toggle;

#[cfg(test)]
mod testing;

pub use anchor::Anchor;
pub use driver::{IslandHandle, channel, run};
pub use eligibility::Ineligible;
pub use error::{RegistryError, StoreError};
pub use hover::HoverZones;
pub use manager::{IslandEvent, IslandManager};
pub use panel::{PanelId, PanelRef, PanelType};
pub use registry::{FocusOracle, PanelRegistry};
pub use scheduler::{
	HideReason, HideRequest, ManagedPanel, PanelPhase, RevealScheduler, RevealTrigger, ShowRequest,
};
pub use store::{RememberedSelections, RememberedState, default_state_path};
pub use timers::{PendingTimer, PendingTimers, TimerAction};
pub use toggle::{ToggleOutcome, toggle_anchor};
