//! Cooperative event loop for one workbench window.
//!
//! Hosts that receive hover, focus or toggle callbacks on other threads send
//! them through an [`IslandHandle`]; [`run`] applies them on a single task and
//! sleeps until the next pending timer is due.

use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::manager::{IslandEvent, IslandManager};
use crate::registry::{FocusOracle, PanelRegistry};

/// Cloneable sender for events bound to an island loop.
#[derive(Debug, Clone)]
pub struct IslandHandle {
	tx: mpsc::UnboundedSender<IslandEvent>,
}

impl IslandHandle {
	/// Queues `event`. Returns `false` when the loop has stopped.
	pub fn send(&self, event: IslandEvent) -> bool {
		self.tx.send(event).is_ok()
	}

	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}
}

pub fn channel() -> (IslandHandle, mpsc::UnboundedReceiver<IslandEvent>) {
	let (tx, rx) = mpsc::unbounded_channel();
	(IslandHandle { tx }, rx)
}

/// Drives `manager` until `cancel` fires or every handle is dropped.
///
/// Pending timers are dropped on exit and managed panels get their original
/// type back. The manager is returned so the host can save its selections.
pub async fn run<R, F>(
	mut manager: IslandManager<R, F>,
	mut events: mpsc::UnboundedReceiver<IslandEvent>,
	cancel: CancellationToken,
) -> IslandManager<R, F>
where
	R: PanelRegistry,
	F: FocusOracle,
{
	debug!("islands.loop_started");
	loop {
		let deadline = manager.next_deadline();
		tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			// Due timers run before queued events.
			_ = sleep_until(deadline) => {
				manager.tick(now());
			}
			event = events.recv() => match event {
				Some(event) => manager.handle(event, now()),
				None => break,
			},
		}
	}
	manager.shutdown();
	debug!("islands.loop_stopped");
	manager
}

/// Current time on tokio's clock, so paused test time applies.
fn now() -> Instant {
	tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
		None => std::future::pending().await,
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicBool, Ordering};

	use atoll_config::IslandSettings;

	use super::*;
	use crate::Anchor;
	use crate::panel::{PanelId, PanelType};
	use crate::scheduler::RevealTrigger;
	use crate::store::RememberedSelections;
	use crate::testing::{FakeRegistry, SharedRegistry, enabled_settings, init_tracing, ms, panel};

	async fn settle() {
		for _ in 0..4 {
			tokio::task::yield_now().await;
		}
	}

	fn visible(registry: &SharedRegistry, id: &str) -> bool {
		registry.0.lock().panel(id).visible
	}

	fn kind(registry: &SharedRegistry, id: &str) -> PanelType {
		registry.0.lock().panel(id).kind
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn reveal_and_cancel_follow_tokio_time() {
		init_tracing();
		let registry = SharedRegistry::new(FakeRegistry::new().with(panel("P", Anchor::Right)));
		let manager = IslandManager::new(
			registry.clone(),
			|| true,
			enabled_settings(),
			RememberedSelections::new(),
		);
		let (handle, events) = channel();
		let cancel = CancellationToken::new();
		let task = tokio::spawn(run(manager, events, cancel.clone()));

		assert!(handle.send(IslandEvent::HoverZoneEntered(Anchor::Right)));
		settle().await;

		tokio::time::advance(ms(149)).await;
		settle().await;
		assert!(!visible(&registry, "P"));

		tokio::time::advance(ms(1)).await;
		settle().await;
		assert!(visible(&registry, "P"));
		assert_eq!(kind(&registry, "P"), PanelType::Overlay);

		cancel.cancel();
		let manager = task.await.unwrap();
		assert_eq!(manager.scheduler().managed_count(), 0);
		assert!(visible(&registry, "P"));
		assert_eq!(kind(&registry, "P"), PanelType::Docked);
		assert!(handle.is_closed());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn hide_waits_for_focus_flag() {
		let registry = SharedRegistry::new(FakeRegistry::new().with(panel("P", Anchor::Left)));
		let focused = Arc::new(AtomicBool::new(true));
		let focus = {
			let focused = Arc::clone(&focused);
			move || focused.load(Ordering::SeqCst)
		};
		let settings = IslandSettings {
			only_when_editor_focused: true,
			..enabled_settings()
		};
		let manager = IslandManager::new(registry.clone(), focus, settings, RememberedSelections::new());
		let (handle, events) = channel();
		let task = tokio::spawn(run(manager, events, CancellationToken::new()));

		handle.send(IslandEvent::Show(PanelId::from("P")));
		settle().await;
		tokio::time::advance(ms(150)).await;
		settle().await;
		assert!(visible(&registry, "P"));

		focused.store(false, Ordering::SeqCst);
		handle.send(IslandEvent::Hide(PanelId::from("P")));
		settle().await;
		tokio::time::advance(ms(500)).await;
		settle().await;
		assert!(visible(&registry, "P"));

		focused.store(true, Ordering::SeqCst);
		tokio::time::advance(ms(200)).await;
		settle().await;
		assert!(!visible(&registry, "P"));
		assert_eq!(kind(&registry, "P"), PanelType::Docked);

		drop(handle);
		let manager = task.await.unwrap();
		assert_eq!(manager.next_deadline(), None);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn due_timer_fires_before_queued_events() {
		let registry = SharedRegistry::new(FakeRegistry::new().with(panel("P", Anchor::Right)));
		let mut manager = IslandManager::new(
			registry.clone(),
			|| true,
			enabled_settings(),
			RememberedSelections::new(),
		);
		manager.request_show(&PanelId::from("P"), RevealTrigger::Api, now());
		tokio::time::advance(ms(200)).await;

		// A hide handled first would cancel the overdue show.
		let (handle, events) = channel();
		assert!(handle.send(IslandEvent::Hide(PanelId::from("P"))));
		let cancel = CancellationToken::new();
		let task = tokio::spawn(run(manager, events, cancel.clone()));
		settle().await;

		assert!(visible(&registry, "P"));
		assert_eq!(kind(&registry, "P"), PanelType::Overlay);

		cancel.cancel();
		task.await.unwrap();
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn dropping_every_handle_stops_the_loop() {
		let registry = SharedRegistry::new(FakeRegistry::new());
		let manager = IslandManager::new(registry, || false, IslandSettings::default(), RememberedSelections::new());
		let (handle, events) = channel();
		let task = tokio::spawn(run(manager, events, CancellationToken::new()));

		let second = handle.clone();
		drop(handle);
		assert!(second.send(IslandEvent::RegistryChanged));
		drop(second);

		let manager = task.await.unwrap();
		assert_eq!(manager.scheduler().pending_count(), 0);
	}
}
