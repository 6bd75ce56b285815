//! Recording in-memory registry for unit tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use atoll_config::IslandSettings;
use parking_lot::Mutex;

use crate::anchor::Anchor;
use crate::error::RegistryError;
use crate::panel::{PanelId, PanelRef, PanelType};
use crate::registry::PanelRegistry;

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub(crate) fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

pub(crate) fn at(t0: Instant, millis: u64) -> Instant {
	t0 + ms(millis)
}

pub(crate) fn id(s: &str) -> PanelId {
	PanelId::from(s)
}

/// Available, unpinned, hidden, docked panel.
pub(crate) fn panel(id: &str, anchor: Anchor) -> PanelRef {
	PanelRef {
		id: PanelId::from(id),
		anchor,
		visible: false,
		pinned: false,
		available: true,
		kind: PanelType::Docked,
	}
}

/// Feature on, focus gating off, otherwise shipped defaults.
pub(crate) fn enabled_settings() -> IslandSettings {
	IslandSettings {
		enabled: true,
		only_when_editor_focused: false,
		..IslandSettings::default()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RegistryOp {
	SetType(PanelId, PanelType),
	Show(PanelId),
	Hide(PanelId),
	Activate(PanelId),
}

impl RegistryOp {
	fn name(&self) -> &'static str {
		match self {
			RegistryOp::SetType(..) => "set_type",
			RegistryOp::Show(_) => "show",
			RegistryOp::Hide(_) => "hide",
			RegistryOp::Activate(_) => "activate",
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct FakeRegistry {
	panels: Vec<PanelRef>,
	active: Option<PanelId>,
	failing: HashSet<(PanelId, &'static str)>,
	pub(crate) ops: Vec<RegistryOp>,
}

impl FakeRegistry {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn with(mut self, panel: PanelRef) -> Self {
		self.panels.push(panel);
		self
	}

	pub(crate) fn panel(&self, id: &str) -> &PanelRef {
		self.panels
			.iter()
			.find(|panel| panel.id.as_str() == id)
			.unwrap_or_else(|| panic!("no panel {id}"))
	}

	pub(crate) fn panel_mut(&mut self, id: &str) -> &mut PanelRef {
		self.panels
			.iter_mut()
			.find(|panel| panel.id.as_str() == id)
			.unwrap_or_else(|| panic!("no panel {id}"))
	}

	pub(crate) fn remove(&mut self, id: &str) {
		self.panels.retain(|panel| panel.id.as_str() != id);
	}

	pub(crate) fn set_active(&mut self, id: Option<&str>) {
		self.active = id.map(PanelId::from);
	}

	/// Makes every future `op` call for `id` fail with [`RegistryError::Rejected`].
	pub(crate) fn fail(&mut self, id: &str, op: &'static str) {
		self.failing.insert((PanelId::from(id), op));
	}

	pub(crate) fn take_ops(&mut self) -> Vec<RegistryOp> {
		std::mem::take(&mut self.ops)
	}

	fn apply(&mut self, op: RegistryOp) -> Result<(), RegistryError> {
		let target = match &op {
			RegistryOp::SetType(id, _) | RegistryOp::Show(id) | RegistryOp::Hide(id) | RegistryOp::Activate(id) => {
				id.clone()
			}
		};
		if self.failing.contains(&(target.clone(), op.name())) {
			return Err(RegistryError::Rejected {
				id: target,
				op: op.name(),
				reason: "injected failure".to_string(),
			});
		}
		let Some(panel) = self.panels.iter_mut().find(|panel| panel.id == target) else {
			return Err(RegistryError::NotFound(target));
		};
		match &op {
			RegistryOp::SetType(_, kind) => panel.kind = *kind,
			RegistryOp::Show(_) => panel.visible = true,
			RegistryOp::Hide(_) => {
				panel.visible = false;
				if self.active.as_ref() == Some(&target) {
					self.active = None;
				}
			}
			RegistryOp::Activate(_) => {
				panel.visible = true;
				self.active = Some(target);
			}
		}
		self.ops.push(op);
		Ok(())
	}
}

impl PanelRegistry for FakeRegistry {
	fn list_ids(&self) -> Vec<PanelId> {
		self.panels.iter().map(|panel| panel.id.clone()).collect()
	}

	fn get(&self, id: &PanelId) -> Option<PanelRef> {
		self.panels.iter().find(|panel| &panel.id == id).cloned()
	}

	fn active_id(&self) -> Option<PanelId> {
		self.active.clone()
	}

	fn set_type(&mut self, id: &PanelId, kind: PanelType) -> Result<(), RegistryError> {
		self.apply(RegistryOp::SetType(id.clone(), kind))
	}

	fn show(&mut self, id: &PanelId) -> Result<(), RegistryError> {
		self.apply(RegistryOp::Show(id.clone()))
	}

	fn hide(&mut self, id: &PanelId) -> Result<(), RegistryError> {
		self.apply(RegistryOp::Hide(id.clone()))
	}

	fn activate(&mut self, id: &PanelId) -> Result<(), RegistryError> {
		self.apply(RegistryOp::Activate(id.clone()))
	}
}

/// Registry handle shared between a running driver and the test body.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedRegistry(pub(crate) Arc<Mutex<FakeRegistry>>);

impl SharedRegistry {
	pub(crate) fn new(registry: FakeRegistry) -> Self {
		Self(Arc::new(Mutex::new(registry)))
	}
}

impl PanelRegistry for SharedRegistry {
	fn list_ids(&self) -> Vec<PanelId> {
		self.0.lock().list_ids()
	}

	fn get(&self, id: &PanelId) -> Option<PanelRef> {
		self.0.lock().get(id)
	}

	fn active_id(&self) -> Option<PanelId> {
		self.0.lock().active_id()
	}

	fn set_type(&mut self, id: &PanelId, kind: PanelType) -> Result<(), RegistryError> {
		self.0.lock().set_type(id, kind)
	}

	fn show(&mut self, id: &PanelId) -> Result<(), RegistryError> {
		self.0.lock().show(id)
	}

	fn hide(&mut self, id: &PanelId) -> Result<(), RegistryError> {
		self.0.lock().hide(id)
	}

	fn activate(&mut self, id: &PanelId) -> Result<(), RegistryError> {
		self.0.lock().activate(id)
	}
}
