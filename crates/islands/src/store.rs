//! Remembered panel selections per island.
//!
//! When an island is closed by a toggle, the ids that were open on it are
//! remembered so the next toggle can bring the same set back. The state is a
//! small JSON document that survives restarts:
//!
//! ```json
//! {
//!   "lastLeftId": "project",
//!   "leftIds": ["project", "structure"],
//!   "rightIds": [],
//!   "bottomIds": ["terminal"]
//! }
//! ```
//!
//! The `last*Id` fields are the older single-id format. They are still written
//! (as the first element of the list) and are read back when the list is empty.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::anchor::Anchor;
use crate::error::StoreError;
use crate::panel::PanelId;

/// Persisted form of the remembered selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RememberedState {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_left_id: Option<PanelId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_right_id: Option<PanelId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_bottom_id: Option<PanelId>,
	pub left_ids: Vec<PanelId>,
	pub right_ids: Vec<PanelId>,
	pub bottom_ids: Vec<PanelId>,
}

impl RememberedState {
	pub fn ids(&self, anchor: Anchor) -> &[PanelId] {
		match anchor {
			Anchor::Left => &self.left_ids,
			Anchor::Right => &self.right_ids,
			Anchor::Bottom => &self.bottom_ids,
		}
	}

	pub fn legacy_id(&self, anchor: Anchor) -> Option<&PanelId> {
		match anchor {
			Anchor::Left => self.last_left_id.as_ref(),
			Anchor::Right => self.last_right_id.as_ref(),
			Anchor::Bottom => self.last_bottom_id.as_ref(),
		}
	}

	/// Remembered ids for `anchor`, falling back to the legacy single id.
	pub fn resolved(&self, anchor: Anchor) -> Vec<PanelId> {
		let ids = self.ids(anchor);
		if !ids.is_empty() {
			return ids.to_vec();
		}
		self.legacy_id(anchor).cloned().into_iter().collect()
	}

	fn set(&mut self, anchor: Anchor, ids: Vec<PanelId>) {
		let legacy = ids.first().cloned();
		let (list, last) = self.slot_mut(anchor);
		*list = ids;
		*last = legacy;
	}

	fn slot_mut(&mut self, anchor: Anchor) -> (&mut Vec<PanelId>, &mut Option<PanelId>) {
		match anchor {
			Anchor::Left => (&mut self.left_ids, &mut self.last_left_id),
			Anchor::Right => (&mut self.right_ids, &mut self.last_right_id),
			Anchor::Bottom => (&mut self.bottom_ids, &mut self.last_bottom_id),
		}
	}

	/// Drops blank and duplicate ids. Returns true when anything changed.
	fn repair(&mut self) -> bool {
		let mut changed = false;
		for anchor in Anchor::ALL {
			let (list, last) = self.slot_mut(anchor);
			let cleaned = dedup(list.iter().cloned());
			if cleaned != *list {
				*list = cleaned;
				changed = true;
			}
			if last.as_ref().is_some_and(PanelId::is_blank) {
				*last = None;
				changed = true;
			}
		}
		changed
	}
}

/// Keeps the first occurrence of every non-blank id, preserving order.
fn dedup(ids: impl IntoIterator<Item = PanelId>) -> Vec<PanelId> {
	let mut out: Vec<PanelId> = Vec::new();
	for id in ids {
		if !id.is_blank() && !out.contains(&id) {
			out.push(id);
		}
	}
	out
}

#[derive(Debug, Default)]
struct Inner {
	state: RememberedState,
	revision: u64,
}

/// Shared handle to the remembered selections of one workbench window.
///
/// Clones share the same state. Every read or write of an anchor's entry
/// happens under a single lock, so readers never observe a partial list.
#[derive(Debug, Clone, Default)]
pub struct RememberedSelections {
	inner: Arc<Mutex<Inner>>,
}

impl RememberedSelections {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps persisted state, repairing blank or duplicate entries.
	pub fn from_state(mut state: RememberedState) -> Self {
		if state.repair() {
			warn!("store.repaired");
		}
		Self {
			inner: Arc::new(Mutex::new(Inner { state, revision: 0 })),
		}
	}

	/// Stores `ids` as the remembered set for `anchor`.
	///
	/// Duplicates and blank ids are dropped; the legacy single-id field is set
	/// to the first remaining id. Returns what was stored.
	pub fn remember_ids(&self, anchor: Anchor, ids: impl IntoIterator<Item = PanelId>) -> Vec<PanelId> {
		let ids = dedup(ids);
		let mut inner = self.inner.lock();
		inner.state.set(anchor, ids.clone());
		inner.revision += 1;
		debug!(anchor = %anchor, count = ids.len(), revision = inner.revision, "store.remembered");
		ids
	}

	pub fn remember_id(&self, anchor: Anchor, id: PanelId) -> Vec<PanelId> {
		self.remember_ids(anchor, [id])
	}

	/// Returns the remembered ids for `anchor`, possibly empty.
	pub fn remembered_ids(&self, anchor: Anchor) -> Vec<PanelId> {
		self.inner.lock().state.resolved(anchor)
	}

	pub fn forget(&self, anchor: Anchor) {
		let mut inner = self.inner.lock();
		inner.state.set(anchor, Vec::new());
		inner.revision += 1;
	}

	pub fn snapshot(&self) -> RememberedState {
		self.inner.lock().state.clone()
	}

	/// Number of writes since this handle was created.
	pub fn revision(&self) -> u64 {
		self.inner.lock().revision
	}

	/// Loads remembered selections from `path`.
	///
	/// A missing file yields an empty store. A file that is not valid JSON is
	/// logged and replaced by an empty store.
	pub fn load(path: &Path) -> Result<Self, StoreError> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::new()),
			Err(error) => {
				return Err(StoreError::Io {
					path: path.to_path_buf(),
					error,
				});
			}
		};

		match serde_json::from_str::<RememberedState>(&content) {
			Ok(state) => Ok(Self::from_state(state)),
			Err(error) => {
				warn!(path = %path.display(), %error, "store.repaired");
				Ok(Self::new())
			}
		}
	}

	/// Writes the current state to `path`, replacing it atomically.
	pub fn save(&self, path: &Path) -> Result<(), StoreError> {
		let json = serde_json::to_string_pretty(&self.snapshot())?;

		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent).map_err(io_error(parent))?;
		}

		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, json).map_err(io_error(&tmp))?;
		fs::rename(&tmp, path).map_err(io_error(path))?;
		debug!(path = %path.display(), "store.saved");
		Ok(())
	}
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
	let path = path.to_path_buf();
	move |error| StoreError::Io { path, error }
}

/// Returns `$XDG_STATE_HOME/atoll/remembered-panels.json`, or the platform equivalent.
pub fn default_state_path() -> Result<PathBuf, StoreError> {
	let state_dir = dirs::state_dir()
		.or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
		.ok_or(StoreError::MissingStateDir)?;
	Ok(state_dir.join("atoll").join("remembered-panels.json"))
}
