//! Mirrors the current graph into a key-value store across sessions.
//!
//! The backend is injected, so the browser uses `localStorage` while tests
//! (and browsers that refuse storage) use [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;

use log::{info, warn};

use super::codec;
use super::types::GraphData;
use crate::error::{AppError, AppResult};

/// Key the graph is stored under.
pub const STORAGE_KEY: &str = "backHomeData";

/// Opaque get/set/remove over string values. Last writer wins.
pub trait KeyValueStore {
	/// Value under `key`, `None` when absent.
	fn get(&self, key: &str) -> AppResult<Option<String>>;
	/// Store `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: &str) -> AppResult<()>;
	/// Delete `key`; absent keys are fine.
	fn remove(&self, key: &str) -> AppResult<()>;
}

/// In-memory [`KeyValueStore`] with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: RefCell<HashMap<String, String>>,
	quota: Option<usize>,
}

impl MemoryStore {
	/// Unbounded store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Store that rejects values longer than `bytes`.
	pub fn with_quota(bytes: usize) -> Self {
		Self {
			entries: RefCell::default(),
			quota: Some(bytes),
		}
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> AppResult<Option<String>> {
		Ok(self.entries.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> AppResult<()> {
		if let Some(quota) = self.quota {
			if value.len() > quota {
				return Err(AppError::StorageQuota { bytes: value.len() });
			}
		}
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> AppResult<()> {
		self.entries.borrow_mut().remove(key);
		Ok(())
	}
}

/// The storage slot holding the graph between visits.
pub struct Session {
	backend: Box<dyn KeyValueStore>,
	key: String,
}

impl Session {
	/// Session over `backend`, using `key` as the slot.
	pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
		Self {
			backend,
			key: key.into(),
		}
	}

	/// Previously stored graph. Missing, unreadable or malformed values all
	/// come back as `None`; failures are logged, never raised.
	pub fn load(&self) -> Option<GraphData> {
		let raw = match self.backend.get(&self.key) {
			Ok(Some(raw)) => raw,
			Ok(None) => return None,
			Err(e) => {
				warn!("reading stored graph failed: {e}");
				return None;
			}
		};
		match codec::parse(&raw) {
			Ok(data) => {
				info!(
					"restored {} entities, {} relationships from storage",
					data.entities.len(),
					data.relationships.len()
				);
				Some(data)
			}
			Err(e) => {
				warn!("ignoring stored graph: {}", AppError::storage_read(e.to_string()));
				None
			}
		}
	}

	/// Persist `data`. A failure leaves the caller's in-memory graph
	/// untouched; it only means the next visit will not see this version.
	pub fn store(&self, data: &GraphData) -> AppResult<()> {
		let text = codec::serialize_compact(data)?;
		self.backend.set(&self.key, &text).inspect_err(|e| {
			warn!("storing graph ({} bytes) failed: {e}", text.len());
		})
	}

	/// Forget the stored graph.
	pub fn clear(&self) -> AppResult<()> {
		self.backend.remove(&self.key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::types::{Entity, Relationship};

	fn family() -> GraphData {
		GraphData {
			entities: vec![
				Entity {
					id: "1".into(),
					name: "Lola".into(),
					kind: "persona".into(),
					..Default::default()
				},
				Entity {
					id: "2".into(),
					name: "Rocco".into(),
					kind: "perro".into(),
					..Default::default()
				},
			],
			relationships: vec![Relationship {
				source: "1".into(),
				target: "2".into(),
				relation: "dueña de".into(),
			}],
		}
	}

	struct Broken;

	impl KeyValueStore for Broken {
		fn get(&self, _: &str) -> AppResult<Option<String>> {
			Err(AppError::storage_read("denied"))
		}
		fn set(&self, _: &str, _: &str) -> AppResult<()> {
			Err(AppError::StorageUnavailable)
		}
		fn remove(&self, _: &str) -> AppResult<()> {
			Err(AppError::StorageUnavailable)
		}
	}

	#[test]
	fn empty_store_loads_nothing() {
		let session = Session::new(Box::new(MemoryStore::new()), STORAGE_KEY);
		assert_eq!(session.load(), None);
	}

	#[test]
	fn store_then_load_then_clear() {
		let session = Session::new(Box::new(MemoryStore::new()), STORAGE_KEY);
		session.store(&family()).unwrap();
		assert_eq!(session.load(), Some(family()));
		session.clear().unwrap();
		assert_eq!(session.load(), None);
	}

	#[test]
	fn malformed_stored_value_loads_as_absent() {
		let backend = MemoryStore::new();
		backend.set("k", "not json {").unwrap();
		let session = Session::new(Box::new(backend), "k");
		assert_eq!(session.load(), None);

		let backend = MemoryStore::new();
		backend.set("k", r#"{"foo":1}"#).unwrap();
		let session = Session::new(Box::new(backend), "k");
		assert_eq!(session.load(), None);
	}

	#[test]
	fn unreadable_backend_loads_as_absent() {
		let session = Session::new(Box::new(Broken), STORAGE_KEY);
		assert_eq!(session.load(), None);
		assert!(session.clear().is_err());
	}

	#[test]
	fn quota_failure_is_reported_and_keeps_previous_value() {
		let small = codec::serialize_compact(&GraphData::default()).unwrap().len();
		let session = Session::new(Box::new(MemoryStore::with_quota(small)), STORAGE_KEY);
		session.store(&GraphData::default()).unwrap();

		let current = family();
		let err = session.store(&current).unwrap_err();
		assert!(matches!(err, AppError::StorageQuota { .. }));
		assert_eq!(current, family());
		assert_eq!(session.load(), Some(GraphData::default()));
	}
}
