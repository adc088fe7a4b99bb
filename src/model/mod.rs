//! Graph data model: types, import/export, editing, projection and
//! persistence. Nothing in here touches the browser.

pub mod codec;
pub mod editor;
pub mod persist;
pub mod projector;
pub mod types;

#[cfg(test)]
mod codec_proptest;

pub use codec::{parse, serialize};
pub use editor::WorkingCopy;
pub use persist::{KeyValueStore, MemoryStore, STORAGE_KEY, Session};
pub use projector::{NodeClass, Projection, ViewEdge, ViewNode, apply_search, classify, layout, project};
pub use types::{Entity, EntityField, EntityId, GraphData, Relationship, RelationshipField};
