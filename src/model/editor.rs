//! The editor's working copy: uncommitted edits over a snapshot of the graph.

use log::debug;

use super::types::{Entity, EntityField, EntityId, GraphData, Relationship, RelationshipField};

/// Name given to a freshly added entity.
pub const NEW_ENTITY_NAME: &str = "Nueva Persona";
/// Kind given to a freshly added entity.
pub const NEW_ENTITY_KIND: &str = "persona";
/// Label given to a freshly added relationship.
pub const NEW_RELATION_LABEL: &str = "nueva relación";

/// The editor's uncommitted copy of a [`GraphData`].
///
/// All mutation of the graph goes through here. Removing an entity also
/// removes every relationship touching it, so no relationship is left
/// pointing at an entity that no longer exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkingCopy {
	entities: Vec<Entity>,
	relationships: Vec<Relationship>,
	next_id: u64,
}

impl WorkingCopy {
	/// Start editing `data`. New ids count upward from `id_seed`
	/// (the browser passes the current time in milliseconds).
	pub fn new(data: &GraphData, id_seed: u64) -> Self {
		Self {
			entities: data.entities.clone(),
			relationships: data.relationships.clone(),
			next_id: id_seed,
		}
	}

	/// Entities in display order.
	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	/// Relationships in display order.
	pub fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}

	/// Entity with `id`, if any.
	pub fn entity(&self, id: &str) -> Option<&Entity> {
		self.entities.iter().find(|e| e.id == id)
	}

	/// Relationship at `index`, if any.
	pub fn relationship(&self, index: usize) -> Option<&Relationship> {
		self.relationships.get(index)
	}

	fn fresh_id(&mut self) -> EntityId {
		loop {
			let candidate = self.next_id.to_string();
			self.next_id += 1;
			if self.entity(&candidate).is_none() {
				return candidate;
			}
		}
	}

	/// Append a placeholder entity and return its id.
	pub fn add_entity(&mut self) -> EntityId {
		let id = self.fresh_id();
		self.entities.push(Entity {
			id: id.clone(),
			name: NEW_ENTITY_NAME.into(),
			kind: NEW_ENTITY_KIND.into(),
			description: Some(String::new()),
			image: Some(String::new()),
			images: None,
		});
		id
	}

	/// Replace one field of the entity with `id`; no-op when absent.
	pub fn update_entity(&mut self, id: &str, field: EntityField, value: impl Into<String>) {
		if let Some(entity) = self.entities.iter_mut().find(|e| e.id == id) {
			field.apply(entity, value.into());
		}
	}

	/// Remove the entity and every relationship that starts or ends at it.
	pub fn remove_entity(&mut self, id: &str) {
		self.entities.retain(|e| e.id != id);
		let before = self.relationships.len();
		self.relationships
			.retain(|r| r.source != id && r.target != id);
		debug!(
			"removed entity {id} and {} relationship(s)",
			before - self.relationships.len()
		);
	}

	/// Link the first two entities with a placeholder label. Does nothing
	/// unless at least two entities exist.
	pub fn add_relationship(&mut self) -> Option<usize> {
		let [first, second, ..] = self.entities.as_slice() else {
			return None;
		};
		self.relationships.push(Relationship {
			source: first.id.clone(),
			target: second.id.clone(),
			relation: NEW_RELATION_LABEL.into(),
		});
		Some(self.relationships.len() - 1)
	}

	/// Replace one field of the relationship at `index`; no-op when out of range.
	pub fn update_relationship(
		&mut self,
		index: usize,
		field: RelationshipField,
		value: impl Into<String>,
	) {
		if let Some(rel) = self.relationships.get_mut(index) {
			field.apply(rel, value.into());
		}
	}

	/// Remove the relationship at `index`; no-op when out of range.
	pub fn remove_relationship(&mut self, index: usize) {
		if index < self.relationships.len() {
			self.relationships.remove(index);
		}
	}

	/// Commit: the working copy becomes the new snapshot.
	pub fn save(self) -> GraphData {
		debug!(
			"saving {} entities, {} relationships",
			self.entities.len(),
			self.relationships.len()
		);
		GraphData {
			entities: self.entities,
			relationships: self.relationships,
		}
	}

	/// Abandon the session; the committed snapshot stays as it was.
	pub fn cancel(self) {
		debug!("discarding editor changes");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rel(source: &str, target: &str) -> Relationship {
		Relationship {
			source: source.into(),
			target: target.into(),
			relation: "x".into(),
		}
	}

	fn three_people() -> GraphData {
		let entities = ["a", "b", "c"]
			.iter()
			.map(|id| Entity {
				id: id.to_string(),
				name: id.to_uppercase(),
				kind: "persona".into(),
				..Default::default()
			})
			.collect();
		GraphData {
			entities,
			relationships: vec![rel("a", "b"), rel("b", "c"), rel("c", "a"), rel("b", "b")],
		}
	}

	#[test]
	fn add_entity_appends_placeholder_with_unique_ids() {
		let mut w = WorkingCopy::new(&GraphData::default(), 7);
		let first = w.add_entity();
		let second = w.add_entity();
		assert_eq!(first, "7");
		assert_eq!(second, "8");
		let e = w.entity(&first).unwrap();
		assert_eq!(e.name, NEW_ENTITY_NAME);
		assert_eq!(e.kind, NEW_ENTITY_KIND);
		assert_eq!(e.description.as_deref(), Some(""));
	}

	#[test]
	fn add_entity_skips_ids_already_taken() {
		let data = GraphData {
			entities: vec![Entity {
				id: "5".into(),
				..Default::default()
			}],
			relationships: vec![],
		};
		let mut w = WorkingCopy::new(&data, 5);
		assert_eq!(w.add_entity(), "6");
	}

	#[test]
	fn update_entity_sets_field_or_ignores_unknown_id() {
		let mut w = WorkingCopy::new(&three_people(), 0);
		w.update_entity("b", EntityField::Name, "Beto");
		w.update_entity("b", EntityField::Kind, "gato");
		w.update_entity("zzz", EntityField::Name, "nobody");
		let b = w.entity("b").unwrap();
		assert_eq!(b.name, "Beto");
		assert_eq!(b.kind, "gato");
		assert_eq!(w.entities().len(), 3);
		assert!(w.entities().iter().all(|e| e.name != "nobody"));
	}

	#[test]
	fn remove_entity_cascades_to_relationships() {
		let mut w = WorkingCopy::new(&three_people(), 0);
		w.remove_entity("b");
		assert!(w.entity("b").is_none());
		assert!(
			w.relationships()
				.iter()
				.all(|r| r.source != "b" && r.target != "b")
		);
		assert_eq!(w.relationships(), &[rel("c", "a")]);
	}

	#[test]
	fn add_relationship_needs_two_entities() {
		let mut w = WorkingCopy::new(&GraphData::default(), 0);
		assert_eq!(w.add_relationship(), None);
		w.add_entity();
		assert_eq!(w.add_relationship(), None);
		assert!(w.relationships().is_empty());

		let second = w.add_entity();
		assert_eq!(w.add_relationship(), Some(0));
		let r = w.relationship(0).unwrap();
		assert_eq!(r.source, "0");
		assert_eq!(r.target, second);
		assert_eq!(r.relation, NEW_RELATION_LABEL);
	}

	#[test]
	fn relationships_are_edited_by_position() {
		let mut w = WorkingCopy::new(&three_people(), 0);
		w.update_relationship(1, RelationshipField::Relation, "hermano de");
		w.update_relationship(1, RelationshipField::Target, "a");
		w.update_relationship(99, RelationshipField::Relation, "ignored");
		assert_eq!(
			w.relationship(1),
			Some(&Relationship {
				source: "b".into(),
				target: "a".into(),
				relation: "hermano de".into(),
			})
		);

		w.remove_relationship(0);
		w.remove_relationship(99);
		assert_eq!(w.relationships().len(), 3);
		assert_eq!(w.relationship(0).unwrap().relation, "hermano de");
	}

	#[test]
	fn save_commits_and_cancel_discards() {
		let before = three_people();
		let mut w = WorkingCopy::new(&before, 0);
		w.remove_entity("a");
		w.clone().cancel();
		assert_eq!(before.entities.len(), 3);
		assert_eq!(before.relationships.len(), 4);

		let saved = w.save();
		assert_eq!(saved.entities.len(), 2);
		assert_eq!(saved.relationships, vec![rel("b", "c"), rel("b", "b")]);
	}
}
