//! Document types and the closed tables of editable fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Caller-assigned entity identifier.
pub type EntityId = String;

/// Accepts an id written as a string or a number. A missing or `null` id
/// reads as empty.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntityId, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Number(serde_json::Number),
	}

	Ok(match Option::<RawId>::deserialize(deserializer)? {
		Some(RawId::Text(text)) => text,
		Some(RawId::Number(n)) => n.to_string(),
		None => EntityId::new(),
	})
}

/// A person or pet in the graph.
///
/// Only the shape of the document is enforced on import; a record missing
/// one of its scalar fields reads it as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
	/// Unique within one [`GraphData`].
	#[serde(default, deserialize_with = "lenient_id")]
	pub id: EntityId,
	/// Display name, also the node label.
	#[serde(default)]
	pub name: String,
	/// Free-form kind, conventionally `persona`, `animal`, `perro`, `gato` or `otro`.
	#[serde(rename = "type", default)]
	pub kind: String,
	/// Markdown text shown in the detail panel.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// URL, data URI or bare file name under the image directory.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	/// Ordered list of further images; the first non-empty one wins over `image`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub images: Option<Vec<String>>,
}

/// A labeled directed edge `source -> target`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
	/// Id of the entity the edge starts at.
	#[serde(default, deserialize_with = "lenient_id")]
	pub source: EntityId,
	/// Id of the entity the arrow points to.
	#[serde(default, deserialize_with = "lenient_id")]
	pub target: EntityId,
	/// Free-form label.
	#[serde(default)]
	pub relation: String,
}

/// The whole document exchanged with files and storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
	/// All entities, in display order.
	pub entities: Vec<Entity>,
	/// All relationships, in display order.
	pub relationships: Vec<Relationship>,
}

impl GraphData {
	/// Look up an entity by id.
	pub fn entity(&self, id: &str) -> Option<&Entity> {
		self.entities.iter().find(|e| e.id == id)
	}

	/// Relationships whose endpoints do not resolve to an entity.
	pub fn dangling_relationships(&self) -> impl Iterator<Item = &Relationship> {
		self.relationships
			.iter()
			.filter(|r| self.entity(&r.source).is_none() || self.entity(&r.target).is_none())
	}
}

/// Editable entity fields. `id` is deliberately absent: it never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityField {
	/// `name`
	Name,
	/// `type`
	Kind,
	/// `description`
	Description,
	/// `image`
	Image,
	/// `images`, edited as one entry per line.
	Images,
}

impl EntityField {
	/// Wire name of the field.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Name => "name",
			Self::Kind => "type",
			Self::Description => "description",
			Self::Image => "image",
			Self::Images => "images",
		}
	}

	/// Current value as edited in a text input.
	pub fn read(self, entity: &Entity) -> String {
		match self {
			Self::Name => entity.name.clone(),
			Self::Kind => entity.kind.clone(),
			Self::Description => entity.description.clone().unwrap_or_default(),
			Self::Image => entity.image.clone().unwrap_or_default(),
			Self::Images => entity
				.images
				.as_ref()
				.map(|list| list.join("\n"))
				.unwrap_or_default(),
		}
	}

	/// Write `value` into the matching field of `entity`.
	pub fn apply(self, entity: &mut Entity, value: String) {
		match self {
			Self::Name => entity.name = value,
			Self::Kind => entity.kind = value,
			Self::Description => entity.description = Some(value),
			Self::Image => entity.image = Some(value),
			Self::Images => {
				let list: Vec<String> = value
					.lines()
					.map(str::trim)
					.filter(|l| !l.is_empty())
					.map(String::from)
					.collect();
				entity.images = if list.is_empty() { None } else { Some(list) };
			}
		}
	}
}

impl FromStr for EntityField {
	type Err = AppError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"name" => Ok(Self::Name),
			"type" => Ok(Self::Kind),
			"description" => Ok(Self::Description),
			"image" => Ok(Self::Image),
			"images" => Ok(Self::Images),
			other => Err(AppError::UnknownField(other.to_string())),
		}
	}
}

impl fmt::Display for EntityField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Editable relationship fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationshipField {
	/// `source`
	Source,
	/// `target`
	Target,
	/// `relation`
	Relation,
}

impl RelationshipField {
	/// Wire name of the field.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Source => "source",
			Self::Target => "target",
			Self::Relation => "relation",
		}
	}

	/// Current value of the field.
	pub fn read(self, rel: &Relationship) -> String {
		match self {
			Self::Source => rel.source.clone(),
			Self::Target => rel.target.clone(),
			Self::Relation => rel.relation.clone(),
		}
	}

	/// Write `value` into the matching field of `rel`.
	pub fn apply(self, rel: &mut Relationship, value: String) {
		match self {
			Self::Source => rel.source = value,
			Self::Target => rel.target = value,
			Self::Relation => rel.relation = value,
		}
	}
}

impl FromStr for RelationshipField {
	type Err = AppError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"source" => Ok(Self::Source),
			"target" => Ok(Self::Target),
			"relation" => Ok(Self::Relation),
			other => Err(AppError::UnknownField(other.to_string())),
		}
	}
}

impl fmt::Display for RelationshipField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn field_names_parse_and_reject_unknown() {
		assert_eq!("type".parse::<EntityField>().unwrap(), EntityField::Kind);
		assert_eq!(
			"relation".parse::<RelationshipField>().unwrap(),
			RelationshipField::Relation
		);
		assert!(matches!(
			"id".parse::<EntityField>(),
			Err(AppError::UnknownField(f)) if f == "id"
		));
		assert!("name".parse::<RelationshipField>().is_err());
	}

	#[test]
	fn images_field_splits_lines_and_drops_blanks() {
		let mut e = Entity::default();
		EntityField::Images.apply(&mut e, "a.png\n\n  b.jpg \n".into());
		assert_eq!(e.images, Some(vec!["a.png".to_string(), "b.jpg".to_string()]));
		assert_eq!(EntityField::Images.read(&e), "a.png\nb.jpg");
		EntityField::Images.apply(&mut e, "  \n".into());
		assert_eq!(e.images, None);
		assert_eq!(EntityField::Images.read(&e), "");
		assert_eq!(EntityField::Description.read(&e), "");
	}

	#[test]
	fn dangling_relationships_are_reported() {
		let data = GraphData {
			entities: vec![Entity {
				id: "1".into(),
				..Default::default()
			}],
			relationships: vec![
				Relationship {
					source: "1".into(),
					target: "1".into(),
					relation: "self".into(),
				},
				Relationship {
					source: "1".into(),
					target: "9".into(),
					relation: "ghost".into(),
				},
			],
		};
		let dangling: Vec<_> = data.dangling_relationships().collect();
		assert_eq!(dangling.len(), 1);
		assert_eq!(dangling[0].target, "9");
	}
}
