//! Derives the renderable node/edge lists from a [`GraphData`].
//!
//! Everything here is a pure function of its inputs. Positions produced by
//! [`layout`] are only the starting point; the canvas lets the user drag
//! nodes around, and those moves are never written back.

use super::types::{Entity, GraphData};

/// Horizontal distance between grid columns.
pub const SPACING_X: f64 = 250.0;
/// Vertical distance between grid rows.
pub const SPACING_Y: f64 = 200.0;
/// Opacity of nodes that do not match the search query.
pub const DIMMED_OPACITY: f64 = 0.2;
/// Directory bare image file names are served from.
pub const IMAGE_DIR: &str = "/images";
/// Entity kinds drawn as animals (compared case-insensitively).
pub const ANIMAL_TYPES: [&str; 4] = ["animal", "perro", "gato", "mascota"];

/// Node position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// Styling class of a node. Never affects graph structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
	/// Anything not recognised as an animal.
	Person,
	/// One of [`ANIMAL_TYPES`].
	Animal,
}

/// Payload carried by a rendered node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
	/// Entity name.
	pub label: String,
	/// Raw entity kind.
	pub kind: String,
	/// Resolved primary image, if any.
	pub image: Option<String>,
}

/// A node as handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
	/// Entity id.
	pub id: String,
	/// Current position.
	pub position: Position,
	/// Label, kind and image.
	pub data: NodeData,
	/// Search highlight: matched nodes are selected.
	pub selected: bool,
	/// Search dimming: 1.0 or [`DIMMED_OPACITY`].
	pub opacity: f64,
}

impl ViewNode {
	/// Styling class derived from the node's kind.
	pub fn class(&self) -> NodeClass {
		classify(&self.data.kind)
	}
}

/// An edge as handed to the renderer, arrow-terminated at `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewEdge {
	/// `e{source}-{target}-{index}`.
	pub id: String,
	/// Source entity id.
	pub source: String,
	/// Target entity id.
	pub target: String,
	/// Relationship label.
	pub label: String,
}

/// The complete renderable graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projection {
	/// One node per entity, same order.
	pub nodes: Vec<ViewNode>,
	/// One edge per relationship, same order.
	pub edges: Vec<ViewEdge>,
}

/// Grid positions for `count` nodes: `ceil(sqrt(count))` columns, filled
/// row by row.
pub fn layout(count: usize) -> Vec<Position> {
	if count == 0 {
		return Vec::new();
	}
	let cols = (count as f64).sqrt().ceil() as usize;
	(0..count)
		.map(|i| Position {
			x: (i % cols) as f64 * SPACING_X,
			y: (i / cols) as f64 * SPACING_Y,
		})
		.collect()
}

/// Animal iff the case-folded kind is in [`ANIMAL_TYPES`]; everything else,
/// including unknown kinds, is a person.
pub fn classify(kind: &str) -> NodeClass {
	let kind = kind.to_lowercase();
	if ANIMAL_TYPES.contains(&kind.as_str()) {
		NodeClass::Animal
	} else {
		NodeClass::Person
	}
}

/// Resolve a single image reference. URLs (`http…`) and embedded
/// `data:image/` values pass through; anything else is a file name under
/// [`IMAGE_DIR`].
pub fn resolve_image_ref(reference: &str) -> String {
	if reference.starts_with("http") || reference.starts_with("data:image/") {
		reference.to_string()
	} else {
		format!("{IMAGE_DIR}/{reference}")
	}
}

/// Primary image of an entity: the first non-empty entry of `images`,
/// then `image`.
pub fn resolve_image(entity: &Entity) -> Option<String> {
	entity
		.images
		.iter()
		.flatten()
		.chain(entity.image.iter())
		.find(|s| !s.is_empty())
		.map(|s| resolve_image_ref(s))
}

/// Build the renderable graph with grid positions and no highlight.
pub fn project(data: &GraphData) -> Projection {
	let nodes = data
		.entities
		.iter()
		.zip(layout(data.entities.len()))
		.map(|(entity, position)| ViewNode {
			id: entity.id.clone(),
			position,
			data: NodeData {
				label: entity.name.clone(),
				kind: entity.kind.clone(),
				image: resolve_image(entity),
			},
			selected: false,
			opacity: 1.0,
		})
		.collect();

	let edges = data
		.relationships
		.iter()
		.enumerate()
		.map(|(i, rel)| ViewEdge {
			id: format!("e{}-{}-{}", rel.source, rel.target, i),
			source: rel.source.clone(),
			target: rel.target.clone(),
			label: rel.relation.clone(),
		})
		.collect();

	Projection { nodes, edges }
}

/// Apply a search query to the node list. Matching is a case-insensitive
/// substring test on the label; non-matches are dimmed and deselected,
/// matches are selected. An empty query restores full opacity and leaves
/// selection alone. Applying the same query again changes nothing.
pub fn apply_search(nodes: &mut [ViewNode], query: &str) {
	if query.is_empty() {
		for node in nodes {
			node.opacity = 1.0;
		}
		return;
	}
	let needle = query.to_lowercase();
	for node in nodes {
		let matched = node.data.label.to_lowercase().contains(&needle);
		node.selected = matched;
		node.opacity = if matched { 1.0 } else { DIMMED_OPACITY };
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::types::Relationship;

	fn entity(id: &str, name: &str, kind: &str) -> Entity {
		Entity {
			id: id.into(),
			name: name.into(),
			kind: kind.into(),
			..Default::default()
		}
	}

	fn sample() -> GraphData {
		GraphData {
			entities: vec![
				entity("1", "Mamá Clara", "persona"),
				entity("2", "Toby", "Perro"),
				entity("3", "Tío Juan", "persona"),
				entity("4", "Mishi", "gato"),
			],
			relationships: vec![
				Relationship {
					source: "1".into(),
					target: "2".into(),
					relation: "adoptó a".into(),
				},
				Relationship {
					source: "1".into(),
					target: "2".into(),
					relation: "paseaba a".into(),
				},
			],
		}
	}

	fn pos(x: f64, y: f64) -> Position {
		Position { x, y }
	}

	#[test]
	fn four_entities_fill_a_two_by_two_grid() {
		assert_eq!(
			layout(4),
			vec![pos(0.0, 0.0), pos(250.0, 0.0), pos(0.0, 200.0), pos(250.0, 200.0)]
		);
	}

	#[test]
	fn layout_handles_empty_and_ragged_counts() {
		assert!(layout(0).is_empty());
		assert_eq!(layout(1), vec![pos(0.0, 0.0)]);
		let five = layout(5);
		assert_eq!(five[2], pos(500.0, 0.0));
		assert_eq!(five[4], pos(250.0, 200.0));
		assert_eq!(layout(5), five);
	}

	#[test]
	fn project_builds_one_node_per_entity_and_one_edge_per_relationship() {
		let p = project(&sample());
		assert_eq!(p.nodes.len(), 4);
		assert_eq!(p.nodes[3].position, pos(250.0, 200.0));
		assert_eq!(p.nodes[1].data.label, "Toby");
		assert!(p.nodes.iter().all(|n| n.opacity == 1.0 && !n.selected));

		assert_eq!(p.edges.len(), 2);
		assert_eq!(p.edges[0].id, "e1-2-0");
		assert_eq!(p.edges[1].id, "e1-2-1");
		assert_eq!(p.edges[1].label, "paseaba a");
		assert_eq!((p.edges[0].source.as_str(), p.edges[0].target.as_str()), ("1", "2"));
	}

	#[test]
	fn search_dims_non_matches_and_is_idempotent() {
		let mut nodes = project(&sample()).nodes;
		apply_search(&mut nodes, "TÍO");
		let once = nodes.clone();
		apply_search(&mut nodes, "TÍO");
		assert_eq!(nodes, once);

		let state: Vec<_> = nodes.iter().map(|n| (n.selected, n.opacity)).collect();
		assert_eq!(
			state,
			vec![
				(false, DIMMED_OPACITY),
				(false, DIMMED_OPACITY),
				(true, 1.0),
				(false, DIMMED_OPACITY)
			]
		);
	}

	#[test]
	fn empty_query_restores_opacity() {
		let mut nodes = project(&sample()).nodes;
		apply_search(&mut nodes, "zzz");
		assert!(nodes.iter().all(|n| n.opacity == DIMMED_OPACITY));
		apply_search(&mut nodes, "");
		assert!(nodes.iter().all(|n| n.opacity == 1.0));
	}

	#[test]
	fn classification_is_case_folded_and_defaults_to_person() {
		assert_eq!(classify("Perro"), NodeClass::Animal);
		assert_eq!(classify("MASCOTA"), NodeClass::Animal);
		assert_eq!(classify("animal"), NodeClass::Animal);
		assert_eq!(classify("persona"), NodeClass::Person);
		assert_eq!(classify("otro"), NodeClass::Person);
		assert_eq!(classify(""), NodeClass::Person);
		assert_eq!(project(&sample()).nodes[3].class(), NodeClass::Animal);
	}

	#[test]
	fn first_image_wins_and_urls_pass_through() {
		let mut e = entity("1", "A", "persona");
		e.images = Some(vec!["http://x/a.png".into(), "b.jpg".into()]);
		assert_eq!(resolve_image(&e).as_deref(), Some("http://x/a.png"));

		e.images = Some(vec!["b.jpg".into()]);
		assert_eq!(resolve_image(&e).as_deref(), Some("/images/b.jpg"));
	}

	#[test]
	fn image_falls_back_through_empty_entries() {
		let mut e = entity("1", "A", "persona");
		assert_eq!(resolve_image(&e), None);

		e.image = Some(String::new());
		assert_eq!(resolve_image(&e), None);

		e.images = Some(vec![String::new()]);
		e.image = Some("data:image/png;base64,AAAA".into());
		assert_eq!(
			resolve_image(&e).as_deref(),
			Some("data:image/png;base64,AAAA")
		);
	}
}
