//! Property test: any well-formed document survives export and re-import.

use proptest::prelude::*;

use super::codec::{parse, serialize, serialize_compact};
use super::types::{Entity, GraphData, Relationship};

fn text_strategy() -> impl Strategy<Value = String> {
	prop_oneof![
		Just(String::new()),
		"[A-Za-z0-9 áéíóúñ.,*_#-]{0,30}".prop_map(|s| s.to_string()),
		Just("línea 1\nlínea \"2\"".to_string()),
	]
}

fn entity_strategy() -> impl Strategy<Value = Entity> {
	(
		"[a-z0-9]{1,8}",
		text_strategy(),
		prop_oneof![
			Just("persona".to_string()),
			Just("perro".to_string()),
			Just("gato".to_string()),
			Just("otro".to_string()),
		],
		proptest::option::of(text_strategy()),
		proptest::option::of(text_strategy()),
		proptest::option::of(proptest::collection::vec(text_strategy(), 0..3)),
	)
		.prop_map(|(id, name, kind, description, image, images)| Entity {
			id,
			name,
			kind,
			description,
			image,
			images,
		})
}

fn relationship_strategy() -> impl Strategy<Value = Relationship> {
	("[a-z0-9]{1,8}", "[a-z0-9]{1,8}", text_strategy()).prop_map(|(source, target, relation)| {
		Relationship {
			source,
			target,
			relation,
		}
	})
}

fn graph_strategy() -> impl Strategy<Value = GraphData> {
	(
		proptest::collection::vec(entity_strategy(), 0..8),
		proptest::collection::vec(relationship_strategy(), 0..8),
	)
		.prop_map(|(entities, relationships)| GraphData {
			entities,
			relationships,
		})
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(256))]

	#[test]
	fn export_then_import_reproduces_the_document(data in graph_strategy()) {
		let text = serialize(&data).unwrap();
		prop_assert_eq!(parse(&text).unwrap(), data);
	}

	#[test]
	fn stored_form_reproduces_the_document(data in graph_strategy()) {
		let text = serialize_compact(&data).unwrap();
		prop_assert_eq!(parse(&text).unwrap(), data);
	}
}
