//! Browser tests. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use back_home::BrowserStorage;
use back_home::model::{Entity, GraphData, KeyValueStore, Session};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn one_pet() -> GraphData {
	GraphData {
		entities: vec![Entity {
			id: "1".into(),
			name: "Pelusa".into(),
			kind: "gato".into(),
			..Default::default()
		}],
		relationships: vec![],
	}
}

#[wasm_bindgen_test]
fn local_storage_round_trips_a_graph() {
	let key = "backHomeData-test-roundtrip";
	let session = Session::new(Box::new(BrowserStorage::open().unwrap()), key);
	session.store(&one_pet()).unwrap();
	assert_eq!(session.load(), Some(one_pet()));
	session.clear().unwrap();
	assert_eq!(session.load(), None);
}

#[wasm_bindgen_test]
fn corrupt_local_storage_loads_as_absent() {
	let key = "backHomeData-test-corrupt";
	let storage = BrowserStorage::open().unwrap();
	storage.set(key, "{not json").unwrap();
	let session = Session::new(Box::new(storage), key);
	assert_eq!(session.load(), None);
	session.clear().unwrap();
}
