//! Host-environment effects: `localStorage`, file reading and downloads.

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, File, FileReader, HtmlAnchorElement, Storage, Url};

use crate::error::{AppError, AppResult};
use crate::model::{KeyValueStore, MemoryStore, STORAGE_KEY, Session};

/// `window.localStorage` as a [`KeyValueStore`].
pub struct BrowserStorage {
	storage: Storage,
}

impl BrowserStorage {
	/// Open the window's local storage, if the browser grants it.
	pub fn open() -> AppResult<Self> {
		let storage = web_sys::window()
			.ok_or(AppError::StorageUnavailable)?
			.local_storage()
			.map_err(|_| AppError::StorageUnavailable)?
			.ok_or(AppError::StorageUnavailable)?;
		Ok(Self { storage })
	}
}

impl KeyValueStore for BrowserStorage {
	fn get(&self, key: &str) -> AppResult<Option<String>> {
		self.storage
			.get_item(key)
			.map_err(|e| AppError::storage_read(format!("{e:?}")))
	}

	fn set(&self, key: &str, value: &str) -> AppResult<()> {
		self.storage
			.set_item(key, value)
			.map_err(|_| AppError::StorageQuota { bytes: value.len() })
	}

	fn remove(&self, key: &str) -> AppResult<()> {
		self.storage
			.remove_item(key)
			.map_err(|_| AppError::StorageUnavailable)
	}
}

/// Session over `localStorage`, or over memory when the browser refuses
/// storage (the graph then lives only as long as the tab).
pub fn open_session() -> (Session, Option<AppError>) {
	match BrowserStorage::open() {
		Ok(storage) => (Session::new(Box::new(storage), STORAGE_KEY), None),
		Err(e) => {
			warn!("falling back to in-memory storage: {e}");
			(Session::new(Box::new(MemoryStore::new()), STORAGE_KEY), Some(e))
		}
	}
}

/// Milliseconds since the epoch, used to seed editor ids.
pub fn now_millis() -> u64 {
	js_sys::Date::now() as u64
}

/// Read `file` as text and hand the result to `on_done` once the browser
/// has finished.
pub fn read_file_text(
	file: &File,
	on_done: impl FnOnce(AppResult<String>) + 'static,
) -> AppResult<()> {
	let reader = FileReader::new().map_err(|_| AppError::FileRead)?;
	let reader_done = reader.clone();
	let onloadend = Closure::once_into_js(move || {
		let text = reader_done
			.result()
			.ok()
			.and_then(|v| v.as_string())
			.ok_or(AppError::FileRead);
		on_done(text);
	});
	reader.set_onloadend(Some(onloadend.unchecked_ref()));
	reader.read_as_text(file).map_err(|_| AppError::FileRead)
}

/// Offer `text` to the user as a JSON file download.
pub fn download_json(file_name: &str, text: &str) -> AppResult<()> {
	let fail = |e: JsValue| AppError::Download {
		message: format!("{e:?}"),
	};
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| AppError::Download {
			message: "no document".into(),
		})?;

	let parts = js_sys::Array::of1(&JsValue::from_str(text));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(fail)?;
	let url = Url::create_object_url_with_blob(&blob).map_err(fail)?;

	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(fail)?
		.dyn_into()
		.map_err(|_| AppError::Download {
			message: "anchor element".into(),
		})?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url).map_err(fail)?;
	debug!("exported {} bytes as {file_name}", text.len());
	Ok(())
}
