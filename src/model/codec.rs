//! Import/export of [`GraphData`] documents.
//!
//! Parsing checks only that the top level is an object carrying both
//! `entities` and `relationships` as lists of records. Scalar fields inside
//! a record may be missing, and ids may be written as numbers; ids and
//! references are taken as-is.

use serde_json::Value;

use super::types::GraphData;
use crate::error::{AppError, AppResult};

/// File name offered when exporting.
pub const EXPORT_FILE_NAME: &str = "vinculos.json";

const REQUIRED_KEYS: [&str; 2] = ["entities", "relationships"];

/// Parse raw document text.
///
/// Fails with [`AppError::Format`] when the text is not JSON and with
/// [`AppError::Schema`] when a required top-level key is missing, `null`,
/// or is not a list of records.
pub fn parse(raw: &str) -> AppResult<GraphData> {
	let value: Value = serde_json::from_str(raw).map_err(AppError::Format)?;
	let Some(object) = value.as_object() else {
		return Err(AppError::schema("top level must be an object"));
	};
	for key in REQUIRED_KEYS {
		if object.get(key).is_none_or(Value::is_null) {
			return Err(AppError::schema(format!("missing `{key}`")));
		}
	}
	serde_json::from_value(value).map_err(|e| AppError::schema(e.to_string()))
}

/// Pretty-printed document text, as written to exported files.
pub fn serialize(data: &GraphData) -> AppResult<String> {
	Ok(serde_json::to_string_pretty(data)?)
}

/// Compact document text, as written to browser storage.
pub fn serialize_compact(data: &GraphData) -> AppResult<String> {
	Ok(serde_json::to_string(data)?)
}

/// Reject uploads whose name does not say JSON, before reading them.
pub fn check_file_name(name: &str) -> AppResult<()> {
	if name.to_ascii_lowercase().ends_with(".json") {
		Ok(())
	} else {
		Err(AppError::NotJsonFile { name: name.into() })
	}
}
