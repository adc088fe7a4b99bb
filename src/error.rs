//! Error taxonomy shared by the import, storage and editor boundaries.

use thiserror::Error;

/// Every failure the app can surface. None of them is fatal: each is
/// recovered where it occurs and shown to the user as a short message.
#[derive(Debug, Error)]
pub enum AppError {
	/// The text is not valid JSON.
	#[error("invalid JSON: {0}")]
	Format(#[source] serde_json::Error),
	/// The JSON lacks (or mistypes) a required top-level field.
	#[error("schema error: {message}")]
	Schema {
		/// What was wrong with the document.
		message: String,
	},
	/// The uploaded file name does not end in `.json`.
	#[error("not a JSON file: {name}")]
	NotJsonFile {
		/// The rejected file name.
		name: String,
	},
	/// The host could not hand over the file contents.
	#[error("could not read file")]
	FileRead,
	/// The storage backend refused the write, typically over quota.
	#[error("storage quota exceeded ({bytes} bytes)")]
	StorageQuota {
		/// Size of the rejected value.
		bytes: usize,
	},
	/// The stored value could not be read back.
	#[error("storage read failed: {message}")]
	StorageRead {
		/// Backend or parse failure text.
		message: String,
	},
	/// No storage backend is available in this environment.
	#[error("storage unavailable")]
	StorageUnavailable,
	/// A field name outside the closed field tables.
	#[error("unknown field `{0}`")]
	UnknownField(String),
	/// The export download could not be started.
	#[error("download failed: {message}")]
	Download {
		/// Host failure text.
		message: String,
	},
}

impl AppError {
	/// Build a [`AppError::Schema`] from any message.
	pub fn schema(message: impl Into<String>) -> Self {
		Self::Schema {
			message: message.into(),
		}
	}

	/// Build a [`AppError::StorageRead`] from any message.
	pub fn storage_read(message: impl Into<String>) -> Self {
		Self::StorageRead {
			message: message.into(),
		}
	}

	/// Short text shown in the UI.
	pub fn user_message(&self) -> String {
		match self {
			Self::Format(_) => "El archivo no es un JSON válido.".into(),
			Self::Schema { .. } => "El JSON no tiene el formato correcto.".into(),
			Self::NotJsonFile { .. } => "Por favor, subí un archivo .JSON válido.".into(),
			Self::FileRead => "Error al leer el archivo.".into(),
			Self::StorageQuota { .. } => {
				"No se pudo guardar en este navegador: los datos son demasiado grandes. \
				 Exportá el archivo para no perder los cambios."
					.into()
			}
			Self::StorageRead { .. } => "No se pudieron recuperar los datos guardados.".into(),
			Self::StorageUnavailable => {
				"Este navegador no permite guardar datos; los cambios se perderán al cerrar.".into()
			}
			Self::UnknownField(field) => format!("Campo desconocido: {field}"),
			Self::Download { .. } => "No se pudo descargar el archivo.".into(),
		}
	}
}

/// Result alias used across the crate.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
	fn from(value: serde_json::Error) -> Self {
		AppError::Format(value)
	}
}
