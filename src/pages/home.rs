use leptos::prelude::*;
use log::{info, warn};

use crate::browser;
use crate::components::data_editor::DataEditor;
use crate::components::file_uploader::FileUploader;
use crate::components::graph_view::GraphView;
use crate::error::AppError;
use crate::model::{GraphData, Session, codec};

/// The storage session, shared with pages through the reactive context.
#[derive(Clone, Copy)]
pub struct SessionContext {
	session: StoredValue<Session, LocalStorage>,
	problem: StoredValue<Option<String>>,
}

impl SessionContext {
	/// Wrap `session`; `problem` is whatever went wrong while opening it.
	pub fn new(session: Session, problem: Option<AppError>) -> Self {
		Self {
			session: StoredValue::new_local(session),
			problem: StoredValue::new(problem.map(|e| e.user_message())),
		}
	}

	/// The snapshot persisted by an earlier visit, if any.
	pub fn load(&self) -> Option<GraphData> {
		self.session.with_value(Session::load)
	}

	/// Persist `data`, returning the message to show when that fails.
	pub fn store(&self, data: &GraphData) -> Option<String> {
		self.session
			.with_value(|s| s.store(data))
			.err()
			.map(|e| e.user_message())
	}

	/// Forget the persisted snapshot.
	pub fn clear(&self) {
		if let Err(e) = self.session.with_value(Session::clear) {
			warn!("clearing storage failed: {e}");
		}
	}

	/// Message describing a problem met while opening storage.
	pub fn problem(&self) -> Option<String> {
		self.problem.get_value()
	}
}

/// Owns the current graph: loads it from storage, mirrors every change
/// back, and switches between the upload screen and the graph.
#[component]
pub fn Home() -> impl IntoView {
	let session = expect_context::<SessionContext>();
	let data = RwSignal::new(session.load());
	let notice = RwSignal::new(session.problem());
	let editing = RwSignal::new(false);

	// Replace the snapshot; a failed store only warns.
	let commit = move |next: GraphData| {
		let dangling = next.dangling_relationships().count();
		if dangling > 0 {
			warn!("{dangling} relationship(s) point at missing entities");
		}
		if let Some(msg) = session.store(&next) {
			notice.set(Some(msg));
		}
		data.set(Some(next));
	};

	let on_loaded = Callback::new(move |loaded: GraphData| commit(loaded));
	let on_start_empty = Callback::new(move |_: ()| {
		info!("starting an empty family");
		commit(GraphData::default());
		editing.set(true);
	});
	let on_save = Callback::new(move |saved: GraphData| {
		commit(saved);
		editing.set(false);
	});
	let on_close = Callback::new(move |_: ()| editing.set(false));

	let export = move |_| {
		let Some(current) = data.get_untracked() else {
			return;
		};
		let result = codec::serialize(&current)
			.and_then(|text| browser::download_json(codec::EXPORT_FILE_NAME, &text));
		if let Err(e) = result {
			warn!("export failed: {e}");
			notice.set(Some(e.user_message()));
		}
	};

	let reset = move |_| {
		editing.set(false);
		data.set(None);
		session.clear();
	};

	let has_data = move || data.with(Option::is_some);

	view! {
		<main class="home">
			<header class="app-header">
				<div class="brand">
					<span class="brand-heart">"♥"</span>
					<div>
						<h1>"BackHome"</h1>
						<p class="tagline">"Recordar es volver a casa"</p>
					</div>
				</div>
				<Show when=has_data>
					<div class="header-actions">
						<button class="button" on:click=move |_| editing.set(true)>
							"Editar"
						</button>
						<button class="button" on:click=export>
							"Exportar"
						</button>
						<button class="button" on:click=reset>
							"Cargar otro"
						</button>
					</div>
				</Show>
			</header>

			{move || {
				notice
					.get()
					.map(|msg| {
						view! {
							<div class="notice" role="alert">
								<span>{msg}</span>
								<button class="icon-button" on:click=move |_| notice.set(None)>
									"×"
								</button>
							</div>
						}
					})
			}}

			<section class="stage">
				<Show
					when=has_data
					fallback=move || {
						view! {
							<div class="welcome">
								<h2>"Tus vínculos en un solo lugar"</h2>
								<p>
									"Cargá tu archivo de vínculos para empezar a recordar. Cada persona y cada mascota tienen un lugar especial en nuestra historia."
								</p>
								<FileUploader on_loaded=on_loaded on_start_empty=on_start_empty />
							</div>
						}
					}
				>
					<GraphView data=Signal::derive(move || data.get().unwrap_or_default()) />
				</Show>
			</section>

			<Show when=move || editing.get()>
				<DataEditor
					data=data.get_untracked().unwrap_or_default()
					on_save=on_save
					on_close=on_close
				/>
			</Show>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{Entity, MemoryStore};

	fn one_person() -> GraphData {
		GraphData {
			entities: vec![Entity {
				id: "1".into(),
				name: "Ana".into(),
				kind: "persona".into(),
				..Default::default()
			}],
			relationships: vec![],
		}
	}

	#[test]
	fn context_session_stores_loads_and_clears() {
		let owner = Owner::new();
		owner.with(|| {
			provide_context(SessionContext::new(
				Session::new(Box::new(MemoryStore::new()), "test"),
				None,
			));
			let session = expect_context::<SessionContext>();
			assert_eq!(session.load(), None);
			assert_eq!(session.store(&one_person()), None);
			assert_eq!(session.load(), Some(one_person()));
			session.clear();
			assert_eq!(session.load(), None);
			assert_eq!(session.problem(), None);
		});
	}

	#[test]
	fn context_session_reports_store_and_open_problems() {
		let owner = Owner::new();
		owner.with(|| {
			let session = SessionContext::new(
				Session::new(Box::new(MemoryStore::with_quota(8)), "test"),
				Some(AppError::StorageUnavailable),
			);
			assert_eq!(
				session.problem(),
				Some(AppError::StorageUnavailable.user_message())
			);
			let msg = session.store(&one_person());
			assert_eq!(msg, Some(AppError::StorageQuota { bytes: 0 }.user_message()));
			assert_eq!(session.load(), None);
		});
	}
}
