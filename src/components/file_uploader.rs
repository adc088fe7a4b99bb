use leptos::prelude::*;
use log::{info, warn};
use web_sys::{DragEvent, File, HtmlInputElement};

use crate::browser;
use crate::model::{GraphData, codec};

/// Drop zone and file picker for a `.json` document.
#[component]
pub fn FileUploader(
	on_loaded: Callback<GraphData>,
	on_start_empty: Callback<()>,
) -> impl IntoView {
	let hovering = RwSignal::new(false);
	let error = RwSignal::new(None::<String>);

	let handle_file = move |file: Option<File>| {
		let Some(file) = file else {
			return;
		};
		error.set(None);
		let name = file.name();
		if let Err(e) = codec::check_file_name(&name) {
			warn!("rejected upload: {e}");
			error.set(Some(e.user_message()));
			return;
		}
		let started = browser::read_file_text(&file, move |text| {
			match text.and_then(|t| codec::parse(&t)) {
				Ok(data) => {
					info!(
						"loaded {name}: {} entities, {} relationships",
						data.entities.len(),
						data.relationships.len()
					);
					on_loaded.run(data);
				}
				Err(e) => {
					warn!("could not load {name}: {e}");
					error.set(Some(e.user_message()));
				}
			}
		});
		if let Err(e) = started {
			error.set(Some(e.user_message()));
		}
	};

	view! {
		<div class="uploader">
			<div
				class="drop-zone"
				class:hovering=move || hovering.get()
				on:dragover=move |ev: DragEvent| {
					ev.prevent_default();
					hovering.set(true);
				}
				on:dragleave=move |_| hovering.set(false)
				on:drop=move |ev: DragEvent| {
					ev.prevent_default();
					hovering.set(false);
					handle_file(ev.data_transfer().and_then(|dt| dt.files()).and_then(|f| f.get(0)));
				}
			>
				<input
					type="file"
					accept=".json"
					class="file-input"
					on:change=move |ev| {
						let input: HtmlInputElement = event_target(&ev);
						handle_file(input.files().and_then(|f| f.get(0)));
					}
				/>
				<div class="drop-icon">"⇪"</div>
				<h3>"Cargar mis vínculos"</h3>
				<p>
					"Arrastrá el archivo con tus familiares y afectos o hacé clic acá para buscarlo en tu dispositivo."
				</p>
				<span class="button primary">"Seleccionar Archivo"</span>
			</div>

			{move || error.get().map(|msg| view! { <div class="upload-error">{msg}</div> })}

			<button class="link-button" on:click=move |_| on_start_empty.run(())>
				"Empezar una familia desde cero"
			</button>
		</div>
	}
}
