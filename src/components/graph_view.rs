use leptos::prelude::*;

use super::graph_canvas::GraphCanvas;
use super::node_details::NodeDetails;
use crate::model::{GraphData, project};

/// Search box, canvas and detail panel for the current graph.
#[component]
pub fn GraphView(#[prop(into)] data: Signal<GraphData>) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let selected = RwSignal::new(None::<String>);
	let projection = Memo::new(move |_| data.with(project));

	let on_node_click = Callback::new(move |id: String| selected.set(Some(id)));
	let on_close = Callback::new(move |_: ()| selected.set(None));
	let selected_entity = move || {
		let id = selected.get()?;
		data.with(|d| d.entity(&id).cloned())
	};

	view! {
		<div class="graph-view">
			<div class="search-box">
				<span class="search-icon">"🔍"</span>
				<input
					type="text"
					placeholder="Buscar vínculo..."
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
				/>
			</div>

			<GraphCanvas projection=projection query=query on_node_click=on_node_click />

			{move || {
				selected_entity()
					.map(|entity| view! { <NodeDetails entity=entity on_close=on_close /> })
			}}
		</div>
	}
}
