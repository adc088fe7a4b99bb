use leptos::prelude::*;
use pulldown_cmark::{Event, Options, Parser, html};

use crate::model::projector::resolve_image;
use crate::model::{Entity, NodeClass, classify};

/// Render a markdown description to HTML. Raw HTML in the source is
/// emitted as escaped text.
fn render_description(text: &str) -> String {
	let events = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
		Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
		other => other,
	});
	let mut out = String::with_capacity(text.len() * 3 / 2);
	html::push_html(&mut out, events);
	out
}

/// Side panel for the clicked entity.
#[component]
pub fn NodeDetails(entity: Entity, on_close: Callback<()>) -> impl IntoView {
	let broken = RwSignal::new(false);
	let icon = match classify(&entity.kind) {
		NodeClass::Animal => "🐾",
		NodeClass::Person => "👤",
	};
	let image = resolve_image(&entity);
	let alt = entity.name.clone();
	let description = render_description(entity.description.as_deref().unwrap_or_default());

	view! {
		<aside class="node-details">
			<div class="node-details-header">
				<h3>"Detalles del vínculo"</h3>
				<button class="icon-button" on:click=move |_| on_close.run(())>"×"</button>
			</div>
			<div class="node-details-body">
				<div class="avatar">
					{match image {
						Some(src) => {
							view! {
								<Show
									when=move || !broken.get()
									fallback=move || view! { <span class="avatar-icon">{icon}</span> }
								>
									<img
										src={src.clone()}
										alt={alt.clone()}
										on:error=move |_| broken.set(true)
									/>
								</Show>
							}
								.into_any()
						}
						None => view! { <span class="avatar-icon">{icon}</span> }.into_any(),
					}}
				</div>
				<h2>{entity.name.clone()}</h2>
				<span class="badge">{entity.kind.clone()}</span>
				<div class="description" inner_html=description></div>
			</div>
		</aside>
	}
}
