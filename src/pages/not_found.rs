use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Página no encontrada"</h1>
			<a href="/">"Volver al inicio"</a>
		</div>
	}
}
