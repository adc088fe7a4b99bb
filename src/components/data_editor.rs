use leptos::prelude::*;
use web_sys::Event;

use crate::browser;
use crate::model::{EntityField, EntityId, GraphData, RelationshipField, WorkingCopy};

/// Kinds offered in the type selector, with their labels.
const KIND_OPTIONS: [(&str, &str); 6] = [
	("persona", "Persona"),
	("perro", "Perro"),
	("gato", "Gato"),
	("mascota", "Otra Mascota"),
	("animal", "Animal"),
	("otro", "Otro"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
	Entities,
	Relationships,
}

/// Modal editor over a working copy of `data`. Nothing reaches the caller
/// until "Guardar"; closing discards the copy.
#[component]
pub fn DataEditor(
	data: GraphData,
	on_save: Callback<GraphData>,
	on_close: Callback<()>,
) -> impl IntoView {
	let working = RwSignal::new(WorkingCopy::new(&data, browser::now_millis()));
	let tab = RwSignal::new(Tab::Entities);

	let save = move |_| on_save.run(working.get_untracked().save());
	let close = move |_| {
		working.get_untracked().cancel();
		on_close.run(());
	};

	view! {
		<div class="modal-backdrop">
			<div class="modal">
				<div class="modal-header">
					<h2>"Administrar Vínculos"</h2>
					<button class="icon-button" on:click=close>"×"</button>
				</div>

				<div class="tabs">
					<button
						class="tab"
						class:active=move || tab.get() == Tab::Entities
						on:click=move |_| tab.set(Tab::Entities)
					>
						"Personas y Mascotas ("
						{move || working.with(|w| w.entities().len())}
						")"
					</button>
					<button
						class="tab"
						class:active=move || tab.get() == Tab::Relationships
						on:click=move |_| tab.set(Tab::Relationships)
					>
						"Conexiones ("
						{move || working.with(|w| w.relationships().len())}
						")"
					</button>
				</div>

				<div class="modal-body">
					<Show
						when=move || tab.get() == Tab::Entities
						fallback=move || view! { <RelationshipList working=working /> }
					>
						<EntityList working=working />
					</Show>
				</div>

				<div class="modal-footer">
					<button class="button" on:click=close>"Cancelar"</button>
					<button class="button primary" on:click=save>"Guardar"</button>
				</div>
			</div>
		</div>
	}
}

#[component]
fn EntityList(working: RwSignal<WorkingCopy>) -> impl IntoView {
	view! {
		<div class="rows">
			<For
				each=move || {
					working.with(|w| w.entities().iter().map(|e| e.id.clone()).collect::<Vec<_>>())
				}
				key=|id| id.clone()
				let:id
			>
				<EntityRow working=working id=id />
			</For>
			<button
				class="add-row"
				on:click=move |_| {
					working.update(|w| {
						w.add_entity();
					})
				}
			>
				"+ Agregar Persona o Mascota"
			</button>
		</div>
	}
}

/// One entity's inputs. Rows are keyed by id, so inputs keep their own
/// state while typing and are only seeded from the working copy.
#[component]
fn EntityRow(working: RwSignal<WorkingCopy>, id: EntityId) -> impl IntoView {
	let initial = working.with_untracked(|w| w.entity(&id).cloned()).unwrap_or_default();
	let id = StoredValue::new(id);
	let update = move |field: EntityField| {
		move |ev: Event| {
			let value = event_target_value(&ev);
			working.update(|w| id.with_value(|id| w.update_entity(id, field, value)));
		}
	};
	let remove = move |_| working.update(|w| id.with_value(|id| w.remove_entity(id)));

	let kind = initial.kind.clone();
	let custom_kind = (!KIND_OPTIONS.iter().any(|(value, _)| *value == kind)).then(|| kind.clone());

	view! {
		<div class="row entity-row">
			<button class="icon-button remove" title="Eliminar" on:click=remove>"🗑"</button>
			<label>
				"Nombre"
				<input
					type="text"
					prop:value={EntityField::Name.read(&initial)}
					on:input={update(EntityField::Name)}
				/>
			</label>
			<label>
				"Tipo"
				<select on:change={update(EntityField::Kind)}>
					{KIND_OPTIONS
						.iter()
						.map(|(value, label)| {
							view! {
								<option value={*value} selected={*value == kind}>
									{*label}
								</option>
							}
						})
						.collect_view()}
					{custom_kind
						.map(|k| {
							view! {
								<option value={k.clone()} selected=true>
									{k.clone()}
								</option>
							}
						})}
				</select>
			</label>
			<label class="wide">
				"Descripción (Soporta Markdown)"
				<textarea
					rows=2
					prop:value={EntityField::Description.read(&initial)}
					on:input={update(EntityField::Description)}
				></textarea>
			</label>
			<label class="wide">
				"URL de la Foto"
				<input
					type="text"
					placeholder="https://..."
					prop:value={EntityField::Image.read(&initial)}
					on:input={update(EntityField::Image)}
				/>
			</label>
			<label class="wide">
				"Más fotos (una por línea)"
				<textarea
					rows=2
					prop:value={EntityField::Images.read(&initial)}
					on:input={update(EntityField::Images)}
				></textarea>
			</label>
		</div>
	}
}

#[component]
fn RelationshipList(working: RwSignal<WorkingCopy>) -> impl IntoView {
	view! {
		<div class="rows">
			<For
				each=move || 0..working.with(|w| w.relationships().len())
				key=|index| *index
				let:index
			>
				<RelationshipRow working=working index=index />
			</For>
			<button
				class="add-row"
				prop:disabled=move || working.with(|w| w.entities().len() < 2)
				on:click=move |_| {
					working.update(|w| {
						w.add_relationship();
					})
				}
			>
				"+ Agregar Conexión"
			</button>
		</div>
	}
}

/// One relationship's inputs. Rows are keyed by position, so every value
/// is read back from the working copy and follows removals above it.
#[component]
fn RelationshipRow(working: RwSignal<WorkingCopy>, index: usize) -> impl IntoView {
	let current = move |field: RelationshipField| {
		working.with(|w| w.relationship(index).map(|r| field.read(r)).unwrap_or_default())
	};
	let update = move |field: RelationshipField| {
		move |ev: Event| {
			let value = event_target_value(&ev);
			working.update(|w| w.update_relationship(index, field, value));
		}
	};
	let endpoint_options = move |field: RelationshipField| {
		move || {
			let selected = current(field);
			working.with(|w| {
				let known = w.entity(&selected).is_some();
				let unassigned = (!known).then(|| {
					view! {
						<option value="" disabled=true selected=true>
							"(sin asignar)"
						</option>
					}
				});
				let entities = w
					.entities()
					.iter()
					.map(|e| {
						view! {
							<option value={e.id.clone()} selected={e.id == selected}>
								{e.name.clone()}
							</option>
						}
					})
					.collect_view();
				(unassigned, entities)
			})
		}
	};

	view! {
		<div class="row relationship-row">
			<select on:change={update(RelationshipField::Source)}>
				{endpoint_options(RelationshipField::Source)}
			</select>
			<input
				type="text"
				class="relation"
				prop:value=move || current(RelationshipField::Relation)
				on:input={update(RelationshipField::Relation)}
			/>
			<span class="arrow">"→"</span>
			<select on:change={update(RelationshipField::Target)}>
				{endpoint_options(RelationshipField::Target)}
			</select>
			<button
				class="icon-button remove"
				title="Eliminar"
				on:click=move |_| working.update(|w| w.remove_relationship(index))
			>
				"🗑"
			</button>
		</div>
	}
}
