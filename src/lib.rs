//! nebula-graph: interactive force-directed knowledge graph explorer.
//!
//! This crate provides a WASM-based graph visualization that renders items and
//! the categories connecting them with a physics-based layout, pan/zoom, hover
//! inspection and click-to-open media.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	DEFAULT_MEDIA_ENDPOINT, ForceGraphCanvas, GraphData, GraphLink, GraphNode, NodeActivation,
	PayloadError, media_url, parse_payload,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("nebula-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Result<GraphData, PayloadError> {
	let script = web_sys::window()
		.and_then(|window: Window| window.document())
		.and_then(|document| document.get_element_by_id("graph-data"))
		.and_then(|element| element.dyn_into::<HtmlScriptElement>().ok())
		.ok_or(PayloadError::Missing)?;
	let json_text = script.text().map_err(|_| PayloadError::Missing)?;

	let data = parse_payload(&json_text)?;
	info!(
		"nebula-graph: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}

/// Open the media behind an activated node in a new tab.
fn open_media(activation: &NodeActivation) {
	let Some(path) = activation.payload.filepath.as_deref() else {
		return;
	};
	let url = media_url(DEFAULT_MEDIA_ENDPOINT, path, None);
	match web_sys::window().map(|w| w.open_with_url_and_target(&url, "_blank")) {
		Some(Ok(_)) => info!("nebula-graph: opened {}", activation.name),
		_ => warn!("nebula-graph: could not open {url}"),
	}
}

/// Main application component.
/// Loads graph data from DOM and renders the force-directed visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|e| {
		warn!("nebula-graph: {e}");
		GraphData::default()
	});
	let categories = graph_data.nodes.iter().filter(|n| n.is_category()).count();
	let items = graph_data.nodes.len() - categories;
	let links = graph_data.links.len();
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Knowledge Nebula" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas
				data=graph_signal
				fullscreen=true
				on_activate=Callback::new(move |activation: NodeActivation| open_media(&activation))
			/>
			<div class="graph-overlay">
				<h1>"Knowledge Nebula"</h1>
				<p class="subtitle">
					{format!("{items} items, {categories} categories, {links} links")}
				</p>
				<p class="subtitle">"Hover to inspect. Click an item to open it. Scroll to zoom. Drag to pan."</p>
			</div>
		</div>
	}
}
