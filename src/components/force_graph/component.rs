//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for hovering, node dragging, panning and zooming. An animation loop
//! runs via `requestAnimationFrame`, ticking the simulation and redrawing when
//! something changed, until the component is unmounted; the first frame after
//! unmount releases the loop. A tooltip overlay follows the hovered node.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::interaction::{HoverChange, NodeActivation};
use super::model::SimNode;
use super::state::ForceGraphState;
use super::types::GraphData;
use super::viewport::ScreenPoint;

/// Media endpoint used when the host does not configure one.
pub const DEFAULT_MEDIA_ENDPOINT: &str = "/api/image";

/// Width requested for tooltip previews.
const PREVIEW_WIDTH: u32 = 350;

/// URL of a media resource: `<endpoint>?path=<encoded path>[&w=<width>]`.
pub fn media_url(endpoint: &str, filepath: &str, width: Option<u32>) -> String {
	let path = String::from(js_sys::encode_uri_component(filepath));
	match width {
		Some(w) => format!("{endpoint}?path={path}&w={w}"),
		None => format!("{endpoint}?path={path}"),
	}
}

/// What the tooltip overlay shows for the hovered node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipView {
	/// Display name.
	pub name: String,
	/// Preview URL, absent for nodes without media.
	pub image: Option<String>,
	/// Trimmed tags, or `Uncategorized`.
	pub tags: Vec<String>,
	/// Description, when non-empty.
	pub description: Option<String>,
	/// Left edge in CSS pixels, already clamped to the canvas.
	pub left: f64,
	/// Top edge in CSS pixels, already clamped to the canvas.
	pub top: f64,
}

impl TooltipView {
	/// Build the overlay content. `image` is the preview URL, if the node has one.
	pub fn new(node: &SimNode, anchor: ScreenPoint, image: Option<String>) -> Self {
		let payload = node.payload();
		let mut tags: Vec<String> = payload
			.tags
			.as_deref()
			.unwrap_or_default()
			.split(',')
			.map(str::trim)
			.filter(|tag| !tag.is_empty())
			.map(str::to_owned)
			.collect();
		if tags.is_empty() {
			tags.push("Uncategorized".to_owned());
		}
		Self {
			name: node.name().to_owned(),
			image,
			tags,
			description: payload.description.clone().filter(|d| !d.is_empty()),
			left: anchor.x,
			top: anchor.y,
		}
	}
}

/// Canvas size in CSS pixels for the current layout mode.
fn viewport_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let dimension = |value: Result<JsValue, JsValue>, fallback| {
			value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		return (
			dimension(window.inner_width(), 800.0),
			dimension(window.inner_height(), 600.0),
		);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

/// Backing-store pixels for a CSS size at the given device pixel ratio.
fn backing_size(width: f64, height: f64, dpr: f64) -> (u32, u32) {
	let px = |css: f64| (css * dpr).round().max(0.0) as u32;
	(px(width), px(height))
}

/// Size the backing store at `css × dpr` and pin the CSS size.
fn size_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64, dpr: f64) {
	let (bw, bh) = backing_size(width, height, dpr);
	canvas.set_width(bw);
	canvas.set_height(bh);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{width}px"));
	let _ = style.set_property("height", &format!("{height}px"));
}

fn pixel_ratio(window: &Window) -> f64 {
	let dpr = window.device_pixel_ratio();
	if dpr.is_finite() && dpr > 0.0 {
		dpr
	} else {
		1.0
	}
}

/// Pointer position relative to the canvas.
fn pointer(ev: &MouseEvent, canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<ScreenPoint> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(ScreenPoint::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal; every change reloads the
/// layout while keeping the current pan and zoom. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing.
///
/// Clicking an item node calls `on_activate`. Tooltip previews are loaded
/// from `media_endpoint`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_activate: Option<Callback<NodeActivation>>,
	#[prop(into, default = DEFAULT_MEDIA_ENDPOINT.to_owned())] media_endpoint: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let tooltip = RwSignal::new(None::<TooltipView>);
	let cursor = RwSignal::new("grab");
	let detached = StoredValue::new(false);

	on_cleanup(move || {
		debug!("nebula-graph: canvas detached");
		detached.set_value(true);
	});

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("nebula-graph: no window, graph disabled");
			return;
		};

		let (w, h) = viewport_size(&canvas, &window, fullscreen, width, height);
		let dpr = pixel_ratio(&window);
		size_canvas(&canvas, w, h, dpr);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("nebula-graph: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("nebula-graph: canvas has no 2d context");
				return;
			}
		};

		*state_init.borrow_mut() = Some(ForceGraphState::new(&data.get_untracked(), w, h, dpr));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			let handle = window_event_listener(ev::resize, move |_| {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&canvas_resize, &win, true, None, None);
				let dpr = pixel_ratio(&win);
				size_canvas(&canvas_resize, nw, nh, dpr);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh, dpr);
				}
			});
			on_cleanup(move || handle.remove());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if detached.try_get_value().unwrap_or(true) {
				// Break the closure's self-reference so it and the state it holds are freed.
				let _ = animate_inner.borrow_mut().take();
				let _ = state_anim.borrow_mut().take();
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.frame(&ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_data = state.clone();
	Effect::new(move |previous: Option<()>| {
		let graph = data.get();
		if previous.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.load(&graph);
		}
		tooltip.set(None);
		cursor.set("grab");
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(p) = pointer(&ev, canvas_ref) else {
			return;
		};
		let mut guard = state_mm.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		match s.pointer_move(p) {
			HoverChange::Entered(_) => {
				tooltip.set(s.tooltip().map(|(node, anchor)| {
					let image = node
						.payload()
						.filepath
						.as_deref()
						.map(|path| media_url(&media_endpoint, path, Some(PREVIEW_WIDTH)));
					TooltipView::new(node, anchor, image)
				}));
			}
			HoverChange::Moved => {
				if let Some((_, anchor)) = s.tooltip() {
					tooltip.update(|tip| {
						if let Some(tip) = tip {
							tip.left = anchor.x;
							tip.top = anchor.y;
						}
					});
				}
			}
			HoverChange::Left => tooltip.set(None),
			HoverChange::Unchanged => {}
		}
		cursor.set(s.cursor());
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(p) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(p);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
			cursor.set(s.cursor());
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
			cursor.set(s.cursor());
		}
		tooltip.set(None);
	};

	let state_ck = state.clone();
	let on_click = move |_: MouseEvent| {
		let activation = state_ck.borrow_mut().as_mut().and_then(ForceGraphState::click);
		if let (Some(activation), Some(cb)) = (activation, on_activate) {
			debug!("nebula-graph: activated {}", activation.id);
			cb.run(activation);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(p) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.double_click(p);
		}
	};

	let state_wh = state;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(p) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(p, ev.delta_y(), ev.delta_mode());
		}
	};

	view! {
		<div class="force-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousemove=on_mousemove
				on:mousedown=on_mousedown
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				style=move || format!("display: block; cursor: {};", cursor.get())
			/>
			{move || {
				tooltip
					.get()
					.map(|tip| {
						view! {
							<div
								class="graph-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; width: 320px; max-height: 350px; pointer-events: none;",
									tip.left,
									tip.top,
								)
							>
								<h3 class="graph-tooltip-title">{tip.name}</h3>
								{tip
									.image
									.map(|src| view! { <img class="graph-tooltip-preview" src=src alt="" /> })}
								<div class="graph-tooltip-tags">
									{tip
										.tags
										.into_iter()
										.map(|tag| view! { <span class="graph-tooltip-tag">{tag}</span> })
										.collect_view()}
								</div>
								{tip
									.description
									.map(|text| view! { <p class="graph-tooltip-description">{text}</p> })}
							</div>
						}
					})
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::model::WorkingGraph;
	use crate::components::force_graph::types::{GraphData, GraphNode};

	fn node(tags: Option<&str>, description: Option<&str>) -> SimNode {
		let graph = WorkingGraph::build(&GraphData {
			nodes: vec![GraphNode {
				id: "a1".into(),
				name: Some("sunset.jpg".into()),
				tags: tags.map(Into::into),
				description: description.map(Into::into),
				..Default::default()
			}],
			links: vec![],
		});
		graph.nodes()[0].clone()
	}

	#[test]
	fn tooltip_splits_tags_on_commas() {
		let tip = TooltipView::new(
			&node(Some("sky, beach,,  orange "), Some("Evening at the pier")),
			ScreenPoint::new(10.0, 20.0),
			None,
		);
		assert_eq!(tip.name, "sunset.jpg");
		assert_eq!(tip.tags, vec!["sky", "beach", "orange"]);
		assert_eq!(tip.description.as_deref(), Some("Evening at the pier"));
		assert_eq!((tip.left, tip.top), (10.0, 20.0));
	}

	#[test]
	fn tooltip_without_tags_is_uncategorized() {
		let tip = TooltipView::new(&node(None, Some("")), ScreenPoint::new(0.0, 0.0), None);
		assert_eq!(tip.tags, vec!["Uncategorized"]);
		assert_eq!(tip.description, None);
	}

	#[test]
	fn backing_store_is_css_size_times_pixel_ratio() {
		assert_eq!(backing_size(800.0, 600.0, 1.0), (800, 600));
		assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
		assert_eq!(backing_size(333.0, 101.0, 1.5), (500, 152));
		assert_eq!(backing_size(0.0, 0.0, 3.0), (0, 0));
	}
}
