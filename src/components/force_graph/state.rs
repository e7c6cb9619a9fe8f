//! Graph engine state and frame sequencing.
//!
//! Owns the force simulation, the interaction controller and the persistent
//! view transform. The host calls [`ForceGraphState::frame`] once per
//! animation frame, which ticks the simulation and then draws the positions
//! that tick produced. A frame with no tick, no view change and no hover
//! change draws nothing.

use log::debug;
use web_sys::CanvasRenderingContext2d;

use super::interaction::{HoverChange, InteractionConfig, InteractionController, NodeActivation};
use super::model::{SimNode, WorkingGraph};
use super::render::{self, Frame};
use super::scale::ScaleConfig;
use super::simulation::{Simulation, SimulationConfig};
use super::theme::Theme;
use super::types::GraphData;
use super::viewport::{ScaleExtent, ScreenPoint, SimPoint, ViewTransform};

/// Every tunable the engine carries, with the dashboard defaults.
#[derive(Clone, Debug, Default)]
pub struct GraphSettings {
	/// Force and cooling parameters.
	pub simulation: SimulationConfig,
	/// Zoom-dependent sizes and the hover radius.
	pub scale: ScaleConfig,
	/// Allowed zoom range.
	pub extent: ScaleExtent,
	/// Palette.
	pub theme: Theme,
	/// Tooltip geometry and click thresholds.
	pub interaction: InteractionConfig,
}

/// Core graph state combining the simulation with view and interaction state.
///
/// Created once when the component mounts, then mutated by the animation
/// loop and the pointer handlers.
pub struct ForceGraphState {
	sim: Simulation,
	interaction: InteractionController,
	transform: ViewTransform,
	settings: GraphSettings,
	width: f64,
	height: f64,
	pixel_ratio: f64,
	needs_redraw: bool,
}

impl ForceGraphState {
	/// State with the default settings, laid out around the viewport center.
	pub fn new(data: &GraphData, width: f64, height: f64, pixel_ratio: f64) -> Self {
		Self::with_settings(data, width, height, pixel_ratio, GraphSettings::default())
	}

	/// State with explicit settings.
	pub fn with_settings(
		data: &GraphData,
		width: f64,
		height: f64,
		pixel_ratio: f64,
		settings: GraphSettings,
	) -> Self {
		let center = SimPoint::new(width / 2.0, height / 2.0);
		let sim = Simulation::new(
			WorkingGraph::build(data),
			settings.simulation.clone(),
			center,
		);
		Self {
			sim,
			interaction: InteractionController::new(
				settings.interaction.clone(),
				settings.scale.clone(),
			),
			transform: ViewTransform::identity(settings.extent),
			settings,
			width,
			height,
			pixel_ratio,
			needs_redraw: true,
		}
	}

	/// Replace the dataset. The running simulation is stopped first; the view
	/// transform survives the reload.
	pub fn load(&mut self, data: &GraphData) {
		self.sim.stop();
		let graph = WorkingGraph::build(data);
		debug!(
			"nebula-graph: reloading with {} nodes, {} links",
			graph.nodes().len(),
			graph.links().len()
		);
		self.sim = Simulation::new(graph, self.settings.simulation.clone(), self.center());
		self.interaction.reset();
		self.needs_redraw = true;
	}

	/// One simulation tick. `true` when positions changed.
	pub fn advance(&mut self) -> bool {
		let ticked = self.sim.tick();
		self.needs_redraw |= ticked;
		ticked
	}

	/// Draw the positions left by the most recent tick.
	pub fn render(&self, ctx: &CanvasRenderingContext2d) {
		let frame = Frame {
			nodes: self.sim.nodes(),
			links: self.sim.links(),
			transform: &self.transform,
			highlighted: self.interaction.hovered(),
			width: self.width,
			height: self.height,
			pixel_ratio: self.pixel_ratio,
		};
		render::render(ctx, &frame, &self.settings.scale, &self.settings.theme);
	}

	/// Tick, then draw if anything visible changed. `true` when it drew.
	pub fn frame(&mut self, ctx: &CanvasRenderingContext2d) -> bool {
		self.advance();
		if !self.take_redraw() {
			return false;
		}
		self.render(ctx);
		true
	}

	/// Whether the next frame has something new to draw.
	pub fn needs_redraw(&self) -> bool {
		self.needs_redraw
	}

	fn take_redraw(&mut self) -> bool {
		std::mem::replace(&mut self.needs_redraw, false)
	}

	/// New viewport size in CSS pixels. Later loads are laid out around the
	/// new center.
	pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) {
		self.width = width;
		self.height = height;
		self.pixel_ratio = pixel_ratio;
		self.sim.set_center(self.center());
		self.needs_redraw = true;
	}

	/// Pointer moved over the canvas: hover, drag or pan.
	pub fn pointer_move(&mut self, screen: ScreenPoint) -> HoverChange {
		let before = self.transform;
		let change = self
			.interaction
			.pointer_move(screen, &mut self.sim, &mut self.transform);
		if self.transform != before || matches!(change, HoverChange::Entered(_) | HoverChange::Left)
		{
			self.needs_redraw = true;
		}
		change
	}

	/// Button pressed at `screen`.
	pub fn pointer_down(&mut self, screen: ScreenPoint) {
		self.interaction
			.pointer_down(screen, &mut self.sim, &self.transform);
	}

	/// Button released.
	pub fn pointer_up(&mut self) {
		self.interaction.pointer_up(&mut self.sim);
	}

	/// Pointer left the canvas.
	pub fn pointer_leave(&mut self) -> HoverChange {
		let change = self.interaction.pointer_leave(&mut self.sim);
		if change == HoverChange::Left {
			self.needs_redraw = true;
		}
		change
	}

	/// Click release. Emits an activation for a hovered item.
	pub fn click(&mut self) -> Option<NodeActivation> {
		self.interaction.click(&self.sim)
	}

	/// Wheel zoom about `anchor`.
	pub fn wheel(&mut self, anchor: ScreenPoint, delta_y: f64, delta_mode: u32) {
		let before = self.transform;
		self.interaction
			.wheel(&mut self.transform, anchor, delta_y, delta_mode);
		self.needs_redraw |= self.transform != before;
	}

	/// Double-click zoom in about `anchor`.
	pub fn double_click(&mut self, anchor: ScreenPoint) {
		let before = self.transform;
		self.interaction.double_click(&mut self.transform, anchor);
		self.needs_redraw |= self.transform != before;
	}

	/// Hovered node and the clamped top-left corner of its tooltip panel.
	pub fn tooltip(&self) -> Option<(&SimNode, ScreenPoint)> {
		let tip = self.interaction.tooltip()?;
		let node = self.sim.node(tip.node)?;
		let anchor = tip.anchor((self.width, self.height), self.interaction.config());
		Some((node, anchor))
	}

	/// Whether the hovered node opens on click.
	pub fn hovering_activatable(&self) -> bool {
		self.interaction.hovering_activatable(&self.sim)
	}

	/// CSS cursor for the canvas.
	pub fn cursor(&self) -> &'static str {
		if self.interaction.is_dragging() || self.interaction.is_panning() {
			"grabbing"
		} else if self.hovering_activatable() {
			"pointer"
		} else {
			"grab"
		}
	}

	/// The running simulation.
	pub fn simulation(&self) -> &Simulation {
		&self.sim
	}

	/// Current view transform.
	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	/// Viewport size in CSS pixels.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn center(&self) -> SimPoint {
		SimPoint::new(self.width / 2.0, self.height / 2.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::SimPhase;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn data(items: usize) -> GraphData {
		let mut nodes = vec![GraphNode {
			id: "CAT_misc".into(),
			group: Some("category".into()),
			..Default::default()
		}];
		let mut links = Vec::new();
		for i in 0..items {
			nodes.push(GraphNode {
				id: format!("item{i}"),
				group: Some("image".into()),
				..Default::default()
			});
			links.push(GraphLink {
				source: format!("item{i}"),
				target: "CAT_misc".into(),
				is_category_link: true,
			});
		}
		GraphData { nodes, links }
	}

	fn hover_first_item(state: &mut ForceGraphState) -> ScreenPoint {
		let p = state.transform().to_screen(state.simulation().nodes()[1].position());
		assert_eq!(state.pointer_move(p), HoverChange::Entered(1));
		p
	}

	#[test]
	fn advance_reports_ticks_until_settled() {
		let mut state = ForceGraphState::new(&data(5), 800.0, 600.0, 1.0);
		let mut ticks = 0;
		while state.advance() {
			ticks += 1;
			assert!(ticks < 1000);
		}
		assert!(ticks > 0);
		assert_eq!(state.simulation().phase(), SimPhase::Settling);
		assert!(!state.advance());
	}

	#[test]
	fn reload_keeps_transform_and_clears_hover() {
		let mut state = ForceGraphState::new(&data(5), 800.0, 600.0, 1.0);
		for _ in 0..20 {
			state.advance();
		}
		state.wheel(ScreenPoint::new(400.0, 300.0), -200.0, 0);
		let transform = *state.transform();
		hover_first_item(&mut state);
		assert!(state.tooltip().is_some());

		state.load(&data(3));

		assert_eq!(*state.transform(), transform);
		assert!(state.tooltip().is_none());
		assert_eq!(state.simulation().nodes().len(), 4);
		assert_eq!(state.simulation().phase(), SimPhase::Idle);
	}

	#[test]
	fn hover_pauses_until_pointer_leaves() {
		let mut state = ForceGraphState::new(&data(5), 800.0, 600.0, 1.0);
		state.advance();
		hover_first_item(&mut state);
		assert!(!state.advance());
		assert!(state.hovering_activatable());
		assert_eq!(state.cursor(), "pointer");

		assert_eq!(state.pointer_leave(), HoverChange::Left);
		assert_eq!(state.cursor(), "grab");
		assert!(state.advance());
	}

	#[test]
	fn click_on_hovered_item_activates() {
		let mut state = ForceGraphState::new(&data(2), 800.0, 600.0, 1.0);
		state.advance();
		let p = hover_first_item(&mut state);
		state.pointer_down(p);
		state.pointer_up();
		let activation = state.click().unwrap();
		assert_eq!(activation.id, "item0");
	}

	#[test]
	fn resize_moves_layout_center_for_later_loads() {
		let mut state = ForceGraphState::new(&GraphData::default(), 800.0, 600.0, 1.0);
		state.resize(400.0, 200.0, 2.0);
		assert_eq!(state.size(), (400.0, 200.0));

		state.load(&data(0));
		let hub = state.simulation().nodes()[0].position();
		assert!(hub.distance(SimPoint::new(200.0, 100.0)) < 10.0);
	}

	#[test]
	fn settled_graph_stops_requesting_redraws() {
		let mut state = ForceGraphState::new(&data(5), 800.0, 600.0, 1.0);
		assert!(state.take_redraw());
		while state.advance() {
			assert!(state.take_redraw());
		}
		assert!(!state.advance());
		assert!(!state.needs_redraw());

		state.pointer_move(ScreenPoint::new(-500.0, -500.0));
		assert!(!state.needs_redraw());

		state.wheel(ScreenPoint::new(400.0, 300.0), -100.0, 0);
		assert!(state.take_redraw());

		hover_first_item(&mut state);
		assert!(state.take_redraw());
		assert_eq!(state.pointer_leave(), HoverChange::Left);
		assert!(state.take_redraw());

		state.resize(640.0, 480.0, 2.0);
		assert!(state.take_redraw());
	}

	#[test]
	fn tooltip_anchor_is_clamped_to_viewport() {
		let mut state = ForceGraphState::new(&data(5), 800.0, 600.0, 1.0);
		hover_first_item(&mut state);
		let (node, anchor) = state.tooltip().unwrap();
		assert_eq!(node.id(), "item0");
		assert!(anchor.x <= 800.0 - 320.0);
		assert!(anchor.y <= 600.0 - 350.0);
	}
}
