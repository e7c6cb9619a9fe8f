//! Pointer interaction: hover picking, node dragging, panning and activation.
//!
//! The controller turns typed pointer input into state changes on the
//! simulation and the view transform. It never writes node positions itself;
//! dragging goes through [`Simulation::pin`].

use log::debug;

use super::model::{NodePayload, SimNode};
use super::scale::{ScaleBehavior, ScaleConfig};
use super::simulation::Simulation;
use super::viewport::{ScreenPoint, ViewTransform, ZoomGesture};

/// Tunables for pointer handling and the tooltip overlay.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
	/// Distance between the pointer and the tooltip's top-left corner.
	pub tooltip_offset: f64,
	/// Tooltip panel width in CSS pixels.
	pub panel_width: f64,
	/// Tooltip panel height in CSS pixels.
	pub panel_height: f64,
	/// Pointer travel (pixels) after which a press becomes a drag or pan.
	pub click_slop: f64,
	/// Scale factor applied by a double click.
	pub double_click_factor: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			tooltip_offset: 15.0,
			panel_width: 320.0,
			panel_height: 350.0,
			click_slop: 3.0,
			double_click_factor: 2.0,
		}
	}
}

/// Find the node nearest to `pointer`, if any lies within the hit radius.
///
/// The radius is given in screen pixels and therefore shrinks in simulation
/// units as the zoom grows. A node must be strictly inside it; on equal
/// distances the earlier node wins.
pub fn hit_test(
	nodes: &[SimNode],
	transform: &ViewTransform,
	pointer: ScreenPoint,
	config: &ScaleConfig,
) -> Option<usize> {
	let p = transform.to_sim(pointer);
	let mut best_distance = ScaleBehavior::Screen.apply(config.hit_radius, transform.k());
	let mut best = None;
	for (index, node) in nodes.iter().enumerate() {
		let d = node.position().distance(p);
		if d < best_distance {
			best_distance = d;
			best = Some(index);
		}
	}
	best
}

/// Result of a hover update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverChange {
	/// Nothing hovered before or after.
	Unchanged,
	/// Same node still hovered; only the pointer moved.
	Moved,
	/// A new node is hovered.
	Entered(usize),
	/// The hovered node was lost.
	Left,
}

/// Which node the tooltip describes and where the pointer last was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tooltip {
	/// Index of the hovered node.
	pub node: usize,
	/// Last pointer position.
	pub screen: ScreenPoint,
}

impl Tooltip {
	/// Top-left corner of the overlay panel, kept inside the viewport.
	pub fn anchor(&self, viewport: (f64, f64), config: &InteractionConfig) -> ScreenPoint {
		let (width, height) = viewport;
		let x = (self.screen.x + config.tooltip_offset).min(width - config.panel_width);
		let y = (self.screen.y + config.tooltip_offset).min(height - config.panel_height);
		ScreenPoint::new(x.max(0.0), y.max(0.0))
	}
}

/// Emitted when an item node is clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeActivation {
	/// Node id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Payload carried through from the input node.
	pub payload: NodePayload,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
	Idle,
	/// Button down, not yet past the click slop.
	Pressed {
		origin: ScreenPoint,
		node: Option<usize>,
	},
	Panning {
		last: ScreenPoint,
	},
	Dragging {
		node: usize,
	},
}

/// Hover, drag and pan state for one canvas.
#[derive(Clone, Debug)]
pub struct InteractionController {
	config: InteractionConfig,
	scale: ScaleConfig,
	gesture: Gesture,
	hovered: Option<usize>,
	pointer: Option<ScreenPoint>,
	/// The last press travelled far enough that the following click is ignored.
	suppress_click: bool,
}

impl InteractionController {
	/// Controller with nothing hovered and no gesture in progress.
	pub fn new(config: InteractionConfig, scale: ScaleConfig) -> Self {
		Self {
			config,
			scale,
			gesture: Gesture::Idle,
			hovered: None,
			pointer: None,
			suppress_click: false,
		}
	}

	/// Tooltip and click settings.
	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	/// Index of the hovered node.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// A node is being dragged.
	pub fn is_dragging(&self) -> bool {
		matches!(self.gesture, Gesture::Dragging { .. })
	}

	/// The background is being dragged.
	pub fn is_panning(&self) -> bool {
		matches!(self.gesture, Gesture::Panning { .. })
	}

	/// Current tooltip, present while a node is hovered.
	pub fn tooltip(&self) -> Option<Tooltip> {
		Some(Tooltip {
			node: self.hovered?,
			screen: self.pointer?,
		})
	}

	/// Forget hover and gesture state without touching the simulation.
	///
	/// Used when the simulation is replaced and old indices become meaningless.
	pub fn reset(&mut self) {
		self.gesture = Gesture::Idle;
		self.hovered = None;
		self.suppress_click = false;
	}

	/// Pointer moved to `screen`. Advances a press into a drag or pan, and
	/// otherwise updates hover.
	pub fn pointer_move(
		&mut self,
		screen: ScreenPoint,
		sim: &mut Simulation,
		transform: &mut ViewTransform,
	) -> HoverChange {
		self.pointer = Some(screen);

		if let Gesture::Pressed { origin, node } = self.gesture {
			if origin.distance(screen) > self.config.click_slop {
				self.suppress_click = true;
				self.gesture = match node {
					Some(node) => {
						debug!("nebula-graph: dragging node {node}");
						sim.set_alpha_target(sim.config().drag_alpha_target);
						sim.restart();
						Gesture::Dragging { node }
					}
					None => Gesture::Panning { last: origin },
				};
			}
		}

		match self.gesture {
			Gesture::Dragging { node } => {
				sim.pin(node, transform.to_sim(screen));
				self.echo()
			}
			Gesture::Panning { last } => {
				transform.apply(ZoomGesture::Pan {
					dx: screen.x - last.x,
					dy: screen.y - last.y,
				});
				self.gesture = Gesture::Panning { last: screen };
				self.echo()
			}
			Gesture::Idle | Gesture::Pressed { .. } => {
				let hit = hit_test(sim.nodes(), transform, screen, &self.scale);
				self.set_hovered(hit, sim)
			}
		}
	}

	/// Record a press. It becomes a drag (on a node) or a pan once it moves past the click slop.
	pub fn pointer_down(
		&mut self,
		screen: ScreenPoint,
		sim: &mut Simulation,
		transform: &ViewTransform,
	) {
		self.pointer = Some(screen);
		self.suppress_click = false;
		let node = hit_test(sim.nodes(), transform, screen, &self.scale);
		self.gesture = Gesture::Pressed {
			origin: screen,
			node,
		};
	}

	/// End the current gesture, unpinning a dragged node.
	pub fn pointer_up(&mut self, sim: &mut Simulation) {
		if let Gesture::Dragging { node } = self.gesture {
			self.release(node, sim);
		}
		self.gesture = Gesture::Idle;
	}

	/// The pointer left the canvas: end every gesture and drop hover.
	pub fn pointer_leave(&mut self, sim: &mut Simulation) -> HoverChange {
		self.pointer_up(sim);
		self.pointer = None;
		self.set_hovered(None, sim)
	}

	/// Activation for the hovered node, unless it is a category or the
	/// press turned into a drag.
	pub fn click(&mut self, sim: &Simulation) -> Option<NodeActivation> {
		if std::mem::take(&mut self.suppress_click) {
			return None;
		}
		let node = sim.node(self.hovered?)?;
		if node.is_category() {
			return None;
		}
		Some(NodeActivation {
			id: node.id().to_owned(),
			name: node.name().to_owned(),
			payload: node.payload().clone(),
		})
	}

	/// Zoom about `anchor` by a wheel delta.
	pub fn wheel(
		&self,
		transform: &mut ViewTransform,
		anchor: ScreenPoint,
		delta_y: f64,
		delta_mode: u32,
	) {
		transform.apply(ZoomGesture::Wheel {
			anchor,
			delta_y,
			delta_mode,
		});
	}

	/// Zoom in by `double_click_factor` about `anchor`.
	pub fn double_click(&self, transform: &mut ViewTransform, anchor: ScreenPoint) {
		transform.apply(ZoomGesture::ScaleBy {
			anchor,
			factor: self.config.double_click_factor,
		});
	}

	/// Whether a click right now would emit an activation.
	pub fn hovering_activatable(&self, sim: &Simulation) -> bool {
		self.hovered
			.and_then(|i| sim.node(i))
			.is_some_and(|node| !node.is_category())
	}

	fn release(&mut self, node: usize, sim: &mut Simulation) {
		sim.unpin(node);
		sim.set_alpha_target(0.0);
		if self.hovered.is_some() {
			sim.stop();
		}
	}

	fn echo(&self) -> HoverChange {
		if self.hovered.is_some() {
			HoverChange::Moved
		} else {
			HoverChange::Unchanged
		}
	}

	/// Apply a hover result. The simulation is paused or reheated only when
	/// the hovered id actually changes.
	fn set_hovered(&mut self, hit: Option<usize>, sim: &mut Simulation) -> HoverChange {
		if hit == self.hovered {
			return self.echo();
		}
		let previous = std::mem::replace(&mut self.hovered, hit);
		match (previous, hit) {
			(_, Some(index)) => {
				sim.stop();
				HoverChange::Entered(index)
			}
			(Some(_), None) => {
				sim.reheat(sim.config().reheat_alpha);
				HoverChange::Left
			}
			(None, None) => HoverChange::Unchanged,
		}
	}
}
