//! Force simulation positioning the working graph.
//!
//! Each tick cools the temperature `alpha`, accumulates velocity from four
//! forces (link springs, many-body charge, centering and collision) and then
//! integrates positions. Once `alpha` drops below `alpha_min` the simulation
//! settles and further ticks are no-ops until something reheats it.
//!
//! The simulation is the only writer of node positions and velocities; the
//! renderer and the interaction controller read them through [`Simulation::nodes`].

use std::f64::consts::PI;

use log::debug;

use super::model::{NodeKind, SimLink, SimNode, WorkingGraph};
use super::quadtree::QuadNode;
use super::viewport::SimPoint;

/// Tunable physics constants.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Temperature a fresh simulation starts at.
	pub alpha_start: f64,
	/// Temperature below which the simulation settles.
	pub alpha_min: f64,
	/// Fraction of the distance to `alpha_target` covered per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick (friction).
	pub velocity_decay: f64,
	/// Rest length of ordinary links.
	pub link_distance: f64,
	/// Rest length of item-to-category links.
	pub category_link_distance: f64,
	/// Many-body strength of item nodes (negative = repulsion).
	pub item_charge: f64,
	/// Many-body strength of category nodes.
	pub category_charge: f64,
	/// Collision radius of item nodes.
	pub item_radius: f64,
	/// Collision radius of category nodes.
	pub category_radius: f64,
	/// Fraction of an overlap resolved per tick.
	pub collide_strength: f64,
	/// How strongly the node centroid is moved onto the layout center.
	pub center_strength: f64,
	/// Barnes-Hut accuracy; cells smaller than `theta * distance` are approximated.
	pub theta: f64,
	/// Floor for pairwise distances in force computations.
	pub min_distance: f64,
	/// Temperature used to resume after a hover pause.
	pub reheat_alpha: f64,
	/// Temperature held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha_start: 1.0,
			alpha_min: 0.001,
			alpha_decay: 0.04,
			velocity_decay: 0.4,
			link_distance: 40.0,
			category_link_distance: 80.0,
			item_charge: -100.0,
			category_charge: -500.0,
			item_radius: 6.0,
			category_radius: 12.0,
			collide_strength: 1.0,
			center_strength: 1.0,
			theta: 0.9,
			min_distance: 1.0,
			reheat_alpha: 0.01,
			drag_alpha_target: 0.3,
		}
	}
}

/// Lifecycle of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPhase {
	/// Freshly loaded; no integration step has run yet.
	Idle,
	/// Integrating on every tick.
	Running,
	/// Cooled below `alpha_min`; ticks do nothing until reheated.
	Settling,
	/// Explicitly stopped; ticks do nothing until restarted.
	Frozen,
}

/// Per-link constants derived once when the graph is loaded.
#[derive(Clone, Copy, Debug)]
struct LinkTerms {
	distance: f64,
	strength: f64,
}

/// Force simulation over a [`WorkingGraph`].
pub struct Simulation {
	config: SimulationConfig,
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	link_terms: Vec<LinkTerms>,
	radii: Vec<f64>,
	charges: Vec<f64>,
	center: SimPoint,
	alpha: f64,
	alpha_target: f64,
	phase: SimPhase,
	positions: Vec<SimPoint>,
	impulses: Vec<(f64, f64)>,
}

impl Simulation {
	/// Take ownership of a working graph and seed node positions around `center`.
	pub fn new(graph: WorkingGraph, config: SimulationConfig, center: SimPoint) -> Self {
		let WorkingGraph {
			mut nodes, links, ..
		} = graph;

		let golden_angle = PI * (3.0 - 5f64.sqrt());
		for (i, node) in nodes.iter_mut().enumerate() {
			let radius = 10.0 * (0.5 + i as f64).sqrt();
			let angle = i as f64 * golden_angle;
			node.x = center.x + radius * angle.cos();
			node.y = center.y + radius * angle.sin();
			node.vx = 0.0;
			node.vy = 0.0;
		}

		let mut degree = vec![0usize; nodes.len()];
		for link in &links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let link_terms = links
			.iter()
			.map(|link| LinkTerms {
				distance: if link.is_category_link {
					config.category_link_distance
				} else {
					config.link_distance
				},
				strength: 1.0 / degree[link.source].min(degree[link.target]).max(1) as f64,
			})
			.collect();

		let (radii, charges) = nodes
			.iter()
			.map(|node| match node.kind {
				NodeKind::Category => (config.category_radius, config.category_charge),
				NodeKind::Item => (config.item_radius, config.item_charge),
			})
			.unzip();

		Self {
			alpha: config.alpha_start,
			alpha_target: 0.0,
			phase: SimPhase::Idle,
			positions: Vec::with_capacity(nodes.len()),
			impulses: Vec::with_capacity(nodes.len()),
			config,
			nodes,
			links,
			link_terms,
			radii,
			charges,
			center,
		}
	}

	/// Nodes in working-set order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Links by node index.
	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	/// Node at `index`, if any.
	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	/// Physics constants in use.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Lifecycle state.
	pub fn phase(&self) -> SimPhase {
		self.phase
	}

	/// Whether the next [`tick`](Self::tick) will integrate.
	pub fn is_active(&self) -> bool {
		matches!(self.phase, SimPhase::Idle | SimPhase::Running) && !self.nodes.is_empty()
	}

	/// Stop integrating until [`restart`](Self::restart) or [`reheat`](Self::reheat).
	pub fn stop(&mut self) {
		if self.phase != SimPhase::Frozen {
			debug!("nebula-graph: simulation frozen at alpha {:.4}", self.alpha);
			self.phase = SimPhase::Frozen;
		}
	}

	/// Resume integrating at the current temperature.
	pub fn restart(&mut self) {
		if !self.nodes.is_empty() {
			self.phase = SimPhase::Running;
		}
	}

	/// Set the temperature and resume.
	pub fn reheat(&mut self, alpha: f64) {
		if alpha.is_finite() {
			self.alpha = alpha.max(0.0);
		}
		debug!("nebula-graph: simulation reheated to alpha {:.4}", self.alpha);
		self.restart();
	}

	/// Temperature `alpha` decays towards. Non-zero keeps the layout live.
	pub fn set_alpha_target(&mut self, target: f64) {
		if target.is_finite() {
			self.alpha_target = target.max(0.0);
		}
	}

	/// Fix a node at `point` until [`unpin`](Self::unpin).
	pub fn pin(&mut self, index: usize, point: SimPoint) {
		if let Some(node) = self.nodes.get_mut(index) {
			if point.x.is_finite() && point.y.is_finite() {
				node.pin = Some(point);
			}
		}
	}

	/// Release a pinned node.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.pin = None;
		}
	}

	/// Move the point the centering force pulls towards.
	pub fn set_center(&mut self, center: SimPoint) {
		self.center = center;
	}

	#[cfg(test)]
	pub(super) fn place(&mut self, index: usize, point: SimPoint) {
		let node = &mut self.nodes[index];
		node.x = point.x;
		node.y = point.y;
		node.vx = 0.0;
		node.vy = 0.0;
	}

	/// Advance one step. Returns `true` when positions were integrated, which
	/// is the signal that a new frame should be drawn.
	pub fn tick(&mut self) -> bool {
		if !self.is_active() {
			return false;
		}
		if self.phase == SimPhase::Idle {
			debug!("nebula-graph: simulation running ({} nodes)", self.nodes.len());
			self.phase = SimPhase::Running;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_many_body();
		self.apply_center();
		self.apply_collision();
		self.integrate();

		if self.alpha < self.config.alpha_min {
			debug!("nebula-graph: simulation settled");
			self.phase = SimPhase::Settling;
		}
		true
	}

	/// Spring every link towards its rest length, half the correction per end.
	fn apply_links(&mut self) {
		let alpha = self.alpha;
		for (link, terms) in self.links.iter().zip(&self.link_terms) {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let (dx, dy, dist_sq) = separation(
				t.x + t.vx - s.x - s.vx,
				t.y + t.vy - s.y - s.vy,
				link.source,
				link.target,
				self.config.min_distance,
			);
			let dist = dist_sq.sqrt();
			let l = (dist - terms.distance) / dist * alpha * terms.strength * 0.5;
			let (fx, fy) = (dx * l, dy * l);

			let target = &mut self.nodes[link.target];
			target.vx -= fx;
			target.vy -= fy;
			let source = &mut self.nodes[link.source];
			source.vx += fx;
			source.vy += fy;
		}
	}

	fn apply_many_body(&mut self) {
		self.positions.clear();
		self.positions.extend(self.nodes.iter().map(SimNode::position));
		let Some(tree) = QuadNode::build(&self.positions, &self.charges) else {
			return;
		};

		let min_distance = self.config.min_distance;
		let theta_sq = self.config.theta * self.config.theta;
		for index in 0..self.nodes.len() {
			let (mut fx, mut fy) = (0.0, 0.0);
			accumulate_charge(
				&tree,
				index,
				&self.positions,
				&self.charges,
				theta_sq,
				min_distance,
				&mut fx,
				&mut fy,
			);
			let node = &mut self.nodes[index];
			node.vx += fx * self.alpha;
			node.vy += fy * self.alpha;
		}
	}

	/// Translate the centroid towards the layout center.
	fn apply_center(&mut self) {
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sx / n - self.center.x) * self.config.center_strength;
		let shift_y = (sy / n - self.center.y) * self.config.center_strength;
		if !shift_x.is_finite() || !shift_y.is_finite() {
			return;
		}
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	/// Push overlapping pairs apart along their predicted offset.
	///
	/// Candidate pairs come from a quadtree over the predicted positions, so
	/// only cells within twice the largest radius of each other are compared.
	fn apply_collision(&mut self) {
		self.positions.clear();
		self.positions
			.extend(self.nodes.iter().map(|n| SimPoint::new(n.x + n.vx, n.y + n.vy)));
		let Some(tree) = QuadNode::build(&self.positions, &self.charges) else {
			return;
		};

		self.impulses.clear();
		self.impulses.resize(self.nodes.len(), (0.0, 0.0));
		let reach = 2.0 * self.radii.iter().copied().fold(0.0, f64::max);
		let pass = CollisionPass {
			positions: &self.positions,
			radii: &self.radii,
			strength: self.config.collide_strength,
			min_distance: self.config.min_distance,
			reach_sq: reach * reach,
		};
		pass.visit(&tree, &tree, true, &mut self.impulses);

		for (node, &(ix, iy)) in self.nodes.iter_mut().zip(&self.impulses) {
			node.vx += ix;
			node.vy += iy;
		}
	}

	fn integrate(&mut self) {
		let retain = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			if let Some(pin) = node.pin {
				node.x = pin.x;
				node.y = pin.y;
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			let (vx, vy) = (node.vx * retain, node.vy * retain);
			let (x, y) = (node.x + vx, node.y + vy);
			if x.is_finite() && y.is_finite() {
				node.vx = vx;
				node.vy = vy;
				node.x = x;
				node.y = y;
			} else {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}
}

/// Offset between two points with degenerate cases floored.
///
/// `(dx, dy)` is the offset of `b` as seen from `a`. Returns
/// `(dx, dy, dist_sq)` with `dist_sq >= min_distance²`. Coincident points get
/// a direction derived from the pair's indices, opposite for `(a, b)` and
/// `(b, a)`, so the pair always separates.
fn separation(dx: f64, dy: f64, a: usize, b: usize, min_distance: f64) -> (f64, f64, f64) {
	let floor_sq = min_distance * min_distance;
	let dist_sq = dx * dx + dy * dy;
	if dist_sq >= floor_sq {
		return (dx, dy, dist_sq);
	}
	if dist_sq > 1e-12 {
		let scale = min_distance / dist_sq.sqrt();
		return (dx * scale, dy * scale, floor_sq);
	}
	let (lo, hi) = (a.min(b), a.max(b));
	let angle = (lo as f64 * 0.618_034 + hi as f64 * 0.414_214) * std::f64::consts::TAU;
	let sign = if a <= b { 1.0 } else { -1.0 };
	(
		sign * angle.cos() * min_distance,
		sign * angle.sin() * min_distance,
		floor_sq,
	)
}

/// One collision sweep over a quadtree of predicted positions.
struct CollisionPass<'a> {
	positions: &'a [SimPoint],
	radii: &'a [f64],
	strength: f64,
	min_distance: f64,
	reach_sq: f64,
}

impl CollisionPass<'_> {
	/// Resolve every overlapping pair with one node in `a` and one in `b`
	/// (or both in `a` when `same`). Returns how many pairs were compared.
	fn visit(&self, a: &QuadNode, b: &QuadNode, same: bool, impulses: &mut [(f64, f64)]) -> usize {
		if !same && a.bounds.distance_sq_to(b.bounds) > self.reach_sq {
			return 0;
		}

		if a.is_leaf() && b.is_leaf() {
			let mut compared = 0;
			for (offset, &i) in a.indices.iter().enumerate() {
				let others = if same { &a.indices[offset + 1..] } else { &b.indices[..] };
				for &j in others {
					self.resolve(i, j, impulses);
					compared += 1;
				}
			}
			return compared;
		}

		if same {
			let children: Vec<&QuadNode> = a.children.iter().flatten().map(|c| &**c).collect();
			let mut compared = 0;
			for (first, child) in children.iter().enumerate() {
				compared += self.visit(child, child, true, impulses);
				for other in &children[first + 1..] {
					compared += self.visit(child, other, false, impulses);
				}
			}
			return compared;
		}

		// Split the larger non-leaf cell.
		let split_a = !a.is_leaf() && (b.is_leaf() || a.bounds.half_extent >= b.bounds.half_extent);
		let (outer, fixed) = if split_a { (a, b) } else { (b, a) };
		outer
			.children
			.iter()
			.flatten()
			.map(|child| self.visit(child, fixed, false, impulses))
			.sum()
	}

	fn resolve(&self, a: usize, b: usize, impulses: &mut [(f64, f64)]) {
		let (i, j) = (a.min(b), a.max(b));
		let (ri, rj) = (self.radii[i], self.radii[j]);
		let r = ri + rj;
		let (dx, dy) = (
			self.positions[i].x - self.positions[j].x,
			self.positions[i].y - self.positions[j].y,
		);
		if dx.abs() >= r || dy.abs() >= r || dx * dx + dy * dy >= r * r {
			return;
		}
		let (dx, dy, dist_sq) = separation(dx, dy, i, j, self.min_distance);
		let dist = dist_sq.sqrt();
		let l = (r - dist) / dist * self.strength;
		let weight = rj * rj / (ri * ri + rj * rj);
		let (px, py) = (dx * l, dy * l);

		impulses[i].0 += px * weight;
		impulses[i].1 += py * weight;
		impulses[j].0 -= px * (1.0 - weight);
		impulses[j].1 -= py * (1.0 - weight);
	}
}

#[allow(clippy::too_many_arguments)]
fn accumulate_charge(
	cell: &QuadNode,
	index: usize,
	positions: &[SimPoint],
	charges: &[f64],
	theta_sq: f64,
	min_distance: f64,
	fx: &mut f64,
	fy: &mut f64,
) {
	let point = positions[index];

	if cell.is_leaf() {
		for &other in &cell.indices {
			if other == index {
				continue;
			}
			let (dx, dy, dist_sq) = separation(
				positions[other].x - point.x,
				positions[other].y - point.y,
				index,
				other,
				min_distance,
			);
			// Charge is negative for repulsion; the sign flips the offset.
			let w = charges[other] / dist_sq;
			*fx += dx * w;
			*fy += dy * w;
		}
		return;
	}

	let (dx, dy) = (cell.centroid.x - point.x, cell.centroid.y - point.y);
	let dist_sq = dx * dx + dy * dy;
	let side = cell.bounds.side_length();
	if !cell.bounds.contains(point) && side * side < theta_sq * dist_sq {
		let dist_sq = dist_sq.max(min_distance * min_distance);
		let w = cell.charge / dist_sq;
		*fx += dx * w;
		*fy += dy * w;
		return;
	}

	for child in cell.children.iter().flatten() {
		accumulate_charge(
			child,
			index,
			positions,
			charges,
			theta_sq,
			min_distance,
			fx,
			fy,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	const CENTER: SimPoint = SimPoint::new(400.0, 300.0);

	fn star(items: usize) -> GraphData {
		let mut nodes = vec![GraphNode {
			id: "hub".into(),
			group: Some("category".into()),
			..Default::default()
		}];
		let mut links = Vec::new();
		for i in 0..items {
			let id = format!("item{i}");
			nodes.push(GraphNode {
				id: id.clone(),
				group: Some("image".into()),
				..Default::default()
			});
			links.push(GraphLink {
				source: id,
				target: "hub".into(),
				is_category_link: true,
			});
		}
		GraphData { nodes, links }
	}

	fn simulation(data: &GraphData) -> Simulation {
		Simulation::new(
			WorkingGraph::build(data),
			SimulationConfig::default(),
			CENTER,
		)
	}

	fn run_until_settled(sim: &mut Simulation) -> usize {
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 10_000, "simulation never settled");
		}
		ticks
	}

	#[test]
	fn starts_idle_then_runs() {
		let mut sim = simulation(&star(3));
		assert_eq!(sim.phase(), SimPhase::Idle);
		assert!(sim.tick());
		assert_eq!(sim.phase(), SimPhase::Running);
	}

	#[test]
	fn alpha_decays_monotonically_and_settles() {
		let mut sim = simulation(&star(12));
		let mut last = sim.alpha();
		while sim.tick() {
			assert!(sim.alpha() < last);
			last = sim.alpha();
		}
		assert_eq!(sim.phase(), SimPhase::Settling);
		assert!(sim.alpha() < sim.config().alpha_min);
	}

	#[test]
	fn settled_positions_stop_changing() {
		let mut sim = simulation(&star(8));
		run_until_settled(&mut sim);
		let before: Vec<SimPoint> = sim.nodes().iter().map(SimNode::position).collect();
		for _ in 0..10 {
			assert!(!sim.tick());
		}
		let after: Vec<SimPoint> = sim.nodes().iter().map(SimNode::position).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn empty_graph_idles() {
		let mut sim = simulation(&GraphData::default());
		assert!(!sim.tick());
		assert!(!sim.is_active());
		sim.reheat(0.5);
		assert!(!sim.tick());
	}

	#[test]
	fn category_links_rest_longer() {
		let mut sim = simulation(&star(1));
		run_until_settled(&mut sim);
		let hub = sim.nodes()[0].position();
		let item = sim.nodes()[1].position();
		let d = hub.distance(item);
		assert!(d > 40.0, "category link rest length not honoured: {d}");
	}

	#[test]
	fn coincident_nodes_separate_without_nan() {
		let data = GraphData {
			nodes: (0..5)
				.map(|i| GraphNode {
					id: format!("n{i}"),
					..Default::default()
				})
				.collect(),
			links: vec![],
		};
		let mut sim = simulation(&data);
		for node in &mut sim.nodes {
			node.x = 10.0;
			node.y = 10.0;
		}
		for _ in 0..50 {
			sim.tick();
		}
		for node in sim.nodes() {
			assert!(node.x().is_finite() && node.y().is_finite());
		}
		let a = sim.nodes()[0].position();
		let b = sim.nodes()[1].position();
		assert!(a.distance(b) > 1.0);
	}

	#[test]
	fn collision_keeps_settled_nodes_apart() {
		let mut sim = simulation(&star(20));
		run_until_settled(&mut sim);
		let nodes = sim.nodes();
		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let d = nodes[i].position().distance(nodes[j].position());
				let min = sim.radii[i] + sim.radii[j];
				assert!(d > min * 0.8, "nodes {i} and {j} overlap: {d} < {min}");
			}
		}
	}

	#[test]
	fn collision_tree_finds_the_same_overlaps_as_all_pairs() {
		let mut seed = 0x2545_f491_4f6c_dd1d_u64;
		let mut next = move || {
			seed ^= seed << 13;
			seed ^= seed >> 7;
			seed ^= seed << 17;
			(seed >> 11) as f64 / (1u64 << 53) as f64
		};
		let n = 3000;
		let mut positions: Vec<SimPoint> = (0..n)
			.map(|_| SimPoint::new(next() * 1200.0, next() * 1200.0))
			.collect();
		positions[1] = positions[0];
		let radii: Vec<f64> = (0..n).map(|i| if i % 50 == 0 { 12.0 } else { 6.0 }).collect();
		let charges = vec![-1.0; n];
		let tree = QuadNode::build(&positions, &charges).unwrap();
		let pass = CollisionPass {
			positions: &positions,
			radii: &radii,
			strength: 1.0,
			min_distance: 1.0,
			reach_sq: 24.0 * 24.0,
		};

		let mut culled = vec![(0.0, 0.0); n];
		let compared = pass.visit(&tree, &tree, true, &mut culled);
		let mut every_pair = vec![(0.0, 0.0); n];
		for i in 0..n {
			for j in (i + 1)..n {
				pass.resolve(i, j, &mut every_pair);
			}
		}

		assert!(compared < n * (n - 1) / 2 / 10, "compared {compared} pairs");
		assert!(every_pair.iter().any(|&(x, y)| x != 0.0 || y != 0.0));
		for (i, (a, b)) in culled.iter().zip(&every_pair).enumerate() {
			assert!(
				(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9,
				"node {i}: {a:?} vs {b:?}"
			);
		}
	}

	#[test]
	fn large_graph_settles() {
		let mut nodes = Vec::new();
		let mut links = Vec::new();
		for c in 0..20 {
			let category = format!("CAT_{c}");
			nodes.push(GraphNode {
				id: category.clone(),
				group: Some("category".into()),
				..Default::default()
			});
			for i in 0..100 {
				let id = format!("item{c}_{i}");
				nodes.push(GraphNode {
					id: id.clone(),
					group: Some("image".into()),
					..Default::default()
				});
				links.push(GraphLink {
					source: id,
					target: category.clone(),
					is_category_link: true,
				});
			}
		}
		let mut sim = simulation(&GraphData { nodes, links });
		assert_eq!(sim.nodes().len(), 2020);

		let ticks = run_until_settled(&mut sim);
		assert!(ticks < 300, "took {ticks} ticks");
		assert_eq!(sim.phase(), SimPhase::Settling);
		assert!(sim.nodes().iter().all(|n| n.x().is_finite() && n.y().is_finite()));
		let (min_x, max_x) = sim
			.nodes()
			.iter()
			.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| (lo.min(n.x()), hi.max(n.x())));
		assert!(max_x - min_x > 200.0, "layout collapsed to width {}", max_x - min_x);
	}

	#[test]
	fn stop_freezes_and_reheat_resumes() {
		let mut sim = simulation(&star(4));
		sim.tick();
		sim.stop();
		assert_eq!(sim.phase(), SimPhase::Frozen);
		let before = sim.nodes()[1].position();
		assert!(!sim.tick());
		assert_eq!(sim.nodes()[1].position(), before);

		sim.reheat(0.01);
		assert_eq!(sim.phase(), SimPhase::Running);
		assert!(sim.tick());
		assert!(sim.alpha() < 0.01);
	}

	#[test]
	fn settled_simulation_can_be_reheated() {
		let mut sim = simulation(&star(4));
		run_until_settled(&mut sim);
		sim.reheat(0.01);
		let ticks = run_until_settled(&mut sim);
		assert!(ticks > 0 && ticks < 100);
	}

	#[test]
	fn pinned_node_holds_position() {
		let mut sim = simulation(&star(6));
		let target = SimPoint::new(-50.0, 75.0);
		sim.pin(2, target);
		for _ in 0..20 {
			sim.tick();
		}
		assert_eq!(sim.nodes()[2].position(), target);
		assert!(sim.nodes()[2].is_pinned());
		sim.unpin(2);
		assert!(!sim.nodes()[2].is_pinned());
	}

	#[test]
	fn alpha_target_keeps_simulation_live() {
		let mut sim = simulation(&star(3));
		sim.set_alpha_target(0.3);
		for _ in 0..500 {
			assert!(sim.tick());
		}
		assert!(sim.alpha() > 0.29);
	}

	#[test]
	fn layout_centers_on_center_point() {
		let mut sim = simulation(&star(10));
		run_until_settled(&mut sim);
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(SimNode::x).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(SimNode::y).sum::<f64>() / n;
		assert!((cx - CENTER.x).abs() < 5.0);
		assert!((cy - CENTER.y).abs() < 5.0);
	}

	#[test]
	fn separation_floors_distance() {
		let (dx, dy, d2) = separation(0.0, 0.0, 1, 2, 1.0);
		assert!((d2 - 1.0).abs() < 1e-12);
		assert!(((dx * dx + dy * dy) - 1.0).abs() < 1e-9);
		let (rx, ry, _) = separation(0.0, 0.0, 2, 1, 1.0);
		assert!((dx + rx).abs() < 1e-12 && (dy + ry).abs() < 1e-12);
		let (_, _, d2) = separation(0.1, 0.0, 0, 0, 1.0);
		assert_eq!(d2, 1.0);
		let (dx, dy, d2) = separation(3.0, 4.0, 0, 0, 1.0);
		assert_eq!((dx, dy, d2), (3.0, 4.0, 25.0));
	}
}
