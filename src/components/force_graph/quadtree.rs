//! Barnes-Hut quadtree for the many-body force and collision culling.
//!
//! Each cell stores the total charge of the nodes below it and their
//! charge-weighted centroid, so distant cells can stand in for all of their
//! nodes at once. Cell bounds also let the collision pass skip whole pairs
//! of cells that are too far apart to touch.

use super::viewport::SimPoint;

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
	pub(super) center: SimPoint,
	pub(super) half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[SimPoint]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for p in points {
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x);
			max_y = max_y.max(p.y);
		}

		if !min_x.is_finite() || !min_y.is_finite() || !max_x.is_finite() || !max_y.is_finite() {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			center: SimPoint::new((min_x + max_x) * 0.5, (min_y + max_y) * 0.5),
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub(super) fn contains(self, p: SimPoint) -> bool {
		(p.x - self.center.x).abs() <= self.half_extent
			&& (p.y - self.center.y).abs() <= self.half_extent
	}

	pub(super) fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	/// Squared gap between two cells; zero when they touch or overlap.
	pub(super) fn distance_sq_to(self, other: Self) -> f64 {
		let reach = self.half_extent + other.half_extent;
		let gx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
		let gy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
		gx * gx + gy * gy
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			center: SimPoint::new(self.center.x + ox, self.center.y + oy),
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, p: SimPoint) -> usize {
		match (p.x >= self.center.x, p.y >= self.center.y) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

pub(super) struct QuadNode {
	pub(super) bounds: QuadBounds,
	/// Charge-weighted centroid of the nodes in this cell.
	pub(super) centroid: SimPoint,
	/// Sum of the charges in this cell.
	pub(super) charge: f64,
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	pub(super) fn build(positions: &[SimPoint], charges: &[f64]) -> Option<Self> {
		let bounds = QuadBounds::from_points(positions)?;
		let indices = (0..positions.len()).collect();
		Some(Self::build_node(bounds, indices, positions, charges, 0))
	}

	fn build_node(
		bounds: QuadBounds,
		indices: Vec<usize>,
		positions: &[SimPoint],
		charges: &[f64],
		depth: usize,
	) -> Self {
		let (mut weight, mut charge, mut cx, mut cy) = (0.0, 0.0, 0.0, 0.0);
		for &index in &indices {
			let w = charges[index].abs();
			weight += w;
			charge += charges[index];
			cx += positions[index].x * w;
			cy += positions[index].y * w;
		}
		let centroid = if weight > 0.0 {
			SimPoint::new(cx / weight, cy / weight)
		} else {
			bounds.center
		};

		let mut node = Self {
			bounds,
			centroid,
			charge,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
		for &index in &node.indices {
			buckets[bounds.quadrant_for(positions[index])].push(index);
		}
		if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				charges,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}
