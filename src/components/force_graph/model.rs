//! Working graph built from a payload.
//!
//! Nodes are copied out of the payload so the simulation never touches the
//! caller's data. Links are resolved to node indices; links whose endpoints
//! are not in the node set are dropped, and duplicate node ids keep their
//! first occurrence.

use std::collections::HashMap;

use log::{info, warn};

use super::types::GraphData;
use super::viewport::SimPoint;

/// Whether a node is a category hub or a plain item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	/// Hub representing a grouping label. Larger, always labeled, inert on click.
	Category,
	/// Regular item node.
	Item,
}

/// Opaque per-node payload forwarded to tooltip and activation consumers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePayload {
	/// Media path, used to build preview and open URLs.
	pub filepath: Option<String>,
	/// Free-form description.
	pub description: Option<String>,
	/// Comma-separated tags.
	pub tags: Option<String>,
}

/// A node with kinematic state.
///
/// Position and velocity are written only by the simulation; everything else
/// reads them through the accessors.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub(super) id: String,
	pub(super) name: String,
	pub(super) kind: NodeKind,
	pub(super) x: f64,
	pub(super) y: f64,
	pub(super) vx: f64,
	pub(super) vy: f64,
	pub(super) pin: Option<SimPoint>,
	pub(super) payload: NodePayload,
}

impl SimNode {
	/// Unique id from the payload.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Display label.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Category hub or item.
	pub fn kind(&self) -> NodeKind {
		self.kind
	}

	/// Shorthand for `kind() == NodeKind::Category`.
	pub fn is_category(&self) -> bool {
		self.kind == NodeKind::Category
	}

	/// Horizontal position in simulation units.
	pub fn x(&self) -> f64 {
		self.x
	}

	/// Vertical position in simulation units.
	pub fn y(&self) -> f64 {
		self.y
	}

	/// Position in simulation units.
	pub fn position(&self) -> SimPoint {
		SimPoint::new(self.x, self.y)
	}

	/// Held in place by a drag.
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}

	/// Data forwarded to tooltip and activation.
	pub fn payload(&self) -> &NodePayload {
		&self.payload
	}
}

/// A link between two working nodes, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimLink {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Item-to-category link; rests longer.
	pub is_category_link: bool,
}

/// Counts of payload entries that did not make it into the working graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
	/// Nodes whose id was already taken.
	pub duplicate_nodes: usize,
	/// Links with an endpoint outside the node set.
	pub dropped_links: usize,
}

/// Self-consistent node and link sets ready for simulation.
#[derive(Clone, Debug, Default)]
pub struct WorkingGraph {
	pub(super) nodes: Vec<SimNode>,
	pub(super) links: Vec<SimLink>,
	stats: BuildStats,
}

impl WorkingGraph {
	/// Build the working graph from a payload.
	///
	/// Positions are left at the origin; the simulation seeds them.
	pub fn build(data: &GraphData) -> Self {
		let mut nodes = Vec::with_capacity(data.nodes.len());
		let mut index_by_id = HashMap::with_capacity(data.nodes.len());
		let mut stats = BuildStats::default();

		for node in &data.nodes {
			if index_by_id.contains_key(&node.id) {
				warn!("nebula-graph: duplicate node id {:?} ignored", node.id);
				stats.duplicate_nodes += 1;
				continue;
			}
			index_by_id.insert(node.id.clone(), nodes.len());
			nodes.push(SimNode {
				id: node.id.clone(),
				name: node.name.clone().unwrap_or_else(|| node.id.clone()),
				kind: if node.is_category() {
					NodeKind::Category
				} else {
					NodeKind::Item
				},
				x: 0.0,
				y: 0.0,
				vx: 0.0,
				vy: 0.0,
				pin: None,
				payload: NodePayload {
					filepath: node.filepath.clone(),
					description: node.description.clone(),
					tags: node.tags.clone(),
				},
			});
		}

		let links: Vec<SimLink> = data
			.links
			.iter()
			.filter_map(|link| {
				let source = index_by_id.get(&link.source)?;
				let target = index_by_id.get(&link.target)?;
				Some(SimLink {
					source: *source,
					target: *target,
					is_category_link: link.is_category_link,
				})
			})
			.collect();
		stats.dropped_links = data.links.len() - links.len();

		if stats != BuildStats::default() {
			info!(
				"nebula-graph: skipped {} duplicate nodes and {} dangling links",
				stats.duplicate_nodes, stats.dropped_links
			);
		}

		Self {
			nodes,
			links,
			stats,
		}
	}

	/// Nodes in payload order, duplicates removed.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Links whose endpoints both resolved.
	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	/// What was skipped while building.
	pub fn stats(&self) -> BuildStats {
		self.stats
	}

	/// No nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, group: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			group: Some(group.into()),
			..Default::default()
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			..Default::default()
		}
	}

	#[test]
	fn drops_links_to_missing_nodes() {
		let data = GraphData {
			nodes: vec![node("A", "category"), node("B", "item"), node("C", "item")],
			links: vec![link("B", "A"), link("C", "X")],
		};

		let graph = WorkingGraph::build(&data);

		assert_eq!(graph.nodes().len(), 3);
		assert_eq!(graph.links().len(), 1);
		let kept = graph.links()[0];
		assert_eq!(graph.nodes()[kept.source].id(), "B");
		assert_eq!(graph.nodes()[kept.target].id(), "A");
		assert_eq!(graph.stats().dropped_links, 1);
	}

	#[test]
	fn duplicate_ids_keep_first_occurrence() {
		let mut first = node("A", "item");
		first.name = Some("first".into());
		let mut second = node("A", "category");
		second.name = Some("second".into());
		let data = GraphData {
			nodes: vec![first, second, node("B", "item")],
			links: vec![link("A", "B")],
		};

		let graph = WorkingGraph::build(&data);

		assert_eq!(graph.nodes().len(), 2);
		assert_eq!(graph.nodes()[0].name(), "first");
		assert_eq!(graph.nodes()[0].kind(), NodeKind::Item);
		assert_eq!(graph.nodes()[1].id(), "B");
		assert_eq!(graph.stats().duplicate_nodes, 1);
		assert_eq!(graph.links().len(), 1);
	}

	#[test]
	fn name_falls_back_to_id() {
		let graph = WorkingGraph::build(&GraphData {
			nodes: vec![node("n1", "item")],
			links: vec![],
		});
		assert_eq!(graph.nodes()[0].name(), "n1");
	}

	#[test]
	fn input_payload_is_not_mutated() {
		let data = GraphData {
			nodes: vec![node("A", "item")],
			links: vec![link("A", "missing")],
		};
		let _ = WorkingGraph::build(&data);
		assert_eq!(data.links.len(), 1);
		assert_eq!(data.nodes[0].id, "A");
	}

	#[test]
	fn empty_payload_is_valid() {
		let graph = WorkingGraph::build(&GraphData::default());
		assert!(graph.is_empty());
		assert!(graph.links().is_empty());
	}
}
