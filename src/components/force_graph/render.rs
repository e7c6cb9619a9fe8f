//! Canvas rendering for the force graph.
//!
//! Every frame is drawn from scratch in three passes:
//! 1. Background (screen space, device-pixel-ratio aware)
//! 2. All links as a single batched path (world space)
//! 3. Nodes and labels, the highlighted node last so it sits on top
//!
//! Rendering only reads the node and link slices it is handed.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::model::{SimLink, SimNode};
use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::viewport::ViewTransform;

/// Everything one frame depends on.
pub struct Frame<'a> {
	pub nodes: &'a [SimNode],
	pub links: &'a [SimLink],
	pub transform: &'a ViewTransform,
	/// Index of the hovered node, if any.
	pub highlighted: Option<usize>,
	/// Canvas size in CSS pixels.
	pub width: f64,
	pub height: f64,
	/// Backing-store pixels per CSS pixel.
	pub pixel_ratio: f64,
}

/// How a node's label is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelAppearance<'a> {
	pub font: &'a str,
	pub color: Color,
	/// Vertical offset from the node center, in world units.
	pub offset_y: f64,
}

/// How a node is drawn this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAppearance<'a> {
	pub radius: f64,
	pub fill: Color,
	/// Outline color and width.
	pub outline: Option<(Color, f64)>,
	/// Glow color and blur.
	pub glow: Option<(Color, f64)>,
	pub label: Option<LabelAppearance<'a>>,
}

/// Decide radius, colors and label for a node.
///
/// Labels are shown for category hubs, for the highlighted node, and for
/// every node once the zoom passes the legibility threshold.
pub fn node_appearance<'a>(
	node: &SimNode,
	highlighted: bool,
	scale: &'a ScaledValues,
	theme: &Theme,
) -> NodeAppearance<'a> {
	if node.is_category() {
		let label_color = if highlighted {
			theme.highlight.label
		} else {
			theme.category.label
		};
		return NodeAppearance {
			radius: scale.category_radius,
			fill: theme.category.fill,
			outline: Some((theme.category.outline, theme.category.outline_width)),
			glow: None,
			label: Some(LabelAppearance {
				font: &scale.category_font,
				color: label_color,
				offset_y: 0.0,
			}),
		};
	}

	let (radius, fill, glow, label_color) = if highlighted {
		(
			scale.highlighted_radius,
			theme.highlight.fill,
			Some((theme.highlight.fill, theme.highlight.glow_blur)),
			theme.highlight.label,
		)
	} else {
		(scale.item_radius, theme.item.fill, None, theme.item.label)
	};

	let label = (highlighted || scale.label_all).then(|| LabelAppearance {
		font: &scale.item_font,
		color: label_color,
		offset_y: radius + scale.item_font_size + scale.label_gap,
	});

	NodeAppearance {
		radius,
		fill,
		outline: None,
		glow,
		label,
	}
}

/// Renders the complete graph to the canvas.
pub fn render(
	ctx: &CanvasRenderingContext2d,
	frame: &Frame<'_>,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let k = frame.transform.k();
	let (tx, ty) = frame.transform.translation();
	let scale = ScaledValues::new(config, k);

	let dpr = frame.pixel_ratio;
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
	ctx.clear_rect(0.0, 0.0, frame.width, frame.height);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	ctx.save();
	let _ = ctx.translate(tx, ty);
	let _ = ctx.scale(k, k);

	draw_links(ctx, frame, &scale, theme);
	draw_nodes(ctx, frame, &scale, theme);

	ctx.restore();
}

fn draw_links(
	ctx: &CanvasRenderingContext2d,
	frame: &Frame<'_>,
	scale: &ScaledValues,
	theme: &Theme,
) {
	if frame.links.is_empty() {
		return;
	}
	ctx.begin_path();
	for link in frame.links {
		let (Some(s), Some(t)) = (frame.nodes.get(link.source), frame.nodes.get(link.target))
		else {
			continue;
		};
		ctx.move_to(s.x(), s.y());
		ctx.line_to(t.x(), t.y());
	}
	ctx.set_stroke_style_str(&theme.link.to_css());
	ctx.set_line_width(scale.link_width);
	ctx.stroke();
}

fn draw_nodes(
	ctx: &CanvasRenderingContext2d,
	frame: &Frame<'_>,
	scale: &ScaledValues,
	theme: &Theme,
) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for (index, node) in frame.nodes.iter().enumerate() {
		if Some(index) != frame.highlighted {
			draw_node(ctx, node, &node_appearance(node, false, scale, theme));
		}
	}

	if let Some(node) = frame.highlighted.and_then(|i| frame.nodes.get(i)) {
		draw_node(ctx, node, &node_appearance(node, true, scale, theme));
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &SimNode, look: &NodeAppearance<'_>) {
	let (x, y) = (node.x(), node.y());

	ctx.begin_path();
	let _ = ctx.arc(x, y, look.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&look.fill.to_css());
	if let Some((color, blur)) = look.glow {
		ctx.set_shadow_blur(blur);
		ctx.set_shadow_color(&color.to_css());
	}
	ctx.fill();
	if look.glow.is_some() {
		ctx.set_shadow_blur(0.0);
	}

	if let Some((color, width)) = look.outline {
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		ctx.stroke();
	}

	if let Some(label) = &look.label {
		ctx.set_font(label.font);
		ctx.set_fill_style_str(&label.color.to_css());
		let _ = ctx.fill_text(node.name(), x, y + label.offset_y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::model::WorkingGraph;
	use crate::components::force_graph::types::{GraphData, GraphNode};

	fn graph() -> WorkingGraph {
		WorkingGraph::build(&GraphData {
			nodes: vec![
				GraphNode {
					id: "CAT_animals".into(),
					name: Some("animals".into()),
					group: Some("category".into()),
					..Default::default()
				},
				GraphNode {
					id: "a1".into(),
					name: Some("cat.jpg".into()),
					group: Some("image".into()),
					..Default::default()
				},
			],
			links: vec![],
		})
	}

	#[test]
	fn categories_are_always_labeled() {
		let graph = graph();
		let theme = Theme::default();
		let scale = ScaledValues::new(&ScaleConfig::default(), 0.1);
		let look = node_appearance(&graph.nodes()[0], false, &scale, &theme);
		assert_eq!(look.radius, 12.0);
		let label = look.label.unwrap();
		assert_eq!(label.offset_y, 0.0);
		assert_eq!(label.font, scale.category_font);
	}

	#[test]
	fn items_are_labeled_only_when_zoomed_or_highlighted() {
		let graph = graph();
		let theme = Theme::default();
		let item = &graph.nodes()[1];

		let far = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert!(node_appearance(item, false, &far, &theme).label.is_none());
		assert!(node_appearance(item, true, &far, &theme).label.is_some());

		let near = ScaledValues::new(&ScaleConfig::default(), 3.0);
		assert!(node_appearance(item, false, &near, &theme).label.is_some());
	}

	#[test]
	fn highlighted_item_grows_and_glows() {
		let graph = graph();
		let theme = Theme::default();
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		let item = &graph.nodes()[1];

		let plain = node_appearance(item, false, &scale, &theme);
		assert_eq!(plain.radius, 3.5);
		assert!(plain.glow.is_none());

		let lit = node_appearance(item, true, &scale, &theme);
		assert_eq!(lit.radius, 9.0);
		assert_eq!(lit.fill, theme.highlight.fill);
		assert!(lit.glow.is_some());
		assert_eq!(lit.label.unwrap().offset_y, 9.0 + 11.0 + 2.0);
	}
}
