//! Zoom-dependent scaling configuration for graph visuals.
//!
//! This module centralizes all zoom-dependent visual parameters, making it easy to
//! understand and tune how elements behave at different zoom levels.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: simulation coordinates. Values in world-space scale
//!   proportionally with zoom (appear larger when zoomed in).
//! - **Screen-space**: CSS pixels on the canvas. Values in screen-space remain
//!   constant regardless of zoom level.
//!
//! Drawing happens after the view transform has been applied to the canvas, so
//! every value handed to the renderer is expressed in world units.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Divides by `k` to counteract the
	/// canvas transform.
	Screen,
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
		}
	}
}

/// Configuration for node sizes.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Category hub radius in world units.
	pub category_radius: f64,
	/// Item radius in world units.
	pub item_radius: f64,
	/// Item radius while highlighted.
	pub highlighted_radius: f64,
	/// How node radii scale with zoom.
	pub radius_behavior: ScaleBehavior,
}

/// Configuration for node labels.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Category label size in screen pixels.
	pub category_size: f64,
	/// Item label size in screen pixels.
	pub item_size: f64,
	/// Font weight of category labels.
	pub category_weight: u16,
	/// Font weight of item labels.
	pub item_weight: u16,
	/// CSS font family list.
	pub family: &'static str,
	/// Zoom level above which every node is labeled.
	pub show_all_above_k: f64,
	/// Gap between an item circle and its label, in world units.
	pub gap: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node radii.
	pub node: NodeScaleConfig,
	/// Label fonts and visibility.
	pub label: LabelScaleConfig,
	/// Link line width in world units.
	pub link_width: f64,
	/// Hover pick radius in screen pixels; shrinks in world units as `k` grows.
	pub hit_radius: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				category_radius: 12.0,
				item_radius: 3.5,
				highlighted_radius: 9.0,
				radius_behavior: ScaleBehavior::World,
			},
			label: LabelScaleConfig {
				category_size: 14.0,
				item_size: 11.0,
				category_weight: 600,
				item_weight: 400,
				family: "Inter, sans-serif",
				show_all_above_k: 2.8,
				gap: 2.0,
			},
			link_width: 0.5,
			hit_radius: 25.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Category hub radius.
	pub category_radius: f64,
	/// Item radius.
	pub item_radius: f64,
	/// Radius of the hovered item.
	pub highlighted_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Category label size in world units.
	pub category_font_size: f64,
	/// Item label size in world units.
	pub item_font_size: f64,
	/// Canvas font string for category labels (e.g. "600 14px Inter, sans-serif").
	pub category_font: String,
	/// Canvas font string for item labels.
	pub item_font: String,
	/// Gap between an item circle and its label.
	pub label_gap: f64,
	/// Link line width.
	pub link_width: f64,
	/// Whether the zoom level is high enough to label every node.
	pub label_all: bool,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let radius = |base| config.node.radius_behavior.apply(base, k);
		let category_font_size = ScaleBehavior::Screen.apply(config.label.category_size, k);
		let item_font_size = ScaleBehavior::Screen.apply(config.label.item_size, k);

		Self {
			k,
			category_radius: radius(config.node.category_radius),
			item_radius: radius(config.node.item_radius),
			highlighted_radius: radius(config.node.highlighted_radius),
			hit_radius: ScaleBehavior::Screen.apply(config.hit_radius, k),
			category_font_size,
			item_font_size,
			category_font: format!(
				"{} {}px {}",
				config.label.category_weight, category_font_size, config.label.family
			),
			item_font: format!(
				"{} {}px {}",
				config.label.item_weight, item_font_size, config.label.family
			),
			label_gap: config.label.gap,
			link_width: ScaleBehavior::World.apply(config.link_width, k),
			label_all: k > config.label.show_all_above_k,
		}
	}
}
