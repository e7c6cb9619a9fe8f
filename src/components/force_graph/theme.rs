//! Visual theming for the force graph.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Category hub style.
#[derive(Clone, Debug)]
pub struct CategoryStyle {
	/// Hub fill.
	pub fill: Color,
	/// Hub outline.
	pub outline: Color,
	/// Outline width in world units.
	pub outline_width: f64,
	/// Hub label.
	pub label: Color,
}

/// Item node style.
#[derive(Clone, Debug)]
pub struct ItemStyle {
	/// Item fill.
	pub fill: Color,
	/// Item label.
	pub label: Color,
}

/// Style of the hovered node.
#[derive(Clone, Debug)]
pub struct HighlightStyle {
	/// Fill of the hovered node.
	pub fill: Color,
	/// Label of the hovered node.
	pub label: Color,
	/// Shadow blur around the highlighted node, in pixels.
	pub glow_blur: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Link stroke.
	pub link: Color,
	/// Category hubs.
	pub category: CategoryStyle,
	/// Item nodes.
	pub item: ItemStyle,
	/// The hovered node.
	pub highlight: HighlightStyle,
}

impl Theme {
	/// Near-black canvas with white hubs and cyan highlight (default)
	pub fn nebula() -> Self {
		let cyan = Color::rgb(0, 229, 255);
		Self {
			background: Color::rgb(10, 10, 10),
			link: Color::rgba(255, 255, 255, 0.08),
			category: CategoryStyle {
				fill: Color::rgb(255, 255, 255),
				outline: Color::rgba(255, 255, 255, 0.4),
				outline_width: 1.6,
				label: Color::rgb(255, 255, 255),
			},
			item: ItemStyle {
				fill: Color::rgba(255, 255, 255, 0.4),
				label: Color::rgb(170, 170, 170),
			},
			highlight: HighlightStyle {
				fill: cyan,
				label: cyan,
				glow_blur: 20.0,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::nebula()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::rgb(0, 229, 255).to_css(), "#00e5ff");
	}

	#[test]
	fn translucent_colors_render_as_rgba() {
		assert_eq!(
			Color::rgba(255, 255, 255, 0.4).to_css(),
			"rgba(255, 255, 255, 0.4)"
		);
	}
}
