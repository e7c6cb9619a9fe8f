//! Pan and zoom transform between simulation space and screen space.
//!
//! `screen = sim * k + (x, y)`. The scale `k` never leaves the configured
//! [`ScaleExtent`], whatever sequence of gestures is applied.

/// A point in simulation (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimPoint {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl SimPoint {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: SimPoint) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// A point in CSS pixels relative to the canvas' top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
	/// Pixels from the left edge.
	pub x: f64,
	/// Pixels from the top edge.
	pub y: f64,
}

impl ScreenPoint {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: ScreenPoint) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Allowed zoom range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleExtent {
	/// Smallest zoom factor.
	pub min: f64,
	/// Largest zoom factor.
	pub max: f64,
}

impl Default for ScaleExtent {
	fn default() -> Self {
		Self {
			min: 0.01,
			max: 30.0,
		}
	}
}

impl ScaleExtent {
	/// `k` limited to the extent.
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min, self.max)
	}
}

/// A pan/zoom gesture, already converted from its DOM event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomGesture {
	/// Mouse wheel over `anchor`. `delta_mode` follows `WheelEvent.deltaMode`.
	Wheel {
		/// Point kept fixed on screen.
		anchor: ScreenPoint,
		/// `WheelEvent.deltaY`; negative zooms in.
		delta_y: f64,
		/// Pixel, line or page units.
		delta_mode: u32,
	},
	/// Translate the view by screen pixels.
	Pan {
		/// Horizontal offset.
		dx: f64,
		/// Vertical offset.
		dy: f64,
	},
	/// Multiply the scale, keeping `anchor` fixed on screen.
	ScaleBy {
		/// Point kept fixed on screen.
		anchor: ScreenPoint,
		/// Multiplier applied to `k`.
		factor: f64,
	},
	/// Request an absolute scale, keeping `anchor` fixed on screen.
	ScaleTo {
		/// Point kept fixed on screen.
		anchor: ScreenPoint,
		/// Requested zoom factor before clamping.
		k: f64,
	},
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	x: f64,
	y: f64,
	k: f64,
	extent: ScaleExtent,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::identity(ScaleExtent::default())
	}
}

impl ViewTransform {
	/// No translation, `k = 1`.
	pub fn identity(extent: ScaleExtent) -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
			extent,
		}
	}

	/// Translation `(x, y)` in screen pixels.
	pub fn translation(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	/// Zoom factor (1.0 = 100%).
	pub fn k(&self) -> f64 {
		self.k
	}

	/// Simulation point to screen pixels.
	pub fn to_screen(&self, p: SimPoint) -> ScreenPoint {
		ScreenPoint::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Inverse of [`to_screen`](Self::to_screen).
	pub fn to_sim(&self, p: ScreenPoint) -> SimPoint {
		SimPoint::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
	}

	/// Apply a gesture. Gestures carrying non-finite values are ignored.
	pub fn apply(&mut self, gesture: ZoomGesture) {
		match gesture {
			ZoomGesture::Wheel {
				anchor,
				delta_y,
				delta_mode,
			} => {
				let per_unit = match delta_mode {
					0 => 0.002,
					1 => 0.05,
					_ => 1.0,
				};
				self.scale_about(anchor, self.k * 2f64.powf(-delta_y * per_unit));
			}
			ZoomGesture::Pan { dx, dy } => {
				if dx.is_finite() && dy.is_finite() {
					self.x += dx;
					self.y += dy;
				}
			}
			ZoomGesture::ScaleBy { anchor, factor } => self.scale_about(anchor, self.k * factor),
			ZoomGesture::ScaleTo { anchor, k } => self.scale_about(anchor, k),
		}
	}

	fn scale_about(&mut self, anchor: ScreenPoint, requested: f64) {
		if !requested.is_finite() || !anchor.x.is_finite() || !anchor.y.is_finite() {
			return;
		}
		let k = self.extent.clamp(requested);
		let fixed = self.to_sim(anchor);
		self.k = k;
		self.x = anchor.x - fixed.x * k;
		self.y = anchor.y - fixed.y * k;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const ORIGIN: ScreenPoint = ScreenPoint::new(0.0, 0.0);

	#[test]
	fn starts_at_identity() {
		let t = ViewTransform::default();
		assert_eq!(t.k(), 1.0);
		assert_eq!(t.translation(), (0.0, 0.0));
		assert_eq!(t.to_screen(SimPoint::new(3.0, -4.0)), ScreenPoint::new(3.0, -4.0));
	}

	#[test]
	fn scale_request_below_floor_clamps() {
		let mut t = ViewTransform::default();
		t.apply(ZoomGesture::ScaleTo {
			anchor: ORIGIN,
			k: 0.005,
		});
		assert_eq!(t.k(), 0.01);
		t.apply(ZoomGesture::ScaleTo {
			anchor: ORIGIN,
			k: 0.001,
		});
		assert_eq!(t.k(), 0.01);
	}

	#[test]
	fn scale_request_above_ceiling_clamps() {
		let mut t = ViewTransform::default();
		for _ in 0..20 {
			t.apply(ZoomGesture::ScaleBy {
				anchor: ORIGIN,
				factor: 2.0,
			});
		}
		assert_eq!(t.k(), 30.0);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut t = ViewTransform::default();
		t.apply(ZoomGesture::Pan { dx: 40.0, dy: -10.0 });
		let anchor = ScreenPoint::new(200.0, 150.0);
		let before = t.to_sim(anchor);

		t.apply(ZoomGesture::Wheel {
			anchor,
			delta_y: -300.0,
			delta_mode: 0,
		});

		assert!(t.k() > 1.0);
		let after = t.to_sim(anchor);
		assert!(before.distance(after) < 1e-9);
	}

	#[test]
	fn wheel_down_zooms_out() {
		let mut t = ViewTransform::default();
		t.apply(ZoomGesture::Wheel {
			anchor: ORIGIN,
			delta_y: 3.0,
			delta_mode: 1,
		});
		assert!(t.k() < 1.0);
	}

	#[test]
	fn non_finite_gestures_are_ignored() {
		let mut t = ViewTransform::default();
		t.apply(ZoomGesture::ScaleTo {
			anchor: ORIGIN,
			k: f64::NAN,
		});
		t.apply(ZoomGesture::Pan {
			dx: f64::INFINITY,
			dy: 0.0,
		});
		assert_eq!(t, ViewTransform::default());
	}

	#[test]
	fn round_trips_points() {
		let mut t = ViewTransform::default();
		t.apply(ZoomGesture::Pan { dx: 12.5, dy: 7.0 });
		t.apply(ZoomGesture::ScaleBy {
			anchor: ScreenPoint::new(30.0, 40.0),
			factor: 3.7,
		});
		let p = SimPoint::new(-81.0, 14.25);
		assert!(t.to_sim(t.to_screen(p)).distance(p) < 1e-9);
	}
}
