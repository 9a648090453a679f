//! Drawing the confetti field onto a surface.
//!
//! Every frame is a full redraw: the surface is cleared, then each live piece
//! is painted as a small rotated rectangle centered on its position.

use super::particles::ConfettiField;
use super::theme::Color;

/// A rectangle centered on `(cx, cy)` and rotated by `rotation` radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotatedRect {
	pub cx: f64,
	pub cy: f64,
	pub width: f64,
	pub height: f64,
	pub rotation: f64,
}

/// Something confetti can be drawn on.
pub trait ConfettiSurface {
	/// Current drawable size in pixels.
	fn size(&self) -> (f64, f64);

	/// Erase the whole surface to transparent.
	fn clear(&mut self);

	fn fill_rotated_rect(&mut self, rect: RotatedRect, color: Color);
}

/// Redraws the complete field.
pub fn render<S: ConfettiSurface + ?Sized>(field: &ConfettiField, surface: &mut S) {
	surface.clear();

	let aspect = field.style().aspect;
	for p in field.particles() {
		let rect = RotatedRect {
			cx: p.x,
			cy: p.y,
			width: p.size,
			height: p.size * aspect,
			rotation: p.rotation,
		};
		surface.fill_rotated_rect(rect, p.color);
	}
}
