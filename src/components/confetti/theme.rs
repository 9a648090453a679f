//! Visual tuning for the confetti effect.
//!
//! Provides the color type, the confetti palette and every constant the
//! animator uses (ranges, gravity, nominal frame length).

use std::ops::Range;

use crate::error::{CardError, Result};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Build an opaque color from a `0xRRGGBB` literal.
	pub const fn hex(rgb: u32) -> Self {
		Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// The six party colors confetti pieces are drawn from.
pub const PARTY_PALETTE: [Color; 6] = [
	Color::hex(0xff6fa3), // Bubblegum
	Color::hex(0xffd166), // Butter
	Color::hex(0x8ed1fc), // Sky
	Color::hex(0x7bd389), // Mint
	Color::hex(0xc792ea), // Lilac
	Color::hex(0xff9f1c), // Tangerine
];

/// Confetti simulation and drawing parameters.
///
/// Distances are surface pixels, times are nominal milliseconds and
/// per-tick quantities assume one tick per display frame.
#[derive(Clone, Debug)]
pub struct ConfettiStyle {
	/// Colors a piece may be painted with (uniform choice).
	pub palette: Vec<Color>,
	/// Piece width in pixels.
	pub size: Range<f64>,
	/// Piece height as a fraction of its width.
	pub aspect: f64,
	/// Lifetime in nominal milliseconds.
	pub ttl: Range<f64>,
	/// Absolute angular velocity bound, radians per tick.
	pub spin: f64,
	/// Multiplier applied to a burst's base velocity.
	pub speed_factor: Range<f64>,
	/// Upward kick subtracted from the initial vertical velocity.
	pub lift: Range<f64>,
	/// Downward acceleration added to vertical velocity every tick.
	pub gravity: f64,
	/// Time charged against every piece's ttl per tick. Not measured.
	pub frame_ms: f64,
}

impl ConfettiStyle {
	/// The birthday card look.
	pub fn party() -> Self {
		Self {
			palette: PARTY_PALETTE.to_vec(),
			size: 4.0..8.0,
			aspect: 0.6,
			ttl: 900.0..1600.0,
			spin: 0.2,
			speed_factor: 0.6..1.2,
			lift: 2.0..5.0,
			gravity: 0.12,
			frame_ms: 16.0,
		}
	}

	/// Check that pieces can be colored. Empty or reversed ranges are fine:
	/// they collapse to their start value.
	pub fn validate(&self) -> Result<()> {
		if self.palette.is_empty() {
			return Err(CardError::Config("confetti palette is empty".into()));
		}
		Ok(())
	}
}

impl Default for ConfettiStyle {
	fn default() -> Self {
		Self::party()
	}
}
