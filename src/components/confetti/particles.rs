//! Confetti pieces and the live collection they are simulated in.

use std::f64::consts::{PI, TAU};
use std::ops::Range;

use log::warn;
use rand::{Rng, RngCore};

use super::theme::{Color, ConfettiStyle};

/// A single confetti piece.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub rotation: f64,
	/// Angular velocity, radians per tick.
	pub spin: f64,
	pub color: Color,
	/// Remaining lifetime in nominal milliseconds.
	pub ttl: f64,
}

/// Parameters of one spawn call.
///
/// The origin is given in normalized surface coordinates (0.0 to 1.0 on each
/// axis) and is scaled to the surface size at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
	pub count: usize,
	pub origin_x: f64,
	pub origin_y: f64,
	/// Total angular spread in degrees around each base direction.
	pub spread: f64,
	/// Base speed in pixels per tick.
	pub velocity: f64,
}

impl Burst {
	/// Main burst fired when the card opens (and on replay).
	pub const CENTER: Burst = Burst::at(140, 0.5, 0.1).with_spread(120.0).with_velocity(9.0);
	/// Delayed burst from the left edge.
	pub const LEFT: Burst = Burst::at(80, 0.1, 0.2).with_spread(100.0);
	/// Delayed burst from the right edge.
	pub const RIGHT: Burst = Burst::at(80, 0.9, 0.2).with_spread(100.0);

	/// A burst with the default 70 degree spread and base velocity of 8.
	pub const fn at(count: usize, origin_x: f64, origin_y: f64) -> Self {
		Self {
			count,
			origin_x,
			origin_y,
			spread: 70.0,
			velocity: 8.0,
		}
	}

	pub const fn with_spread(mut self, degrees: f64) -> Self {
		self.spread = degrees;
		self
	}

	pub const fn with_velocity(mut self, velocity: f64) -> Self {
		self.velocity = velocity;
		self
	}
}

/// Uniform draw from `range`; an empty or reversed range yields its start.
fn sample<R: Rng>(rng: &mut R, range: &Range<f64>) -> f64 {
	if range.start < range.end {
		rng.random_range(range.clone())
	} else {
		range.start
	}
}

/// The live particle collection plus the randomness and style that feed it.
///
/// Knows nothing about surfaces or frame scheduling; the animator drives it.
pub struct ConfettiField {
	particles: Vec<Particle>,
	style: ConfettiStyle,
	rng: Box<dyn RngCore>,
}

impl ConfettiField {
	pub fn new(style: ConfettiStyle, rng: Box<dyn RngCore>) -> Self {
		Self {
			particles: Vec::new(),
			style,
			rng,
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn style(&self) -> &ConfettiStyle {
		&self.style
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	/// Append `burst.count` pieces originating from the burst's origin on a
	/// `width` x `height` surface. Returns the number of pieces added, which is
	/// 0 when the style fails validation.
	pub fn spawn(&mut self, burst: &Burst, width: f64, height: f64) -> usize {
		if let Err(e) = self.style.validate() {
			warn!("birthday-card: burst dropped: {}", e);
			return 0;
		}
		let (x, y) = (burst.origin_x * width, burst.origin_y * height);
		self.particles.reserve(burst.count);

		for _ in 0..burst.count {
			let style = &self.style;
			let rng = &mut self.rng;

			// Two-lobed fountain: spread around either 0 or PI.
			let offset = (rng.random::<f64>() * burst.spread - burst.spread / 2.0).to_radians();
			let base = if rng.random_bool(0.5) { PI } else { 0.0 };
			let angle = offset + base;
			let speed = burst.velocity * sample(rng, &style.speed_factor);
			let spin = style.spin.abs();

			let particle = Particle {
				x,
				y,
				vx: angle.cos() * speed,
				vy: angle.sin() * speed - sample(rng, &style.lift),
				size: sample(rng, &style.size),
				rotation: rng.random_range(0.0..TAU),
				spin: sample(rng, &(-spin..spin)),
				color: style.palette[rng.random_range(0..style.palette.len())],
				ttl: sample(rng, &style.ttl),
			};
			self.particles.push(particle);
		}

		burst.count
	}

	/// Advance every piece by one nominal frame and drop the expired ones.
	/// Returns the number of pieces still alive.
	pub fn step(&mut self) -> usize {
		let (frame_ms, gravity) = (self.style.frame_ms, self.style.gravity);

		self.particles.retain_mut(|p| {
			p.ttl -= frame_ms;
			if p.ttl <= 0.0 {
				return false;
			}
			p.vy += gravity;
			p.x += p.vx;
			p.y += p.vy;
			p.rotation += p.spin;
			true
		});

		self.particles.len()
	}
}
