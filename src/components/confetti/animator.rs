//! The confetti animator: a particle field, a lazily created surface and a
//! self-rescheduling frame loop.
//!
//! A loop is pending exactly while the field has live pieces. Spawning into an
//! idle animator starts it; the frame that empties the field stops it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};
use rand::RngCore;

use super::particles::{Burst, ConfettiField};
use super::render::{ConfettiSurface, render};
use super::theme::ConfettiStyle;
use crate::error::Result;

/// A pending display-frame request.
pub trait FrameRequest {
	/// Withdraw the request so its callback never runs.
	fn cancel(&self);
}

/// Platform services the animator needs.
pub trait ConfettiHost: 'static {
	type Surface: ConfettiSurface + 'static;
	type Frame: FrameRequest + 'static;

	/// Create the drawing surface. Called at most once per animator.
	fn create_surface(&self) -> Result<Self::Surface>;

	/// Run `callback` before the next repaint.
	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<Self::Frame>;
}

/// Owned confetti animator. Cloning yields another handle to the same field.
pub struct Confetti<H: ConfettiHost> {
	inner: Rc<Inner<H>>,
}

struct Inner<H: ConfettiHost> {
	host: H,
	state: RefCell<State<H>>,
}

struct State<H: ConfettiHost> {
	field: ConfettiField,
	surface: Option<H::Surface>,
	frame: Option<H::Frame>,
}

impl<H: ConfettiHost> Clone for Confetti<H> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<H: ConfettiHost> Drop for Inner<H> {
	fn drop(&mut self) {
		if let Some(frame) = self.state.get_mut().frame.take() {
			frame.cancel();
		}
	}
}

impl<H: ConfettiHost> Confetti<H> {
	pub fn new(host: H, style: ConfettiStyle, rng: Box<dyn RngCore>) -> Self {
		Self {
			inner: Rc::new(Inner {
				host,
				state: RefCell::new(State {
					field: ConfettiField::new(style, rng),
					surface: None,
					frame: None,
				}),
			}),
		}
	}

	/// Launch a burst. Returns the number of pieces added, which is
	/// `burst.count` unless the surface could not be created or the loop could
	/// not be started.
	pub fn spawn(&self, burst: Burst) -> usize {
		if !self.ensure_surface() {
			return 0;
		}

		let added = {
			let mut guard = self.inner.state.borrow_mut();
			let state = &mut *guard;
			let Some(surface) = state.surface.as_ref() else {
				return 0;
			};
			let (width, height) = surface.size();
			state.field.spawn(&burst, width, height)
		};

		let idle = {
			let state = self.inner.state.borrow();
			state.frame.is_none() && !state.field.is_empty()
		};
		if idle {
			debug!("birthday-card: confetti loop started");
			if !Inner::schedule(&self.inner) {
				return 0;
			}
		}
		added
	}

	/// Whether a frame is pending.
	pub fn is_running(&self) -> bool {
		self.inner.state.borrow().frame.is_some()
	}

	/// Number of live pieces.
	pub fn live_count(&self) -> usize {
		self.inner.state.borrow().field.len()
	}

	fn ensure_surface(&self) -> bool {
		if self.inner.state.borrow().surface.is_some() {
			return true;
		}
		match self.inner.host.create_surface() {
			Ok(surface) => {
				self.inner.state.borrow_mut().surface = Some(surface);
				true
			}
			Err(e) => {
				warn!("birthday-card: confetti disabled, no drawing surface: {}", e);
				false
			}
		}
	}
}

impl<H: ConfettiHost> Inner<H> {
	/// Request the next frame. On failure the field is cleared and false is
	/// returned.
	fn schedule(this: &Rc<Self>) -> bool {
		let weak: Weak<Self> = Rc::downgrade(this);
		let callback = Box::new(move || {
			if let Some(inner) = weak.upgrade() {
				Inner::on_frame(&inner);
			}
		});

		match this.host.request_frame(callback) {
			Ok(frame) => {
				this.state.borrow_mut().frame = Some(frame);
				true
			}
			Err(e) => {
				warn!("birthday-card: could not request a frame, dropping confetti: {}", e);
				this.state.borrow_mut().field.clear();
				false
			}
		}
	}

	fn on_frame(this: &Rc<Self>) {
		let alive = {
			let mut guard = this.state.borrow_mut();
			let state = &mut *guard;
			state.frame = None;
			let alive = state.field.step();
			if let Some(surface) = state.surface.as_mut() {
				render(&state.field, surface);
			}
			alive
		};

		if alive > 0 {
			Inner::schedule(this);
		} else {
			debug!("birthday-card: confetti loop stopped");
		}
	}
}


#[cfg(test)]
mod tests {
	use super::testing::FakeHost;
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn animator(host: &FakeHost) -> Confetti<FakeHost> {
		Confetti::new(
			host.clone(),
			ConfettiStyle::party(),
			Box::new(StdRng::seed_from_u64(42)),
		)
	}

	#[test]
	fn test_spawn_starts_a_single_loop() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		assert!(!confetti.is_running());

		assert_eq!(confetti.spawn(Burst::CENTER), 140);
		assert_eq!(confetti.spawn(Burst::LEFT), 80);
		assert_eq!(confetti.spawn(Burst::RIGHT), 80);

		assert!(confetti.is_running());
		assert_eq!(confetti.live_count(), 300);
		assert_eq!(host.pending_frames(), 1);
	}

	#[test]
	fn test_surface_is_created_once() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		confetti.spawn(Burst::CENTER);
		host.run_frame();
		confetti.spawn(Burst::LEFT);
		assert_eq!(host.surfaces_created.get(), 1);
	}

	#[test]
	fn test_loop_runs_iff_particles_are_live() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		confetti.spawn(Burst::CENTER);

		let mut frames = 0;
		while host.run_frame() {
			frames += 1;
			assert_eq!(confetti.is_running(), confetti.live_count() > 0);
			assert!(frames <= 100, "loop did not stop");
		}

		// The longest ttl is under 1600 ms, i.e. at most 100 ticks.
		assert!(frames >= 57);
		assert!(!confetti.is_running());
		assert_eq!(confetti.live_count(), 0);
		assert_eq!(host.pending_frames(), 0);
		assert!(host.surface.0.borrow().last_frame().is_empty());
	}

	#[test]
	fn test_each_frame_redraws_live_pieces() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		confetti.spawn(Burst::at(25, 0.5, 0.5));
		host.run_frame();

		let surface = host.surface.0.borrow();
		assert_eq!(surface.clears(), 1);
		assert_eq!(surface.last_frame().len(), 25);
	}

	#[test]
	fn test_zero_count_spawn_does_not_start_loop() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		assert_eq!(confetti.spawn(Burst::at(0, 0.5, 0.5)), 0);
		assert!(!confetti.is_running());
		assert_eq!(host.pending_frames(), 0);
	}

	#[test]
	fn test_missing_surface_drops_the_burst() {
		let host = FakeHost::new(1000.0, 800.0);
		host.surface_fails.set(true);
		let confetti = animator(&host);

		assert_eq!(confetti.spawn(Burst::CENTER), 0);
		assert_eq!(confetti.live_count(), 0);
		assert!(!confetti.is_running());

		host.surface_fails.set(false);
		assert_eq!(confetti.spawn(Burst::CENTER), 140);
		assert!(confetti.is_running());
	}

	#[test]
	fn test_frame_request_failure_clears_field() {
		let host = FakeHost::new(1000.0, 800.0);
		host.frame_fails.set(true);
		let confetti = animator(&host);

		assert_eq!(confetti.spawn(Burst::CENTER), 0);
		assert!(!confetti.is_running());
		assert_eq!(confetti.live_count(), 0);
	}

	#[test]
	fn test_resize_affects_only_later_bursts() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		confetti.spawn(Burst::at(3, 0.5, 0.5));

		host.surface.0.borrow_mut().width = 200.0;
		confetti.spawn(Burst::at(3, 0.5, 0.5));

		let xs: Vec<f64> = confetti
			.inner
			.state
			.borrow()
			.field
			.particles()
			.iter()
			.map(|p| p.x)
			.collect();
		assert_eq!(xs, vec![500.0, 500.0, 500.0, 100.0, 100.0, 100.0]);
	}

	#[test]
	fn test_dropping_animator_cancels_pending_frame() {
		let host = FakeHost::new(1000.0, 800.0);
		let confetti = animator(&host);
		confetti.spawn(Burst::CENTER);
		assert_eq!(host.pending_frames(), 1);

		drop(confetti);
		assert_eq!(host.pending_frames(), 0);
	}
}
