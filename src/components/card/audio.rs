//! Background music.
//!
//! Starting playback is asynchronous and may be refused by the browser, and
//! the user can toggle again before a start settles. Every start therefore
//! carries a request id; a settlement for anything but the latest request is
//! dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::warn;

use crate::error::Result;

/// Who asked for playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOrigin {
	/// Opening the card.
	Auto,
	/// The audio toggle.
	User,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
	#[default]
	Idle,
	/// A start is pending.
	Starting { request: u64, origin: PlayOrigin },
	Playing,
	/// A pause was issued; waiting for the media to report it.
	Pausing,
}

/// What the media element should be told to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
	Play { request: u64 },
	Pause,
}

/// Result of delivering a start settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settled {
	/// The settlement belonged to the pending start.
	Current(PlayOrigin),
	/// A newer request or a pause superseded it.
	Stale,
}

/// The playback state machine, free of any media element.
#[derive(Clone, Debug, Default)]
pub struct Playback {
	state: PlaybackState,
	last_request: u64,
}

impl Playback {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> PlaybackState {
		self.state
	}

	/// The toggle reads as pressed only once playback has actually begun.
	pub fn is_pressed(&self) -> bool {
		self.state == PlaybackState::Playing
	}

	pub fn start(&mut self, origin: PlayOrigin) -> Option<Command> {
		match self.state {
			PlaybackState::Starting { .. } | PlaybackState::Playing => None,
			PlaybackState::Idle | PlaybackState::Pausing => {
				self.last_request += 1;
				let request = self.last_request;
				self.state = PlaybackState::Starting { request, origin };
				Some(Command::Play { request })
			}
		}
	}

	pub fn pause(&mut self) -> Option<Command> {
		match self.state {
			PlaybackState::Starting { .. } | PlaybackState::Playing => {
				self.state = PlaybackState::Pausing;
				Some(Command::Pause)
			}
			PlaybackState::Idle | PlaybackState::Pausing => None,
		}
	}

	pub fn toggle(&mut self) -> Option<Command> {
		match self.state {
			PlaybackState::Idle | PlaybackState::Pausing => self.start(PlayOrigin::User),
			PlaybackState::Starting { .. } | PlaybackState::Playing => self.pause(),
		}
	}

	pub fn settle(&mut self, request: u64, ok: bool) -> Settled {
		match self.state {
			PlaybackState::Starting {
				request: pending,
				origin,
			} if pending == request => {
				self.state = if ok {
					PlaybackState::Playing
				} else {
					PlaybackState::Idle
				};
				Settled::Current(origin)
			}
			_ => Settled::Stale,
		}
	}

	/// The media element reported that it is paused.
	pub fn media_paused(&mut self) {
		if matches!(self.state, PlaybackState::Playing | PlaybackState::Pausing) {
			self.state = PlaybackState::Idle;
		}
	}
}

/// A playable media element.
pub trait MediaHandle: 'static {
	fn set_volume(&self, volume: f64);

	/// Begin playback and call `settled` once the start succeeds or fails.
	fn play(&self, settled: Box<dyn FnOnce(Result<()>)>);

	fn pause(&self);
}

/// Couples [`Playback`] to a media element and reports the pressed state of
/// the audio toggle through `on_change`.
pub struct MusicPlayer<M: MediaHandle> {
	inner: Rc<PlayerInner<M>>,
}

struct PlayerInner<M: MediaHandle> {
	media: M,
	volume: f64,
	playback: RefCell<Playback>,
	on_change: Box<dyn Fn(bool)>,
}

impl<M: MediaHandle> Clone for MusicPlayer<M> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<M: MediaHandle> MusicPlayer<M> {
	pub fn new(media: M, volume: f64, on_change: impl Fn(bool) + 'static) -> Self {
		Self {
			inner: Rc::new(PlayerInner {
				media,
				volume,
				playback: RefCell::new(Playback::new()),
				on_change: Box::new(on_change),
			}),
		}
	}

	pub fn state(&self) -> PlaybackState {
		self.inner.playback.borrow().state()
	}

	pub fn is_playing(&self) -> bool {
		self.inner.playback.borrow().is_pressed()
	}

	/// Best-effort start when the card opens.
	pub fn autoplay(&self) {
		self.inner.media.set_volume(self.inner.volume);
		PlayerInner::transition(&self.inner, |p| p.start(PlayOrigin::Auto));
	}

	/// The audio toggle was clicked.
	pub fn toggle(&self) {
		PlayerInner::transition(&self.inner, Playback::toggle);
	}

	/// The card closed.
	pub fn stop(&self) {
		PlayerInner::transition(&self.inner, Playback::pause);
	}

	/// The media element fired `pause`.
	pub fn media_paused(&self) {
		PlayerInner::transition(&self.inner, |p| {
			p.media_paused();
			None
		});
	}
}

impl<M: MediaHandle> PlayerInner<M> {
	/// Apply `step` and then, with the state released, notify and issue the
	/// resulting media command.
	fn transition(this: &Rc<Self>, step: impl FnOnce(&mut Playback) -> Option<Command>) {
		let (was_pressed, command, pressed) = {
			let mut playback = this.playback.borrow_mut();
			let was_pressed = playback.is_pressed();
			let command = step(&mut playback);
			(was_pressed, command, playback.is_pressed())
		};

		if was_pressed != pressed {
			(this.on_change)(pressed);
		}

		match command {
			Some(Command::Play { request }) => {
				let weak: Weak<Self> = Rc::downgrade(this);
				this.media.play(Box::new(move |result| {
					if let Some(inner) = weak.upgrade() {
						PlayerInner::settle(&inner, request, result);
					}
				}));
			}
			Some(Command::Pause) => this.media.pause(),
			None => {}
		}
	}

	fn settle(this: &Rc<Self>, request: u64, result: Result<()>) {
		let mut outcome = Settled::Stale;
		PlayerInner::transition(this, |p| {
			outcome = p.settle(request, result.is_ok());
			None
		});

		if let (Settled::Current(PlayOrigin::User), Err(e)) = (outcome, &result) {
			warn!("birthday-card: could not start music: {}", e);
		}
	}
}
