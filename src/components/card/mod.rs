//! The greeting card: a cake trigger, a focus-trapped dialog with the
//! message, confetti and optional background music.

pub mod audio;
mod component;
pub mod modal;
mod web;

pub use audio::{MediaHandle, MusicPlayer, Playback, PlaybackState};
pub use component::BirthdayCard;
pub use modal::{CardEffects, DialogHost, KeyOutcome, ModalController, ModalState, TimerHandle, Timers};
pub use web::{WebAudio, WebCard, WebDialog, WebTimers};

use crate::components::confetti::{Burst, Confetti, ConfettiHost};

/// What opening the card sets off: confetti and music.
pub struct Celebration<H: ConfettiHost, M: MediaHandle> {
	pub confetti: Confetti<H>,
	pub music: MusicPlayer<M>,
}

impl<H: ConfettiHost, M: MediaHandle> CardEffects for Celebration<H, M> {
	fn burst(&self, burst: Burst) {
		self.confetti.spawn(burst);
	}

	fn play_music(&self) {
		self.music.autoplay();
	}

	fn stop_music(&self) {
		self.music.stop();
	}
}
