//! Browser implementations of the card's host traits and the wiring that ties
//! them to the rendered elements.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle};
use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, FocusOptions, HtmlAudioElement, HtmlElement, KeyboardEvent};

use super::audio::{MediaHandle, MusicPlayer};
use super::modal::{DialogHost, FOCUSABLE_SELECTOR, KeyOutcome, ModalController, TimerHandle, Timers};
use super::Celebration;
use crate::components::confetti::{CanvasHost, Confetti, ConfettiStyle};
use crate::config::CardConfig;
use crate::error::{CardError, Result};
use crate::input::KeyboardInput;

/// The card dialog as rendered in the document.
pub struct WebDialog {
	document: Document,
	backdrop: HtmlElement,
	modal: HtmlElement,
}

impl DialogHost for WebDialog {
	type Element = HtmlElement;

	fn active_element(&self) -> Option<HtmlElement> {
		self.document.active_element()?.dyn_into().ok()
	}

	fn dialog(&self) -> HtmlElement {
		self.modal.clone()
	}

	fn focusable(&self) -> Vec<HtmlElement> {
		let Ok(nodes) = self.modal.query_selector_all(FOCUSABLE_SELECTOR) else {
			return Vec::new();
		};
		(0..nodes.length())
			.filter_map(|i| nodes.item(i))
			.filter_map(|node| node.dyn_into::<HtmlElement>().ok())
			.collect()
	}

	fn focus(&self, element: &HtmlElement) {
		let options = FocusOptions::new();
		options.set_prevent_scroll(true);
		let _ = element.focus_with_options(&options);
	}

	fn set_open(&self, open: bool) {
		if let Some(body) = self.document.body() {
			let _ = body.class_list().toggle_with_force("open", open);
		}
		let hidden = if open { "false" } else { "true" };
		let _ = self.backdrop.set_attribute("aria-hidden", hidden);
	}
}

/// `setTimeout`-backed timers.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebTimers;

impl Timers for WebTimers {
	type Handle = TimeoutHandle;

	fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<TimeoutHandle> {
		set_timeout_with_handle(callback, delay).map_err(|e| CardError::dom(&e))
	}
}

impl TimerHandle for TimeoutHandle {
	fn cancel(&self) {
		self.clear();
	}
}

/// The `<audio>` element carrying the background track.
pub struct WebAudio(pub HtmlAudioElement);

impl MediaHandle for WebAudio {
	fn set_volume(&self, volume: f64) {
		self.0.set_volume(volume);
	}

	fn play(&self, settled: Box<dyn FnOnce(Result<()>)>) {
		match self.0.play() {
			Ok(promise) => spawn_local(async move {
				let result = JsFuture::from(promise)
					.await
					.map(|_| ())
					.map_err(|e| CardError::playback(&e));
				settled(result);
			}),
			Err(e) => settled(Err(CardError::playback(&e))),
		}
	}

	fn pause(&self) {
		let _ = self.0.pause();
	}
}

type WebCelebration = Celebration<CanvasHost, WebAudio>;

/// A mounted card: the dialog controller plus the celebration it triggers.
pub struct WebCard {
	modal: RefCell<ModalController<WebDialog, WebTimers, WebCelebration>>,
	effects: Rc<WebCelebration>,
}

impl WebCard {
	/// Wire the card to its rendered elements. `on_music_change` receives the
	/// pressed state of the audio toggle whenever it changes.
	pub fn mount(
		config: &CardConfig,
		modal: HtmlElement,
		backdrop: HtmlElement,
		audio: HtmlAudioElement,
		on_music_change: impl Fn(bool) + 'static,
	) -> Result<Self> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| CardError::Dom("no document".into()))?;

		audio.set_loop(config.audio.looped);

		let effects = Rc::new(Celebration {
			confetti: Confetti::new(CanvasHost, ConfettiStyle::party(), Box::new(rand::rng())),
			music: MusicPlayer::new(WebAudio(audio), config.audio.volume, on_music_change),
		});
		let dialog = WebDialog {
			document,
			backdrop,
			modal,
		};

		info!("birthday-card: card wired");
		Ok(Self {
			modal: RefCell::new(ModalController::new(dialog, WebTimers, effects.clone())),
			effects,
		})
	}

	pub fn open(&self) {
		self.modal.borrow_mut().open();
	}

	pub fn close(&self) {
		self.modal.borrow_mut().close();
	}

	pub fn replay(&self) {
		self.modal.borrow().replay();
	}

	/// Keydown on the cake trigger.
	pub fn trigger_key(&self, ev: &KeyboardEvent) {
		let input = KeyboardInput::from(ev);
		if self.modal.borrow_mut().handle_trigger_key(&input) == KeyOutcome::Handled {
			ev.prevent_default();
		}
	}

	/// Keydown inside the dialog.
	pub fn dialog_key(&self, ev: &KeyboardEvent) {
		let input = KeyboardInput::from(ev);
		if self.modal.borrow_mut().handle_key(&input) == KeyOutcome::Handled {
			ev.prevent_default();
		}
	}

	pub fn toggle_music(&self) {
		self.effects.music.toggle();
	}

	pub fn music_paused(&self) {
		self.effects.music.media_paused();
	}
}
