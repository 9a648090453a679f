//! Open/close state of the card dialog, focus capture and the keyboard trap.

use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{info, warn};

use crate::components::confetti::Burst;
use crate::error::Result;
use crate::input::{Key, KeyboardInput};

/// Delay between the opening burst and the two side bursts.
pub const SIDE_BURST_DELAY: Duration = Duration::from_millis(260);

/// Selector for elements that take part in the dialog's tab cycle.
pub const FOCUSABLE_SELECTOR: &str = concat!(
	"a[href], button:not([disabled]), textarea, input, select, ",
	r#"[tabindex]:not([tabindex^="-"])"#,
);

/// Dialog visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalState {
	#[default]
	Closed,
	Open,
}

/// Whether a key press was consumed. Handled presses should have their
/// browser default suppressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
	Handled,
	Ignored,
}

/// Document access the controller needs.
pub trait DialogHost {
	type Element: Clone + PartialEq;

	/// The element that currently has keyboard focus.
	fn active_element(&self) -> Option<Self::Element>;

	/// The dialog container itself.
	fn dialog(&self) -> Self::Element;

	/// Focusable descendants of the dialog, in document order.
	fn focusable(&self) -> Vec<Self::Element>;

	/// Move focus without scrolling.
	fn focus(&self, element: &Self::Element);

	/// Show or hide the overlay.
	fn set_open(&self, open: bool);
}

/// Side effects of opening and closing the card.
pub trait CardEffects {
	fn burst(&self, burst: Burst);
	fn play_music(&self);
	fn stop_music(&self);
}

/// A scheduled one-shot callback.
pub trait TimerHandle {
	fn cancel(&self);
}

/// One-shot timeouts.
pub trait Timers {
	type Handle: TimerHandle;

	fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<Self::Handle>;
}

/// Drives the card dialog.
pub struct ModalController<D: DialogHost, T: Timers, E: CardEffects + 'static> {
	dialog: D,
	timers: T,
	effects: Rc<E>,
	state: ModalState,
	restore_focus: Option<D::Element>,
	side_bursts: Option<T::Handle>,
}

impl<D: DialogHost, T: Timers, E: CardEffects + 'static> ModalController<D, T, E> {
	pub fn new(dialog: D, timers: T, effects: Rc<E>) -> Self {
		Self {
			dialog,
			timers,
			effects,
			state: ModalState::Closed,
			restore_focus: None,
			side_bursts: None,
		}
	}

	pub fn state(&self) -> ModalState {
		self.state
	}

	pub fn is_open(&self) -> bool {
		self.state == ModalState::Open
	}

	/// Open the card. Returns false if it was already open.
	pub fn open(&mut self) -> bool {
		if self.is_open() {
			return false;
		}
		self.state = ModalState::Open;
		self.restore_focus = self.dialog.active_element();
		self.dialog.set_open(true);

		let target = self
			.dialog
			.focusable()
			.into_iter()
			.next()
			.unwrap_or_else(|| self.dialog.dialog());
		self.dialog.focus(&target);

		self.effects.burst(Burst::CENTER);
		self.schedule_side_bursts();
		self.effects.play_music();

		info!("birthday-card: card opened");
		true
	}

	/// Close the card. Returns false if it was already closed.
	pub fn close(&mut self) -> bool {
		if !self.is_open() {
			return false;
		}
		self.state = ModalState::Closed;
		self.dialog.set_open(false);

		if let Some(pending) = self.side_bursts.take() {
			pending.cancel();
		}
		if let Some(element) = self.restore_focus.take() {
			self.dialog.focus(&element);
		}
		self.effects.stop_music();

		info!("birthday-card: card closed");
		true
	}

	/// Fire another opening burst without touching the dialog.
	pub fn replay(&self) {
		self.effects.burst(Burst::CENTER);
	}

	/// Keys pressed on the cake trigger: Enter and Space open a closed card.
	pub fn handle_trigger_key(&mut self, input: &KeyboardInput) -> KeyOutcome {
		if input.is_activation() && self.open() {
			KeyOutcome::Handled
		} else {
			KeyOutcome::Ignored
		}
	}

	/// Keys pressed inside the dialog.
	pub fn handle_key(&mut self, input: &KeyboardInput) -> KeyOutcome {
		if !self.is_open() {
			return KeyOutcome::Ignored;
		}
		match input.key {
			Key::Escape => {
				self.close();
				KeyOutcome::Handled
			}
			Key::Tab => self.trap_tab(input.modifiers.shift),
			_ => KeyOutcome::Ignored,
		}
	}

	/// Wrap Tab from the last focusable to the first, Shift+Tab the other way.
	fn trap_tab(&self, backwards: bool) -> KeyOutcome {
		let focusable = self.dialog.focusable();
		let (Some(first), Some(last)) = (focusable.first(), focusable.last()) else {
			return KeyOutcome::Ignored;
		};

		let active = self.dialog.active_element();
		let (edge, wrap_to) = if backwards { (first, last) } else { (last, first) };
		if active.as_ref() != Some(edge) {
			return KeyOutcome::Ignored;
		}
		self.dialog.focus(wrap_to);
		KeyOutcome::Handled
	}

	fn schedule_side_bursts(&mut self) {
		if let Some(stale) = self.side_bursts.take() {
			stale.cancel();
		}

		let effects: Weak<E> = Rc::downgrade(&self.effects);
		let fire = Box::new(move || {
			if let Some(effects) = effects.upgrade() {
				effects.burst(Burst::LEFT);
				effects.burst(Burst::RIGHT);
			}
		});

		match self.timers.after(SIDE_BURST_DELAY, fire) {
			Ok(handle) => self.side_bursts = Some(handle),
			Err(e) => warn!("birthday-card: side bursts skipped: {}", e),
		}
	}
}


#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::testing::ManualTimers;
	use super::*;

	const DIALOG: &str = "modal";

	#[derive(Default)]
	struct FakeDialog {
		active: RefCell<Option<&'static str>>,
		focusable: RefCell<Vec<&'static str>>,
		open: RefCell<bool>,
	}

	impl FakeDialog {
		fn with_focusable(items: &[&'static str]) -> Self {
			let dialog = Self::default();
			*dialog.focusable.borrow_mut() = items.to_vec();
			*dialog.active.borrow_mut() = Some("cake");
			dialog
		}

		fn active(&self) -> Option<&'static str> {
			*self.active.borrow()
		}
	}

	impl DialogHost for Rc<FakeDialog> {
		type Element = &'static str;

		fn active_element(&self) -> Option<&'static str> {
			*self.active.borrow()
		}

		fn dialog(&self) -> &'static str {
			DIALOG
		}

		fn focusable(&self) -> Vec<&'static str> {
			self.focusable.borrow().clone()
		}

		fn focus(&self, element: &&'static str) {
			*self.active.borrow_mut() = Some(*element);
		}

		fn set_open(&self, open: bool) {
			*self.open.borrow_mut() = open;
		}
	}

	#[derive(Clone, Debug, PartialEq)]
	enum Effect {
		Burst(Burst),
		Play,
		Stop,
	}

	#[derive(Default)]
	struct RecordingEffects {
		log: RefCell<Vec<Effect>>,
	}

	impl CardEffects for RecordingEffects {
		fn burst(&self, burst: Burst) {
			self.log.borrow_mut().push(Effect::Burst(burst));
		}

		fn play_music(&self) {
			self.log.borrow_mut().push(Effect::Play);
		}

		fn stop_music(&self) {
			self.log.borrow_mut().push(Effect::Stop);
		}
	}

	type Controller = ModalController<Rc<FakeDialog>, ManualTimers, RecordingEffects>;

	fn controller(items: &[&'static str]) -> (Controller, Rc<FakeDialog>, ManualTimers, Rc<RecordingEffects>) {
		let dialog = Rc::new(FakeDialog::with_focusable(items));
		let timers = ManualTimers::default();
		let effects = Rc::new(RecordingEffects::default());
		let modal = ModalController::new(dialog.clone(), timers.clone(), effects.clone());
		(modal, dialog, timers, effects)
	}

	fn tab() -> KeyboardInput {
		KeyboardInput::plain(Key::Tab)
	}

	fn shift_tab() -> KeyboardInput {
		KeyboardInput::shifted(Key::Tab)
	}

	#[test]
	fn test_open_focuses_first_and_fires_effects() {
		let (mut modal, dialog, timers, effects) = controller(&["close", "replay"]);

		assert_eq!(modal.state(), ModalState::Closed);
		assert!(modal.open());
		assert_eq!(modal.state(), ModalState::Open);
		assert!(*dialog.open.borrow());
		assert_eq!(dialog.active(), Some("close"));
		assert_eq!(
			*effects.log.borrow(),
			vec![Effect::Burst(Burst::CENTER), Effect::Play]
		);
		assert_eq!(timers.pending(), vec![SIDE_BURST_DELAY]);

		assert_eq!(timers.fire_all(), 1);
		assert_eq!(
			effects.log.borrow()[2..],
			[Effect::Burst(Burst::LEFT), Effect::Burst(Burst::RIGHT)]
		);
	}

	#[test]
	fn test_open_without_focusables_focuses_dialog() {
		let (mut modal, dialog, _, _) = controller(&[]);
		modal.open();
		assert_eq!(dialog.active(), Some(DIALOG));
	}

	#[test]
	fn test_close_restores_focus() {
		let (mut modal, dialog, _, effects) = controller(&["close"]);
		modal.open();
		assert!(modal.close());

		assert_eq!(dialog.active(), Some("cake"));
		assert!(!*dialog.open.borrow());
		assert_eq!(effects.log.borrow().last(), Some(&Effect::Stop));
	}

	#[test]
	fn test_open_and_close_are_idempotent() {
		let (mut modal, _, timers, effects) = controller(&["close"]);
		assert!(!modal.close());
		assert!(effects.log.borrow().is_empty());

		assert!(modal.open());
		assert!(!modal.open());
		assert_eq!(timers.pending().len(), 1);
		assert_eq!(effects.log.borrow().len(), 2);

		assert!(modal.close());
		assert!(!modal.close());
		assert_eq!(effects.log.borrow().len(), 3);
	}

	#[test]
	fn test_side_bursts_do_not_fire_after_close() {
		let (mut modal, _, timers, effects) = controller(&["close"]);
		modal.open();
		modal.close();

		assert_eq!(timers.fire_all(), 0);
		let bursts = effects
			.log
			.borrow()
			.iter()
			.filter(|e| matches!(e, Effect::Burst(_)))
			.count();
		assert_eq!(bursts, 1);
	}

	#[test]
	fn test_single_focusable_keeps_focus() {
		let (mut modal, dialog, _, _) = controller(&["close"]);
		modal.open();

		assert_eq!(modal.handle_key(&tab()), KeyOutcome::Handled);
		assert_eq!(dialog.active(), Some("close"));
		assert_eq!(modal.handle_key(&shift_tab()), KeyOutcome::Handled);
		assert_eq!(dialog.active(), Some("close"));
	}

	#[test]
	fn test_tab_wraps_around_the_dialog() {
		let (mut modal, dialog, _, _) = controller(&["a", "b", "c"]);
		modal.open();
		assert_eq!(dialog.active(), Some("a"));

		// Moving forward from the middle is left to the browser.
		modal.dialog.focus(&"b");
		assert_eq!(modal.handle_key(&tab()), KeyOutcome::Ignored);

		modal.dialog.focus(&"c");
		assert_eq!(modal.handle_key(&tab()), KeyOutcome::Handled);
		assert_eq!(dialog.active(), Some("a"));

		assert_eq!(modal.handle_key(&shift_tab()), KeyOutcome::Handled);
		assert_eq!(dialog.active(), Some("c"));
	}

	#[test]
	fn test_tab_without_focusables_is_ignored() {
		let (mut modal, dialog, _, _) = controller(&[]);
		modal.open();
		assert_eq!(modal.handle_key(&tab()), KeyOutcome::Ignored);
		assert_eq!(dialog.active(), Some(DIALOG));
	}

	#[test]
	fn test_escape_closes() {
		let (mut modal, dialog, _, _) = controller(&["close"]);
		modal.open();
		assert_eq!(
			modal.handle_key(&KeyboardInput::plain(Key::Escape)),
			KeyOutcome::Handled
		);
		assert!(!modal.is_open());
		assert_eq!(dialog.active(), Some("cake"));
	}

	#[test]
	fn test_keys_are_ignored_while_closed() {
		let (mut modal, _, _, _) = controller(&["close"]);
		assert_eq!(modal.handle_key(&tab()), KeyOutcome::Ignored);
		assert_eq!(
			modal.handle_key(&KeyboardInput::plain(Key::Escape)),
			KeyOutcome::Ignored
		);
		assert_eq!(
			modal.handle_key(&KeyboardInput::plain(Key::Char('x'))),
			KeyOutcome::Ignored
		);
	}

	#[test]
	fn test_trigger_opens_on_enter_and_space() {
		let (mut modal, _, _, _) = controller(&["close"]);
		assert_eq!(
			modal.handle_trigger_key(&KeyboardInput::plain(Key::Char('a'))),
			KeyOutcome::Ignored
		);
		assert!(!modal.is_open());

		assert_eq!(
			modal.handle_trigger_key(&KeyboardInput::plain(Key::Space)),
			KeyOutcome::Handled
		);
		assert!(modal.is_open());

		modal.close();
		modal.handle_trigger_key(&KeyboardInput::plain(Key::Enter));
		assert!(modal.is_open());
	}

	#[test]
	fn test_trigger_keys_pass_through_while_open() {
		let (mut modal, _, timers, effects) = controller(&["close"]);
		modal.open();

		assert_eq!(
			modal.handle_trigger_key(&KeyboardInput::plain(Key::Enter)),
			KeyOutcome::Ignored
		);
		assert_eq!(modal.state(), ModalState::Open);
		assert_eq!(timers.pending().len(), 1);
		assert_eq!(effects.log.borrow().len(), 2);
	}

	#[test]
	fn test_replay_only_bursts() {
		let (modal, dialog, _, effects) = controller(&["close"]);
		modal.replay();
		assert_eq!(*effects.log.borrow(), vec![Effect::Burst(Burst::CENTER)]);
		assert!(!*dialog.open.borrow());
	}
}
