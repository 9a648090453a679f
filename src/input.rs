//! Keyboard input as seen by the card.
//!
//! DOM `KeyboardEvent.key` strings are mapped to a small key enum so the modal
//! logic can be driven (and tested) without a browser.

use web_sys::KeyboardEvent;

/// Keys the card reacts to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
	Escape,
	Tab,
	Enter,
	Space,
	/// Any other printable character.
	Char(char),
	/// Anything else (arrows, function keys, dead keys, ...).
	Unknown,
}

impl Key {
	/// Map a DOM `KeyboardEvent.key` value.
	pub fn from_dom(key: &str) -> Self {
		match key {
			"Escape" | "Esc" => Key::Escape,
			"Tab" => Key::Tab,
			"Enter" => Key::Enter,
			" " | "Spacebar" => Key::Space,
			_ => {
				let mut chars = key.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => Key::Char(c),
					_ => Key::Unknown,
				}
			}
		}
	}
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
	pub shift: bool,
	pub ctrl: bool,
	pub alt: bool,
	pub meta: bool,
}

/// A key press together with the modifiers held at the time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardInput {
	pub key: Key,
	pub modifiers: Modifiers,
}

impl KeyboardInput {
	/// A key press without modifiers.
	pub fn plain(key: Key) -> Self {
		Self {
			key,
			modifiers: Modifiers::default(),
		}
	}

	/// A key press with only Shift held.
	pub fn shifted(key: Key) -> Self {
		Self {
			key,
			modifiers: Modifiers {
				shift: true,
				..Modifiers::default()
			},
		}
	}

	/// Enter or Space: keys that activate a button-like element.
	pub fn is_activation(&self) -> bool {
		matches!(self.key, Key::Enter | Key::Space)
	}
}

impl From<&KeyboardEvent> for KeyboardInput {
	fn from(ev: &KeyboardEvent) -> Self {
		Self {
			key: Key::from_dom(&ev.key()),
			modifiers: Modifiers {
				shift: ev.shift_key(),
				ctrl: ev.ctrl_key(),
				alt: ev.alt_key(),
				meta: ev.meta_key(),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_named_keys() {
		assert_eq!(Key::from_dom("Escape"), Key::Escape);
		assert_eq!(Key::from_dom("Tab"), Key::Tab);
		assert_eq!(Key::from_dom("Enter"), Key::Enter);
		assert_eq!(Key::from_dom(" "), Key::Space);
	}

	#[test]
	fn test_characters_and_unknown_keys() {
		assert_eq!(Key::from_dom("a"), Key::Char('a'));
		assert_eq!(Key::from_dom("ñ"), Key::Char('ñ'));
		assert_eq!(Key::from_dom("ArrowLeft"), Key::Unknown);
		assert_eq!(Key::from_dom(""), Key::Unknown);
	}

	#[test]
	fn test_activation_keys() {
		assert!(KeyboardInput::plain(Key::Enter).is_activation());
		assert!(KeyboardInput::plain(Key::Space).is_activation());
		assert!(!KeyboardInput::plain(Key::Tab).is_activation());
		assert!(KeyboardInput::shifted(Key::Tab).modifiers.shift);
	}

	#[test]
	fn test_constructors_set_only_the_named_modifiers() {
		let plain = KeyboardInput::plain(Key::Enter).modifiers;
		assert_eq!(plain, Modifiers::default());
		assert!(!plain.shift && !plain.ctrl && !plain.alt && !plain.meta);

		let shifted = KeyboardInput::shifted(Key::Tab).modifiers;
		assert!(shifted.shift);
		assert!(!shifted.ctrl && !shifted.alt && !shifted.meta);
	}
}
