//! Error types for the card.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Errors that can occur while wiring up or running the card.
#[derive(Error, Debug)]
pub enum CardError {
	/// The card configuration is structurally valid JSON but has bad values.
	#[error("invalid card configuration: {0}")]
	Config(String),

	/// The card configuration could not be parsed.
	#[error("failed to parse card configuration: {0}")]
	Json(#[from] serde_json::Error),

	/// A DOM, canvas or scheduling call failed.
	#[error("DOM operation failed: {0}")]
	Dom(String),

	/// The browser refused to start audio playback.
	#[error("playback rejected: {0}")]
	Playback(String),
}

impl CardError {
	/// Wrap a JavaScript exception raised by a DOM call.
	pub fn dom(value: &JsValue) -> Self {
		CardError::Dom(js_message(value))
	}

	/// Wrap the rejection reason of a media `play()` promise.
	pub fn playback(value: &JsValue) -> Self {
		CardError::Playback(js_message(value))
	}
}

/// Best-effort human readable text for a thrown JavaScript value.
fn js_message(value: &JsValue) -> String {
	if let Some(text) = value.as_string() {
		return text;
	}
	match value.dyn_ref::<js_sys::Error>() {
		Some(err) => err.message().into(),
		None => format!("{value:?}"),
	}
}

/// Result type for card operations.
pub type Result<T> = std::result::Result<T, CardError>;
