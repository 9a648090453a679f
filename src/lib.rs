//! birthday-card: Interactive birthday greeting card.
//!
//! This crate provides a WASM-based greeting card: tapping the cake opens a
//! focus-trapped dialog with the message, launches canvas confetti and starts
//! optional background music.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use getrandom as _;

pub mod components;
pub mod config;
pub mod error;
pub mod input;

pub use components::card::BirthdayCard;
pub use components::confetti::{Burst, Confetti, ConfettiStyle};
pub use config::CardConfig;
pub use error::CardError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("birthday-card: logging initialized");
}

/// Load the card configuration from a script element with id="card-config".
/// A missing element yields the defaults; a broken one is reported and ignored.
fn load_card_config() -> CardConfig {
	let Some(text) = card_config_text() else {
		return CardConfig::default();
	};

	match CardConfig::from_json(&text) {
		Ok(config) => {
			info!(
				"birthday-card: loaded config, {} message paragraphs",
				config.message.len()
			);
			config
		}
		Err(e) => {
			warn!("birthday-card: {}, using defaults", e);
			CardConfig::default()
		}
	}
}

fn card_config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("card-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Loads the card configuration from the DOM and renders the card.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_card_config();
	let (lang, title) = (config.lang.clone(), config.title.clone());

	view! {
		<Html attr:lang=lang attr:dir="ltr" />
		<Title text=title />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<BirthdayCard config=config />
	}
}
