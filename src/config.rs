//! Card content and behavior settings.
//!
//! The page embeds a JSON document in `<script id="card-config">`; every field
//! is optional and falls back to the defaults below.

use serde::Deserialize;

use crate::error::{CardError, Result};

/// Complete card configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CardConfig {
	/// Document language, applied to `<html lang>`.
	pub lang: String,
	/// Heading shown inside the card and used as the page title.
	pub title: String,
	/// Message paragraphs, rendered in order.
	pub message: Vec<String>,
	/// Optional closing line.
	pub signature: Option<String>,
	/// Short hint rendered under the cake trigger.
	pub cake_hint: String,
	/// Background music settings.
	pub audio: AudioConfig,
	/// Button labels.
	pub labels: Labels,
}

/// Background music settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
	/// Audio source URL. No music is offered when unset.
	pub src: Option<String>,
	/// Volume applied before every automatic start (0.0 to 1.0).
	pub volume: f64,
	/// Restart the track when it ends.
	pub looped: bool,
}

/// Button labels.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Labels {
	/// Audio toggle label while music is not playing.
	pub play: String,
	/// Audio toggle label while music is playing.
	pub mute: String,
	/// Close button label.
	pub close: String,
	/// Replay-confetti button label.
	pub replay: String,
}

impl Default for CardConfig {
	fn default() -> Self {
		Self {
			lang: "es".to_string(),
			title: "¡Feliz cumpleaños!".to_string(),
			message: vec![
				"Que este nuevo año venga lleno de risas, abrazos y sueños cumplidos.".to_string(),
				"Gracias por ser como eres. ¡A celebrar!".to_string(),
			],
			signature: None,
			cake_hint: "Toca el pastel".to_string(),
			audio: AudioConfig::default(),
			labels: Labels::default(),
		}
	}
}

impl Default for AudioConfig {
	fn default() -> Self {
		Self {
			src: None,
			volume: 0.35,
			looped: true,
		}
	}
}

impl Default for Labels {
	fn default() -> Self {
		Self {
			play: "🔊 Activar sonido".to_string(),
			mute: "🔇 Silenciar".to_string(),
			close: "Cerrar".to_string(),
			replay: "Otra vez 🎉".to_string(),
		}
	}
}

impl CardConfig {
	/// Parse and validate a configuration document.
	pub fn from_json(text: &str) -> Result<Self> {
		let config: CardConfig = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		if !(0.0..=1.0).contains(&self.audio.volume) {
			return Err(CardError::Config(format!(
				"audio.volume must be within 0.0..=1.0, got {}",
				self.audio.volume
			)));
		}
		Ok(())
	}
}
