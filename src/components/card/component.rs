//! Leptos component rendering the card.
//!
//! The markup is static apart from the audio toggle. Once the dialog, backdrop
//! and `<audio>` nodes are mounted an effect wires them into a [`WebCard`],
//! which every event handler below forwards to.

use std::cell::OnceCell;
use std::rc::Rc;

use leptos::html;
use leptos::prelude::*;
use log::warn;
use web_sys::{Event, KeyboardEvent, MouseEvent};

use super::web::WebCard;
use crate::config::CardConfig;

/// Renders the cake trigger, the card dialog and the music controls.
#[component]
pub fn BirthdayCard(config: CardConfig) -> impl IntoView {
	let modal_ref = NodeRef::<html::Section>::new();
	let backdrop_ref = NodeRef::<html::Div>::new();
	let audio_ref = NodeRef::<html::Audio>::new();
	let pressed = RwSignal::new(false);

	let card: Rc<OnceCell<WebCard>> = Rc::default();

	let (card_init, config_init) = (card.clone(), config.clone());
	Effect::new(move |_| {
		let (Some(modal), Some(backdrop), Some(audio)) =
			(modal_ref.get(), backdrop_ref.get(), audio_ref.get())
		else {
			return;
		};
		if card_init.get().is_some() {
			return;
		}
		match WebCard::mount(&config_init, modal, backdrop.into(), audio, move |on| pressed.set(on)) {
			Ok(mounted) => {
				let _ = card_init.set(mounted);
			}
			Err(e) => warn!("birthday-card: card is inert: {}", e),
		}
	});

	let card_open = card.clone();
	let on_cake_click = move |_: MouseEvent| {
		if let Some(c) = card_open.get() {
			c.open();
		}
	};

	let card_trigger = card.clone();
	let on_cake_keydown = move |ev: KeyboardEvent| {
		if let Some(c) = card_trigger.get() {
			c.trigger_key(&ev);
		}
	};

	let card_backdrop = card.clone();
	let on_backdrop_click = move |_: MouseEvent| {
		if let Some(c) = card_backdrop.get() {
			c.close();
		}
	};

	let card_close = card.clone();
	let on_close_click = move |_: MouseEvent| {
		if let Some(c) = card_close.get() {
			c.close();
		}
	};

	let card_replay = card.clone();
	let on_replay_click = move |_: MouseEvent| {
		if let Some(c) = card_replay.get() {
			c.replay();
		}
	};

	let card_keys = card.clone();
	let on_modal_keydown = move |ev: KeyboardEvent| {
		if let Some(c) = card_keys.get() {
			c.dialog_key(&ev);
		}
	};

	let card_toggle = card.clone();
	let on_toggle_click = move |_: MouseEvent| {
		if let Some(c) = card_toggle.get() {
			c.toggle_music();
		}
	};

	let card_paused = card;
	let on_media_pause = move |_: Event| {
		if let Some(c) = card_paused.get() {
			c.music_paused();
		}
	};

	let CardConfig {
		title,
		message,
		signature,
		cake_hint,
		audio,
		labels,
		..
	} = config;
	let (play_label, mute_label) = (labels.play, labels.mute);
	let cake_aria_label = cake_hint.clone();

	view! {
		<main class="scene">
			<div
				id="cake"
				class="cake"
				role="button"
				tabindex="0"
				aria-haspopup="dialog"
				aria-controls="modal"
				aria-label=cake_aria_label
				on:click=on_cake_click
				on:keydown=on_cake_keydown
			>
				<span class="cake-emoji" aria-hidden="true">"🎂"</span>
				<span class="cake-hint">{cake_hint}</span>
			</div>

			<button
				id="toggle-audio"
				class="audio-toggle"
				type="button"
				aria-pressed=move || if pressed.get() { "true" } else { "false" }
				on:click=on_toggle_click
			>
				{move || if pressed.get() { mute_label.clone() } else { play_label.clone() }}
			</button>
			<audio id="bgm" preload="auto" src=audio.src node_ref=audio_ref on:pause=on_media_pause></audio>
		</main>

		<div id="backdrop" class="backdrop" aria-hidden="true" node_ref=backdrop_ref on:click=on_backdrop_click></div>

		<section
			id="modal"
			class="modal"
			role="dialog"
			aria-modal="true"
			aria-labelledby="card-title"
			tabindex="-1"
			node_ref=modal_ref
			on:keydown=on_modal_keydown
		>
			<h2 id="card-title">{title}</h2>
			{message.into_iter().map(|paragraph| view! { <p>{paragraph}</p> }).collect_view()}
			{signature.map(|line| view! { <p class="signature">{line}</p> })}
			<div class="actions">
				<button id="replay" type="button" on:click=on_replay_click>{labels.replay}</button>
				<button id="close" type="button" on:click=on_close_click>{labels.close}</button>
			</div>
		</section>
	}
}
