//! Browser host for the confetti animator: a full-viewport `<canvas>` overlay
//! and `requestAnimationFrame` scheduling.

use leptos::leptos_dom::helpers::{AnimationFrameRequestHandle, request_animation_frame_with_handle};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::animator::{ConfettiHost, FrameRequest};
use super::render::{ConfettiSurface, RotatedRect};
use super::theme::Color;
use crate::error::{CardError, Result};

/// Id of the overlay canvas appended to `<body>`.
pub const CANVAS_ID: &str = "confetti-canvas";

const CANVAS_STYLE: &str = "position:fixed;inset:0;pointer-events:none;z-index:1000";

/// Creates the confetti canvas and schedules frames with the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasHost;

impl ConfettiHost for CanvasHost {
	type Surface = CanvasSurface;
	type Frame = AnimationFrameRequestHandle;

	fn create_surface(&self) -> Result<CanvasSurface> {
		CanvasSurface::attach()
	}

	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<AnimationFrameRequestHandle> {
		request_animation_frame_with_handle(callback).map_err(|e| CardError::dom(&e))
	}
}

impl FrameRequest for AnimationFrameRequestHandle {
	fn cancel(&self) {
		AnimationFrameRequestHandle::cancel(self);
	}
}

/// The overlay canvas, kept at viewport size for as long as it lives.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	on_resize: Closure<dyn FnMut()>,
}

impl CanvasSurface {
	fn attach() -> Result<Self> {
		let window = web_sys::window().ok_or_else(|| CardError::Dom("no window".into()))?;
		let document = window
			.document()
			.ok_or_else(|| CardError::Dom("no document".into()))?;
		let body = document
			.body()
			.ok_or_else(|| CardError::Dom("no <body>".into()))?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(|e| CardError::dom(&e))?
			.dyn_into()
			.map_err(|_| CardError::Dom("created element is not a canvas".into()))?;
		canvas.set_id(CANVAS_ID);
		canvas
			.set_attribute("style", CANVAS_STYLE)
			.map_err(|e| CardError::dom(&e))?;
		canvas
			.set_attribute("aria-hidden", "true")
			.map_err(|e| CardError::dom(&e))?;

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| CardError::dom(&e))?
			.ok_or_else(|| CardError::Dom("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| CardError::Dom("unexpected 2d context type".into()))?;

		fit_to_viewport(&window, &canvas);

		let canvas_resize = canvas.clone();
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			if let Some(win) = web_sys::window() {
				fit_to_viewport(&win, &canvas_resize);
			}
		});
		window
			.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
			.map_err(|e| CardError::dom(&e))?;

		// Attached last; a failed attach drops `surface` and leaves no trace.
		let surface = Self {
			canvas,
			ctx,
			on_resize,
		};
		body.append_child(&surface.canvas).map_err(|e| CardError::dom(&e))?;
		Ok(surface)
	}
}

/// Size the canvas backing store to the window's inner size. Pieces already in
/// flight keep their pixel positions.
fn fit_to_viewport(window: &Window, canvas: &HtmlCanvasElement) {
	let dimension = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
	if let (Some(w), Some(h)) = (dimension(window.inner_width()), dimension(window.inner_height())) {
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
	}
}

impl ConfettiSurface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.canvas.width() as f64, self.canvas.height() as f64)
	}

	fn clear(&mut self) {
		let (w, h) = self.size();
		self.ctx.clear_rect(0.0, 0.0, w, h);
	}

	fn fill_rotated_rect(&mut self, rect: RotatedRect, color: Color) {
		let ctx = &self.ctx;
		ctx.save();
		let _ = ctx.translate(rect.cx, rect.cy);
		let _ = ctx.rotate(rect.rotation);
		ctx.set_fill_style_str(&color.to_css());
		ctx.fill_rect(-rect.width / 2.0, -rect.height / 2.0, rect.width, rect.height);
		ctx.restore();
	}
}

impl Drop for CanvasSurface {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
		}
		self.canvas.remove();
	}
}
