//! Canvas confetti.
//!
//! Bursts of small rotated rectangles are launched from a point on a
//! full-viewport overlay, fall under gravity and fade out when their lifetime
//! runs out. The animator ([`Confetti`]) is platform independent; [`CanvasHost`]
//! plugs it into the browser.
//!
//! # Example
//!
//! ```ignore
//! let confetti = Confetti::new(CanvasHost, ConfettiStyle::party(), Box::new(rand::rng()));
//! confetti.spawn(Burst::CENTER);
//! ```

mod animator;
mod canvas;
mod particles;
mod render;
pub mod theme;

pub use animator::{Confetti, ConfettiHost, FrameRequest};
pub use canvas::{CANVAS_ID, CanvasHost, CanvasSurface};
pub use particles::{Burst, ConfettiField, Particle};
pub use render::{ConfettiSurface, RotatedRect};
pub use theme::{Color, ConfettiStyle, PARTY_PALETTE};

#[cfg(test)]
pub(crate) use animator::testing;
