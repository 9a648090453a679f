//! UI components.

pub mod card;
pub mod confetti;
