//! Tally Animation System
//!
//! Time-based transitions for chart redraws.
//!
//! # Features
//!
//! - **Easing**: the usual polynomial curves plus CSS-style cubic beziers
//! - **Tweens**: pure `(start, end, duration, easing, elapsed) -> value` sampling
//! - **Interruptible**: retargeting continues from the value currently on screen

pub mod easing;
pub mod lerp;
pub mod tween;

pub use easing::Easing;
pub use lerp::Lerp;
pub use tween::{interpolate, Tween};
