//! Time-based interpolation with retargeting
//!
//! A [`Tween`] is a plain value: it records where an animation started, where
//! it is heading, and when. Sampling is pure, so any number of frames can be
//! drawn from the same tween. Retargeting produces a new tween that starts
//! from the value currently on screen, which is how an incoming gesture
//! supersedes an animation that is still in flight.

use crate::easing::Easing;
use crate::lerp::Lerp;

/// Value of an animation `elapsed_ms` after it started.
pub fn interpolate<T: Lerp>(
    start: T,
    end: T,
    duration_ms: f64,
    easing: Easing,
    elapsed_ms: f64,
) -> T {
    if duration_ms <= 0.0 || elapsed_ms >= duration_ms {
        return end;
    }
    if elapsed_ms <= 0.0 {
        return start;
    }
    let t = (elapsed_ms / duration_ms) as f32;
    start.lerp(&end, easing.apply(t))
}

/// A single animated value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
            easing,
        }
    }

    /// A tween that is already at rest on `value`.
    pub fn settled(value: T) -> Self {
        Self::new(value, value, 0.0, 0.0, Easing::Linear)
    }

    pub fn sample(&self, now_ms: f64) -> T {
        interpolate(
            self.from,
            self.to,
            self.duration_ms,
            self.easing,
            now_ms - self.start_ms,
        )
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms || self.from == self.to
    }

    /// Head for `to` starting from whatever is on screen at `now_ms`.
    ///
    /// Retargeting to the current target keeps the tween as-is so repeated
    /// redraw requests do not restart the clock.
    pub fn retarget(&self, to: T, now_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        if to == self.to {
            return *self;
        }
        tracing::trace!(now_ms, duration_ms, "tween retargeted");
        Self::new(self.sample(now_ms), to, now_ms, duration_ms, easing)
    }
}
