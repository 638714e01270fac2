//! Linear interpolation for animatable values

/// A value that can be blended between two endpoints.
///
/// `t` is not clamped here: eased progress may overshoot `0.0..=1.0` for some
/// bezier curves and the overshoot is intentional.
pub trait Lerp: Copy + PartialEq {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}
