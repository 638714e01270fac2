//! Zoom/pan state
//!
//! The chart zooms and pans horizontally only. Every gesture, whatever its
//! source, goes through [`ViewportTransform::apply_gesture`], which clamps the
//! zoom factor to the configured extent and the pan so the zoomed content
//! always covers the drawable width.

use serde::Serialize;

use crate::config::ChartConfig;
use crate::scale::LinearScale;

/// 2D zoom transform: `screen = translate + k * content`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Transform {
    pub k: f32,
    pub x: f32,
    pub y: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn apply_x(&self, x: f32) -> f32 {
        self.x + self.k * x
    }

    pub fn invert_x(&self, px: f32) -> f32 {
        (px - self.x) / self.k
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Raw (unclamped) zoom factor and horizontal translation from an input source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub scale: f32,
    pub translate_x: f32,
}

impl Gesture {
    pub fn new(scale: f32, translate_x: f32) -> Self {
        Self { scale, translate_x }
    }
}

/// Category-index interval currently covered by the drawable width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub start: f32,
    pub end: f32,
}

impl Viewport {
    pub fn contains(&self, index: f32) -> bool {
        index >= self.start && index <= self.end
    }
}

#[derive(Clone, Debug)]
pub struct ViewportTransform {
    transform: Transform,
    width: f32,
    min_scale: f32,
    max_scale: f32,
    category_count: usize,
}

impl ViewportTransform {
    pub fn new(width: f32, scale_extent: (f32, f32), category_count: usize) -> Self {
        Self {
            transform: Transform::IDENTITY,
            width,
            min_scale: scale_extent.0,
            max_scale: scale_extent.1,
            category_count,
        }
    }

    pub fn from_config(config: &ChartConfig, category_count: usize) -> Self {
        Self::new(
            config.drawable_width(),
            config.scale_extent(),
            category_count,
        )
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn category_count(&self) -> usize {
        self.category_count
    }

    pub fn set_category_count(&mut self, category_count: usize) {
        self.category_count = category_count;
    }

    /// Clamp a raw gesture without storing it.
    ///
    /// Non-finite components keep the current value.
    pub fn clamp(&self, gesture: Gesture) -> Transform {
        let k = if gesture.scale.is_finite() {
            gesture.scale.clamp(self.min_scale, self.max_scale)
        } else {
            self.transform.k
        };
        let raw_x = if gesture.translate_x.is_finite() {
            gesture.translate_x
        } else {
            self.transform.x
        };
        let min_x = (-self.width * (k - 1.0)).min(0.0);
        Transform {
            k,
            x: raw_x.clamp(min_x, 0.0),
            y: 0.0,
        }
    }

    pub fn apply_gesture(&mut self, gesture: Gesture) -> Transform {
        let next = self.clamp(gesture);
        if next != self.transform {
            tracing::debug!(k = next.k, x = next.x, "viewport transform updated");
        }
        self.transform = next;
        next
    }

    /// Raw gesture scaling by `factor` about `pivot_x` (plot-local pixels).
    ///
    /// The zoom factor is clamped before solving for the translation.
    pub fn zoom_gesture(&self, factor: f32, pivot_x: f32) -> Gesture {
        let current = self.transform;
        if !(factor.is_finite() && factor > 0.0 && pivot_x.is_finite()) {
            return Gesture::new(current.k, current.x);
        }
        let k = (current.k * factor).clamp(self.min_scale, self.max_scale);
        let x = pivot_x - (pivot_x - current.x) * k / current.k;
        Gesture::new(k, x)
    }

    pub fn pan_gesture(&self, dx: f32) -> Gesture {
        Gesture::new(self.transform.k, self.transform.x + dx)
    }

    /// Scale by `factor`, keeping the content under `pivot_x` in place.
    pub fn zoom_about(&mut self, factor: f32, pivot_x: f32) -> Transform {
        self.apply_gesture(self.zoom_gesture(factor, pivot_x))
    }

    pub fn pan_by(&mut self, dx: f32) -> Transform {
        self.apply_gesture(self.pan_gesture(dx))
    }

    pub fn reset(&mut self) -> Transform {
        self.apply_gesture(Gesture::new(Transform::IDENTITY.k, Transform::IDENTITY.x))
    }

    /// Index scale (`[0, n] -> [0, width]`) rescaled by the current transform.
    pub fn index_scale(&self) -> LinearScale {
        let t = self.transform;
        LinearScale::new(
            0.0,
            self.category_count as f32,
            t.apply_x(0.0),
            t.apply_x(self.width),
        )
    }

    /// Pixel position of category `index` under the current transform.
    pub fn position_of(&self, index: usize) -> f32 {
        self.index_scale().map(index as f32)
    }

    /// Pixel distance between adjacent categories.
    pub fn category_pitch(&self) -> f32 {
        if self.category_count == 0 {
            return 0.0;
        }
        self.transform.k * self.width / self.category_count as f32
    }

    pub fn viewport(&self) -> Viewport {
        let scale = self.index_scale();
        Viewport {
            start: scale.invert(0.0),
            end: scale.invert(self.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vt(n: usize) -> ViewportTransform {
        ViewportTransform::new(730.0, (1.0, 30.0), n)
    }

    #[test]
    fn clamps_scale_and_translation() {
        let mut v = vt(10);
        let t = v.apply_gesture(Gesture::new(50.0, 100.0));
        assert_eq!(t, Transform { k: 30.0, x: 0.0, y: 0.0 });

        let t = v.apply_gesture(Gesture::new(2.0, -5000.0));
        assert_eq!(t.x, -730.0);

        let t = v.apply_gesture(Gesture::new(0.2, -10.0));
        assert_eq!((t.k, t.x), (1.0, 0.0));
    }

    #[test]
    fn non_finite_gesture_keeps_current_values() {
        let mut v = vt(10);
        v.apply_gesture(Gesture::new(3.0, -100.0));
        let t = v.apply_gesture(Gesture::new(f32::NAN, f32::INFINITY));
        assert_eq!((t.k, t.x), (3.0, -100.0));
    }

    #[test]
    fn zoom_about_keeps_pivot_fixed() {
        let mut v = vt(10);
        let t = v.zoom_about(2.0, 200.0);
        assert_eq!(t.k, 2.0);
        // Content under the pivot before and after is the same.
        assert!((t.invert_x(200.0) - 200.0).abs() < 1e-3);

        // Zooming back out past the minimum lands on identity.
        let t = v.zoom_about(0.1, 500.0);
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn positions_follow_transform() {
        let mut v = vt(3);
        assert!((v.position_of(1) - 730.0 / 3.0).abs() < 1e-3);
        v.apply_gesture(Gesture::new(3.0, -365.0));
        assert!((v.position_of(1) - 365.0).abs() < 1e-3);
        assert!((v.category_pitch() - 730.0).abs() < 1e-3);

        let vp = v.viewport();
        assert!((vp.start - 0.5).abs() < 1e-4);
        assert!((vp.end - 1.5).abs() < 1e-4);
        assert!(vp.contains(1.0) && !vp.contains(2.0));
    }

    #[test]
    fn pan_and_reset() {
        let mut v = vt(5);
        v.apply_gesture(Gesture::new(4.0, 0.0));
        assert_eq!(v.pan_by(-100.0).x, -100.0);
        assert_eq!(v.pan_by(500.0).x, 0.0);
        assert_eq!(v.reset(), Transform::IDENTITY);
    }
}
