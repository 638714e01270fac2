//! Tally Core
//!
//! Foundational primitives shared by the Tally crates:
//!
//! - **Geometry**: points, sizes and rectangles in logical pixels
//! - **Paint**: colors, brushes, strokes and text styles
//! - **Drawing**: the [`DrawContext`] surface contract and a recording
//!   [`DisplayList`] implementation for headless use

pub mod draw;
pub mod geometry;
pub mod paint;

pub use draw::{text_extent, DisplayList, DrawCommand, DrawContext};
pub use geometry::{Point, Rect, Size};
pub use paint::{Brush, Color, RectStyle, Stroke, TextAnchor, TextStyle};
