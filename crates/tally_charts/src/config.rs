//! Chart configuration
//!
//! Defaults reproduce the published chart: an 800×500 canvas with a 730×440
//! drawable area, zoom between 1× and 30×, and 500 ms ease-out redraws.

use serde::{Deserialize, Serialize};
use tally_animation::Easing;
use tally_core::{Color, Rect};

use crate::error::{ChartError, Result};

/// Canvas margins around the drawable area
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 0.0,
            bottom: 50.0,
            left: 70.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartColors {
    pub yes: Color,
    pub no: Color,
    pub outline: Color,
    pub axis: Color,
    pub text: Color,
    pub tooltip_bg: Color,
    pub tooltip_border: Color,
    pub tooltip_text: Color,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            yes: Color::from_hex(0x7fbf7b),
            no: Color::from_hex(0xaf8dc3),
            outline: Color::BLACK,
            axis: Color::BLACK,
            text: Color::BLACK,
            tooltip_bg: Color::WHITE,
            tooltip_border: Color::from_hex(0xdddddd),
            tooltip_text: Color::from_hex(0x374151),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Logical canvas width, margins included.
    pub width: f32,
    /// Logical canvas height, margins included.
    pub height: f32,

    /// Inner and outer band padding, as a fraction of the band step.
    pub band_padding: f32,
    /// Upper bound on bar width once the chart has been zoomed or panned.
    pub max_bar_width: f32,
    /// Zoom factor above which per-county tick labels replace the axis caption.
    pub label_threshold: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Target tick count for the value axis.
    pub value_ticks: usize,

    /// Bar/axis redraw duration.
    pub transition_ms: f64,
    pub transition_easing: Easing,
    /// Caption/tick-label fade duration.
    pub fade_ms: f64,
    pub fade_easing: Easing,

    /// Wheel zoom: each pixel of `delta_y` scales by `2^(-delta_y * factor)`.
    pub wheel_zoom_factor: f32,

    pub hover_opacity: f32,
    pub tooltip_offset_x: f32,
    pub tooltip_offset_y: f32,
    /// How far below the drawable area the bar clip extends (room for rotated labels).
    pub clip_overhang: f32,

    pub category_caption: String,
    pub value_caption: String,

    // Nested sections last so the struct serializes cleanly to TOML.
    pub margin: Margins,
    pub colors: ChartColors,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            band_padding: 0.2,
            max_bar_width: 40.0,
            label_threshold: 2.1,
            min_scale: 1.0,
            max_scale: 30.0,
            value_ticks: 10,
            transition_ms: 500.0,
            transition_easing: Easing::EaseOutCubic,
            fade_ms: 100.0,
            fade_easing: Easing::EaseInOutCubic,
            wheel_zoom_factor: 0.002,
            hover_opacity: 0.7,
            tooltip_offset_x: 10.0,
            tooltip_offset_y: -20.0,
            clip_overhang: 100.0,
            category_caption: "Counties".to_string(),
            value_caption: "Total Votes".to_string(),
            margin: Margins::default(),
            colors: ChartColors::default(),
        }
    }
}

impl ChartConfig {
    pub fn drawable_width(&self) -> f32 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn drawable_height(&self) -> f32 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Drawable area in canvas coordinates.
    pub fn plot_rect(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            self.drawable_width().max(0.0),
            self.drawable_height().max(0.0),
        )
    }

    pub fn scale_extent(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Check that the constants are mutually consistent.
    pub fn validate(&self) -> Result<()> {
        if !(self.drawable_width() > 0.0 && self.drawable_height() > 0.0) {
            return Err(ChartError::Config(format!(
                "margins leave no drawable area ({}x{})",
                self.drawable_width(),
                self.drawable_height()
            )));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ChartError::Config(format!(
                "scale extent [{}, {}] must be positive and ordered",
                self.min_scale, self.max_scale
            )));
        }
        if !(0.0..1.0).contains(&self.band_padding) {
            return Err(ChartError::Config(format!(
                "band padding {} must be in [0, 1)",
                self.band_padding
            )));
        }
        if !(self.max_bar_width > 0.0) {
            return Err(ChartError::Config(format!(
                "max bar width {} must be positive",
                self.max_bar_width
            )));
        }
        if !(self.transition_ms > 0.0 && self.fade_ms > 0.0) {
            return Err(ChartError::Config(
                "transition and fade durations must be positive".to_string(),
            ));
        }
        if self.value_ticks == 0 {
            return Err(ChartError::Config(
                "value axis needs at least one tick".to_string(),
            ));
        }
        Ok(())
    }
}
