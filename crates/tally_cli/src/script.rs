//! Scripted pointer/gesture input for headless renders.
//!
//! ```json
//! { "steps": [
//!     { "type": "wheel", "delta_y": -300, "x": 400 },
//!     { "type": "wait", "ms": 200 },
//!     { "type": "pointer", "x": 300, "y": 250 }
//! ] }
//! ```
//!
//! Coordinates are canvas pixels.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tally_charts::{ChartEvent, VoteChart};
use tally_core::Point;

/// Sequence of input steps replayed against a chart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GestureScript {
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Advance the clock.
    Wait { ms: f64 },
    Wheel { delta_y: f32, x: f32 },
    Pinch { scale: f32, x: f32 },
    Drag { dx: f32 },
    /// Absolute zoom factor and translation.
    Zoom { k: f32, x: f32 },
    /// Pointer position, hit tested against the bars.
    Pointer { x: f32, y: f32 },
    /// Pointer left the chart.
    Leave,
}

impl ScriptStep {
    fn event(&self) -> Option<ChartEvent> {
        let event = match *self {
            ScriptStep::Wait { .. } => return None,
            ScriptStep::Wheel { delta_y, x } => ChartEvent::Wheel {
                delta_y,
                pointer_x: x,
            },
            ScriptStep::Pinch { scale, x } => ChartEvent::Pinch { scale, center_x: x },
            ScriptStep::Drag { dx } => ChartEvent::Drag { dx },
            ScriptStep::Zoom { k, x } => ChartEvent::Zoom {
                scale: k,
                translate_x: x,
            },
            ScriptStep::Pointer { x, y } => ChartEvent::PointerMove {
                pointer: Point::new(x, y),
            },
            ScriptStep::Leave => ChartEvent::HoverLeave,
        };
        Some(event)
    }
}

impl GestureScript {
    /// Load a script from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a script from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Feed every step to `chart` starting at `start_ms`; returns the clock afterwards.
    pub fn play(&self, chart: &mut VoteChart, start_ms: f64) -> f64 {
        let mut now = start_ms;
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                ScriptStep::Wait { ms } => now += ms.max(0.0),
                _ => {
                    if let Some(event) = step.event() {
                        let transition = chart.handle_event(event, now);
                        tracing::debug!(step = i, now, ?transition, "script step applied");
                    }
                }
            }
        }
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_charts::{ChartConfig, VoteRecord};

    #[test]
    fn parses_tagged_steps() {
        let s = GestureScript::from_json(
            r#"{ "steps": [
                { "type": "zoom", "k": 3, "x": -365 },
                { "type": "wait", "ms": 120 },
                { "type": "leave" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            s.steps,
            vec![
                ScriptStep::Zoom { k: 3.0, x: -365.0 },
                ScriptStep::Wait { ms: 120.0 },
                ScriptStep::Leave,
            ]
        );
    }

    #[test]
    fn unknown_step_is_an_error() {
        assert!(GestureScript::from_json(r#"{ "steps": [{ "type": "tap" }] }"#).is_err());
    }

    #[test]
    fn play_advances_clock_and_applies_gestures() {
        let mut chart = VoteChart::with_votes(
            ChartConfig::default(),
            vec![VoteRecord::new("A", 1, 1), VoteRecord::new("B", 2, 2)],
        )
        .unwrap();
        chart.mount(0.0);
        let script = GestureScript {
            steps: vec![
                ScriptStep::Wait { ms: 100.0 },
                ScriptStep::Zoom { k: 4.0, x: -50.0 },
                ScriptStep::Wait { ms: 50.0 },
                ScriptStep::Drag { dx: 20.0 },
            ],
        };
        let end = script.play(&mut chart, 1_000.0);
        assert_eq!(end, 1_150.0);
        assert_eq!(chart.transform().k, 4.0);
        assert_eq!(chart.transform().x, -30.0);
    }
}
