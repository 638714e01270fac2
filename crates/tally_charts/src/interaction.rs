//! Pointer and gesture handling
//!
//! [`transition`] is the whole event table: it looks at one event and the
//! current state and says what should change. It never mutates anything;
//! [`crate::VoteChart`] applies the result.
//!
//! Pointer positions are canvas coordinates. Zoom pivots are converted to
//! plot-local pixels before they reach the viewport.

use tally_core::Point;

use crate::config::ChartConfig;
use crate::model::ScaleModel;
use crate::render::{bar_clip, Frame};
use crate::stack::{StackKey, StackedSegment};
use crate::tooltip::{TooltipContent, TooltipState};
use crate::viewport::{Gesture, ViewportTransform};

/// Identifies one bar segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentRef {
    pub county_index: usize,
    pub key: StackKey,
}

impl SegmentRef {
    pub fn new(county_index: usize, key: StackKey) -> Self {
        Self { county_index, key }
    }

    pub fn of(segment: &StackedSegment) -> Self {
        Self::new(segment.county_index, segment.key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChartEvent {
    /// The host already knows which segment is under the pointer.
    HoverEnter { segment: SegmentRef, pointer: Point },
    HoverMove { pointer: Point },
    HoverLeave,
    /// Raw pointer position; resolved to enter/move/leave by hit testing.
    PointerMove { pointer: Point },
    Wheel { delta_y: f32, pointer_x: f32 },
    Pinch { scale: f32, center_x: f32 },
    Drag { dx: f32 },
    /// Absolute zoom/pan from an external gesture recognizer.
    Zoom { scale: f32, translate_x: f32 },
}

/// Which segment is hovered and what the tooltip shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
    pub segment: Option<SegmentRef>,
    pub tooltip: TooltipState,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Forward to the viewport, then recompute the visible set and redraw.
    Gesture(Gesture),
    /// Replace hover/tooltip state; the transform is untouched.
    Hover(HoverState),
    None,
}

pub fn transition(
    event: ChartEvent,
    hover: &HoverState,
    viewport: &ViewportTransform,
    model: &ScaleModel,
    frame: &Frame,
    config: &ChartConfig,
) -> Transition {
    let plot_x = config.plot_rect().x();
    match event {
        ChartEvent::HoverEnter { segment, pointer } => match model.record(segment.county_index) {
            Some(record) => Transition::Hover(HoverState {
                segment: Some(segment),
                tooltip: TooltipState::shown_at(
                    TooltipContent::for_record(record),
                    pointer,
                    config,
                ),
            }),
            None => Transition::None,
        },
        ChartEvent::HoverMove { pointer } => {
            if hover.segment.is_none() {
                return Transition::None;
            }
            Transition::Hover(HoverState {
                segment: hover.segment,
                tooltip: hover.tooltip.moved_to(pointer, config),
            })
        }
        ChartEvent::HoverLeave => {
            if hover.segment.is_none() && !hover.tooltip.visible {
                return Transition::None;
            }
            Transition::Hover(HoverState {
                segment: None,
                tooltip: hover.tooltip.hide(),
            })
        }
        ChartEvent::PointerMove { pointer } => {
            let hit = hit_test(pointer, model, frame, config);
            let resolved = match (hover.segment, hit) {
                (current, Some(segment)) if current != Some(segment) => {
                    ChartEvent::HoverEnter { segment, pointer }
                }
                (Some(_), Some(_)) => ChartEvent::HoverMove { pointer },
                (Some(_), None) => ChartEvent::HoverLeave,
                (None, _) => return Transition::None,
            };
            transition(resolved, hover, viewport, model, frame, config)
        }
        ChartEvent::Wheel { delta_y, pointer_x } => {
            let factor = 2f32.powf(-delta_y * config.wheel_zoom_factor);
            Transition::Gesture(viewport.zoom_gesture(factor, pointer_x - plot_x))
        }
        ChartEvent::Pinch { scale, center_x } => {
            Transition::Gesture(viewport.zoom_gesture(scale, center_x - plot_x))
        }
        ChartEvent::Drag { dx } => Transition::Gesture(viewport.pan_gesture(dx)),
        ChartEvent::Zoom { scale, translate_x } => {
            Transition::Gesture(Gesture::new(scale, translate_x))
        }
    }
}

/// Topmost bar segment under `pointer` in `frame`, if any.
pub fn hit_test(
    pointer: Point,
    model: &ScaleModel,
    frame: &Frame,
    config: &ChartConfig,
) -> Option<SegmentRef> {
    if !bar_clip(config).contains(pointer) {
        return None;
    }
    let plot = config.plot_rect();
    // Reverse draw order so later (upper) segments win.
    StackKey::ORDER.iter().rev().find_map(|key| {
        model
            .segments()
            .iter()
            .rev()
            .filter(|s| s.key == *key)
            .find(|s| {
                let r = frame.segment_rect(s, plot);
                r.width() > 0.0 && r.height() > 0.0 && r.contains(pointer)
            })
            .map(SegmentRef::of)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::VoteRecord;
    use crate::render::{RenderTargets, VisualState};

    struct Fixture {
        config: ChartConfig,
        model: ScaleModel,
        viewport: ViewportTransform,
        frame: Frame,
    }

    fn fixture() -> Fixture {
        let config = ChartConfig::default();
        let model = ScaleModel::new(
            vec![
                VoteRecord::new("A", 100, 50),
                VoteRecord::new("B", 30, 30),
                VoteRecord::new("C", 0, 0),
            ],
            &config,
        );
        let viewport = ViewportTransform::from_config(&config, model.county_count());
        let frame = VisualState::at_rest(&RenderTargets::initial(&model)).settled();
        Fixture {
            config,
            model,
            viewport,
            frame,
        }
    }

    impl Fixture {
        fn run(&self, event: ChartEvent, hover: &HoverState) -> Transition {
            transition(
                event,
                hover,
                &self.viewport,
                &self.model,
                &self.frame,
                &self.config,
            )
        }

        fn center_of(&self, segment: SegmentRef) -> Point {
            let s = self
                .model
                .segment(segment.county_index, segment.key)
                .unwrap();
            let r = self.frame.segment_rect(s, self.config.plot_rect());
            Point::new(r.x() + r.width() * 0.5, r.y() + r.height() * 0.5)
        }
    }

    #[test]
    fn hover_enter_move_leave() {
        let f = fixture();
        let seg = SegmentRef::new(1, StackKey::Yes);
        let Transition::Hover(entered) = f.run(
            ChartEvent::HoverEnter {
                segment: seg,
                pointer: Point::new(300.0, 400.0),
            },
            &HoverState::default(),
        ) else {
            panic!("expected hover transition");
        };
        assert_eq!(entered.segment, Some(seg));
        assert_eq!((entered.tooltip.x, entered.tooltip.y), (310.0, 380.0));
        let text = entered.tooltip.text().unwrap();
        assert!(text.starts_with("B County\n"));
        assert!(text.ends_with("Total Votes: 60"));

        let Transition::Hover(moved) = f.run(
            ChartEvent::HoverMove {
                pointer: Point::new(320.0, 390.0),
            },
            &entered,
        ) else {
            panic!("expected hover transition");
        };
        assert_eq!(moved.tooltip.content, entered.tooltip.content);
        assert_eq!(moved.tooltip.x, 330.0);

        let Transition::Hover(left) = f.run(ChartEvent::HoverLeave, &moved) else {
            panic!("expected hover transition");
        };
        assert_eq!(left.segment, None);
        assert!(!left.tooltip.visible);

        assert_eq!(f.run(ChartEvent::HoverLeave, &left), Transition::None);
    }

    #[test]
    fn pointer_move_resolves_through_hit_test() {
        let f = fixture();
        let a_no = SegmentRef::new(0, StackKey::No);
        let p = f.center_of(a_no);
        assert_eq!(hit_test(p, &f.model, &f.frame, &f.config), Some(a_no));

        let Transition::Hover(h) = f.run(ChartEvent::PointerMove { pointer: p }, &HoverState::default())
        else {
            panic!("expected enter");
        };
        assert_eq!(h.segment, Some(a_no));

        // Moving onto the yes segment of the same bar switches segments.
        let a_yes = SegmentRef::new(0, StackKey::Yes);
        let Transition::Hover(h2) = f.run(
            ChartEvent::PointerMove {
                pointer: f.center_of(a_yes),
            },
            &h,
        ) else {
            panic!("expected enter");
        };
        assert_eq!(h2.segment, Some(a_yes));

        // Off every bar: leave.
        let Transition::Hover(h3) = f.run(
            ChartEvent::PointerMove {
                pointer: Point::new(5.0, 5.0),
            },
            &h2,
        ) else {
            panic!("expected leave");
        };
        assert_eq!(h3.segment, None);
    }

    #[test]
    fn zero_height_segments_are_never_hit() {
        let f = fixture();
        let c = f.center_of(SegmentRef::new(2, StackKey::Yes));
        assert_eq!(hit_test(c, &f.model, &f.frame, &f.config), None);
    }

    #[test]
    fn wheel_zooms_about_plot_local_pointer() {
        let f = fixture();
        let Transition::Gesture(g) = f.run(
            ChartEvent::Wheel {
                delta_y: -500.0,
                pointer_x: 70.0,
            },
            &HoverState::default(),
        ) else {
            panic!("expected gesture");
        };
        // 2^(500 * 0.002) = 2, pivot at the plot's left edge.
        assert!((g.scale - 2.0).abs() < 1e-5);
        assert!(g.translate_x.abs() < 1e-3);
    }

    #[test]
    fn drag_and_zoom_forward_raw_gestures() {
        let f = fixture();
        let h = HoverState::default();
        assert_eq!(
            f.run(ChartEvent::Drag { dx: -40.0 }, &h),
            Transition::Gesture(Gesture::new(1.0, -40.0))
        );
        assert_eq!(
            f.run(
                ChartEvent::Zoom {
                    scale: 99.0,
                    translate_x: 5.0
                },
                &h
            ),
            Transition::Gesture(Gesture::new(99.0, 5.0))
        );
    }
}
