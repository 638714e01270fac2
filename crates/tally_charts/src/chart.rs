//! The vote chart component
//!
//! [`VoteChart`] owns one model, one viewport, the animated visual state, the
//! hover state and its tooltip surface, and sequences them:
//!
//! ```text
//! votes -> ScaleModel -> render (at rest)
//! event -> transition -> ViewportTransform -> visible set -> render (animated)
//!                     \-> hover/tooltip
//! ```
//!
//! All work happens synchronously on the caller's thread. Time is passed in
//! explicitly (`now_ms`), so hosts drive animation from their own clock.

use tally_core::DrawContext;

use crate::config::ChartConfig;
use crate::error::Result;
use crate::interaction::{transition, ChartEvent, HoverState, Transition};
use crate::model::ScaleModel;
use crate::record::{parse_votes, VoteRecord};
use crate::render::{draw_frame, render, Frame, RenderTargets, VisualState};
use crate::tooltip::{TooltipState, TooltipSurface};
use crate::viewport::{Gesture, Transform, ViewportTransform};
use crate::visible::{visible_set, VisibleSet};

pub struct VoteChart {
    config: ChartConfig,
    model: ScaleModel,
    viewport: ViewportTransform,
    visual: Option<VisualState>,
    hover: HoverState,
    tooltip: Option<TooltipSurface>,
}

impl VoteChart {
    pub fn new(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        let model = ScaleModel::empty(&config);
        let viewport = ViewportTransform::from_config(&config, 0);
        Ok(Self {
            config,
            model,
            viewport,
            visual: None,
            hover: HoverState::default(),
            tooltip: None,
        })
    }

    pub fn with_votes(config: ChartConfig, records: Vec<VoteRecord>) -> Result<Self> {
        let mut chart = Self::new(config)?;
        chart.set_votes(records, 0.0);
        Ok(chart)
    }

    /// First draw: acquire the tooltip surface and settle on the band layout.
    pub fn mount(&mut self, now_ms: f64) {
        if self.tooltip.is_none() {
            let mut surface = TooltipSurface::acquire();
            surface.set(self.hover.tooltip.clone());
            self.tooltip = Some(surface);
        }
        self.visual = Some(render(
            None,
            &RenderTargets::initial(&self.model),
            &self.config,
            now_ms,
        ));
        tracing::debug!(counties = self.model.county_count(), "vote chart mounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.tooltip.is_some()
    }

    /// Replace the dataset. Zoom/pan resets and the chart redraws at rest.
    pub fn set_votes(&mut self, records: Vec<VoteRecord>, now_ms: f64) {
        self.model = ScaleModel::new(records, &self.config);
        self.viewport = ViewportTransform::from_config(&self.config, self.model.county_count());
        self.set_hover(HoverState::default());
        tracing::debug!(
            counties = self.model.county_count(),
            global_max = self.model.global_max(),
            "vote dataset replaced"
        );
        if self.is_mounted() {
            self.mount(now_ms);
        }
    }

    /// Replace the dataset from a JSON payload; malformed payloads become empty.
    pub fn set_votes_json(&mut self, json: &str, now_ms: f64) {
        self.set_votes(parse_votes(json), now_ms);
    }

    /// Feed one input event and apply the resulting transition.
    pub fn handle_event(&mut self, event: ChartEvent, now_ms: f64) -> Transition {
        let frame = self.frame(now_ms);
        let t = transition(
            event,
            &self.hover,
            &self.viewport,
            &self.model,
            &frame,
            &self.config,
        );
        match &t {
            Transition::Gesture(gesture) => {
                self.apply_gesture(*gesture, now_ms);
            }
            Transition::Hover(hover) => self.set_hover(hover.clone()),
            Transition::None => {}
        }
        t
    }

    /// Clamp and store a raw gesture, then retarget the redraw.
    pub fn apply_gesture(&mut self, gesture: Gesture, now_ms: f64) -> Transform {
        let transform = self.viewport.apply_gesture(gesture);
        let targets = RenderTargets::for_view(&self.model, &self.viewport, &self.config);
        self.visual = Some(render(
            self.visual.as_ref(),
            &targets,
            &self.config,
            now_ms,
        ));
        transform
    }

    fn set_hover(&mut self, hover: HoverState) {
        if let Some(surface) = self.tooltip.as_mut() {
            surface.set(hover.tooltip.clone());
        }
        self.hover = hover;
    }

    pub fn frame(&self, now_ms: f64) -> Frame {
        match &self.visual {
            Some(visual) => visual.sample(now_ms),
            None => VisualState::at_rest(&RenderTargets::initial(&self.model)).settled(),
        }
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.visual
            .as_ref()
            .is_some_and(|visual| visual.is_animating(now_ms))
    }

    /// Draw bars and axes; mounts on first use.
    pub fn render(&mut self, ctx: &mut dyn DrawContext, now_ms: f64) {
        if !self.is_mounted() {
            self.mount(now_ms);
        }
        let frame = self.frame(now_ms);
        draw_frame(ctx, &frame, &self.model, self.hover.segment, &self.config);
    }

    /// Draw the tooltip layer above everything else.
    pub fn render_overlay(&self, ctx: &mut dyn DrawContext) {
        if let Some(surface) = &self.tooltip {
            surface.draw(ctx, &self.config);
        }
    }

    /// Release the tooltip surface and drop the visual state.
    pub fn teardown(&mut self) {
        self.hover = HoverState::default();
        self.visual = None;
        if let Some(surface) = self.tooltip.take() {
            tracing::debug!(surface = surface.id(), "vote chart torn down");
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn model(&self) -> &ScaleModel {
        &self.model
    }

    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn visible_set(&self) -> VisibleSet {
        visible_set(&self.viewport, &self.model)
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.hover.tooltip
    }

    pub fn tooltip_surface(&self) -> Option<&TooltipSurface> {
        self.tooltip.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::interaction::SegmentRef;
    use crate::stack::StackKey;
    use tally_core::{DisplayList, Point};

    fn chart() -> VoteChart {
        VoteChart::with_votes(
            ChartConfig::default(),
            vec![
                VoteRecord::new("A", 100, 50),
                VoteRecord::new("B", 30, 30),
                VoteRecord::new("C", 0, 0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ChartConfig {
            width: 10.0,
            ..ChartConfig::default()
        };
        assert!(matches!(VoteChart::new(config), Err(ChartError::Config(_))));
    }

    #[test]
    fn render_mounts_lazily_and_teardown_releases() {
        let mut c = chart();
        assert!(!c.is_mounted());
        let mut list = DisplayList::new();
        c.render(&mut list, 0.0);
        assert!(c.is_mounted());
        assert_eq!(list.rects().count(), 6);

        c.teardown();
        assert!(!c.is_mounted());
        assert!(c.tooltip_surface().is_none());
    }

    #[test]
    fn gesture_animates_and_clamps() {
        let mut c = chart();
        c.mount(0.0);
        let t = c.apply_gesture(Gesture::new(3.0, -365.0), 0.0);
        assert_eq!((t.k, t.x, t.y), (3.0, -365.0, 0.0));
        assert!(c.is_animating(100.0));
        assert_eq!(c.frame(600.0).domain_max, 60.0);
        assert_eq!(c.visible_set().indices(), &[1]);

        c.handle_event(ChartEvent::Drag { dx: 10_000.0 }, 600.0);
        assert_eq!(c.transform().x, 0.0);
    }

    #[test]
    fn hover_drives_tooltip_surface() {
        let mut c = chart();
        c.mount(0.0);
        c.handle_event(
            ChartEvent::HoverEnter {
                segment: SegmentRef::new(0, StackKey::Yes),
                pointer: Point::new(120.0, 300.0),
            },
            0.0,
        );
        assert!(c.tooltip().visible);
        assert_eq!(c.tooltip_surface().map(|s| s.state().visible), Some(true));

        let mut list = DisplayList::new();
        c.render_overlay(&mut list);
        assert!(list.find_text("A County").is_some());

        c.handle_event(ChartEvent::HoverLeave, 0.0);
        assert!(!c.tooltip().visible);
        list.clear();
        c.render_overlay(&mut list);
        assert!(list.commands().is_empty());
    }

    #[test]
    fn hover_before_mount_reaches_the_surface() {
        let mut c = chart();
        c.handle_event(
            ChartEvent::HoverEnter {
                segment: SegmentRef::new(1, StackKey::Yes),
                pointer: Point::new(200.0, 300.0),
            },
            0.0,
        );
        assert!(c.tooltip().visible);
        c.mount(0.0);
        assert_eq!(c.tooltip_surface().map(|s| s.state().visible), Some(true));

        let mut list = DisplayList::new();
        c.render_overlay(&mut list);
        assert!(list.find_text("B County").is_some());
    }

    #[test]
    fn oversized_counts_do_not_panic() {
        let mut c = chart();
        c.mount(0.0);
        c.set_votes(
            vec![VoteRecord::new("X", u64::MAX, 1), VoteRecord::new("Y", 1, 1)],
            0.0,
        );
        assert_eq!(c.model().total_at(0), u64::MAX);
        let mut list = DisplayList::new();
        c.render(&mut list, 0.0);
        assert_eq!(list.rects().count(), 4);
    }

    #[test]
    fn new_dataset_resets_view_and_hover() {
        let mut c = chart();
        c.mount(0.0);
        c.apply_gesture(Gesture::new(5.0, -100.0), 0.0);
        c.handle_event(
            ChartEvent::HoverEnter {
                segment: SegmentRef::new(0, StackKey::No),
                pointer: Point::ZERO,
            },
            0.0,
        );

        c.set_votes_json(r#"{"votes": "broken"}"#, 50.0);
        assert!(c.model().is_empty());
        assert_eq!(c.transform(), Transform::IDENTITY);
        assert!(!c.tooltip().visible);
        assert!(!c.is_animating(50.0));
        assert_eq!(c.frame(50.0).domain_max, 1.0);
    }
}
