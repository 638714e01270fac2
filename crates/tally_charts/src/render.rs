//! Render pipeline
//!
//! Redraws are split in two:
//!
//! - [`render`] is pure. Given the previous [`VisualState`] and the targets
//!   for the new data/transform it returns the next visual state, retargeting
//!   any animation still in flight from the value currently on screen.
//! - [`draw_frame`] paints one sampled [`Frame`] onto a surface. It is the only
//!   place with side effects.
//!
//! Bars, tick positions and the value axis all animate from the same
//! [`BarLayout`] and domain tweens, so the bars never drift away from their
//! ticks or from the axis mid-transition.

use tally_animation::{Lerp, Tween};
use tally_core::{DrawContext, Point, Rect, RectStyle, Stroke, TextAnchor, TextStyle};

use crate::axis::{build_category_ticks, build_value_ticks, draw_category_axis, draw_value_axis};
use crate::config::ChartConfig;
use crate::interaction::SegmentRef;
use crate::model::ScaleModel;
use crate::scale::{BandScale, LinearScale};
use crate::stack::{StackKey, StackedSegment};
use crate::viewport::ViewportTransform;
use crate::visible::visible_set;

const CATEGORY_CAPTION_SIZE_PX: f32 = 24.0;
const CATEGORY_CAPTION_OFFSET_PX: f32 = 35.0;
const VALUE_CAPTION_SIZE_PX: f32 = 16.0;
const VALUE_CAPTION_X_PX: f32 = 20.0;

/// Horizontal bar placement: bar `i` spans `origin + i * pitch` plus `bar_width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarLayout {
    pub origin: f32,
    pub pitch: f32,
    pub bar_width: f32,
}

impl BarLayout {
    /// Untransformed band layout.
    pub fn band(band: &BandScale) -> Self {
        Self {
            origin: band.start(),
            pitch: band.step(),
            bar_width: band.band_width(),
        }
    }

    /// Layout under the viewport's current zoom/pan.
    pub fn transformed(viewport: &ViewportTransform, max_bar_width: f32) -> Self {
        let pitch = viewport.category_pitch();
        Self {
            origin: viewport.position_of(0),
            pitch,
            bar_width: pitch.min(max_bar_width),
        }
    }

    pub fn bar_x(&self, index: usize) -> f32 {
        self.origin + index as f32 * self.pitch
    }

    /// Category tick position: the middle of the bar.
    pub fn tick_x(&self, index: usize) -> f32 {
        self.bar_x(index) + self.bar_width * 0.5
    }
}

impl Lerp for BarLayout {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            origin: self.origin.lerp(&to.origin, t),
            pitch: self.pitch.lerp(&to.pitch, t),
            bar_width: self.bar_width.lerp(&to.bar_width, t),
        }
    }
}

/// Where the next redraw should end up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTargets {
    pub layout: BarLayout,
    pub domain_max: f32,
    pub show_tick_labels: bool,
}

impl RenderTargets {
    /// Mount/dataset layout: padded bands, niced domain over every county.
    pub fn initial(model: &ScaleModel) -> Self {
        Self {
            layout: BarLayout::band(model.band()),
            domain_max: model.value_scale().domain().1,
            show_tick_labels: false,
        }
    }

    /// Layout for the current transform, with the domain taken from the visible set.
    pub fn for_view(model: &ScaleModel, viewport: &ViewportTransform, config: &ChartConfig) -> Self {
        let visible = visible_set(viewport, model);
        Self {
            layout: BarLayout::transformed(viewport, config.max_bar_width),
            domain_max: visible.domain_max(),
            show_tick_labels: viewport.transform().k > config.label_threshold,
        }
    }

    fn caption_opacity(&self) -> f32 {
        if self.show_tick_labels {
            0.0
        } else {
            1.0
        }
    }

    fn tick_label_opacity(&self) -> f32 {
        1.0 - self.caption_opacity()
    }
}

/// Animated visual state of one chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    layout: Tween<BarLayout>,
    domain_max: Tween<f32>,
    caption_opacity: Tween<f32>,
    tick_label_opacity: Tween<f32>,
}

impl VisualState {
    pub fn at_rest(targets: &RenderTargets) -> Self {
        Self {
            layout: Tween::settled(targets.layout),
            domain_max: Tween::settled(targets.domain_max),
            caption_opacity: Tween::settled(targets.caption_opacity()),
            tick_label_opacity: Tween::settled(targets.tick_label_opacity()),
        }
    }

    pub fn sample(&self, now_ms: f64) -> Frame {
        let frame = Frame {
            layout: self.layout.sample(now_ms),
            domain_max: self.domain_max.sample(now_ms),
            caption_opacity: self.caption_opacity.sample(now_ms),
            tick_label_opacity: self.tick_label_opacity.sample(now_ms),
        };
        tracing::trace!(now_ms, domain_max = frame.domain_max, "frame sampled");
        frame
    }

    /// The frame this state settles on.
    pub fn settled(&self) -> Frame {
        Frame {
            layout: self.layout.target(),
            domain_max: self.domain_max.target(),
            caption_opacity: self.caption_opacity.target(),
            tick_label_opacity: self.tick_label_opacity.target(),
        }
    }

    pub fn is_animating(&self, now_ms: f64) -> bool {
        !(self.layout.is_finished(now_ms)
            && self.domain_max.is_finished(now_ms)
            && self.caption_opacity.is_finished(now_ms)
            && self.tick_label_opacity.is_finished(now_ms))
    }
}

/// Next visual state for `targets`, animating from `previous` when there is one.
pub fn render(
    previous: Option<&VisualState>,
    targets: &RenderTargets,
    config: &ChartConfig,
    now_ms: f64,
) -> VisualState {
    let Some(prev) = previous else {
        return VisualState::at_rest(targets);
    };
    let (move_ms, move_ease) = (config.transition_ms, config.transition_easing);
    let (fade_ms, fade_ease) = (config.fade_ms, config.fade_easing);
    VisualState {
        layout: prev
            .layout
            .retarget(targets.layout, now_ms, move_ms, move_ease),
        domain_max: prev
            .domain_max
            .retarget(targets.domain_max, now_ms, move_ms, move_ease),
        caption_opacity: prev.caption_opacity.retarget(
            targets.caption_opacity(),
            now_ms,
            fade_ms,
            fade_ease,
        ),
        tick_label_opacity: prev.tick_label_opacity.retarget(
            targets.tick_label_opacity(),
            now_ms,
            fade_ms,
            fade_ease,
        ),
    }
}

/// One sampled point of a [`VisualState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub layout: BarLayout,
    pub domain_max: f32,
    pub caption_opacity: f32,
    pub tick_label_opacity: f32,
}

impl Frame {
    /// Value scale for this frame in plot-local pixels.
    pub fn value_scale(&self, plot_height: f32) -> LinearScale {
        LinearScale::new(0.0, self.domain_max, plot_height, 0.0)
    }

    /// Canvas-space rectangle of `segment`.
    pub fn segment_rect(&self, segment: &StackedSegment, plot: Rect) -> Rect {
        let scale = self.value_scale(plot.height());
        let top = scale.map(segment.y1 as f32);
        let bottom = scale.map(segment.y0 as f32);
        Rect::new(
            plot.x() + self.layout.bar_x(segment.county_index),
            plot.y() + top,
            self.layout.bar_width,
            bottom - top,
        )
    }
}

/// Region bars and the category axis are clipped to.
pub fn bar_clip(config: &ChartConfig) -> Rect {
    let plot = config.plot_rect();
    Rect::new(
        plot.x(),
        plot.y(),
        plot.width(),
        plot.height() + config.clip_overhang,
    )
}

pub fn draw_frame(
    ctx: &mut dyn DrawContext,
    frame: &Frame,
    model: &ScaleModel,
    hovered: Option<SegmentRef>,
    config: &ChartConfig,
) {
    let plot = config.plot_rect();
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return;
    }
    let colors = &config.colors;

    ctx.push_clip(bar_clip(config));

    let ticks = build_category_ticks(
        model.records().iter().map(|r| r.county_name.as_str()),
        |i| plot.x() + frame.layout.tick_x(i),
    );
    draw_category_axis(
        ctx,
        &ticks,
        plot,
        colors.axis,
        colors.text,
        frame.tick_label_opacity,
    );

    let outline = Stroke::new(colors.outline, 1.0);
    for key in StackKey::ORDER {
        let fill = match key {
            StackKey::Yes => colors.yes,
            StackKey::No => colors.no,
        };
        for segment in model.segments().iter().filter(|s| s.key == key) {
            let is_hovered = hovered == Some(SegmentRef::of(segment));
            let opacity = if is_hovered { config.hover_opacity } else { 1.0 };
            ctx.fill_rect(
                frame.segment_rect(segment, plot),
                &RectStyle::fill(fill)
                    .with_stroke(outline)
                    .with_opacity(opacity),
            );
        }
    }

    ctx.pop_clip();

    let value_ticks = build_value_ticks(frame.domain_max, plot, config.value_ticks);
    draw_value_axis(ctx, &value_ticks, plot, colors.axis, colors.text);

    if frame.caption_opacity > 0.0 {
        let style = TextStyle::new(CATEGORY_CAPTION_SIZE_PX)
            .with_color(colors.text.faded(frame.caption_opacity))
            .bold()
            .anchored(TextAnchor::Middle);
        ctx.draw_text(
            &config.category_caption,
            Point::new(
                plot.x() + plot.width() * 0.5,
                plot.bottom() + CATEGORY_CAPTION_OFFSET_PX,
            ),
            &style,
        );
    }

    let style = TextStyle::new(VALUE_CAPTION_SIZE_PX)
        .with_color(colors.text)
        .bold()
        .anchored(TextAnchor::Middle)
        .rotated(-90.0);
    ctx.draw_text(
        &config.value_caption,
        Point::new(VALUE_CAPTION_X_PX, plot.y() + plot.height() * 0.5),
        &style,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::VoteRecord;
    use crate::viewport::Gesture;
    use tally_core::DisplayList;

    fn setup() -> (ChartConfig, ScaleModel) {
        let config = ChartConfig::default();
        let model = ScaleModel::new(
            vec![
                VoteRecord::new("A", 100, 50),
                VoteRecord::new("B", 30, 30),
                VoteRecord::new("C", 0, 0),
            ],
            &config,
        );
        (config, model)
    }

    #[test]
    fn first_render_is_at_rest_on_band_layout() {
        let (config, model) = setup();
        let state = render(None, &RenderTargets::initial(&model), &config, 0.0);
        assert!(!state.is_animating(0.0));
        let frame = state.sample(0.0);
        assert_eq!(frame.domain_max, 160.0);
        assert_eq!(frame.layout.bar_width, model.band().band_width());
        assert_eq!(frame.caption_opacity, 1.0);
        assert_eq!(frame.tick_label_opacity, 0.0);
    }

    #[test]
    fn transform_change_animates_then_settles() {
        let (config, model) = setup();
        let initial = render(None, &RenderTargets::initial(&model), &config, 0.0);

        let mut viewport = ViewportTransform::from_config(&config, model.county_count());
        viewport.apply_gesture(Gesture::new(3.0, -365.0));
        let targets = RenderTargets::for_view(&model, &viewport, &config);
        assert!(targets.show_tick_labels);
        assert_eq!(targets.layout.bar_width, 40.0);

        let next = render(Some(&initial), &targets, &config, 1000.0);
        assert!(next.is_animating(1250.0));
        let mid = next.sample(1250.0).domain_max;
        assert!(mid < 160.0 && mid > 60.0);
        // The fade finishes well before the bars do.
        assert_eq!(next.sample(1100.0).tick_label_opacity, 1.0);

        let end = next.sample(1500.0);
        assert!(!next.is_animating(1500.0));
        assert_eq!(end, next.settled());
        assert_eq!(end.domain_max, 60.0);
        assert_eq!(end.caption_opacity, 0.0);
    }

    #[test]
    fn retarget_mid_flight_starts_from_screen_value() {
        let (config, model) = setup();
        let initial = render(None, &RenderTargets::initial(&model), &config, 0.0);
        let mut viewport = ViewportTransform::from_config(&config, model.county_count());

        viewport.apply_gesture(Gesture::new(3.0, -365.0));
        let a = render(
            Some(&initial),
            &RenderTargets::for_view(&model, &viewport, &config),
            &config,
            0.0,
        );
        let on_screen = a.sample(200.0).domain_max;

        viewport.reset();
        let b = render(
            Some(&a),
            &RenderTargets::for_view(&model, &viewport, &config),
            &config,
            200.0,
        );
        assert_eq!(b.sample(200.0).domain_max, on_screen);
        assert_eq!(b.settled().domain_max, 150.0);
    }

    #[test]
    fn segment_heights_match_value_scale() {
        let (config, model) = setup();
        let plot = config.plot_rect();
        let frame = VisualState::at_rest(&RenderTargets::initial(&model)).settled();
        let scale = frame.value_scale(plot.height());
        for (i, record) in model.records().iter().enumerate() {
            let rects: Vec<Rect> = model
                .segments_for(i)
                .iter()
                .map(|s| frame.segment_rect(s, plot))
                .collect();
            let sum: f32 = rects.iter().map(|r| r.height()).sum();
            let expected = scale.map(0.0) - scale.map(record.total() as f32);
            assert!((sum - expected).abs() < 1e-3);
            // Yes sits directly under no.
            assert!((rects[0].y() - rects[1].bottom()).abs() < 1e-3);
        }
    }

    #[test]
    fn draws_clipped_bars_and_both_axes() {
        let (config, model) = setup();
        let frame = VisualState::at_rest(&RenderTargets::initial(&model)).settled();
        let mut list = DisplayList::new();
        let hovered = Some(SegmentRef::new(1, StackKey::No));
        draw_frame(&mut list, &frame, &model, hovered, &config);

        assert_eq!(list.clip_depth(), 0);
        let bars: Vec<_> = list.rects().collect();
        assert_eq!(bars.len(), 6);
        let yes = bars.iter().filter(|(_, s)| s.fill.color() == config.colors.yes).count();
        assert_eq!(yes, 3);
        let dimmed: Vec<_> = bars.iter().filter(|(_, s)| s.opacity < 1.0).collect();
        assert_eq!(dimmed.len(), 1);
        assert_eq!(dimmed[0].1.opacity, 0.7);

        assert!(list.find_text("Counties").is_some());
        assert!(list.find_text("Total Votes").is_some());
        assert!(list.find_text("160").is_some());
        // County labels stay hidden until zoomed past the threshold.
        assert!(list.find_text("A").is_none());
    }

    #[test]
    fn empty_dataset_draws_axes_only() {
        let config = ChartConfig::default();
        let model = ScaleModel::empty(&config);
        let frame = VisualState::at_rest(&RenderTargets::initial(&model)).settled();
        let mut list = DisplayList::new();
        draw_frame(&mut list, &frame, &model, None, &config);
        assert_eq!(list.rects().count(), 0);
        assert_eq!(frame.domain_max, 1.0);
        assert!(list.find_text("1.0").is_some());
    }
}
