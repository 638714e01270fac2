use tally_core::{Color, DrawContext, Point, Rect, Stroke, TextAnchor, TextStyle};

use crate::format::format_tick;
use crate::scale::LinearScale;

const TICK_SIZE_PX: f32 = 6.0;
const TICK_PADDING_PX: f32 = 3.0;
const VALUE_LABEL_SIZE_PX: f32 = 10.0;
const CATEGORY_LABEL_SIZE_PX: f32 = 12.0;
const CATEGORY_LABEL_ROTATION_DEG: f32 = -45.0;

#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub value: f32,
    pub px: f32,
    pub label: String,
}

/// Ticks for a value axis spanning `[0, domain_max]` bottom to top of `plot`.
pub fn build_value_ticks(domain_max: f32, plot: Rect, tick_count: usize) -> Vec<AxisTick> {
    if tick_count == 0 || !(domain_max.is_finite() && domain_max > 0.0) || plot.height() <= 0.0 {
        return Vec::new();
    }
    // Inverted so larger values are visually higher.
    let s = LinearScale::new(0.0, domain_max, plot.bottom(), plot.y());
    let step = s.tick_step(tick_count);
    s.ticks(tick_count)
        .into_iter()
        .map(|v| AxisTick {
            value: v,
            px: s.map(v),
            label: format_tick(v, step),
        })
        .collect()
}

/// One tick per category at the given pixel positions.
pub fn build_category_ticks<'a, I>(labels: I, positions: impl Fn(usize) -> f32) -> Vec<AxisTick>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| AxisTick {
            value: i as f32,
            px: positions(i),
            label: label.to_string(),
        })
        .collect()
}

pub fn draw_value_axis(
    ctx: &mut dyn DrawContext,
    ticks: &[AxisTick],
    plot: Rect,
    axis_color: Color,
    text_color: Color,
) {
    if plot.height() <= 0.0 {
        return;
    }

    let stroke = Stroke::new(axis_color, 1.0);
    let x = plot.x();
    ctx.stroke_line(Point::new(x, plot.y()), Point::new(x, plot.bottom()), stroke);

    let style = TextStyle::new(VALUE_LABEL_SIZE_PX)
        .with_color(text_color)
        .anchored(TextAnchor::End);
    for t in ticks {
        ctx.stroke_line(Point::new(x - TICK_SIZE_PX, t.px), Point::new(x, t.px), stroke);
        ctx.draw_text(
            &t.label,
            // Baseline sits a third of the glyph height below the tick.
            Point::new(
                x - TICK_SIZE_PX - TICK_PADDING_PX,
                t.px + VALUE_LABEL_SIZE_PX * 0.32,
            ),
            &style,
        );
    }
}

/// Bottom axis along `plot`; labels are skipped entirely at zero opacity.
pub fn draw_category_axis(
    ctx: &mut dyn DrawContext,
    ticks: &[AxisTick],
    plot: Rect,
    axis_color: Color,
    text_color: Color,
    label_opacity: f32,
) {
    if plot.width() <= 0.0 {
        return;
    }

    let stroke = Stroke::new(axis_color, 1.0);
    let y = plot.bottom();
    ctx.stroke_line(Point::new(plot.x(), y), Point::new(plot.right(), y), stroke);

    let style = TextStyle::new(CATEGORY_LABEL_SIZE_PX)
        .with_color(text_color.faded(label_opacity))
        .bold()
        .anchored(TextAnchor::End)
        .rotated(CATEGORY_LABEL_ROTATION_DEG);
    for t in ticks {
        ctx.stroke_line(Point::new(t.px, y), Point::new(t.px, y + TICK_SIZE_PX), stroke);
        if label_opacity > 0.0 {
            ctx.draw_text(
                &t.label,
                Point::new(t.px, y + TICK_SIZE_PX + TICK_PADDING_PX),
                &style,
            );
        }
    }
}
