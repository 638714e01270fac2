//! Drawing surface contract
//!
//! Chart code draws through [`DrawContext`]; hosts provide the concrete
//! surface (a GPU canvas, an SVG writer, ...). [`DisplayList`] is a surface
//! that just records commands, which is what headless tests assert on.

use crate::geometry::{Point, Rect, Size};
use crate::paint::{RectStyle, Stroke, TextStyle};

/// Fallback glyph advance used when a surface cannot measure text.
pub const AVG_CHAR_WIDTH_EM: f32 = 0.6;

/// A 2D drawing surface.
pub trait DrawContext {
    fn fill_rect(&mut self, rect: Rect, style: &RectStyle);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke);

    /// `position` is the anchor point on the text baseline.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Restrict subsequent drawing to `rect` until the matching [`DrawContext::pop_clip`].
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    /// Measure a single line of text, if the surface has font metrics.
    fn measure_text(&mut self, _text: &str, _style: &TextStyle) -> Option<Size> {
        None
    }
}

/// Measure with the surface, falling back to a per-character estimate.
pub fn text_extent(ctx: &mut dyn DrawContext, text: &str, style: &TextStyle) -> Size {
    ctx.measure_text(text, style).unwrap_or_else(|| {
        Size::new(
            text.chars().count() as f32 * style.size * AVG_CHAR_WIDTH_EM,
            style.size,
        )
    })
}

/// One recorded drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, style: RectStyle },
    Line { from: Point, to: Point, stroke: Stroke },
    Text {
        text: String,
        position: Point,
        style: TextStyle,
    },
    PushClip(Rect),
    PopClip,
}

/// A [`DrawContext`] that records every command in order.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_depth = 0;
    }

    /// Number of clips pushed but not yet popped.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    pub fn rects(&self) -> impl Iterator<Item = (&Rect, &RectStyle)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillRect { rect, style } => Some((rect, style)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, &Point, &TextStyle)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text {
                text,
                position,
                style,
            } => Some((text.as_str(), position, style)),
            _ => None,
        })
    }

    /// First text command whose content equals `needle`.
    pub fn find_text(&self, needle: &str) -> Option<(&Point, &TextStyle)> {
        self.texts()
            .find(|(t, _, _)| *t == needle)
            .map(|(_, p, s)| (p, s))
    }
}

impl DrawContext for DisplayList {
    fn fill_rect(&mut self, rect: Rect, style: &RectStyle) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            style: style.clone(),
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn display_list_records_in_order() {
        let mut list = DisplayList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), &RectStyle::fill(Color::WHITE));
        list.draw_text("hi", Point::new(3.0, 4.0), &TextStyle::new(12.0));
        assert_eq!(list.clip_depth(), 1);
        list.pop_clip();

        assert_eq!(list.commands().len(), 4);
        assert_eq!(list.rects().count(), 1);
        assert_eq!(list.clip_depth(), 0);
        assert_eq!(list.find_text("hi").map(|(p, _)| *p), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn text_extent_falls_back_to_estimate() {
        let mut list = DisplayList::new();
        let size = text_extent(&mut list, "abcd", &TextStyle::new(10.0));
        assert!((size.width - 24.0).abs() < 1e-4);
        assert_eq!(size.height, 10.0);
    }
}
