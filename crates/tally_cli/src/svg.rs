//! SVG output surface for headless renders.

use std::fmt::Write as _;

use tally_core::{Color, DrawContext, Point, Rect, RectStyle, Size, Stroke, TextAnchor, TextStyle};

/// A [`DrawContext`] that writes an SVG document.
#[derive(Debug)]
pub struct SvgSurface {
    size: Size,
    body: String,
    open_clips: usize,
    next_clip_id: usize,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32, background: Color) -> Self {
        let mut surface = Self {
            size: Size::new(width, height),
            body: String::new(),
            open_clips: 0,
            next_clip_id: 0,
        };
        if background.a > 0.0 {
            surface.fill_rect(
                Rect::new(0.0, 0.0, width, height),
                &RectStyle::fill(background),
            );
        }
        surface
    }

    /// Close any clip groups left open and return the document.
    pub fn finish(mut self) -> String {
        while self.open_clips > 0 {
            self.pop_clip();
        }
        let mut out = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = self.size.width,
            h = self.size.height,
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let _ = write!(out, r#" {name}="{}""#, color.to_hex_rgb());
    if color.a < 1.0 {
        let _ = write!(out, r#" {name}-opacity="{}""#, color.a);
    }
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

impl DrawContext for SvgSurface {
    fn fill_rect(&mut self, rect: Rect, style: &RectStyle) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            rect.x(),
            rect.y(),
            rect.width().max(0.0),
            rect.height().max(0.0),
        );
        write_paint_attr(&mut self.body, "fill", style.fill.color());
        if let Some(stroke) = style.stroke {
            write_paint_attr(&mut self.body, "stroke", stroke.color);
            let _ = write!(self.body, r#" stroke-width="{}""#, stroke.width);
        }
        if style.opacity < 1.0 {
            let _ = write!(self.body, r#" opacity="{}""#, style.opacity);
        }
        self.body.push_str("/>\n");
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
            from.x, from.y, to.x, to.y
        );
        write_paint_attr(&mut self.body, "stroke", stroke.color);
        let _ = write!(self.body, r#" stroke-width="{}"/>"#, stroke.width);
        self.body.push('\n');
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-size="{}""#,
            position.x, position.y, style.size
        );
        if style.bold {
            self.body.push_str(r#" font-weight="bold""#);
        }
        self.body.push_str(match style.anchor {
            TextAnchor::Start => r#" text-anchor="start""#,
            TextAnchor::Middle => r#" text-anchor="middle""#,
            TextAnchor::End => r#" text-anchor="end""#,
        });
        if style.rotation_deg != 0.0 {
            let _ = write!(
                self.body,
                r#" transform="rotate({} {} {})""#,
                style.rotation_deg, position.x, position.y
            );
        }
        write_paint_attr(&mut self.body, "fill", style.color);
        self.body.push('>');
        self.body.push_str(&escape_xml(text));
        self.body.push_str("</text>\n");
    }

    fn push_clip(&mut self, rect: Rect) {
        let id = self.next_clip_id;
        self.next_clip_id += 1;
        let _ = writeln!(
            self.body,
            r#"<clipPath id="clip{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
        );
        let _ = writeln!(self.body, r#"<g clip-path="url(#clip{id})">"#);
        self.open_clips += 1;
    }

    fn pop_clip(&mut self) {
        if self.open_clips == 0 {
            return;
        }
        self.open_clips -= 1;
        self.body.push_str("</g>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_clipped_shapes_and_escaped_text() {
        let mut svg = SvgSurface::new(100.0, 50.0, Color::WHITE);
        svg.push_clip(Rect::new(0.0, 0.0, 80.0, 40.0));
        svg.fill_rect(
            Rect::new(1.0, 2.0, 3.0, 4.0),
            &RectStyle::fill(Color::from_hex(0x7fbf7b)).with_opacity(0.7),
        );
        svg.draw_text(
            "A & B",
            Point::new(5.0, 6.0),
            &TextStyle::new(12.0).rotated(-45.0).anchored(TextAnchor::End),
        );
        let out = svg.finish();

        assert!(out.starts_with("<svg "));
        assert!(out.contains(r#"<clipPath id="clip0">"#));
        assert!(out.contains(r##"fill="#7fbf7b" opacity="0.7""##));
        assert!(out.contains(r#"transform="rotate(-45 5 6)""#));
        assert!(out.contains("A &amp; B"));
        // The unbalanced clip is closed before the root element.
        assert!(out.trim_end().ends_with("</g>\n</svg>"));
    }

    #[test]
    fn transparent_background_is_skipped() {
        let out = SvgSurface::new(10.0, 10.0, Color::TRANSPARENT).finish();
        assert!(!out.contains("<rect"));
    }
}
