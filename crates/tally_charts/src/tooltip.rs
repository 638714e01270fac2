//! Hover tooltip
//!
//! Each chart owns exactly one [`TooltipSurface`]. It is acquired when the
//! chart mounts and released when the chart is torn down or dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use tally_core::{text_extent, DrawContext, Point, Rect, RectStyle, Stroke, TextStyle};

use crate::config::ChartConfig;
use crate::format::format_grouped;
use crate::record::VoteRecord;

const TOOLTIP_FONT_SIZE_PX: f32 = 14.0;
const TOOLTIP_PADDING_PX: f32 = 10.0;
const TOOLTIP_LINE_HEIGHT: f32 = 1.4;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipContent {
    pub county_name: String,
    pub yes: u64,
    pub no: u64,
}

impl TooltipContent {
    pub fn for_record(record: &VoteRecord) -> Self {
        Self {
            county_name: record.county_name.clone(),
            yes: record.yes_count,
            no: record.no_count,
        }
    }

    pub fn total(&self) -> u64 {
        self.yes.saturating_add(self.no)
    }

    pub fn lines(&self) -> [String; 4] {
        [
            format!("{} County", self.county_name),
            format!("Votes For: {}", format_grouped(self.yes)),
            format!("Votes Against: {}", format_grouped(self.no)),
            format!("Total Votes: {}", format_grouped(self.total())),
        ]
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
    pub visible: bool,
    pub content: Option<TooltipContent>,
    /// Top-left corner, canvas coordinates.
    pub x: f32,
    pub y: f32,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Show `content` offset from the pointer.
    pub fn shown_at(content: TooltipContent, pointer: Point, config: &ChartConfig) -> Self {
        let at = tooltip_anchor(pointer, config);
        Self {
            visible: true,
            content: Some(content),
            x: at.x,
            y: at.y,
        }
    }

    /// Same content, following the pointer.
    pub fn moved_to(&self, pointer: Point, config: &ChartConfig) -> Self {
        let at = tooltip_anchor(pointer, config);
        Self {
            x: at.x,
            y: at.y,
            ..self.clone()
        }
    }

    pub fn hide(&self) -> Self {
        Self {
            visible: false,
            ..self.clone()
        }
    }

    pub fn text(&self) -> Option<String> {
        if !self.visible {
            return None;
        }
        self.content.as_ref().map(TooltipContent::text)
    }
}

fn tooltip_anchor(pointer: Point, config: &ChartConfig) -> Point {
    pointer.offset(config.tooltip_offset_x, config.tooltip_offset_y)
}

/// The per-chart tooltip overlay.
#[derive(Debug)]
pub struct TooltipSurface {
    id: u64,
    state: TooltipState,
}

impl TooltipSurface {
    pub fn acquire() -> Self {
        let id = NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(surface = id, "tooltip surface acquired");
        Self {
            id,
            state: TooltipState::hidden(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn set(&mut self, state: TooltipState) {
        self.state = state;
    }

    pub fn hide(&mut self) {
        self.state = self.state.hide();
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, config: &ChartConfig) {
        let Some(content) = self.state.content.as_ref().filter(|_| self.state.visible) else {
            return;
        };
        let colors = &config.colors;
        let body = TextStyle::new(TOOLTIP_FONT_SIZE_PX).with_color(colors.tooltip_text);
        let heading = body.clone().bold();
        let lines = content.lines();

        let line_h = TOOLTIP_FONT_SIZE_PX * TOOLTIP_LINE_HEIGHT;
        let mut text_w = 0.0f32;
        for (i, line) in lines.iter().enumerate() {
            let style = if i == 0 { &heading } else { &body };
            text_w = text_w.max(text_extent(ctx, line, style).width);
        }

        let origin = Point::new(self.state.x, self.state.y);
        let rect = Rect::new(
            origin.x,
            origin.y,
            text_w + TOOLTIP_PADDING_PX * 2.0,
            line_h * lines.len() as f32 + TOOLTIP_PADDING_PX * 2.0,
        );
        ctx.fill_rect(
            rect,
            &RectStyle::fill(colors.tooltip_bg).with_stroke(Stroke::new(colors.tooltip_border, 1.0)),
        );

        for (i, line) in lines.iter().enumerate() {
            let style = if i == 0 { &heading } else { &body };
            let baseline = origin.y + TOOLTIP_PADDING_PX + line_h * i as f32 + TOOLTIP_FONT_SIZE_PX;
            ctx.draw_text(line, Point::new(origin.x + TOOLTIP_PADDING_PX, baseline), style);
        }
    }
}

impl Drop for TooltipSurface {
    fn drop(&mut self) {
        tracing::debug!(surface = self.id, "tooltip surface released");
    }
}
