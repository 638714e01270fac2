//! tally_charts
//!
//! Interactive stacked-bar chart of county-level election results.
//!
//! One bar per county, split into "yes" and "no" segments. The chart zooms and
//! pans horizontally; on every zoom/pan the value axis is rescaled to the
//! counties still in view and bars, ticks and axis animate to their new place.
//!
//! Rendering goes through [`tally_core::DrawContext`], so the same chart draws
//! to a GPU canvas, an SVG file or a recording [`tally_core::DisplayList`].

mod axis;
mod format;

pub mod chart;
pub mod config;
pub mod error;
pub mod interaction;
pub mod model;
pub mod record;
pub mod render;
pub mod scale;
pub mod stack;
pub mod tooltip;
pub mod viewport;
pub mod visible;

pub use axis::AxisTick;
pub use chart::VoteChart;
pub use config::{ChartColors, ChartConfig, Margins};
pub use error::{ChartError, Result};
pub use format::{format_grouped, format_tick};
pub use interaction::{hit_test, transition, ChartEvent, HoverState, SegmentRef, Transition};
pub use model::ScaleModel;
pub use record::{parse_votes, try_parse_votes, votes_from_value, VoteRecord, VoteTotals};
pub use render::{draw_frame, render, BarLayout, Frame, RenderTargets, VisualState};
pub use scale::{BandScale, LinearScale};
pub use stack::{stack_votes, StackKey, StackedSegment};
pub use tooltip::{TooltipContent, TooltipState, TooltipSurface};
pub use viewport::{Gesture, Transform, Viewport, ViewportTransform};
pub use visible::{visible_set, VisibleSet};

/// Common imports for chart users.
pub mod prelude {
    pub use crate::chart::VoteChart;
    pub use crate::config::ChartConfig;
    pub use crate::interaction::{ChartEvent, SegmentRef};
    pub use crate::record::{parse_votes, VoteRecord, VoteTotals};
    pub use crate::stack::StackKey;
    pub use crate::viewport::{Gesture, Transform};
    pub use tally_core::{DisplayList, DrawContext};
}
