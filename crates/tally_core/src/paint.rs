//! Paint types: colors, brushes, strokes, and text styles

use serde::{Deserialize, Serialize};

/// RGBA color with components in `0.0..=1.0`
///
/// Serializes as a `#rrggbb` (or `#rrggbbaa`) hex string so it can live in
/// configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let v = u16::from_str_radix(digits, 16).ok()?;
                let expand = |n: u16| f32::from((n & 0xF) as u8 * 17) / 255.0;
                Some(Self::rgb(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            6 => Some(Self::rgb(
                f32::from(channel(0)?) / 255.0,
                f32::from(channel(2)?) / 255.0,
                f32::from(channel(4)?) / 255.0,
            )),
            8 => Some(Self::rgba(
                f32::from(channel(0)?) / 255.0,
                f32::from(channel(2)?) / 255.0,
                f32::from(channel(4)?) / 255.0,
                f32::from(channel(6)?) / 255.0,
            )),
            _ => None,
        }
    }

    /// `#rrggbb` form; alpha is dropped (see [`Color::a`]).
    pub fn to_hex_rgb(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b)
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Multiply the alpha channel (used for fades).
    pub fn faded(mut self, opacity: f32) -> Self {
        self.a *= opacity.clamp(0.0, 1.0);
        self
    }
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value).ok_or_else(|| format!("invalid hex color `{value}`"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        if color.a >= 1.0 {
            color.to_hex_rgb()
        } else {
            format!("{}{:02x}", color.to_hex_rgb(), to_u8(color.a))
        }
    }
}

/// Brush for filling shapes
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
}

impl Brush {
    pub fn color(&self) -> Color {
        match self {
            Brush::Solid(c) => *c,
        }
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

/// Outline stroke
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Paint applied to a filled rectangle
#[derive(Clone, Debug, PartialEq)]
pub struct RectStyle {
    pub fill: Brush,
    pub stroke: Option<Stroke>,
    /// Whole-shape opacity, applied to fill and stroke alike.
    pub opacity: f32,
}

impl RectStyle {
    pub fn fill(fill: impl Into<Brush>) -> Self {
        Self {
            fill: fill.into(),
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Horizontal anchoring of a text run relative to its position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Text style
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub anchor: TextAnchor,
    /// Clockwise rotation in degrees about the text position.
    pub rotation_deg: f32,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            color: Color::BLACK,
            bold: false,
            anchor: TextAnchor::Start,
            rotation_deg: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation_deg = degrees;
        self
    }
}
