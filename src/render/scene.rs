//! Card scene: a resolution-independent display list.
//!
//! Coordinates are logical points with the origin at the card's top-left
//! corner. The preview paints a scene through egui, the exporter rasterizes
//! it in software; neither needs to know what a card is.

use crate::card::Template;
use crate::fonts::CardFont;
use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;
use std::sync::Arc;

/// Logical size of every card.
pub const CARD_SIZE: Vec2 = Vec2::new(320.0, 500.0);

// ─────────────────────────────────────────────────────────────────────────────
// Paint
// ─────────────────────────────────────────────────────────────────────────────

/// Multi-stop gradient running from the top-left to the bottom-right corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// Offsets in `0.0..=1.0`, ascending
    pub stops: Vec<(f32, Color32)>,
}

impl Gradient {
    /// Evenly spaced stops.
    pub fn even(colors: &[Color32]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        Self {
            stops: colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f32 / last, *c))
                .collect(),
        }
    }

    /// Color at offset `t` along the gradient line.
    pub fn sample(&self, t: f32) -> Color32 {
        let Some(&(first_t, first)) = self.stops.first() else {
            return Color32::TRANSPARENT;
        };
        if t <= first_t {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = (t1 - t0).max(f32::EPSILON);
                return lerp_color(c0, c1, (t - t0) / span);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first)
    }

    /// Gradient offset of point `p` inside `rect`.
    ///
    /// Follows the "to bottom right" corner rule: the top-left corner is 0,
    /// the bottom-right corner is 1 and the other two corners sit at 0.5.
    pub fn offset_in(rect: Rect, p: Pos2) -> f32 {
        let (w, h) = (rect.width(), rect.height());
        let dir = Vec2::new(h, w).normalized();
        let length = w * dir.x + h * dir.y;
        if length <= 0.0 {
            return 0.0;
        }
        ((p - rect.center()).dot(dir) / length + 0.5).clamp(0.0, 1.0)
    }
}

/// Interpolate two colors in unmultiplied sRGB space.
pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let a = a.to_srgba_unmultiplied();
    let b = b.to_srgba_unmultiplied();
    let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(mix(0), mix(1), mix(2), mix(3))
}

/// Apply an opacity multiplier to a color.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let a = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// How a region is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color32),
    Diagonal(Gradient),
}

impl Fill {
    /// Fill color at `p` for a shape bounded by `rect`.
    pub fn color_at(&self, rect: Rect, p: Pos2) -> Color32 {
        match self {
            Fill::Solid(color) => *color,
            Fill::Diagonal(gradient) => gradient.sample(Gradient::offset_in(rect, p)),
        }
    }
}

/// A border drawn inside a shape's outline, like a CSS border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color32,
}

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos.x` is the left edge
    Left,
    /// `pos.x` is the horizontal center
    Center,
}

// ─────────────────────────────────────────────────────────────────────────────
// Shapes
// ─────────────────────────────────────────────────────────────────────────────

/// One drawing primitive, painted in list order.
#[derive(Debug, Clone)]
pub enum Shape {
    RoundedRect {
        rect: Rect,
        radius: f32,
        fill: Fill,
        border: Option<Border>,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        border: Option<Border>,
    },
    /// Filled polygon (even-odd rule)
    Polygon { points: Vec<Pos2>, fill: Color32 },
    /// Line segment with round caps
    Line {
        from: Pos2,
        to: Pos2,
        width: f32,
        color: Color32,
    },
    /// Square image clipped to a circle
    Photo {
        center: Pos2,
        radius: f32,
        photo_id: u64,
        image: Arc<RgbaImage>,
    },
    /// A single line of text whose top edge is at `pos.y`
    Text {
        pos: Pos2,
        align: TextAlign,
        text: String,
        size: f32,
        color: Color32,
        font: CardFont,
    },
}

/// A complete card ready to be painted or rasterized.
#[derive(Debug, Clone)]
pub struct CardScene {
    pub size: Vec2,
    pub template: Template,
    pub shapes: Vec<Shape>,
}

impl CardScene {
    /// Collect every text run, mostly useful for inspection.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let g = Gradient::even(&[Color32::BLACK, Color32::WHITE]);
        assert_eq!(g.sample(0.0), Color32::BLACK);
        assert_eq!(g.sample(1.0), Color32::WHITE);
        let mid = g.sample(0.5).to_srgba_unmultiplied();
        assert!((127..=128).contains(&mid[0]));
    }

    #[test]
    fn test_three_stop_gradient_hits_middle_stop() {
        let middle = Color32::from_rgb(37, 99, 235);
        let g = Gradient::even(&[Color32::RED, middle, Color32::BLUE]);
        assert_eq!(g.sample(0.5), middle);
    }

    #[test]
    fn test_offset_corners() {
        let rect = Rect::from_min_size(Pos2::ZERO, CARD_SIZE);
        assert!(Gradient::offset_in(rect, rect.left_top()) < 0.001);
        assert!(Gradient::offset_in(rect, rect.right_bottom()) > 0.999);
        assert!((Gradient::offset_in(rect, rect.right_top()) - 0.5).abs() < 0.001);
        assert!((Gradient::offset_in(rect, rect.left_bottom()) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_with_opacity() {
        let c = with_opacity(Color32::WHITE, 0.5);
        assert_eq!(c.to_srgba_unmultiplied()[3], 128);
    }
}
