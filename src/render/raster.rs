//! Software rasterizer for card scenes.
//!
//! Shapes are composited source-over onto a transparent, unpremultiplied
//! RGBA canvas. Edges are anti-aliased from signed distances where the shape
//! allows it and by 4x4 supersampling otherwise.

use super::scene::{Border, CardScene, Fill, Shape, TextAlign};
use crate::fonts::{self, CardFont};
use egui::{Color32, Pos2, Rect};
use image::{Rgba, RgbaImage};
use log::debug;

/// Largest bitmap side the rasterizer will allocate.
pub const MAX_BITMAP_SIDE: u32 = 16384;

/// Errors raised while rasterizing.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterError {
    /// The requested bitmap would be empty or larger than `MAX_BITMAP_SIDE`
    InvalidSize { width: u32, height: u32 },
    /// A font needed by a text run could not be loaded
    FontUnavailable(CardFont),
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::InvalidSize { width, height } => {
                write!(f, "Cannot allocate a {}x{} bitmap", width, height)
            }
            RasterError::FontUnavailable(font) => write!(f, "Font unavailable: {:?}", font),
        }
    }
}

impl std::error::Error for RasterError {}

/// Rasterize `scene` at `scale` pixels per logical point.
pub fn rasterize_scene(scene: &CardScene, scale: f32) -> Result<RgbaImage, RasterError> {
    let width = (scene.size.x * scale).round().max(0.0) as u32;
    let height = (scene.size.y * scale).round().max(0.0) as u32;
    if width == 0 || height == 0 || width > MAX_BITMAP_SIDE || height > MAX_BITMAP_SIDE {
        return Err(RasterError::InvalidSize { width, height });
    }

    let mut canvas = Canvas {
        image: RgbaImage::new(width, height),
        scale,
    };
    for shape in &scene.shapes {
        canvas.draw(shape)?;
    }

    debug!(
        "Rasterized {} shapes into {}x{} bitmap",
        scene.shapes.len(),
        width,
        height
    );
    Ok(canvas.image)
}

// ─────────────────────────────────────────────────────────────────────────────
// Compositing
// ─────────────────────────────────────────────────────────────────────────────

/// Blend `color` over `dst` with extra `coverage` in `0..=1`.
fn blend(dst: &mut Rgba<u8>, color: [u8; 4], coverage: f32) {
    let sa = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for i in 0..3 {
        let sc = color[i] as f32;
        let dc = dst.0[i] as f32;
        dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

fn rgba(color: Color32) -> [u8; 4] {
    color.to_srgba_unmultiplied()
}

/// Coverage of a pixel by the inside of a signed distance field.
fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

/// Signed distance from `p` to a rounded rectangle (negative inside).
fn rounded_rect_sdf(rect: Rect, radius: f32, p: Pos2) -> f32 {
    let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let center = rect.center();
    let half = rect.size() / 2.0 - egui::vec2(radius, radius);
    let qx = (p.x - center.x).abs() - half.x;
    let qy = (p.y - center.y).abs() - half.y;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

/// Signed distance from `p` to a segment of the given half-width.
fn capsule_sdf(a: Pos2, b: Pos2, half_width: f32, p: Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.length_sq();
    let t = if len_sq > 0.0 {
        (ap.dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (ap - ab * t).length() - half_width
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[Pos2], p: Pos2) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Bilinear sample of an image at fractional pixel coordinates.
fn sample_bilinear(image: &RgbaImage, x: f32, y: f32) -> [u8; 4] {
    let max_x = image.width().saturating_sub(1) as f32;
    let max_y = image.height().saturating_sub(1) as f32;
    let x = (x - 0.5).clamp(0.0, max_x);
    let y = (y - 0.5).clamp(0.0, max_y);
    let (x0, y0) = (x.floor() as u32, y.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(max_x as u32), (y0 + 1).min(max_y as u32));
    let (fx, fy) = (x - x0 as f32, y - y0 as f32);

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] as f32 * (1.0 - fx) + p10[i] as f32 * fx;
        let bottom = p01[i] as f32 * (1.0 - fx) + p11[i] as f32 * fx;
        out[i] = (top * (1.0 - fy) + bottom * fy).round() as u8;
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Canvas
// ─────────────────────────────────────────────────────────────────────────────

struct Canvas {
    image: RgbaImage,
    scale: f32,
}

impl Canvas {
    fn draw(&mut self, shape: &Shape) -> Result<(), RasterError> {
        match shape {
            Shape::RoundedRect {
                rect,
                radius,
                fill,
                border,
            } => self.rounded_rect(*rect, *radius, fill, *border),
            Shape::Circle {
                center,
                radius,
                fill,
                border,
            } => {
                let rect = Rect::from_center_size(*center, egui::vec2(*radius, *radius) * 2.0);
                self.rounded_rect(rect, *radius, &Fill::Solid(*fill), *border);
            }
            Shape::Polygon { points, fill } => self.polygon(points, *fill),
            Shape::Line {
                from,
                to,
                width,
                color,
            } => self.line(*from, *to, *width, *color),
            Shape::Photo {
                center,
                radius,
                image,
                ..
            } => self.photo(*center, *radius, image),
            Shape::Text {
                pos,
                align,
                text,
                size,
                color,
                font,
            } => self.text(*pos, *align, text, *size, *color, *font)?,
        }
        Ok(())
    }

    /// Pixel range covering a logical rectangle, padded by one pixel.
    fn pixel_bounds(&self, rect: Rect) -> (u32, u32, u32, u32) {
        let s = self.scale;
        let clamp_x = |v: f32| v.clamp(0.0, self.image.width() as f32) as u32;
        let clamp_y = |v: f32| v.clamp(0.0, self.image.height() as f32) as u32;
        (
            clamp_x((rect.min.x * s).floor() - 1.0),
            clamp_y((rect.min.y * s).floor() - 1.0),
            clamp_x((rect.max.x * s).ceil() + 1.0),
            clamp_y((rect.max.y * s).ceil() + 1.0),
        )
    }

    /// Logical position of a pixel center.
    fn logical(&self, px: u32, py: u32) -> Pos2 {
        Pos2::new(
            (px as f32 + 0.5) / self.scale,
            (py as f32 + 0.5) / self.scale,
        )
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: &Fill, border: Option<Border>) {
        let (x0, y0, x1, y1) = self.pixel_bounds(rect);
        let s = self.scale;
        for py in y0..y1 {
            for px in x0..x1 {
                let p = self.logical(px, py);
                let d = rounded_rect_sdf(rect, radius, p) * s;
                let outer = coverage(d);
                if outer <= 0.0 {
                    continue;
                }
                let color = fill.color_at(rect, p);
                blend(self.image.get_pixel_mut(px, py), rgba(color), outer);

                if let Some(border) = border {
                    let inner = coverage(d + border.width * s);
                    let ring = (outer - inner).max(0.0);
                    blend(self.image.get_pixel_mut(px, py), rgba(border.color), ring);
                }
            }
        }
    }

    fn polygon(&mut self, points: &[Pos2], fill: Color32) {
        if points.len() < 3 {
            return;
        }
        const SAMPLES: u32 = 4;
        let bounds = Rect::from_points(points);
        let (x0, y0, x1, y1) = self.pixel_bounds(bounds);
        let color = rgba(fill);
        for py in y0..y1 {
            for px in x0..x1 {
                let mut hits = 0;
                for sy in 0..SAMPLES {
                    for sx in 0..SAMPLES {
                        let p = Pos2::new(
                            (px as f32 + (sx as f32 + 0.5) / SAMPLES as f32) / self.scale,
                            (py as f32 + (sy as f32 + 0.5) / SAMPLES as f32) / self.scale,
                        );
                        if polygon_contains(points, p) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    let cov = hits as f32 / (SAMPLES * SAMPLES) as f32;
                    blend(self.image.get_pixel_mut(px, py), color, cov);
                }
            }
        }
    }

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let half = width / 2.0;
        let bounds = Rect::from_two_pos(from, to).expand(half);
        let (x0, y0, x1, y1) = self.pixel_bounds(bounds);
        let color = rgba(color);
        for py in y0..y1 {
            for px in x0..x1 {
                let d = capsule_sdf(from, to, half, self.logical(px, py)) * self.scale;
                let cov = coverage(d);
                if cov > 0.0 {
                    blend(self.image.get_pixel_mut(px, py), color, cov);
                }
            }
        }
    }

    fn photo(&mut self, center: Pos2, radius: f32, image: &RgbaImage) {
        if image.width() == 0 || image.height() == 0 || radius <= 0.0 {
            return;
        }
        let rect = Rect::from_center_size(center, egui::vec2(radius, radius) * 2.0);
        let (x0, y0, x1, y1) = self.pixel_bounds(rect);
        let to_src_x = image.width() as f32 / rect.width();
        let to_src_y = image.height() as f32 / rect.height();
        for py in y0..y1 {
            for px in x0..x1 {
                let p = self.logical(px, py);
                let d = ((p - center).length() - radius) * self.scale;
                let cov = coverage(d);
                if cov <= 0.0 {
                    continue;
                }
                let sample = sample_bilinear(
                    image,
                    (p.x - rect.min.x) * to_src_x,
                    (p.y - rect.min.y) * to_src_y,
                );
                blend(self.image.get_pixel_mut(px, py), sample, cov);
            }
        }
    }

    fn text(
        &mut self,
        pos: Pos2,
        align: TextAlign,
        text: &str,
        size: f32,
        color: Color32,
        font: CardFont,
    ) -> Result<(), RasterError> {
        if text.is_empty() {
            return Ok(());
        }
        let face = fonts::card_font(font).ok_or(RasterError::FontUnavailable(font))?;

        let s = self.scale;
        let left = match align {
            TextAlign::Left => pos.x,
            TextAlign::Center => pos.x - fonts::text_width(font, size, text) / 2.0,
        };
        let (width, height) = self.image.dimensions();
        let color = rgba(color);

        for glyph in fonts::layout_line(face, size * s, left * s, pos.y * s, text) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            let image = &mut self.image;
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                blend(image.get_pixel_mut(px as u32, py as u32), color, v);
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardRecord, Photo, Template};
    use crate::render::layout::build_scene;
    use crate::render::scene::CARD_SIZE;
    use egui::{pos2, vec2};
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn single_shape_scene(shape: Shape) -> CardScene {
        CardScene {
            size: vec2(10.0, 10.0),
            template: Template::Modern,
            shapes: vec![shape],
        }
    }

    #[test]
    fn test_bitmap_is_scaled() {
        let scene = build_scene(&CardRecord::sample(), Template::Modern);
        let bitmap = rasterize_scene(&scene, 2.0).unwrap();
        assert_eq!(bitmap.dimensions(), (640, 1000));
    }

    #[test]
    fn test_background_is_transparent_outside_rounded_corners() {
        let scene = build_scene(&CardRecord::sample(), Template::Classic);
        let bitmap = rasterize_scene(&scene, 2.0).unwrap();
        assert_eq!(bitmap.get_pixel(0, 0).0[3], 0);
        assert_eq!(bitmap.get_pixel(639, 999).0[3], 0);
        // Inside the card body the pixels are opaque
        assert_eq!(bitmap.get_pixel(320, 40).0[3], 255);
    }

    #[test]
    fn test_modern_gradient_runs_blue_to_purple() {
        let scene = build_scene(&CardRecord::blank(), Template::Modern);
        let bitmap = rasterize_scene(&scene, 1.0).unwrap();
        let top_left = bitmap.get_pixel(20, 20).0;
        let bottom_right = bitmap.get_pixel(300, 480).0;
        assert!(top_left[2] > top_left[0]);
        assert!(bottom_right[0] > top_left[0]);
    }

    #[test]
    fn test_minimal_card_has_white_body() {
        let scene = build_scene(&CardRecord::blank(), Template::Minimal);
        let bitmap = rasterize_scene(&scene, 1.0).unwrap();
        let p = bitmap.get_pixel(60, 450).0;
        assert_eq!(p, [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_is_painted() {
        let scene = single_shape_scene(Shape::Text {
            pos: pos2(0.0, 0.0),
            align: TextAlign::Left,
            text: "WWW".to_string(),
            size: 10.0,
            color: Color32::BLACK,
            font: CardFont::Proportional,
        });
        let bitmap = rasterize_scene(&scene, 2.0).unwrap();
        assert!(bitmap.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn test_polygon_fills_interior_only() {
        let scene = single_shape_scene(Shape::Polygon {
            points: vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(0.0, 10.0)],
            fill: Color32::RED,
        });
        let bitmap = rasterize_scene(&scene, 1.0).unwrap();
        assert_eq!(bitmap.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(bitmap.get_pixel(9, 9).0[3], 0);
    }

    #[test]
    fn test_border_ring_leaves_center_untouched() {
        let scene = single_shape_scene(Shape::Circle {
            center: pos2(5.0, 5.0),
            radius: 5.0,
            fill: Color32::TRANSPARENT,
            border: Some(Border {
                width: 1.0,
                color: Color32::BLACK,
            }),
        });
        let bitmap = rasterize_scene(&scene, 4.0).unwrap();
        assert_eq!(bitmap.get_pixel(20, 20).0[3], 0);
        assert_eq!(bitmap.get_pixel(20, 1).0[3], 255);
    }

    #[test]
    fn test_photo_pixels_appear_in_circle() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 200, 0, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let mut record = CardRecord::sample();
        record.photo = Some(Photo::from_bytes(buf));
        let scene = build_scene(&record, Template::Modern);
        let bitmap = rasterize_scene(&scene, 1.0).unwrap();

        // Photo circle center: horizontally centered, 184pt from the top
        let p = bitmap.get_pixel((CARD_SIZE.x / 2.0) as u32, 184).0;
        assert_eq!(p, [0, 200, 0, 255]);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        let scene = build_scene(&CardRecord::sample(), Template::Modern);
        assert!(matches!(
            rasterize_scene(&scene, 0.0),
            Err(RasterError::InvalidSize { .. })
        ));
        assert!(matches!(
            rasterize_scene(&scene, 100.0),
            Err(RasterError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let mut dst = Rgba([0, 0, 0, 0]);
        blend(&mut dst, [10, 20, 30, 255], 0.5);
        assert_eq!(dst.0, [10, 20, 30, 128]);
    }
}
