//! Live card preview.
//!
//! Paints a `CardScene` with the egui painter, scaled to the available space,
//! and publishes the scene to the `PreviewSurface` that exports capture from.

use crate::render::{CardScene, Fill, PreviewSurface, Shape, TextAlign};
use eframe::egui::{
    self, epaint::Vertex, Align2, Color32, ColorImage, FontId, Mesh, Pos2, Rect, Response,
    Rounding, Sense, Stroke, TextureHandle, TextureOptions, Ui, Vec2,
};
use log::debug;
use std::collections::HashMap;

/// Segments used to approximate a quarter circle.
const CORNER_SEGMENTS: usize = 8;
/// Segments used for full circles drawn as meshes.
const CIRCLE_SEGMENTS: usize = 48;
/// Largest on-screen magnification of the card.
const MAX_PREVIEW_SCALE: f32 = 1.5;

/// Paints card scenes and keeps photo textures alive between frames.
#[derive(Default)]
pub struct CardPreview {
    textures: HashMap<u64, TextureHandle>,
}

impl CardPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `scene` centered in the remaining space and publish it.
    pub fn show(&mut self, ui: &mut Ui, scene: CardScene, surface: &PreviewSurface) -> Response {
        let available = ui.available_size();
        if available.x < 1.0 || available.y < 1.0 {
            // Nothing on screen to capture
            surface.clear();
            return ui.allocate_response(Vec2::ZERO, Sense::hover());
        }
        let scale = (available.x / scene.size.x)
            .min(available.y / scene.size.y)
            .clamp(0.1, MAX_PREVIEW_SCALE);
        let size = scene.size * scale;
        let (outer, response) = ui.allocate_exact_size(available.max(size), Sense::hover());
        let card_rect = Rect::from_center_size(outer.center(), size);

        self.sync_textures(ui.ctx(), &scene);

        let painter = ui.painter_at(outer);
        let xf = Transform {
            origin: card_rect.min,
            scale,
        };

        // Soft drop shadow under the card
        for (spread, alpha) in [(6.0, 10), (3.0, 18)] {
            painter.rect_filled(
                card_rect.translate(egui::vec2(0.0, 4.0)).expand(spread),
                Rounding::same((16.0 + spread) * scale),
                Color32::from_black_alpha(alpha),
            );
        }

        for shape in &scene.shapes {
            self.paint_shape(&painter, &xf, shape);
        }

        surface.publish(scene);
        response
    }

    /// Upload textures for new photos and drop the ones no longer shown.
    fn sync_textures(&mut self, ctx: &egui::Context, scene: &CardScene) {
        let mut visible = Vec::new();
        for shape in &scene.shapes {
            if let Shape::Photo {
                photo_id, image, ..
            } = shape
            {
                visible.push(*photo_id);
                self.textures.entry(*photo_id).or_insert_with(|| {
                    debug!("Uploading texture for photo {}", photo_id);
                    let color_image = ColorImage::from_rgba_unmultiplied(
                        [image.width() as usize, image.height() as usize],
                        image.as_raw(),
                    );
                    ctx.load_texture(
                        format!("card-photo-{}", photo_id),
                        color_image,
                        TextureOptions::LINEAR,
                    )
                });
            }
        }
        self.textures.retain(|id, _| visible.contains(id));
    }

    fn paint_shape(&self, painter: &egui::Painter, xf: &Transform, shape: &Shape) {
        match shape {
            Shape::RoundedRect {
                rect,
                radius,
                fill,
                border,
            } => {
                let rect = xf.rect(*rect);
                let radius = radius * xf.scale;
                match fill {
                    Fill::Solid(color) => {
                        painter.rect_filled(rect, Rounding::same(radius), *color);
                    }
                    Fill::Diagonal(_) => {
                        let outline = rounded_rect_outline(rect, radius);
                        painter.add(gradient_fan(&outline, |p| fill.color_at(rect, p)));
                    }
                }
                if let Some(border) = border {
                    let w = border.width * xf.scale;
                    painter.rect_stroke(
                        rect.shrink(w / 2.0),
                        Rounding::same((radius - w / 2.0).max(0.0)),
                        Stroke::new(w, border.color),
                    );
                }
            }
            Shape::Circle {
                center,
                radius,
                fill,
                border,
            } => {
                let center = xf.pos(*center);
                let radius = radius * xf.scale;
                painter.circle_filled(center, radius, *fill);
                if let Some(border) = border {
                    let w = border.width * xf.scale;
                    painter.circle_stroke(center, radius - w / 2.0, Stroke::new(w, border.color));
                }
            }
            Shape::Polygon { points, fill } => {
                let points: Vec<Pos2> = points.iter().map(|p| xf.pos(*p)).collect();
                painter.add(gradient_fan(&points, |_| *fill));
            }
            Shape::Line {
                from,
                to,
                width,
                color,
            } => {
                let (a, b) = (xf.pos(*from), xf.pos(*to));
                let w = width * xf.scale;
                painter.line_segment([a, b], Stroke::new(w, *color));
                painter.circle_filled(a, w / 2.0, *color);
                painter.circle_filled(b, w / 2.0, *color);
            }
            Shape::Photo {
                center,
                radius,
                photo_id,
                ..
            } => {
                if let Some(texture) = self.textures.get(photo_id) {
                    painter.add(photo_mesh(
                        texture.id(),
                        xf.pos(*center),
                        radius * xf.scale,
                    ));
                }
            }
            Shape::Text {
                pos,
                align,
                text,
                size,
                color,
                font,
            } => {
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_TOP,
                    TextAlign::Center => Align2::CENTER_TOP,
                };
                painter.text(
                    xf.pos(*pos),
                    anchor,
                    text,
                    FontId::new(size * xf.scale, font.egui_family()),
                    *color,
                );
            }
        }
    }
}

/// Maps card coordinates to screen coordinates.
struct Transform {
    origin: Pos2,
    scale: f32,
}

impl Transform {
    fn pos(&self, p: Pos2) -> Pos2 {
        self.origin + p.to_vec2() * self.scale
    }

    fn rect(&self, r: Rect) -> Rect {
        Rect::from_min_max(self.pos(r.min), self.pos(r.max))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mesh Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Outline of a rounded rectangle, clockwise from the top-left corner.
fn rounded_rect_outline(rect: Rect, radius: f32) -> Vec<Pos2> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let corners = [
        (Pos2::new(rect.left() + r, rect.top() + r), std::f32::consts::PI),
        (Pos2::new(rect.right() - r, rect.top() + r), 1.5 * std::f32::consts::PI),
        (Pos2::new(rect.right() - r, rect.bottom() - r), 0.0),
        (Pos2::new(rect.left() + r, rect.bottom() - r), 0.5 * std::f32::consts::PI),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (center, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let angle = start + std::f32::consts::FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
            points.push(center + Vec2::angled(angle) * r);
        }
    }
    points
}

/// Triangle fan from the centroid of `outline`, colored per vertex.
///
/// Correct for any polygon that is star-shaped around its centroid.
fn gradient_fan(outline: &[Pos2], color_at: impl Fn(Pos2) -> Color32) -> Mesh {
    let mut mesh = Mesh::default();
    if outline.len() < 3 {
        return mesh;
    }
    let sum = outline.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    let centroid = (sum / outline.len() as f32).to_pos2();

    mesh.colored_vertex(centroid, color_at(centroid));
    for p in outline {
        mesh.colored_vertex(*p, color_at(*p));
    }
    let n = outline.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    mesh
}

/// A textured disc showing the full texture.
fn photo_mesh(texture_id: egui::TextureId, center: Pos2, radius: f32) -> Mesh {
    let mut mesh = Mesh::with_texture(texture_id);
    mesh.vertices.push(Vertex {
        pos: center,
        uv: Pos2::new(0.5, 0.5),
        color: Color32::WHITE,
    });
    for i in 0..CIRCLE_SEGMENTS {
        let dir = Vec2::angled(std::f32::consts::TAU * i as f32 / CIRCLE_SEGMENTS as f32);
        mesh.vertices.push(Vertex {
            pos: center + dir * radius,
            uv: Pos2::new(0.5 + dir.x * 0.5, 0.5 + dir.y * 0.5),
            color: Color32::WHITE,
        });
    }
    let n = CIRCLE_SEGMENTS as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_stays_in_rect() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(320.0, 500.0));
        let outline = rounded_rect_outline(rect, 16.0);
        assert_eq!(outline.len(), 4 * (CORNER_SEGMENTS + 1));
        assert!(outline.iter().all(|p| rect.expand(0.01).contains(*p)));
        assert!((outline[0].x - rect.left()).abs() < 0.01);
    }

    #[test]
    fn test_fan_covers_outline() {
        let outline = [Pos2::ZERO, Pos2::new(10.0, 0.0), Pos2::new(0.0, 10.0)];
        let mesh = gradient_fan(&outline, |_| Color32::RED);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 9);
    }

    #[test]
    fn test_photo_mesh_uvs_in_range() {
        let mesh = photo_mesh(egui::TextureId::default(), Pos2::new(5.0, 5.0), 4.0);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (0.0..=1.0).contains(&v.uv.x) && (0.0..=1.0).contains(&v.uv.y)));
    }
}
