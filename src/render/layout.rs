//! Card layout: turns a `CardRecord` and a `Template` into a `CardScene`.
//!
//! All measurements are in logical points on the 320 x 500 card.

use super::scene::{
    with_opacity, Border, CardScene, Fill, Gradient, Shape, TextAlign, CARD_SIZE,
};
use crate::card::{CardField, CardRecord, Template};
use crate::fonts::{self, CardFont};
use egui::{pos2, vec2, Color32, Pos2, Rect};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

const BLUE_500: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
const BLUE_600: Color32 = Color32::from_rgb(0x25, 0x63, 0xEB);
const PURPLE_600: Color32 = Color32::from_rgb(0x93, 0x33, 0xEA);
const SLATE_200: Color32 = Color32::from_rgb(0xE2, 0xE8, 0xF0);
const SLATE_400: Color32 = Color32::from_rgb(0x94, 0xA3, 0xB8);
const SLATE_700: Color32 = Color32::from_rgb(0x33, 0x41, 0x55);
const SLATE_800: Color32 = Color32::from_rgb(0x1E, 0x29, 0x3B);
const SLATE_900: Color32 = Color32::from_rgb(0x0F, 0x17, 0x2A);

// ─────────────────────────────────────────────────────────────────────────────
// Metrics
// ─────────────────────────────────────────────────────────────────────────────

const CARD_RADIUS: f32 = 16.0;
const PADDING: f32 = 24.0;
const CONTENT_WIDTH: f32 = CARD_SIZE.x - 2.0 * PADDING;
const COLUMN_GAP: f32 = 16.0;
const COLUMN_WIDTH: f32 = (CONTENT_WIDTH - COLUMN_GAP) / 2.0;

const ICON_SIZE: f32 = 32.0;
const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 14.0;
const LABEL_SIZE: f32 = 12.0;
const VALUE_SIZE: f32 = 16.0;
const SMALL_VALUE_SIZE: f32 = 14.0;
const EMAIL_SIZE: f32 = 12.0;

const PHOTO_DIAMETER: f32 = 96.0;
const PHOTO_RING: f32 = 4.0;
const QR_TILE: f32 = 64.0;
const QR_GLYPH: f32 = 48.0;

/// Card background for a template.
pub fn background_fill(template: Template) -> Fill {
    match template {
        Template::Modern => Fill::Diagonal(Gradient::even(&[BLUE_500, BLUE_600, PURPLE_600])),
        Template::Classic => Fill::Diagonal(Gradient::even(&[SLATE_700, SLATE_900])),
        Template::Minimal => Fill::Solid(Color32::WHITE),
    }
}

fn text_color(template: Template) -> Color32 {
    if template.has_dark_text() {
        SLATE_800
    } else {
        Color32::WHITE
    }
}

/// Build the card scene for the current form state.
pub fn build_scene(record: &CardRecord, template: Template) -> CardScene {
    let mut shapes = Vec::with_capacity(48);
    let fg = text_color(template);

    // Card body
    shapes.push(Shape::RoundedRect {
        rect: Rect::from_min_size(Pos2::ZERO, CARD_SIZE),
        radius: CARD_RADIUS,
        fill: background_fill(template),
        border: (template == Template::Minimal).then_some(Border {
            width: 2.0,
            color: SLATE_200,
        }),
    });

    // Header
    let mut y = PADDING;
    push_cap_icon(&mut shapes, pos2(CARD_SIZE.x / 2.0 - ICON_SIZE / 2.0, y), fg);
    y += ICON_SIZE + 8.0;

    push_centered_text(
        &mut shapes,
        y,
        record.display_value(CardField::Institution),
        TITLE_SIZE,
        fg,
    );
    y += 28.0;
    push_centered_text(
        &mut shapes,
        y,
        "Student Identification Card",
        SUBTITLE_SIZE,
        with_opacity(fg, 0.9),
    );
    y += 20.0 + PADDING;

    // Photo
    let center = pos2(CARD_SIZE.x / 2.0, y + PHOTO_DIAMETER / 2.0);
    push_photo(&mut shapes, record, center);
    y += PHOTO_DIAMETER + 16.0;

    // Details
    let left = PADDING;
    let right = PADDING + COLUMN_WIDTH + COLUMN_GAP;

    push_labelled(
        &mut shapes,
        pos2(left, y),
        "NAME",
        record.display_value(CardField::Name),
        VALUE_SIZE,
        CardFont::Proportional,
        CONTENT_WIDTH,
        fg,
    );
    y += 16.0 + 24.0 + 12.0;

    push_labelled(
        &mut shapes,
        pos2(left, y),
        "ID",
        record.display_value(CardField::Id),
        SMALL_VALUE_SIZE,
        CardFont::Monospace,
        COLUMN_WIDTH,
        fg,
    );
    push_labelled(
        &mut shapes,
        pos2(right, y),
        "COURSE",
        record.display_value(CardField::Program),
        SMALL_VALUE_SIZE,
        CardFont::Proportional,
        COLUMN_WIDTH,
        fg,
    );
    y += 16.0 + 20.0 + 12.0;

    push_labelled(
        &mut shapes,
        pos2(left, y),
        "EMAIL",
        record.display_value(CardField::Email),
        EMAIL_SIZE,
        CardFont::Proportional,
        CONTENT_WIDTH,
        fg,
    );

    // Corner decorations
    push_qr_tile(
        &mut shapes,
        pos2(
            CARD_SIZE.x - PADDING - QR_TILE,
            CARD_SIZE.y - PADDING - QR_TILE,
        ),
    );
    push_badge(&mut shapes, template);

    CardScene {
        size: CARD_SIZE,
        template,
        shapes,
    }
}

/// Keeps the last built scene until the record or template changes.
#[derive(Debug, Default)]
pub struct SceneCache {
    cached: Option<(CardRecord, Template, CardScene)>,
    builds: u64,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene for `record` and `template`, rebuilt only when either differs
    /// from the previous call.
    pub fn scene(&mut self, record: &CardRecord, template: Template) -> &CardScene {
        let entry = match self.cached.take() {
            Some(entry) if entry.0 == *record && entry.1 == template => entry,
            _ => {
                let scene = build_scene(record, template);
                self.builds += 1;
                debug!(
                    "Built {:?} card scene #{} with {} shapes",
                    template,
                    self.builds,
                    scene.shapes.len()
                );
                (record.clone(), template, scene)
            }
        };
        &self.cached.insert(entry).2
    }

    /// How many scenes have been built so far.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Building Blocks
// ─────────────────────────────────────────────────────────────────────────────

fn push_centered_text(shapes: &mut Vec<Shape>, y: f32, text: &str, size: f32, color: Color32) {
    shapes.push(Shape::Text {
        pos: pos2(CARD_SIZE.x / 2.0, y),
        align: TextAlign::Center,
        text: fonts::ellipsize(CardFont::Proportional, size, text, CONTENT_WIDTH),
        size,
        color,
        font: CardFont::Proportional,
    });
}

#[allow(clippy::too_many_arguments)]
fn push_labelled(
    shapes: &mut Vec<Shape>,
    top_left: Pos2,
    label: &str,
    value: &str,
    size: f32,
    font: CardFont,
    max_width: f32,
    color: Color32,
) {
    shapes.push(Shape::Text {
        pos: top_left,
        align: TextAlign::Left,
        text: label.to_string(),
        size: LABEL_SIZE,
        color: with_opacity(color, 0.7),
        font: CardFont::Proportional,
    });
    shapes.push(Shape::Text {
        pos: top_left + vec2(0.0, 16.0 + (24.0 - size) / 2.0 - 2.0),
        align: TextAlign::Left,
        text: fonts::ellipsize(font, size, value, max_width),
        size,
        color,
        font,
    });
}

fn push_photo(shapes: &mut Vec<Shape>, record: &CardRecord, center: Pos2) {
    let radius = PHOTO_DIAMETER / 2.0;
    shapes.push(Shape::Circle {
        center,
        radius,
        fill: Color32::WHITE,
        border: None,
    });

    let inner = radius - PHOTO_RING;
    match record.photo.as_ref().and_then(|p| p.image().map(|img| (p.id(), img))) {
        Some((photo_id, image)) => shapes.push(Shape::Photo {
            center,
            radius: inner,
            photo_id,
            image: image.clone(),
        }),
        None => {
            shapes.push(Shape::Circle {
                center,
                radius: inner,
                fill: SLATE_200,
                border: None,
            });
            push_upload_glyph(shapes, center - vec2(16.0, 16.0), 32.0);
        }
    }

    shapes.push(Shape::Circle {
        center,
        radius,
        fill: Color32::TRANSPARENT,
        border: Some(Border {
            width: PHOTO_RING,
            color: with_opacity(Color32::WHITE, 0.2),
        }),
    });
}

fn push_badge(shapes: &mut Vec<Shape>, template: Template) {
    let label = template.badge();
    let text_width = fonts::text_width(CardFont::Proportional, LABEL_SIZE, label);
    let width = text_width + 20.0;
    let rect = Rect::from_min_size(pos2(CARD_SIZE.x - PADDING - width, PADDING), vec2(width, 20.0));

    shapes.push(Shape::RoundedRect {
        rect,
        radius: 10.0,
        fill: Fill::Solid(with_opacity(Color32::WHITE, 0.2)),
        border: Some(Border {
            width: 1.0,
            color: with_opacity(Color32::WHITE, 0.3),
        }),
    });
    shapes.push(Shape::Text {
        pos: pos2(rect.center().x, rect.top() + 2.0),
        align: TextAlign::Center,
        text: label.to_string(),
        size: LABEL_SIZE,
        color: Color32::WHITE,
        font: CardFont::Proportional,
    });
}

fn push_qr_tile(shapes: &mut Vec<Shape>, top_left: Pos2) {
    shapes.push(Shape::RoundedRect {
        rect: Rect::from_min_size(top_left, vec2(QR_TILE, QR_TILE)),
        radius: 8.0,
        fill: Fill::Solid(Color32::WHITE),
        border: None,
    });
    let inset = (QR_TILE - QR_GLYPH) / 2.0;
    push_qr_glyph(shapes, top_left + vec2(inset, inset), QR_GLYPH);
}

// ─────────────────────────────────────────────────────────────────────────────
// Glyphs (drawn on a 24-unit grid)
// ─────────────────────────────────────────────────────────────────────────────

/// Maps 24-unit icon coordinates into card space.
struct IconGrid {
    origin: Pos2,
    unit: f32,
}

impl IconGrid {
    fn new(origin: Pos2, size: f32) -> Self {
        Self {
            origin,
            unit: size / 24.0,
        }
    }

    fn p(&self, u: f32, v: f32) -> Pos2 {
        self.origin + vec2(u, v) * self.unit
    }

    fn rect(&self, u: f32, v: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(self.p(u, v), vec2(w, h) * self.unit)
    }
}

fn push_cap_icon(shapes: &mut Vec<Shape>, origin: Pos2, color: Color32) {
    let g = IconGrid::new(origin, ICON_SIZE);

    // Board
    shapes.push(Shape::Polygon {
        points: vec![g.p(2.0, 10.0), g.p(12.0, 5.5), g.p(22.0, 10.0), g.p(12.0, 14.5)],
        fill: color,
    });

    // Crown below the board
    let mut crown = vec![g.p(6.0, 12.3), g.p(12.0, 15.0), g.p(18.0, 12.3), g.p(18.0, 16.0)];
    for step in 1..=8 {
        let theta = std::f32::consts::PI * step as f32 / 8.0;
        crown.push(g.p(12.0 + 6.0 * theta.cos(), 16.0 + 3.0 * theta.sin()));
    }
    shapes.push(Shape::Polygon {
        points: crown,
        fill: color,
    });

    // Tassel
    shapes.push(Shape::Line {
        from: g.p(22.0, 10.0),
        to: g.p(22.0, 16.0),
        width: 2.0 * g.unit,
        color,
    });
}

fn push_upload_glyph(shapes: &mut Vec<Shape>, origin: Pos2, size: f32) {
    let g = IconGrid::new(origin, size);
    let width = 2.0 * g.unit;

    shapes.push(Shape::Polygon {
        points: vec![g.p(12.0, 3.0), g.p(17.0, 8.5), g.p(7.0, 8.5)],
        fill: SLATE_400,
    });
    let segments = [
        ((12.0, 8.0), (12.0, 15.0)),
        ((3.0, 15.0), (3.0, 19.0)),
        ((3.0, 19.0), (21.0, 19.0)),
        ((21.0, 19.0), (21.0, 15.0)),
    ];
    for ((u0, v0), (u1, v1)) in segments {
        shapes.push(Shape::Line {
            from: g.p(u0, v0),
            to: g.p(u1, v1),
            width,
            color: SLATE_400,
        });
    }
}

fn push_qr_glyph(shapes: &mut Vec<Shape>, origin: Pos2, size: f32) {
    let g = IconGrid::new(origin, size);

    for (u, v) in [(3.0, 3.0), (16.0, 3.0), (3.0, 16.0)] {
        shapes.push(Shape::RoundedRect {
            rect: g.rect(u, v, 5.0, 5.0),
            radius: g.unit,
            fill: Fill::Solid(Color32::TRANSPARENT),
            border: Some(Border {
                width: 2.0 * g.unit,
                color: SLATE_800,
            }),
        });
    }

    let modules = [
        (11.0, 3.0),
        (11.0, 7.0),
        (3.0, 11.0),
        (7.0, 11.0),
        (11.0, 11.0),
        (15.0, 11.0),
        (19.0, 11.0),
        (11.0, 15.0),
        (15.0, 15.0),
        (19.0, 19.0),
        (15.0, 19.0),
        (11.0, 19.0),
    ];
    for (u, v) in modules {
        shapes.push(Shape::RoundedRect {
            rect: g.rect(u, v, 2.0, 2.0),
            radius: 0.0,
            fill: Fill::Solid(SLATE_800),
            border: None,
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
