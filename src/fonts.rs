//! Font management for Cardforge
//!
//! The card is painted with the fonts egui ships by default, so the live
//! preview and the exported bitmap use identical glyph outlines. This module
//! exposes those same font files to the software rasterizer through
//! `rusttype`, plus the text measuring helpers the card layout relies on.

use egui::{FontDefinitions, FontFamily};
use log::{info, warn};
use rusttype::{point, Font, GlyphId, Scale};
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Font Family Names
// ─────────────────────────────────────────────────────────────────────────────

/// egui's bundled proportional font
const FONT_PROPORTIONAL_KEY: &str = "Ubuntu-Light";
/// egui's bundled monospace font
const FONT_MONOSPACE_KEY: &str = "Hack";

/// Rough advance per character (as a fraction of font size) used when a font
/// cannot be loaded.
const FALLBACK_ADVANCE: f32 = 0.55;

const ELLIPSIS: char = '…';

/// Typeface used by a run of card text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardFont {
    /// Body text
    Proportional,
    /// The card ID
    Monospace,
}

impl CardFont {
    /// egui family that renders this typeface in the preview.
    pub fn egui_family(&self) -> FontFamily {
        match self {
            CardFont::Proportional => FontFamily::Proportional,
            CardFont::Monospace => FontFamily::Monospace,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            CardFont::Proportional => FONT_PROPORTIONAL_KEY,
            CardFont::Monospace => FONT_MONOSPACE_KEY,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Loading
// ─────────────────────────────────────────────────────────────────────────────

struct CardFonts {
    proportional: Option<Font<'static>>,
    monospace: Option<Font<'static>>,
}

fn load_font(definitions: &FontDefinitions, kind: CardFont) -> Option<Font<'static>> {
    let Some(data) = definitions.font_data.get(kind.key()) else {
        warn!("Font '{}' missing from egui defaults", kind.key());
        return None;
    };
    let font = Font::try_from_vec_and_index(data.font.to_vec(), data.index);
    if font.is_none() {
        warn!("Font '{}' could not be parsed", kind.key());
    }
    font
}

fn card_fonts() -> &'static CardFonts {
    static FONTS: OnceLock<CardFonts> = OnceLock::new();
    FONTS.get_or_init(|| {
        let definitions = FontDefinitions::default();
        let fonts = CardFonts {
            proportional: load_font(&definitions, CardFont::Proportional),
            monospace: load_font(&definitions, CardFont::Monospace),
        };
        info!(
            "Card fonts loaded (proportional: {}, monospace: {})",
            fonts.proportional.is_some(),
            fonts.monospace.is_some()
        );
        fonts
    })
}

/// Get the rasterizable font for a typeface.
pub fn card_font(kind: CardFont) -> Option<&'static Font<'static>> {
    let fonts = card_fonts();
    match kind {
        CardFont::Proportional => fonts.proportional.as_ref(),
        CardFont::Monospace => fonts.monospace.as_ref(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Measuring
// ─────────────────────────────────────────────────────────────────────────────

/// Running line width, one character at a time.
struct LineMeasure {
    font: Option<&'static Font<'static>>,
    scale: Scale,
    size: f32,
    width: f32,
    previous: Option<GlyphId>,
}

impl LineMeasure {
    fn new(kind: CardFont, size: f32) -> Self {
        Self {
            font: card_font(kind),
            scale: Scale::uniform(size),
            size,
            width: 0.0,
            previous: None,
        }
    }

    /// Width the line would have with `ch` appended.
    fn width_with(&self, ch: char) -> f32 {
        match self.font {
            Some(font) => {
                let glyph = font.glyph(ch).scaled(self.scale);
                let mut width = self.width;
                if let Some(prev) = self.previous {
                    width += font.pair_kerning(self.scale, prev, glyph.id());
                }
                width + glyph.h_metrics().advance_width
            }
            None => self.width + self.size * FALLBACK_ADVANCE,
        }
    }

    fn push(&mut self, ch: char) {
        self.width = self.width_with(ch);
        if let Some(font) = self.font {
            self.previous = Some(font.glyph(ch).id());
        }
    }
}

/// Width of a single line of text, in the same units as `size`.
pub fn text_width(kind: CardFont, size: f32, text: &str) -> f32 {
    let mut measure = LineMeasure::new(kind, size);
    for ch in text.chars() {
        measure.push(ch);
    }
    measure.width
}

/// Shorten `text` with a trailing ellipsis until it fits in `max_width`.
///
/// Trailing whitespace before the ellipsis is dropped. Measuring stops at
/// the first character past `max_width`, so the cost is bounded by what fits
/// on the line rather than by the length of `text`.
pub fn ellipsize(kind: CardFont, size: f32, text: &str, max_width: f32) -> String {
    let mut measure = LineMeasure::new(kind, size);
    // Byte offset of the longest prefix that still fits with an ellipsis
    let mut cut = None;
    let mut ends_with_space = true;

    for (offset, ch) in text.char_indices() {
        if !ends_with_space && measure.width_with(ELLIPSIS) <= max_width {
            cut = Some(offset);
        }
        measure.push(ch);
        if measure.width > max_width {
            return match cut {
                Some(offset) => format!("{}{}", &text[..offset], ELLIPSIS),
                None => ELLIPSIS.to_string(),
            };
        }
        ends_with_space = ch.is_whitespace();
    }

    text.to_string()
}

/// Lay out glyphs for a line whose top-left corner is at (`x`, `y`).
pub fn layout_line<'a>(
    font: &'a Font<'static>,
    size: f32,
    x: f32,
    y: f32,
    text: &'a str,
) -> impl Iterator<Item = rusttype::PositionedGlyph<'static>> + 'a {
    let scale = Scale::uniform(size);
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(x, y + ascent))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fonts_available() {
        assert!(card_font(CardFont::Proportional).is_some());
        assert!(card_font(CardFont::Monospace).is_some());
    }

    #[test]
    fn test_text_width_grows_with_text() {
        let short = text_width(CardFont::Proportional, 14.0, "Alex");
        let long = text_width(CardFont::Proportional, 14.0, "Alex Johnson");
        assert!(short > 0.0);
        assert!(long > short);
        assert_eq!(text_width(CardFont::Proportional, 14.0, ""), 0.0);
    }

    #[test]
    fn test_monospace_advances_are_uniform() {
        let a = text_width(CardFont::Monospace, 14.0, "iiii");
        let b = text_width(CardFont::Monospace, 14.0, "WWWW");
        assert!((a - b).abs() < 0.01);
    }

    #[test]
    fn test_ellipsize_fits() {
        let text = "a.very.long.address@some-university.example.edu";
        let result = ellipsize(CardFont::Proportional, 12.0, text, 80.0);
        assert!(result.ends_with('…'));
        assert!(text_width(CardFont::Proportional, 12.0, &result) <= 80.0);
    }

    #[test]
    fn test_ellipsize_keeps_short_text() {
        assert_eq!(ellipsize(CardFont::Proportional, 12.0, "ok", 200.0), "ok");
    }

    #[test]
    fn test_ellipsize_drops_trailing_space() {
        let result = ellipsize(CardFont::Monospace, 10.0, "ab    cdefghijklmnop", 40.0);
        assert!(result.ends_with('…'));
        assert!(!result.trim_end_matches('…').ends_with(' '));
        assert!(text_width(CardFont::Monospace, 10.0, &result) <= 40.0);
    }

    #[test]
    fn test_ellipsize_keeps_longest_fitting_prefix() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let max = 60.0;
        let result = ellipsize(CardFont::Monospace, 10.0, text, max);
        let kept = result.trim_end_matches('…');
        assert!(text.starts_with(kept));
        assert!(text_width(CardFont::Monospace, 10.0, &result) <= max);
        let longer = format!("{}…", &text[..kept.len() + 1]);
        assert!(text_width(CardFont::Monospace, 10.0, &longer) > max);
    }

    #[test]
    fn test_ellipsize_long_input_is_fast() {
        let text = "a".repeat(10_000);
        let start = std::time::Instant::now();
        for _ in 0..10 {
            let result = ellipsize(CardFont::Proportional, 14.0, &text, 260.0);
            assert!(result.ends_with('…'));
            assert!(result.chars().count() < 200);
        }
        assert!(start.elapsed() < std::time::Duration::from_millis(500));
    }
}
