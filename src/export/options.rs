//! Export Formats and Page Geometry
//!
//! This module defines the download formats and the fixed measurements of
//! the exported artifacts.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// A4 page with the card centered on it
    #[default]
    Pdf,
    /// Lossless PNG of the card
    Image,
}

impl ExportFormat {
    /// Get the button label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "Download PDF",
            ExportFormat::Image => "Download Image",
        }
    }

    /// Noun used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Image => "image",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Image => "png",
        }
    }

    /// Get an icon for this format.
    pub fn icon(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "📄",
            ExportFormat::Image => "🖼",
        }
    }

    /// Get all available export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Pdf, ExportFormat::Image]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Pixels per logical point when capturing the preview.
pub const CAPTURE_SCALE: f32 = 2.0;

/// A4 portrait page size in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Size of the card on the printed page, in millimetres.
pub const CARD_WIDTH_MM: f32 = 85.0;
pub const CARD_HEIGHT_MM: f32 = 140.0;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// A rectangle on the page in millimetres, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Where the card lands on the page: centered, at a fixed footprint.
    pub fn centered_card() -> Self {
        Self {
            x: (PAGE_WIDTH_MM - CARD_WIDTH_MM) / 2.0,
            y: (PAGE_HEIGHT_MM - CARD_HEIGHT_MM) / 2.0,
            width: CARD_WIDTH_MM,
            height: CARD_HEIGHT_MM,
        }
    }

    /// Distance from the bottom of the page to the bottom edge, in mm.
    pub fn bottom(&self) -> f32 {
        PAGE_HEIGHT_MM - self.y - self.height
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Image.extension(), "png");
    }

    #[test]
    fn test_export_format_label() {
        assert_eq!(ExportFormat::Pdf.label(), "Download PDF");
        assert_eq!(ExportFormat::Image.label(), "Download Image");
    }

    #[test]
    fn test_card_is_centered() {
        let p = Placement::centered_card();
        assert!((p.x - 62.5).abs() < f32::EPSILON);
        assert!((p.y - 78.5).abs() < f32::EPSILON);
        assert!((p.bottom() - 78.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mm_to_pt() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 0.001);
        assert!((mm_to_pt(PAGE_WIDTH_MM) - 595.27).abs() < 0.01);
    }
}
