//! Capture and download pipeline.
//!
//! `rasterize` snapshots the card currently shown in the preview, the
//! `export_*` functions encode a bitmap and hand exactly one artifact to a
//! [`DownloadSink`], and the `download_as_*` functions chain the two.

use super::options::{ExportFormat, CAPTURE_SCALE};
use super::pdf::compose_pdf;
use super::png::encode_png;
use super::sink::DownloadSink;
use crate::render::{rasterize_scene, PreviewSurface, RasterError};
use image::RgbaImage;
use log::{debug, error, info};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Export Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while exporting a card.
#[derive(Debug)]
pub enum ExportError {
    /// No card is currently displayed in the preview
    NodeNotFound,
    /// Rasterizing the card or encoding the artifact failed
    CaptureOrEncoding(String),
    /// The artifact could not be written
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NodeNotFound => write!(f, "Card preview not found"),
            ExportError::CaptureOrEncoding(msg) => write!(f, "Capture or encoding failed: {}", msg),
            ExportError::Write { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RasterError> for ExportError {
    fn from(err: RasterError) -> Self {
        ExportError::CaptureOrEncoding(err.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::CaptureOrEncoding(err.to_string())
    }
}

impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        ExportError::CaptureOrEncoding(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline Steps
// ─────────────────────────────────────────────────────────────────────────────

/// Capture the displayed card as a bitmap at `scale` pixels per point.
pub fn rasterize(surface: &PreviewSurface, scale: f32) -> Result<RgbaImage, ExportError> {
    let scene = surface.snapshot().ok_or(ExportError::NodeNotFound)?;
    let bitmap = rasterize_scene(&scene, scale)?;
    debug!(
        "Captured {:?} card at {}x ({}x{})",
        scene.template,
        scale,
        bitmap.width(),
        bitmap.height()
    );
    Ok(bitmap)
}

/// Encode `bitmap` as PNG and deliver `<filename>.png`.
pub fn export_image(
    bitmap: &RgbaImage,
    filename: &str,
    sink: &mut dyn DownloadSink,
) -> Result<PathBuf, ExportError> {
    let bytes = encode_png(bitmap)?;
    let name = format!("{}.{}", filename, ExportFormat::Image.extension());
    let path = sink.deliver(&name, &bytes)?;
    info!("Exported card image to {}", path.display());
    Ok(path)
}

/// Place `bitmap` on an A4 page and deliver `<filename>.pdf`.
pub fn export_document(
    bitmap: &RgbaImage,
    filename: &str,
    sink: &mut dyn DownloadSink,
) -> Result<PathBuf, ExportError> {
    let bytes = compose_pdf(bitmap, filename)?;
    let name = format!("{}.{}", filename, ExportFormat::Pdf.extension());
    let path = sink.deliver(&name, &bytes)?;
    info!("Exported card PDF to {}", path.display());
    Ok(path)
}

/// Capture the displayed card and download it as a PNG.
pub fn download_as_image(
    surface: &PreviewSurface,
    filename: &str,
    sink: &mut dyn DownloadSink,
) -> Result<PathBuf, ExportError> {
    rasterize(surface, CAPTURE_SCALE)
        .and_then(|bitmap| export_image(&bitmap, filename, sink))
        .inspect_err(|e| error!("Error generating image: {}", e))
}

/// Capture the displayed card and download it as a PDF.
pub fn download_as_document(
    surface: &PreviewSurface,
    filename: &str,
    sink: &mut dyn DownloadSink,
) -> Result<PathBuf, ExportError> {
    rasterize(surface, CAPTURE_SCALE)
        .and_then(|bitmap| export_document(&bitmap, filename, sink))
        .inspect_err(|e| error!("Error generating PDF: {}", e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardRecord, Template};
    use crate::export::MemorySink;
    use crate::render::build_scene;

    fn mounted_surface() -> PreviewSurface {
        let surface = PreviewSurface::new();
        surface.publish(build_scene(&CardRecord::sample(), Template::Modern));
        surface
    }

    #[test]
    fn test_rasterize_captures_at_double_scale() {
        let bitmap = rasterize(&mounted_surface(), CAPTURE_SCALE).unwrap();
        assert_eq!(bitmap.dimensions(), (640, 1000));
    }

    #[test]
    fn test_rasterize_without_preview() {
        let result = rasterize(&PreviewSurface::new(), CAPTURE_SCALE);
        assert!(matches!(result, Err(ExportError::NodeNotFound)));
    }

    #[test]
    fn test_rasterize_rejects_zero_scale() {
        let result = rasterize(&mounted_surface(), 0.0);
        assert!(matches!(result, Err(ExportError::CaptureOrEncoding(_))));
    }

    #[test]
    fn test_download_image_delivers_one_png() {
        let mut sink = MemorySink::default();
        let stem = CardRecord::sample().export_file_stem();
        download_as_image(&mounted_surface(), &stem, &mut sink).unwrap();

        assert_eq!(sink.deliveries.len(), 1);
        let (name, bytes) = &sink.deliveries[0];
        assert_eq!(name, "Alex Johnson-ID-Card.png");
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_download_document_delivers_one_pdf() {
        let mut sink = MemorySink::default();
        let stem = CardRecord::sample().export_file_stem();
        download_as_document(&mounted_surface(), &stem, &mut sink).unwrap();

        assert_eq!(sink.deliveries.len(), 1);
        let (name, bytes) = &sink.deliveries[0];
        assert_eq!(name, "Alex Johnson-ID-Card.pdf");
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_missing_preview_delivers_nothing() {
        let mut sink = MemorySink::default();
        let surface = PreviewSurface::new();
        assert!(matches!(
            download_as_image(&surface, "x", &mut sink),
            Err(ExportError::NodeNotFound)
        ));
        assert!(matches!(
            download_as_document(&surface, "x", &mut sink),
            Err(ExportError::NodeNotFound)
        ));
        assert!(sink.deliveries.is_empty());
    }

    #[test]
    fn test_write_error_has_source() {
        use std::error::Error as _;
        let err = ExportError::Write {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/nope"));
    }
}
