//! Card Export Module for Cardforge
//!
//! This module captures the card shown in the preview and downloads it as a
//! PNG image or a printable PDF.
//!
//! # Supported Export Formats
//!
//! - **Image**: Lossless PNG at twice the card's logical size
//! - **PDF**: One A4 page with the card centered at 85 x 140 mm
//!
//! # Architecture
//!
//! - `options.rs` - Export formats and page geometry
//! - `pipeline.rs` - Capture, export and download steps
//! - `png.rs` / `pdf.rs` - Encoders
//! - `sink.rs` - Where artifacts are written
//! - `job.rs` - Background worker used by the UI

mod job;
mod options;
mod pdf;
mod pipeline;
mod png;
mod sink;

pub use job::{ExportJob, ExportOutcome, ExportRequest};
pub use options::ExportFormat;
pub use pipeline::ExportError;
pub use sink::DirectorySink;

#[cfg(test)]
pub use pipeline::{download_as_document, download_as_image};
#[cfg(test)]
pub use sink::MemorySink;
