//! Background export jobs.
//!
//! A download runs on its own thread so the UI keeps painting while the card
//! is rasterized and encoded. The app polls the job once per frame.

use super::options::ExportFormat;
use super::pipeline::{download_as_document, download_as_image, ExportError};
use super::sink::DownloadSink;
use crate::render::PreviewSurface;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Result of one finished download.
pub type ExportOutcome = Result<PathBuf, ExportError>;

/// Everything a worker needs to run one download.
pub struct ExportRequest {
    pub format: ExportFormat,
    /// File name without extension
    pub filename: String,
    pub sink: Box<dyn DownloadSink>,
}

/// Run a request to completion on the current thread.
pub fn run_request(surface: &PreviewSurface, mut request: ExportRequest) -> ExportOutcome {
    match request.format {
        ExportFormat::Image => download_as_image(surface, &request.filename, request.sink.as_mut()),
        ExportFormat::Pdf => {
            download_as_document(surface, &request.filename, request.sink.as_mut())
        }
    }
}

/// A download running on a worker thread.
pub struct ExportJob {
    format: ExportFormat,
    receiver: Receiver<ExportOutcome>,
}

impl ExportJob {
    /// Start `request` in the background.
    pub fn spawn(surface: PreviewSurface, request: ExportRequest) -> std::io::Result<Self> {
        let format = request.format;
        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("card-export".to_string())
            .spawn(move || {
                let outcome = run_request(&surface, request);
                if sender.send(outcome).is_err() {
                    debug!("Export finished after its job was dropped");
                }
            })?;
        debug!("Spawned {:?} export job", format);
        Ok(Self { format, receiver })
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Return the outcome if the worker has finished.
    pub fn poll(&self) -> Option<ExportOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Export worker exited without reporting a result");
                Some(Err(ExportError::CaptureOrEncoding(
                    "Export worker stopped unexpectedly".to_string(),
                )))
            }
        }
    }

    /// Block until the worker finishes.
    pub fn wait(self) -> ExportOutcome {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(ExportError::CaptureOrEncoding(
                "Export worker stopped unexpectedly".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardRecord, Template};
    use crate::export::DirectorySink;
    use crate::render::build_scene;
    use tempfile::TempDir;

    #[test]
    fn test_job_writes_png() {
        let dir = TempDir::new().unwrap();
        let surface = PreviewSurface::new();
        surface.publish(build_scene(&CardRecord::sample(), Template::Minimal));

        let job = ExportJob::spawn(
            surface,
            ExportRequest {
                format: ExportFormat::Image,
                filename: "Alex Johnson-ID-Card".to_string(),
                sink: Box::new(DirectorySink::new(dir.path())),
            },
        )
        .unwrap();
        assert_eq!(job.format(), ExportFormat::Image);

        let path = job.wait().unwrap();
        assert_eq!(path, dir.path().join("Alex Johnson-ID-Card.png"));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 1000));
    }

    #[test]
    fn test_job_reports_missing_preview() {
        let dir = TempDir::new().unwrap();
        let job = ExportJob::spawn(
            PreviewSurface::new(),
            ExportRequest {
                format: ExportFormat::Pdf,
                filename: "card".to_string(),
                sink: Box::new(DirectorySink::new(dir.path())),
            },
        )
        .unwrap();

        assert!(matches!(job.wait(), Err(ExportError::NodeNotFound)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
