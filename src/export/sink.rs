//! Download sinks: where finished artifacts end up.

use super::ExportError;
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Highest "name (n).ext" suffix tried before giving up.
const MAX_COLLISION_SUFFIX: u32 = 9999;

/// Receives encoded artifacts.
pub trait DownloadSink: Send {
    /// Store `bytes` under `file_name` and return where they landed.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Writes artifacts into a directory without ever replacing existing files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    max_suffix: u32,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            max_suffix: MAX_COLLISION_SUFFIX,
        }
    }

    #[cfg(test)]
    fn with_max_suffix(mut self, max_suffix: u32) -> Self {
        self.max_suffix = max_suffix;
        self
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| ExportError::Write {
            path: self.directory.clone(),
            source,
        })?;

        let (stem, ext) = split_file_name(&sanitize_file_name(file_name));
        let mut last_tried = self.directory.join(numbered_name(&stem, ext.as_deref(), 0));
        for n in 0..=self.max_suffix {
            let candidate = self.directory.join(numbered_name(&stem, ext.as_deref(), n));
            // create_new makes the existence check and the creation one step
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut file) => {
                    file.write_all(bytes)
                        .and_then(|_| file.sync_all())
                        .map_err(|source| ExportError::Write {
                            path: candidate.clone(),
                            source,
                        })?;
                    info!("Wrote {} ({} bytes)", candidate.display(), bytes.len());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next name", candidate.display());
                    last_tried = candidate;
                }
                Err(source) => {
                    return Err(ExportError::Write {
                        path: candidate,
                        source,
                    })
                }
            }
        }

        Err(ExportError::Write {
            path: last_tried,
            source: std::io::Error::new(ErrorKind::AlreadyExists, "no free file name"),
        })
    }
}

/// Keeps deliveries in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    pub deliveries: Vec<(String, Vec<u8>)>,
}

#[cfg(test)]
impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        self.deliveries.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Names
// ─────────────────────────────────────────────────────────────────────────────

/// Replace characters that are not allowed in file names on common platforms.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.').trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

fn split_file_name(name: &str) -> (String, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), Some(ext.to_string()))
        }
        _ => (name.to_string(), None),
    }
}

fn numbered_name(stem: &str, ext: Option<&str>, n: u32) -> String {
    match (n, ext) {
        (0, Some(ext)) => format!("{}.{}", stem, ext),
        (0, None) => stem.to_string(),
        (n, Some(ext)) => format!("{} ({}).{}", stem, n, ext),
        (n, None) => format!("{} ({})", stem, n),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
