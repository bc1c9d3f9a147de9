//! Application state management for Cardforge
//!
//! This module defines the central `AppState` struct that holds the card
//! being edited, the selected template, user settings and transient UI state
//! such as notifications and the export-in-progress flag.

use crate::card::{CardField, CardRecord, Photo, Template};
use crate::config::{load_config, save_config_silent, Settings};
use crate::error::{Error, Result};
use crate::export::{ExportFormat, ExportOutcome};
use log::{debug, info, warn};
use std::path::Path;

/// Photo file extensions accepted by the upload dialog and drag-and-drop.
pub const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Maximum number of notifications shown at once.
const TOAST_LIMIT: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Default,
    /// Errors and rejected actions
    Destructive,
}

/// A transient notification shown in the corner of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    /// App time in seconds at which the toast disappears
    pub expires_at: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the settings window is open
    pub show_settings: bool,
    /// Whether a download is running
    pub is_exporting: bool,
    /// Active notifications, oldest first
    pub toasts: Vec<Toast>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
///
/// The card record lives only in memory. The selected template is part of
/// the settings and is persisted with them.
#[derive(Debug)]
pub struct AppState {
    /// The card being edited
    pub record: CardRecord,
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
}

impl AppState {
    /// Create a new AppState with settings loaded from config.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, Template: {:?}",
            settings.theme, settings.template
        );
        Self::with_settings(settings)
    }

    /// Create AppState with custom settings (useful for testing).
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            record: CardRecord::sample(),
            settings,
            ui: UiState::default(),
            settings_dirty: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// The currently selected template.
    pub fn template(&self) -> Template {
        self.settings.template
    }

    /// Set one text field of the card.
    pub fn set_field(&mut self, field: CardField, value: impl Into<String>) {
        self.record.set_field(field, value);
    }

    /// Attach an encoded photo payload to the card.
    pub fn set_photo(&mut self, bytes: impl Into<std::sync::Arc<[u8]>>) {
        let photo = Photo::from_bytes(bytes);
        debug!("Photo {} attached ({} bytes)", photo.id(), photo.bytes().len());
        self.record.photo = Some(photo);
    }

    /// Read a photo from disk and attach it.
    pub fn load_photo(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|source| Error::PhotoRead {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded photo from {}", path.display());
        self.set_photo(bytes);
        Ok(())
    }

    /// Load a photo and turn a failure into a notification.
    pub fn load_photo_or_notify(&mut self, path: &Path, now: f64) {
        if let Err(e) = self.load_photo(path) {
            warn!("{}", e);
            self.push_toast(
                "Photo Upload Failed",
                "The selected photo could not be read.",
                ToastKind::Destructive,
                now,
            );
        }
    }

    /// Remove the photo from the card.
    pub fn clear_photo(&mut self) {
        self.record.photo = None;
    }

    /// Switch the card template. The card record is left untouched.
    pub fn select_template(&mut self, template: Template) {
        if self.settings.template != template {
            debug!("Template changed to {:?}", template);
            self.settings.template = template;
            self.settings_dirty = true;
        }
    }

    /// Clear every field and the photo. The template is kept.
    pub fn reset_form(&mut self) {
        self.record = CardRecord::blank();
        debug!("Form reset");
    }

    /// Restore the example card shown at startup.
    pub fn restore_sample(&mut self) {
        self.record = CardRecord::sample();
        debug!("Sample card restored");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export Gate
    // ─────────────────────────────────────────────────────────────────────────

    /// Check whether a download may start and mark it as running.
    ///
    /// Returns the base file name for the artifact, or `None` when the card is
    /// missing its name or ID (a notification is shown) or a download is
    /// already running.
    pub fn prepare_export(&mut self, format: ExportFormat, now: f64) -> Option<String> {
        if self.ui.is_exporting {
            debug!("{:?} export ignored, another export is running", format);
            return None;
        }
        if !self.record.is_exportable() {
            self.push_toast(
                "Missing Information",
                "Please fill in at least the student name and ID before downloading.",
                ToastKind::Destructive,
                now,
            );
            return None;
        }

        self.ui.is_exporting = true;
        Some(self.record.export_file_stem())
    }

    /// Record the end of a download and notify the user.
    pub fn finish_export(&mut self, format: ExportFormat, outcome: &ExportOutcome, now: f64) {
        self.ui.is_exporting = false;
        match outcome {
            Ok(path) => {
                info!("{:?} export finished: {}", format, path.display());
                self.push_toast(
                    "Success!",
                    format!("ID card {} downloaded successfully.", format.noun()),
                    ToastKind::Default,
                    now,
                );
            }
            Err(e) => {
                warn!("{:?} export failed: {}", format, e);
                self.push_toast(
                    "Download Failed",
                    format!(
                        "There was an error downloading the {}. Please try again.",
                        format.noun()
                    ),
                    ToastKind::Destructive,
                    now,
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a notification for the configured duration.
    pub fn push_toast(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: ToastKind,
        now: f64,
    ) {
        self.ui.toasts.push(Toast {
            title: title.into(),
            description: description.into(),
            kind,
            expires_at: now + self.settings.toast_duration_secs,
        });
        if self.ui.toasts.len() > TOAST_LIMIT {
            let excess = self.ui.toasts.len() - TOAST_LIMIT;
            self.ui.toasts.drain(..excess);
        }
    }

    /// Drop expired notifications. Call once per frame.
    pub fn update_toasts(&mut self, now: f64) {
        self.ui.toasts.retain(|t| now < t.expires_at);
    }

    /// Dismiss a notification by index.
    pub fn dismiss_toast(&mut self, index: usize) {
        if index < self.ui.toasts.len() {
            self.ui.toasts.remove(index);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings.sanitize();
        self.settings_dirty = true;
    }

    /// Mark settings as dirty (needing to be saved).
    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Toggle the settings window.
    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    /// Prepare state for application shutdown.
    pub fn shutdown(&mut self) {
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a dropped or selected file looks like a supported photo.
pub fn is_photo_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PHOTO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{download_as_document, download_as_image, ExportError, MemorySink};
    use crate::render::{build_scene, PreviewSurface};
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::with_settings(Settings::default())
    }

    #[test]
    fn test_starts_with_sample_card() {
        let state = state();
        assert_eq!(state.record, CardRecord::sample());
        assert_eq!(state.template(), Template::Modern);
        assert!(!state.ui.is_exporting);
    }

    #[test]
    fn test_set_field() {
        let mut state = state();
        state.set_field(CardField::Program, "Physics");
        assert_eq!(state.record.program, "Physics");
    }

    #[test]
    fn test_reset_clears_everything_for_any_template() {
        for template in Template::all() {
            let mut state = state();
            state.select_template(*template);
            state.set_photo(vec![1u8, 2, 3]);
            state.reset_form();
            assert_eq!(state.record, CardRecord::blank());
            assert!(state.record.photo.is_none());
            assert_eq!(state.template(), *template);
        }
    }

    #[test]
    fn test_template_switch_keeps_record() {
        let mut state = state();
        state.set_field(CardField::Name, "Sam Lee");
        let before = state.record.clone();
        state.select_template(Template::Minimal);
        state.select_template(Template::Classic);
        assert_eq!(state.record, before);
        assert!(state.settings_dirty());
    }

    #[test]
    fn test_restore_sample() {
        let mut state = state();
        state.reset_form();
        state.restore_sample();
        assert_eq!(state.record, CardRecord::sample());
    }

    #[test]
    fn test_gate_rejects_missing_name_or_id() {
        for field in [CardField::Name, CardField::Id] {
            let mut state = state();
            state.set_field(field, "");
            assert_eq!(state.prepare_export(ExportFormat::Pdf, 0.0), None);
            assert_eq!(state.ui.toasts.len(), 1);
            let toast = &state.ui.toasts[0];
            assert_eq!(toast.title, "Missing Information");
            assert_eq!(
                toast.description,
                "Please fill in at least the student name and ID before downloading."
            );
            assert_eq!(toast.kind, ToastKind::Destructive);
            assert!(!state.ui.is_exporting);
        }
    }

    #[test]
    fn test_gate_returns_file_stem() {
        let mut state = state();
        let stem = state.prepare_export(ExportFormat::Image, 0.0);
        assert_eq!(stem.as_deref(), Some("Alex Johnson-ID-Card"));
        assert!(state.ui.is_exporting);
        assert!(state.ui.toasts.is_empty());
    }

    #[test]
    fn test_gate_blocks_while_running() {
        let mut state = state();
        assert!(state.prepare_export(ExportFormat::Image, 0.0).is_some());
        assert!(state.prepare_export(ExportFormat::Pdf, 0.0).is_none());
        assert!(state.ui.toasts.is_empty());
    }

    #[test]
    fn test_gated_export_delivers_once() {
        let surface = PreviewSurface::new();
        let mut state = state();
        surface.publish(build_scene(&state.record, state.template()));

        let mut sink = MemorySink::default();
        let stem = state.prepare_export(ExportFormat::Image, 0.0).unwrap();
        let outcome = download_as_image(&surface, &stem, &mut sink);
        state.finish_export(ExportFormat::Image, &outcome, 0.0);

        assert_eq!(sink.deliveries.len(), 1);
        assert_eq!(sink.deliveries[0].0, "Alex Johnson-ID-Card.png");
        assert!(!state.ui.is_exporting);
    }

    #[test]
    fn test_whitespace_name_passes_gate() {
        let mut state = state();
        state.set_field(CardField::Name, " ");
        let stem = state.prepare_export(ExportFormat::Image, 0.0);
        assert_eq!(stem.as_deref(), Some(" -ID-Card"));
        assert!(state.ui.toasts.is_empty());
    }

    #[test]
    fn test_any_non_empty_record_downloads_one_pdf() {
        let long_name = "Maximilian ".repeat(200);
        let cases: [(&str, &str); 4] = [
            ("   ", "\t"),
            ("Zoë Ångström-Núñez", "学生-0042"),
            (long_name.as_str(), "ST2024001"),
            ("x", "1"),
        ];

        for (name, id) in cases {
            let surface = PreviewSurface::new();
            let mut state = state();
            state.reset_form();
            state.set_field(CardField::Name, name);
            state.set_field(CardField::Id, id);
            surface.publish(build_scene(&state.record, state.template()));

            let mut sink = MemorySink::default();
            let stem = state
                .prepare_export(ExportFormat::Pdf, 0.0)
                .expect("non-empty name and id pass the gate");
            let outcome = download_as_document(&surface, &stem, &mut sink);
            state.finish_export(ExportFormat::Pdf, &outcome, 0.0);

            assert!(outcome.is_ok(), "export failed for {:?}", name);
            assert_eq!(sink.deliveries.len(), 1);
            assert_eq!(sink.deliveries[0].0, format!("{}-ID-Card.pdf", name));
            assert!(sink.deliveries[0].1.starts_with(b"%PDF"));
            assert_eq!(state.ui.toasts.len(), 1);
            assert_eq!(state.ui.toasts[0].title, "Success!");
        }
    }

    #[test]
    fn test_rejected_export_delivers_nothing() {
        let surface = PreviewSurface::new();
        let mut state = state();
        state.set_field(CardField::Id, "");
        surface.publish(build_scene(&state.record, state.template()));

        let mut sink = MemorySink::default();
        if let Some(stem) = state.prepare_export(ExportFormat::Image, 0.0) {
            let _ = download_as_image(&surface, &stem, &mut sink);
        }
        assert!(sink.deliveries.is_empty());
        assert_eq!(state.ui.toasts.len(), 1);
    }

    #[test]
    fn test_finish_export_success_toast() {
        let mut state = state();
        state.prepare_export(ExportFormat::Pdf, 0.0);
        state.finish_export(ExportFormat::Pdf, &Ok(PathBuf::from("a.pdf")), 1.0);
        let toast = &state.ui.toasts[0];
        assert_eq!(toast.title, "Success!");
        assert_eq!(toast.description, "ID card PDF downloaded successfully.");
        assert_eq!(toast.kind, ToastKind::Default);
    }

    #[test]
    fn test_finish_export_failure_keeps_record() {
        let mut state = state();
        let before = state.record.clone();
        state.prepare_export(ExportFormat::Image, 0.0);
        state.finish_export(ExportFormat::Image, &Err(ExportError::NodeNotFound), 1.0);

        let toast = &state.ui.toasts[0];
        assert_eq!(toast.title, "Download Failed");
        assert_eq!(
            toast.description,
            "There was an error downloading the image. Please try again."
        );
        assert_eq!(toast.kind, ToastKind::Destructive);
        assert_eq!(state.record, before);
        assert!(!state.ui.is_exporting);
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = state();
        state.push_toast("a", "b", ToastKind::Default, 10.0);
        state.update_toasts(10.0 + state.settings.toast_duration_secs - 0.1);
        assert_eq!(state.ui.toasts.len(), 1);
        state.update_toasts(10.0 + state.settings.toast_duration_secs);
        assert!(state.ui.toasts.is_empty());
    }

    #[test]
    fn test_toast_limit() {
        let mut state = state();
        for i in 0..5 {
            state.push_toast(format!("t{}", i), "", ToastKind::Default, 0.0);
        }
        assert_eq!(state.ui.toasts.len(), TOAST_LIMIT);
        assert_eq!(state.ui.toasts[0].title, "t2");
    }

    #[test]
    fn test_load_photo_missing_file() {
        let mut state = state();
        state.load_photo_or_notify(Path::new("/definitely/not/here.png"), 0.0);
        assert!(state.record.photo.is_none());
        assert_eq!(state.ui.toasts[0].kind, ToastKind::Destructive);
    }

    #[test]
    fn test_is_photo_path() {
        assert!(is_photo_path(Path::new("me.JPG")));
        assert!(is_photo_path(Path::new("/tmp/a.webp")));
        assert!(!is_photo_path(Path::new("notes.txt")));
        assert!(!is_photo_path(Path::new("noext")));
    }
}
