//! Main application module for Cardforge
//!
//! This module implements the eframe App trait for the card editor, wiring
//! the form, the live preview and the background downloads together.

use crate::config::{Settings, WindowSize};
use crate::export::{DirectorySink, ExportError, ExportFormat, ExportJob, ExportRequest};
use crate::files::dialogs::{open_photo_dialog, save_download_dialog};
use crate::render::{PreviewSurface, SceneCache};
use crate::state::{is_photo_path, AppState, ToastKind};
use crate::theme::ThemeManager;
use crate::ui::{
    show_actions, show_form, show_header, show_template_picker, show_toasts, CardPreview,
    SettingsPanel, UiAction,
};
use eframe::egui;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;

/// Repaint interval while a download runs in the background.
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Width of the form side panel.
const FORM_PANEL_WIDTH: f32 = 420.0;

/// The main application struct that holds all state and implements eframe::App.
pub struct CardforgeApp {
    /// Central application state
    state: AppState,
    /// Theme manager for handling theme switching
    theme_manager: ThemeManager,
    /// Settings panel component
    settings_panel: SettingsPanel,
    /// Live card preview
    preview: CardPreview,
    /// Scene for the current form state
    scenes: SceneCache,
    /// Scene shared with the export worker
    surface: PreviewSurface,
    /// Download currently running, if any
    export_job: Option<ExportJob>,
    /// Directory the last photo was picked from
    last_photo_dir: Option<PathBuf>,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing notifications
    start_time: std::time::Instant,
}

impl CardforgeApp {
    /// Create a new CardforgeApp instance.
    ///
    /// This initializes the application state from the config file and applies
    /// the saved theme preference.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing Cardforge");

        let state = AppState::new();

        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply(&cc.egui_ctx);
        info!("Applied initial theme: {:?}", state.settings.theme);

        Self {
            state,
            theme_manager,
            settings_panel: SettingsPanel::new(),
            preview: CardPreview::new(),
            scenes: SceneCache::new(),
            surface: PreviewSurface::new(),
            export_job: None,
            last_photo_dir: None,
            last_window_size: None,
            last_window_pos: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Update window size in settings if changed.
    ///
    /// Returns `true` if the window state was updated.
    fn update_window_state(&mut self, ctx: &egui::Context) -> bool {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return false;
        };
        let (size, pos) = (rect.size(), rect.min);

        let size_changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        let pos_changed = self
            .last_window_pos
            .map(|p| (p - pos).length() > 1.0)
            .unwrap_or(true);
        if !size_changed && !pos_changed {
            return false;
        }

        self.last_window_size = Some(size);
        self.last_window_pos = Some(pos);
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        self.state.settings.window_size = WindowSize {
            width: size.x,
            height: size.y,
            x: Some(pos.x),
            y: Some(pos.y),
            maximized,
        };
        debug!(
            "Window state updated: {}x{} at ({}, {}), maximized: {}",
            size.x, size.y, pos.x, pos.y, maximized
        );
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Photo Handling
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_upload_photo(&mut self) {
        let Some(path) = open_photo_dialog(self.last_photo_dir.as_deref()) else {
            debug!("Photo dialog cancelled");
            return;
        };
        self.last_photo_dir = path.parent().map(PathBuf::from);
        let time = self.get_app_time();
        self.state.load_photo_or_notify(&path, time);
    }

    /// Accept the first dropped image file as the card photo.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if dropped_files.is_empty() {
            return;
        }

        let time = self.get_app_time();
        match dropped_files.iter().find(|p| is_photo_path(p)) {
            Some(path) => {
                info!("Photo dropped: {}", path.display());
                self.state.load_photo_or_notify(path, time);
            }
            None => {
                self.state.push_toast(
                    "Unsupported File",
                    "Drop a PNG, JPEG, GIF, WebP or BMP image to use it as the photo.",
                    ToastKind::Destructive,
                    time,
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Downloads
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the export gate and start a background download.
    fn handle_download(&mut self, format: ExportFormat) {
        let time = self.get_app_time();
        let Some(file_stem) = self.state.prepare_export(format, time) else {
            return;
        };

        let mut directory = self.state.settings.resolved_export_directory();
        let mut filename = file_stem;
        if self.state.settings.ask_save_location {
            match save_download_dialog(&directory, format, &filename) {
                Some((dir, stem)) => {
                    directory = dir;
                    filename = stem;
                }
                None => {
                    debug!("Save dialog cancelled, download aborted");
                    self.state.ui.is_exporting = false;
                    return;
                }
            }
        }

        if !self.surface.is_mounted() {
            warn!("{:?} download requested before the preview was painted", format);
            self.state
                .finish_export(format, &Err(ExportError::NodeNotFound), time);
            return;
        }

        info!(
            "Starting {:?} download of '{}' into {}",
            format,
            filename,
            directory.display()
        );
        let request = ExportRequest {
            format,
            filename,
            sink: Box::new(DirectorySink::new(directory)),
        };
        match ExportJob::spawn(self.surface.clone(), request) {
            Ok(job) => self.export_job = Some(job),
            Err(e) => {
                warn!("Failed to start export worker: {}", e);
                let outcome = Err(ExportError::CaptureOrEncoding(e.to_string()));
                self.state.finish_export(format, &outcome, time);
            }
        }
    }

    /// Collect the result of a finished download.
    fn poll_export_job(&mut self, ctx: &egui::Context) {
        let Some(job) = &self.export_job else {
            return;
        };
        let Some(outcome) = job.poll() else {
            ctx.request_repaint_after(EXPORT_POLL_INTERVAL);
            return;
        };

        let format = job.format();
        self.export_job = None;
        let time = self.get_app_time();
        self.state.finish_export(format, &outcome, time);

        if let Ok(path) = &outcome {
            if self.state.settings.open_after_export {
                if let Err(e) = open::that(path) {
                    warn!("Failed to open {}: {}", path.display(), e);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_ui_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::UploadPhoto => self.handle_upload_photo(),
            UiAction::Download(format) => self.handle_download(format),
            UiAction::ToggleTheme => {
                let theme = self.theme_manager.toggle();
                self.theme_manager.apply(ctx);
                self.state.settings.theme = theme;
                self.state.mark_settings_dirty();
                info!("Theme changed to: {:?}", theme);
            }
            UiAction::ToggleSettings => self.state.toggle_settings(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) -> Option<UiAction> {
        let colors = self.theme_manager.colors();
        let is_dark = self.theme_manager.is_dark();
        let mut action = None;

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(colors.base.surface)
                    .inner_margin(egui::Margin::symmetric(16.0, 10.0)),
            )
            .show(ctx, |ui| {
                if let Some(a) = show_header(ui, &colors, is_dark) {
                    action = Some(a);
                }
            });

        egui::SidePanel::left("form_panel")
            .resizable(false)
            .exact_width(FORM_PANEL_WIDTH)
            .frame(
                egui::Frame::none()
                    .fill(colors.base.background)
                    .inner_margin(egui::Margin::same(16.0)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if let Some(a) = show_form(ui, &mut self.state, &colors) {
                        action = Some(a);
                    }
                    ui.add_space(12.0);
                    show_template_picker(ui, &mut self.state, &colors);
                    ui.add_space(16.0);
                    ui.separator();
                    ui.add_space(8.0);
                    if let Some(a) = show_actions(ui, &mut self.state, &colors) {
                        action = Some(a);
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(colors.base.background)
                    .inner_margin(egui::Margin::same(24.0)),
            )
            .show(ctx, |ui| {
                let scene = self
                    .scenes
                    .scene(&self.state.record, self.state.template())
                    .clone();
                self.preview.show(ui, scene, &self.surface);
            });

        show_toasts(ctx, &mut self.state, &colors);

        action
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        if !self.state.ui.show_settings {
            return;
        }

        let is_dark = self.theme_manager.is_dark();
        let output = self
            .settings_panel
            .show(ctx, &mut self.state.settings, is_dark);

        if output.changed {
            self.state.settings.sanitize();
            self.state.mark_settings_dirty();
            self.theme_manager.set_theme(self.state.settings.theme);
            self.theme_manager.apply(ctx);
        }

        if output.reset_requested {
            let window_size = self.state.settings.window_size;
            self.state.update_settings(|settings| {
                *settings = Settings {
                    window_size,
                    ..Settings::default()
                };
            });
            self.theme_manager.set_theme(self.state.settings.theme);
            self.theme_manager.apply(ctx);

            let time = self.get_app_time();
            self.state.push_toast(
                "Settings Reset",
                "All settings were restored to their defaults.",
                ToastKind::Default,
                time,
            );
        }

        if output.close_requested {
            self.state.ui.show_settings = false;
        }
    }
}

impl eframe::App for CardforgeApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Follow the OS theme when the System preference is selected
        self.theme_manager
            .set_system_dark(frame.info().system_theme.map(|t| t == eframe::Theme::Dark));
        self.theme_manager.apply_if_needed(ctx);

        let current_time = self.get_app_time();
        self.state.update_toasts(current_time);
        if let Some(next) = self
            .state
            .ui
            .toasts
            .iter()
            .map(|t| t.expires_at)
            .reduce(f64::min)
        {
            ctx.request_repaint_after(Duration::from_secs_f64((next - current_time).max(0.0)));
        }

        self.update_window_state(ctx);
        self.handle_dropped_files(ctx);
        self.poll_export_job(ctx);

        if let Some(action) = self.render_ui(ctx) {
            self.handle_ui_action(action, ctx);
        }
        self.render_settings(ctx);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        if let Some(job) = self.export_job.take() {
            info!("Waiting for running download to finish");
            let format = job.format();
            let outcome = job.wait();
            let time = self.get_app_time();
            self.state.finish_export(format, &outcome, time);
        }
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}
