//! Settings Panel Component for Cardforge
//!
//! A modal settings window for appearance, download location and
//! notification options. Changes apply live and are saved by the app.

use crate::card::Template;
use crate::config::{Settings, Theme};
use crate::files::dialogs::pick_export_folder;
use eframe::egui::{self, Color32, RichText, Ui};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Downloads,
}

impl SettingsSection {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Downloads => "Downloads",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Downloads => "📥",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(460.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);
                        for section in [SettingsSection::Appearance, SettingsSection::Downloads] {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());
                            if ui
                                .add_sized(
                                    [110.0, 32.0],
                                    egui::SelectableLabel::new(
                                        selected,
                                        RichText::new(text).size(14.0),
                                    ),
                                )
                                .clicked()
                            {
                                self.active_section = section;
                            }
                        }

                        ui.add_space((ui.available_height() - 40.0).max(0.0));
                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(300.0);
                        ui.set_min_height(260.0);
                        let changed = match self.active_section {
                            SettingsSection::Appearance => show_appearance_section(ui, settings),
                            SettingsSection::Downloads => show_downloads_section(ui, settings),
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }
}

/// Returns true if any setting was changed.
fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label(RichText::new("Theme").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for theme in Theme::all() {
            let label = format!("{} {}", theme.icon(), theme.label());
            changed |= ui
                .selectable_value(&mut settings.theme, *theme, label)
                .changed();
        }
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("Default Template").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for template in Template::all() {
            changed |= ui
                .selectable_value(&mut settings.template, *template, template.label())
                .changed();
        }
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Notification Duration").strong());
        ui.add_space(8.0);
        ui.label(format!("{:.0}s", settings.toast_duration_secs));
    });
    ui.add_space(4.0);
    changed |= ui
        .add(
            egui::Slider::new(
                &mut settings.toast_duration_secs,
                Settings::MIN_TOAST_SECS..=Settings::MAX_TOAST_SECS,
            )
            .show_value(false)
            .step_by(1.0),
        )
        .changed();

    changed
}

/// Returns true if any setting was changed.
fn show_downloads_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Downloads");
    ui.add_space(8.0);

    ui.label(RichText::new("Download Folder").strong());
    ui.add_space(4.0);
    let current = settings.resolved_export_directory();
    ui.label(RichText::new(current.display().to_string()).monospace().small());
    ui.horizontal(|ui| {
        if ui.button("📁 Choose…").clicked() {
            if let Some(dir) = pick_export_folder(Some(&current)) {
                settings.export_directory = Some(dir);
                changed = true;
            }
        }
        if settings.export_directory.is_some()
            && ui
                .button("Use Default")
                .on_hover_text("Use the system Downloads folder")
                .clicked()
        {
            settings.export_directory = None;
            changed = true;
        }
    });

    ui.add_space(12.0);

    changed |= ui
        .checkbox(&mut settings.ask_save_location, "Ask where to save each download")
        .changed();
    ui.add_space(4.0);
    changed |= ui
        .checkbox(&mut settings.open_after_export, "Open file after download")
        .on_hover_text("Open the downloaded file with the default application")
        .changed();

    changed
}
