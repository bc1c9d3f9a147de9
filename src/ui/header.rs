//! Window header with the app title, theme switch and settings button.

use super::UiAction;
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Ui};

/// Show the header bar. Returns the action of any clicked control.
pub fn show_header(ui: &mut Ui, colors: &ThemeColors, is_dark: bool) -> Option<UiAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("🎓").size(28.0));
        ui.vertical(|ui| {
            ui.label(
                RichText::new("Student ID Card Generator")
                    .size(20.0)
                    .strong()
                    .color(colors.text.primary),
            );
            ui.label(
                RichText::new("Create professional student identification cards")
                    .size(12.0)
                    .color(colors.text.secondary),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(RichText::new("⚙").size(16.0))
                .on_hover_text("Settings")
                .clicked()
            {
                action = Some(UiAction::ToggleSettings);
            }

            let mut dark = is_dark;
            let toggle = ui
                .add(egui::Checkbox::without_text(&mut dark))
                .on_hover_text("Dark mode");
            ui.label(if is_dark { "🌙" } else { "☀" });
            if toggle.changed() {
                action = Some(UiAction::ToggleTheme);
            }
        });
    });

    action
}
