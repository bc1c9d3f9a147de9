//! Download and form-reset buttons below the form.

use super::UiAction;
use crate::export::ExportFormat;
use crate::state::AppState;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, RichText, Ui};

const BUTTON_HEIGHT: f32 = 32.0;

/// Show the action buttons.
///
/// Reset and sample restore edit the state in place. Downloads are handed
/// back as [`UiAction::Download`].
pub fn show_actions(ui: &mut Ui, state: &mut AppState, colors: &ThemeColors) -> Option<UiAction> {
    let mut action = None;
    let busy = state.ui.is_exporting;

    let width = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
    ui.horizontal(|ui| {
        for format in ExportFormat::all() {
            let text = if busy {
                "Downloading...".to_string()
            } else {
                format!("{} {}", format.icon(), format.label())
            };
            let primary = *format == ExportFormat::Pdf;
            let mut text = RichText::new(text).strong();
            if primary {
                text = text.color(Color32::WHITE);
            }
            let mut button = egui::Button::new(text).min_size(egui::vec2(width, BUTTON_HEIGHT));
            if primary {
                button = button.fill(colors.ui.accent);
            }
            if ui.add_enabled(!busy, button).clicked() {
                action = Some(UiAction::Download(*format));
            }
        }
    });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!busy, egui::Button::new("Reset Form"))
            .on_hover_text("Clear every field and the photo")
            .clicked()
        {
            state.reset_form();
        }
        if ui
            .add_enabled(!busy, egui::Button::new("Load Sample"))
            .on_hover_text("Restore the example card")
            .clicked()
        {
            state.restore_sample();
        }
    });

    action
}
