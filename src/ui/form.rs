//! Student information form.

use super::UiAction;
use crate::card::CardField;
use crate::state::AppState;
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Ui};

/// Fields laid out two per row; `None` leaves the second column empty.
const FIELD_ROWS: &[(CardField, Option<CardField>)] = &[
    (CardField::Name, Some(CardField::Id)),
    (CardField::Institution, None),
    (CardField::Program, None),
    (CardField::EmergencyContact, Some(CardField::Phone)),
    (CardField::Email, None),
];

/// Show the photo upload row and the text fields.
pub fn show_form(ui: &mut Ui, state: &mut AppState, colors: &ThemeColors) -> Option<UiAction> {
    let mut action = None;

    ui.label(
        RichText::new("Student Information")
            .size(18.0)
            .strong()
            .color(colors.text.primary),
    );
    ui.label(
        RichText::new("Fill in the details to generate your ID card")
            .small()
            .color(colors.text.secondary),
    );
    ui.add_space(12.0);

    // Photo
    ui.label(RichText::new("Photo Upload").strong());
    ui.horizontal(|ui| {
        if ui.button("📷 Upload Photo").clicked() {
            action = Some(UiAction::UploadPhoto);
        }
        if state.record.photo.is_some() {
            if ui.button("Remove").clicked() {
                state.clear_photo();
            }
        } else {
            ui.label(
                RichText::new("or drop an image onto the window")
                    .small()
                    .color(colors.text.muted),
            );
        }
    });
    ui.add_space(8.0);

    let full_width = ui.available_width();
    let half_width = (full_width - ui.spacing().item_spacing.x) / 2.0;

    for (first, second) in FIELD_ROWS {
        match second {
            Some(second) => {
                ui.horizontal(|ui| {
                    field_input(ui, state, *first, half_width);
                    field_input(ui, state, *second, half_width);
                });
            }
            None => field_input(ui, state, *first, full_width),
        }
        ui.add_space(4.0);
    }

    action
}

fn field_input(ui: &mut Ui, state: &mut AppState, field: CardField, width: f32) {
    ui.vertical(|ui| {
        ui.set_width(width);
        ui.label(field.label());
        let mut value = state.record.field(field).to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut value)
                .hint_text(field.hint())
                .desired_width(width),
        );
        if response.changed() {
            state.set_field(field, value);
        }
    });
}
