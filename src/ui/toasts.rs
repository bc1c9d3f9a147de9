//! Notification stack in the bottom-right corner of the window.

use crate::state::{AppState, ToastKind};
use crate::theme::ThemeColors;
use eframe::egui::{self, Align2, Frame, Margin, RichText, Rounding, Stroke};

const TOAST_WIDTH: f32 = 320.0;
const EDGE_OFFSET: f32 = 16.0;

/// Draw the active notifications. The `×` button dismisses one early.
pub fn show_toasts(ctx: &egui::Context, state: &mut AppState, colors: &ThemeColors) {
    if state.ui.toasts.is_empty() {
        return;
    }

    let mut dismissed = None;

    egui::Area::new(egui::Id::new("toast_stack"))
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-EDGE_OFFSET, -EDGE_OFFSET))
        .order(egui::Order::Foreground)
        .interactable(true)
        .show(ctx, |ui| {
            ui.set_width(TOAST_WIDTH);
            for (index, toast) in state.ui.toasts.iter().enumerate() {
                let (fill, border, title_color) = match toast.kind {
                    ToastKind::Default => {
                        (colors.base.surface, colors.base.border, colors.text.primary)
                    }
                    ToastKind::Destructive => {
                        (colors.ui.error_bg, colors.ui.error, colors.ui.error)
                    }
                };

                Frame::none()
                    .fill(fill)
                    .stroke(Stroke::new(1.0, border))
                    .rounding(Rounding::same(6.0))
                    .inner_margin(Margin::same(12.0))
                    .shadow(ui.visuals().popup_shadow)
                    .show(ui, |ui| {
                        ui.set_width(TOAST_WIDTH - 24.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&toast.title).strong().color(title_color));
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("×").on_hover_text("Dismiss").clicked() {
                                        dismissed = Some(index);
                                    }
                                },
                            );
                        });
                        if !toast.description.is_empty() {
                            ui.label(
                                RichText::new(&toast.description)
                                    .small()
                                    .color(colors.text.secondary),
                            );
                        }
                    });
                ui.add_space(6.0);
            }
        });

    if let Some(index) = dismissed {
        state.dismiss_toast(index);
    }
}
