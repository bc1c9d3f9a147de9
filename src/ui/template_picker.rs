//! Template selector: a combo box plus clickable swatches.

use crate::card::Template;
use crate::render::background_fill;
use crate::state::AppState;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Mesh, RichText, Rounding, Sense, Stroke, Ui, Vec2};

const SWATCH_SIZE: Vec2 = Vec2::new(64.0, 40.0);

/// Show the template selector and apply the user's choice.
pub fn show_template_picker(ui: &mut Ui, state: &mut AppState, colors: &ThemeColors) {
    ui.label(RichText::new("Card Template").strong());

    let mut selected = state.template();
    egui::ComboBox::from_id_source("template_picker")
        .selected_text(selected.label())
        .width(ui.available_width().min(240.0))
        .show_ui(ui, |ui| {
            for template in Template::all() {
                ui.selectable_value(&mut selected, *template, template.label());
            }
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        for template in Template::all() {
            ui.vertical(|ui| {
                if swatch(ui, *template, selected == *template, colors).clicked() {
                    selected = *template;
                }
                ui.label(
                    RichText::new(template.badge())
                        .small()
                        .color(colors.text.secondary),
                );
            });
        }
    });

    state.select_template(selected);
}

fn swatch(
    ui: &mut Ui,
    template: Template,
    selected: bool,
    colors: &ThemeColors,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(SWATCH_SIZE, Sense::click());
    let painter = ui.painter();
    let fill = background_fill(template);

    let mut mesh = Mesh::default();
    for corner in [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ] {
        mesh.colored_vertex(corner, fill.color_at(rect, corner));
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(mesh);

    let outline = if selected {
        Stroke::new(2.0, colors.ui.accent)
    } else if response.hovered() {
        Stroke::new(1.0, colors.base.border)
    } else {
        Stroke::new(1.0, colors.base.border_subtle)
    };
    painter.rect_stroke(rect, Rounding::same(4.0), outline);

    // White swatch needs an inner edge to read against light panels
    if template.has_dark_text() {
        painter.rect_stroke(
            rect.shrink(3.0),
            Rounding::same(2.0),
            Stroke::new(1.0, Color32::from_gray(226)),
        );
    }

    response.on_hover_text(template.label())
}
