//! Light Theme Configuration
//!
//! Converts the `ThemeColors::light()` palette into egui's `Visuals`.

use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

use super::{ThemeColors, ThemeSpacing};

/// Create egui Visuals configured for the light theme.
pub fn create_light_visuals() -> Visuals {
    let colors = ThemeColors::light();
    let spacing = ThemeSpacing::default();

    let mut visuals = Visuals::light();

    // ─────────────────────────────────────────────────────────────────────────
    // Window & Panel Background
    // ─────────────────────────────────────────────────────────────────────────
    visuals.panel_fill = colors.base.background;
    visuals.window_fill = colors.base.surface;
    visuals.extreme_bg_color = colors.base.input;
    visuals.faint_bg_color = colors.base.hover;

    visuals.warn_fg_color = colors.ui.warning;
    visuals.error_fg_color = colors.ui.error;
    visuals.hyperlink_color = colors.ui.accent;

    visuals.selection.bg_fill = colors.base.selected;
    visuals.selection.stroke = Stroke::new(1.0, colors.ui.accent);

    // ─────────────────────────────────────────────────────────────────────────
    // Widgets
    // ─────────────────────────────────────────────────────────────────────────
    let rounding = Rounding::same(spacing.md);

    visuals.widgets.noninteractive.bg_fill = colors.base.surface;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.base.border_subtle);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text.primary);
    visuals.widgets.noninteractive.rounding = rounding;

    visuals.widgets.inactive.bg_fill = colors.base.surface;
    visuals.widgets.inactive.weak_bg_fill = colors.base.surface;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, colors.base.border);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text.secondary);
    visuals.widgets.inactive.rounding = rounding;

    visuals.widgets.hovered.bg_fill = colors.base.hover;
    visuals.widgets.hovered.weak_bg_fill = colors.base.hover;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, colors.text.primary);
    visuals.widgets.hovered.rounding = rounding;

    visuals.widgets.active.bg_fill = colors.ui.accent;
    visuals.widgets.active.weak_bg_fill = colors.base.selected;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, colors.ui.accent_hover);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = rounding;

    visuals.widgets.open.bg_fill = colors.base.selected;
    visuals.widgets.open.weak_bg_fill = colors.base.selected;
    visuals.widgets.open.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    visuals.widgets.open.fg_stroke = Stroke::new(1.0, colors.text.primary);
    visuals.widgets.open.rounding = rounding;

    // ─────────────────────────────────────────────────────────────────────────
    // Window & Popup Styling
    // ─────────────────────────────────────────────────────────────────────────
    visuals.window_rounding = Rounding::same(spacing.lg);
    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 16.0,
        spread: 0.0,
        color: Color32::from_black_alpha(25),
    };
    visuals.window_stroke = Stroke::new(1.0, colors.base.border_subtle);
    visuals.menu_rounding = rounding;
    visuals.interact_cursor = Some(egui::CursorIcon::PointingHand);

    visuals.dark_mode = false;
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_visuals_is_light_mode() {
        let visuals = create_light_visuals();
        assert!(!visuals.dark_mode);
        assert!(visuals.panel_fill.r() > 200);
    }

    #[test]
    fn test_light_visuals_text_contrast() {
        let visuals = create_light_visuals();
        assert_eq!(
            visuals.widgets.noninteractive.fg_stroke.color,
            ThemeColors::light().text.primary
        );
        assert!(visuals.widgets.noninteractive.fg_stroke.color.r() < 100);
    }
}
