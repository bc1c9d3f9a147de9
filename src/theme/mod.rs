//! Theme System for Cardforge
//!
//! Colors and spacing for the application chrome: the form panel, header,
//! buttons and notifications. The card itself never follows the app theme;
//! its colors come from the selected card template.
//!
//! # Theme Files
//!
//! - `light.rs` - Light theme egui Visuals
//! - `dark.rs` - Dark theme egui Visuals
//! - `manager.rs` - Theme switching and caching

pub mod dark;
pub mod light;
pub mod manager;

pub use manager::ThemeManager;

use crate::config::Theme;
use eframe::egui::Color32;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors for the whole application chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    /// Backgrounds and borders
    pub base: BaseColors,
    /// Text colors
    pub text: TextColors,
    /// Accent and feedback colors
    pub ui: UiColors,
}

impl ThemeColors {
    /// Resolve the palette for a theme setting.
    ///
    /// `system_dark` is the platform preference, used for `Theme::System`.
    pub fn from_theme(theme: Theme, system_dark: bool) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
            Theme::System if system_dark => Self::dark(),
            Theme::System => Self::light(),
        }
    }

    pub fn light() -> Self {
        Self {
            base: BaseColors::light(),
            text: TextColors::light(),
            ui: UiColors::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            base: BaseColors::dark(),
            text: TextColors::dark(),
            ui: UiColors::dark(),
        }
    }

    /// Check if this is a dark theme.
    pub fn is_dark(&self) -> bool {
        self.base.background.r() < 128
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Base UI colors for backgrounds and borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseColors {
    /// Window background
    pub background: Color32,
    /// Cards and panels on top of the background
    pub surface: Color32,
    /// Text inputs
    pub input: Color32,
    pub border: Color32,
    pub border_subtle: Color32,
    pub hover: Color32,
    pub selected: Color32,
}

impl BaseColors {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(248, 250, 252),
            surface: Color32::from_rgb(255, 255, 255),
            input: Color32::from_rgb(255, 255, 255),
            border: Color32::from_rgb(203, 213, 225),
            border_subtle: Color32::from_rgb(226, 232, 240),
            hover: Color32::from_rgb(241, 245, 249),
            selected: Color32::from_rgb(219, 234, 254),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(15, 23, 42),
            surface: Color32::from_rgb(30, 41, 59),
            input: Color32::from_rgb(51, 65, 85),
            border: Color32::from_rgb(71, 85, 105),
            border_subtle: Color32::from_rgb(51, 65, 85),
            hover: Color32::from_rgb(51, 65, 85),
            selected: Color32::from_rgb(30, 58, 138),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Text colors for various contexts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    pub primary: Color32,
    pub secondary: Color32,
    /// Hints and placeholders
    pub muted: Color32,
}

impl TextColors {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(30, 41, 59),
            secondary: Color32::from_rgb(71, 85, 105),
            muted: Color32::from_rgb(148, 163, 184),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(241, 245, 249),
            secondary: Color32::from_rgb(203, 213, 225),
            muted: Color32::from_rgb(100, 116, 139),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Accent and feedback colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiColors {
    pub accent: Color32,
    pub accent_hover: Color32,
    pub success: Color32,
    pub warning: Color32,
    /// Destructive notifications and errors
    pub error: Color32,
    /// Background of destructive notifications
    pub error_bg: Color32,
}

impl UiColors {
    pub fn light() -> Self {
        Self {
            accent: Color32::from_rgb(37, 99, 235),
            accent_hover: Color32::from_rgb(29, 78, 216),
            success: Color32::from_rgb(22, 163, 74),
            warning: Color32::from_rgb(217, 119, 6),
            error: Color32::from_rgb(220, 38, 38),
            error_bg: Color32::from_rgb(254, 226, 226),
        }
    }

    pub fn dark() -> Self {
        Self {
            accent: Color32::from_rgb(59, 130, 246),
            accent_hover: Color32::from_rgb(96, 165, 250),
            success: Color32::from_rgb(74, 222, 128),
            warning: Color32::from_rgb(251, 191, 36),
            error: Color32::from_rgb(248, 113, 113),
            error_bg: Color32::from_rgb(127, 29, 29),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spacing
// ─────────────────────────────────────────────────────────────────────────────

/// Spacing and rounding values used across the chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSpacing {
    pub xs: f32,
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self {
            xs: 2.0,
            sm: 4.0,
            md: 8.0,
            lg: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_theme() {
        assert!(!ThemeColors::from_theme(Theme::Light, true).is_dark());
        assert!(ThemeColors::from_theme(Theme::Dark, false).is_dark());
        assert!(ThemeColors::from_theme(Theme::System, true).is_dark());
        assert!(!ThemeColors::from_theme(Theme::System, false).is_dark());
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(ThemeColors::light(), ThemeColors::dark());
    }
}
