//! User settings and preferences for Cardforge
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. The card being edited is
//! deliberately absent: only application preferences are persisted.

use crate::card::Template;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the application chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "☀",
            Theme::Dark => "🌙",
            Theme::System => "💻",
        }
    }

    /// Get all available themes.
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Card template selected when the application was last closed
    pub template: Template,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Directory that downloads are written into (None = platform Downloads)
    pub export_directory: Option<PathBuf>,

    /// Whether to ask for a destination with a save dialog on every download
    pub ask_save_location: bool,

    /// Whether to open exported files after export
    pub open_after_export: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────
    /// How long a notification stays visible, in seconds
    pub toast_duration_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            template: Template::default(),

            // Window State
            window_size: WindowSize::default(),

            // Export Settings
            export_directory: None,
            ask_save_location: false,
            open_after_export: false,

            // Notifications
            toast_duration_secs: 3.0,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Minimum toast duration in seconds.
    pub const MIN_TOAST_SECS: f64 = 1.0;
    /// Maximum toast duration in seconds.
    pub const MAX_TOAST_SECS: f64 = 30.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        if !self.toast_duration_secs.is_finite() {
            self.toast_duration_secs = Settings::default().toast_duration_secs;
        }
        self.toast_duration_secs = self
            .toast_duration_secs
            .clamp(Self::MIN_TOAST_SECS, Self::MAX_TOAST_SECS);

        // An empty path is not a usable directory
        if self
            .export_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.export_directory = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The directory downloads land in.
    ///
    /// Falls back to the platform Downloads folder, then the home directory,
    /// then the current directory.
    pub fn resolved_export_directory(&self) -> PathBuf {
        self.export_directory
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.template, Template::Modern);
        assert!(settings.export_directory.is_none());
        assert!(!settings.ask_save_location);
        assert!(!settings.open_after_export);
        assert_eq!(settings.toast_duration_secs, 3.0);
    }

    #[test]
    fn test_theme_labels_are_distinct() {
        let labels: Vec<_> = Theme::all().iter().map(Theme::label).collect();
        assert_eq!(labels, ["Light", "Dark", "System"]);
        assert_eq!(Theme::Dark.icon(), "🌙");
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(theme, Theme::System);
    }

    #[test]
    fn test_template_persisted_lowercase() {
        let settings = Settings {
            template: Template::Classic,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"template\":\"classic\""));
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.template, Template::Modern);
        assert_eq!(settings.window_size, WindowSize::default());
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_window_size() {
        let mut settings = Settings::default();
        settings.window_size.width = 10.0;
        settings.window_size.height = 50_000.0;
        settings.sanitize();
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_sanitize_toast_duration() {
        let mut settings = Settings {
            toast_duration_secs: 0.0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.toast_duration_secs, Settings::MIN_TOAST_SECS);

        settings.toast_duration_secs = f64::NAN;
        settings.sanitize();
        assert_eq!(settings.toast_duration_secs, 3.0);
    }

    #[test]
    fn test_sanitize_empty_export_directory() {
        let mut settings = Settings {
            export_directory: Some(PathBuf::new()),
            ..Settings::default()
        };
        settings.sanitize();
        assert!(settings.export_directory.is_none());
    }

    #[test]
    fn test_resolved_export_directory_prefers_configured() {
        let settings = Settings {
            export_directory: Some(PathBuf::from("/tmp/cards")),
            ..Settings::default()
        };
        assert_eq!(
            settings.resolved_export_directory(),
            PathBuf::from("/tmp/cards")
        );
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings =
            Settings::from_json_sanitized(r#"{"toast_duration_secs": 120.0}"#).unwrap();
        assert_eq!(settings.toast_duration_secs, Settings::MAX_TOAST_SECS);
    }
}
