//! Theme Manager for Cardforge
//!
//! Centralized theme management: switching, caching of egui `Visuals` and
//! resolution of the System theme against the platform preference.

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::{dark, light, ThemeColors};
use crate::config::Theme;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Manages theme state and applies themes to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    /// Current theme setting (Light, Dark, or System)
    current_theme: Theme,
    /// Cached visuals for the current theme
    cached_visuals: Option<Visuals>,
    /// Whether the theme needs to be reapplied
    needs_apply: bool,
    /// Last known platform dark mode preference
    system_dark: bool,
}

impl ThemeManager {
    /// Create a new ThemeManager with the given initial theme.
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            cached_visuals: None,
            needs_apply: true,
            system_dark: false,
        }
    }

    /// Set the theme and mark for reapplication.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.cached_visuals = None;
            self.needs_apply = true;
        }
    }

    /// Toggle between Light and Dark.
    ///
    /// System flips to the opposite of what is currently shown.
    pub fn toggle(&mut self) -> Theme {
        let new_theme = if self.is_dark() {
            Theme::Light
        } else {
            Theme::Dark
        };
        self.set_theme(new_theme);
        new_theme
    }

    /// Whether the effective theme is dark.
    pub fn is_dark(&self) -> bool {
        match self.current_theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => self.system_dark,
        }
    }

    /// Record the platform preference (from `eframe::Frame::info`).
    pub fn set_system_dark(&mut self, system_dark: Option<bool>) {
        let Some(system_dark) = system_dark else {
            return;
        };
        if self.system_dark != system_dark {
            debug!("System dark mode changed to: {}", system_dark);
            self.system_dark = system_dark;
            if self.current_theme == Theme::System {
                self.cached_visuals = None;
                self.needs_apply = true;
            }
        }
    }

    /// Apply the current theme to the egui context.
    pub fn apply(&mut self, ctx: &Context) {
        let visuals = self.get_or_create_visuals();
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
    }

    /// Apply the theme only if it changed. Returns `true` if applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.needs_apply {
            self.apply(ctx);
            true
        } else {
            false
        }
    }

    fn get_or_create_visuals(&mut self) -> Visuals {
        if let Some(ref visuals) = self.cached_visuals {
            return visuals.clone();
        }
        let visuals = if self.is_dark() {
            dark::create_dark_visuals()
        } else {
            light::create_light_visuals()
        };
        self.cached_visuals = Some(visuals.clone());
        visuals
    }

    /// Colors of the effective theme.
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_theme(self.current_theme, self.system_dark)
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_needs_apply() {
        let manager = ThemeManager::new(Theme::Dark);
        assert_eq!(manager.current_theme, Theme::Dark);
        assert!(manager.needs_apply);
    }

    #[test]
    fn test_toggle() {
        let mut manager = ThemeManager::new(Theme::Light);
        assert_eq!(manager.toggle(), Theme::Dark);
        assert_eq!(manager.toggle(), Theme::Light);
    }

    #[test]
    fn test_toggle_from_system_flips_effective_theme() {
        let mut manager = ThemeManager::new(Theme::System);
        manager.set_system_dark(Some(true));
        assert!(manager.is_dark());
        assert_eq!(manager.toggle(), Theme::Light);
    }

    #[test]
    fn test_apply_clears_flag() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::Dark);
        assert!(manager.apply_if_needed(&ctx));
        assert!(!manager.apply_if_needed(&ctx));
        assert!(ctx.style().visuals.dark_mode);
    }

    #[test]
    fn test_system_preference_change_reapplies() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::System);
        manager.apply(&ctx);
        manager.set_system_dark(Some(true));
        assert!(manager.needs_apply);
        assert!(manager.colors().is_dark());

        // Unknown preference leaves things alone
        manager.apply(&ctx);
        manager.set_system_dark(None);
        assert!(!manager.needs_apply);
    }
}
