//! UI components for Cardforge
//!
//! Widgets for the card editor window. Widgets edit `AppState` directly when
//! a change is purely local and report a [`UiAction`] when the app has to do
//! something on their behalf (open a dialog, start a download).

mod actions;
mod form;
mod header;
mod preview;
mod settings;
mod template_picker;
mod toasts;

pub use actions::show_actions;
pub use form::show_form;
pub use header::show_header;
pub use preview::CardPreview;
pub use settings::SettingsPanel;
pub use template_picker::show_template_picker;
pub use toasts::show_toasts;

use crate::export::ExportFormat;

/// Requests that widgets hand back to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Pick a photo with the file dialog
    UploadPhoto,
    /// Start a download
    Download(ExportFormat),
    /// Switch between light and dark
    ToggleTheme,
    /// Open or close the settings window
    ToggleSettings,
}
