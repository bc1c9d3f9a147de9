//! Card templates.

use serde::{Deserialize, Serialize};

/// The closed set of visual card variants.
///
/// A template only changes how the card is painted, never what it says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Blue-to-purple gradient
    #[default]
    Modern,
    /// Dark slate gradient
    Classic,
    /// White card with a thin border
    Minimal,
}

impl Template {
    /// Get all available templates.
    pub fn all() -> &'static [Template] {
        &[Template::Modern, Template::Classic, Template::Minimal]
    }

    /// Label used in the template selector.
    pub fn label(&self) -> &'static str {
        match self {
            Template::Modern => "Modern Design",
            Template::Classic => "Classic Academic",
            Template::Minimal => "Minimal Clean",
        }
    }

    /// Short name printed on the card badge and under the swatches.
    pub fn badge(&self) -> &'static str {
        match self {
            Template::Modern => "Modern",
            Template::Classic => "Classic",
            Template::Minimal => "Minimal",
        }
    }

    /// Whether card text is dark (light card background).
    pub fn has_dark_text(&self) -> bool {
        matches!(self, Template::Minimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_modern() {
        assert_eq!(Template::default(), Template::Modern);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Template::Modern.label(), "Modern Design");
        assert_eq!(Template::Classic.label(), "Classic Academic");
        assert_eq!(Template::Minimal.label(), "Minimal Clean");
        assert_eq!(Template::Classic.badge(), "Classic");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Template::Minimal).unwrap(), "\"minimal\"");
        let t: Template = serde_json::from_str("\"classic\"").unwrap();
        assert_eq!(t, Template::Classic);
    }

    #[test]
    fn test_only_minimal_has_dark_text() {
        let dark: Vec<_> = Template::all()
            .iter()
            .filter(|t| t.has_dark_text())
            .collect();
        assert_eq!(dark, vec![&Template::Minimal]);
    }
}
