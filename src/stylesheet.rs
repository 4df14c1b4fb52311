//! Color palettes
//!
//! Scenes and constraint expressions can name colors symbolically (`accent-1`, `text-2`). A
//! stylesheet maps those tokens to concrete colors so one scene renders under different themes.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::Rgba;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid color '{value}' for token '{token}'")]
    InvalidColor { token: String, value: String },
}

/// A stylesheet mapping symbolic colors to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: token name -> color
    pub colors: HashMap<String, Rgba>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default palette: neutral grays with a blue accent
const DEFAULT_PALETTE: &[(&str, Rgba)] = &[
    ("foreground-1", Rgba::rgb(0x33, 0x33, 0x33)),
    ("foreground-2", Rgba::rgb(0x66, 0x66, 0x66)),
    ("foreground-3", Rgba::rgb(0x99, 0x99, 0x99)),
    ("background-1", Rgba::rgb(0xff, 0xff, 0xff)),
    ("background-2", Rgba::rgb(0xf5, 0xf5, 0xf5)),
    ("background-3", Rgba::rgb(0xee, 0xee, 0xee)),
    ("text-1", Rgba::rgb(0x33, 0x33, 0x33)),
    ("text-2", Rgba::rgb(0x66, 0x66, 0x66)),
    ("text-light", Rgba::rgb(0xff, 0xff, 0xff)),
    ("accent-1", Rgba::rgb(0x21, 0x96, 0xf3)),
    ("accent-2", Rgba::rgb(0xe3, 0xf2, 0xfd)),
    ("accent-dark", Rgba::rgb(0x15, 0x65, 0xc0)),
    ("secondary-1", Rgba::rgb(0xff, 0x98, 0x00)),
    ("status-success", Rgba::rgb(0x4c, 0xaf, 0x50)),
    ("status-warning", Rgba::rgb(0xff, 0x98, 0x00)),
    ("status-error", Rgba::rgb(0xf4, 0x43, 0x36)),
];

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        let mut colors = HashMap::with_capacity(parsed.colors.len());
        for (token, value) in parsed.colors {
            let color = Rgba::from_hex(&value).ok_or_else(|| StylesheetError::InvalidColor {
                token: token.clone(),
                value: value.clone(),
            })?;
            colors.insert(token, color);
        }

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors,
        })
    }

    /// A stylesheet with no tokens
    pub fn empty() -> Self {
        Self {
            name: None,
            description: None,
            colors: HashMap::new(),
        }
    }

    /// Resolve a token, falling back to the default palette
    pub fn resolve(&self, token: &str) -> Option<Rgba> {
        self.colors.get(token).copied().or_else(|| {
            DEFAULT_PALETTE
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, color)| *color)
        })
    }

    /// Every token this stylesheet can resolve, sorted
    pub fn token_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .colors
            .keys()
            .cloned()
            .chain(DEFAULT_PALETTE.iter().map(|(name, _)| name.to_string()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            name: Some("default".to_string()),
            description: None,
            colors: DEFAULT_PALETTE
                .iter()
                .map(|(name, color)| (name.to_string(), *color))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet() {
        let stylesheet = Stylesheet::default();
        assert!(stylesheet.colors.contains_key("foreground-1"));
        assert!(stylesheet.colors.contains_key("accent-1"));
    }

    #[test]
    fn test_resolve_existing_token() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("accent-1"), Some(Rgba::rgb(0x21, 0x96, 0xf3)));
        assert_eq!(stylesheet.resolve("nonexistent"), None);
    }

    #[test]
    fn test_empty_stylesheet_falls_back_to_default_palette() {
        let empty = Stylesheet::empty();
        assert_eq!(empty.resolve("foreground-1"), Some(Rgba::rgb(0x33, 0x33, 0x33)));
        assert!(empty.token_names().contains(&"status-error".to_string()));
    }

    #[test]
    fn test_custom_tokens_override_defaults() {
        let mut stylesheet = Stylesheet::empty();
        stylesheet.colors.insert("accent-1".to_string(), Rgba::BLACK);
        assert_eq!(stylesheet.resolve("accent-1"), Some(Rgba::BLACK));
    }

    #[test]
    fn test_parse_toml_with_metadata() {
        let toml_str = r##"
[metadata]
name = "Night"
description = "Dark theme"

[colors]
foreground-1 = "#000000"
overlay = "#00000080"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, Some("Night".to_string()));
        assert_eq!(stylesheet.resolve("foreground-1"), Some(Rgba::BLACK));
        assert_eq!(stylesheet.resolve("overlay"), Some(Rgba::new(0, 0, 0, 0x80)));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result = Stylesheet::from_str("[colors]\nbad = \"blue\"\n");
        assert!(matches!(result, Err(StylesheetError::InvalidColor { .. })));
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(Stylesheet::from_str("this is not valid toml {{{{").is_err());
    }
}
