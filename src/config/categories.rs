//! Category taxonomy loading from config.toml
//!
//! The normalizer is prompted with a fixed grocery taxonomy, but its output
//! is free text. This module loads the taxonomy (overridable via config.toml)
//! and folds near-miss spellings onto it; unknown categories pass through
//! verbatim and only fall back at analytics time.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Category taxonomy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Canonical category names
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Category used when an item has none
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            fallback: default_fallback(),
        }
    }
}

impl CategoryConfig {
    /// Maps a normalizer-produced category onto the taxonomy: blank becomes
    /// the fallback, case-insensitive matches take the canonical spelling,
    /// anything else passes through as-is.
    #[must_use]
    pub fn canonicalize(&self, category: &str) -> String {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return self.fallback.clone();
        }

        self.categories
            .iter()
            .find(|known| known.eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }
}

fn default_categories() -> Vec<String> {
    // The taxonomy the normalizer is prompted with
    ["Produce", "Dairy", "Meat", "Pantry", "Frozen", "Beverages", "Household", "Other"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_fallback() -> String {
    "Other".to_string()
}

/// Loads category configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CategoryConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads category configuration from the default location (./config.toml),
/// falling back to the built-in taxonomy when the file is absent.
#[must_use]
pub fn load_default_config() -> CategoryConfig {
    load_config("config.toml").unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_category_config() {
        let toml_str = r#"
            categories = ["Produce", "Dairy", "Bulk"]
            fallback = "Misc"
        "#;

        let config: CategoryConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.categories.len(), 3);
        assert_eq!(config.categories[2], "Bulk");
        assert_eq!(config.fallback, "Misc");
    }

    #[test]
    fn test_parse_applies_defaults() {
        let config: CategoryConfig = toml::from_str("").unwrap();
        assert_eq!(config.fallback, "Other");
        assert!(config.categories.contains(&"Produce".to_string()));
    }

    #[test]
    fn test_canonicalize_blank_uses_fallback() {
        let config = CategoryConfig::default();
        assert_eq!(config.canonicalize(""), "Other");
        assert_eq!(config.canonicalize("   "), "Other");
    }

    #[test]
    fn test_canonicalize_folds_case() {
        let config = CategoryConfig::default();
        assert_eq!(config.canonicalize("produce"), "Produce");
        assert_eq!(config.canonicalize("DAIRY"), "Dairy");
    }

    #[test]
    fn test_canonicalize_passes_unknown_through() {
        let config = CategoryConfig::default();
        assert_eq!(config.canonicalize("Charcuterie"), "Charcuterie");
    }
}
