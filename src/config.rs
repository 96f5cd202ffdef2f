//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the course root.
//! Configuration is sparse: stock defaults apply, user files override only
//! the keys they name, and unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Course"            # Site title (header, <title> suffix)
//!
//! [vocabulary]
//! on_duplicate_term = "overwrite"  # or "error" - see below
//!
//! [theme]
//! accent = "#2a6f97"          # Link and heading accent color
//! background = "#ffffff"      # Page background
//! text = "#1a1a1a"            # Body text
//! ```
//!
//! ## Duplicate term policy
//!
//! Registering the same canonical term name twice in `vocabulary.toml` is
//! usually an authoring slip. `"overwrite"` keeps the last registration and
//! surfaces a warning in the CLI output; `"error"` aborts the build instead.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, shown in the header and as the `<title>` suffix.
    pub title: String,
    /// Vocabulary handling settings.
    pub vocabulary: VocabularyConfig,
    /// Theme colors.
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Course".to_string(),
            vocabulary: VocabularyConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        for (key, value) in [
            ("theme.accent", &self.theme.accent),
            ("theme.background", &self.theme.background),
            ("theme.text", &self.theme.text),
        ] {
            if !value.starts_with('#') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a hex color starting with '#', got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Vocabulary handling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocabularyConfig {
    /// What to do when `vocabulary.toml` registers the same canonical term
    /// name twice.
    pub on_duplicate_term: DuplicatePolicy,
}

/// Policy for duplicate canonical term registrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the last registration and emit a warning.
    #[default]
    Overwrite,
    /// Abort the build.
    Error,
}

/// Theme colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: "#2a6f97".to_string(),
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
        }
    }
}

/// Load `config.toml` from the course root, falling back to defaults when
/// the file is absent.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Coursegen Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Site title, shown in the header and appended to every page <title>.
title = "Course"

# ---------------------------------------------------------------------------
# Vocabulary handling
# ---------------------------------------------------------------------------
[vocabulary]
# What to do when vocabulary.toml registers the same term name twice:
#   "overwrite" - keep the last registration, warn in the build output
#   "error"     - abort the build
on_duplicate_term = "overwrite"

# ---------------------------------------------------------------------------
# Theme colors
# ---------------------------------------------------------------------------
[theme]
# Link and heading accent color.
accent = "#2a6f97"
# Page background.
background = "#ffffff"
# Body text.
text = "#1a1a1a"
"##
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-accent: {accent};
    --color-bg: {background};
    --color-text: {text};
}}"#,
        accent = theme.accent,
        background = theme.background,
        text = theme.text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Course");
        assert_eq!(
            config.vocabulary.on_duplicate_term,
            DuplicatePolicy::Overwrite
        );
    }

    #[test]
    fn load_config_reads_partial_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
title = "Intro to Python"

[theme]
accent = "#cc0000"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Intro to Python");
        assert_eq!(config.theme.accent, "#cc0000");
        // Unspecified values should be defaults
        assert_eq!(config.theme.background, "#ffffff");
    }

    #[test]
    fn load_config_parses_duplicate_policy() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[vocabulary]\non_duplicate_term = \"error\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.vocabulary.on_duplicate_term, DuplicatePolicy::Error);
    }

    #[test]
    fn load_config_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "titel = \"typo\"\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validation_rejects_non_hex_color() {
        let mut config = SiteConfig::default();
        config.theme.accent = "red".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validation_rejects_empty_title() {
        let mut config = SiteConfig::default();
        config.title = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn stock_config_parses_as_valid_config() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.title, "Course");
    }

    #[test]
    fn theme_css_contains_custom_properties() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--color-accent: #2a6f97"));
        assert!(css.contains("--color-bg: #ffffff"));
    }
}
