//! MDS Config
//!
//! This crate handles configuration loading and management
//! for the MDS parser, supporting TOML configuration files.
//!
//! # Overview
//!
//! Configuration is loaded from platform-specific locations:
//! - Linux: `~/.config/mds/config.toml`
//! - macOS: `~/Library/Application Support/mds/config.toml`
//! - Windows: `%APPDATA%\mds\config.toml`
//!
//! # Example
//!
//! ```no_run
//! use mds_config::Config;
//!
//! // Load config with defaults
//! let config = Config::load().unwrap();
//!
//! // Or load with an override file
//! let config = Config::load_with_override(Some("./mds.toml")).unwrap();
//! ```

mod components;
mod markdown;

pub use components::ComponentsConfig;
pub use markdown::{MarkdownConfig, MarkdownOverride};

use mds_core::{MdsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default TOML configuration string.
const DEFAULT_TOML: &str = r#"[markdown]
Tables            = true
Strikethrough     = true
TaskLists         = true
Footnotes         = true
Math              = true
SmartPunctuation  = false
HeadingAttributes = false

[components]
Registered = []
"#;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Markdown extension flags
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Registered components
    #[serde(default)]
    pub components: ComponentsConfig,
}

/// The settings an override file or string actually names.
///
/// Unlike [`Config`], missing markdown flags stay unset instead of falling
/// back to their defaults, so merging an override only touches what it
/// mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigOverride {
    #[serde(default)]
    pub markdown: MarkdownOverride,

    #[serde(default)]
    pub components: ComponentsConfig,
}

impl ConfigOverride {
    /// Parse an override from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MdsError::Config(format!("Override parse error: {}", e)))
    }
}

impl Config {
    /// Returns the default TOML configuration string.
    ///
    /// # Example
    ///
    /// ```
    /// use mds_config::Config;
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("[markdown]"));
    /// assert!(toml.contains("[components]"));
    /// ```
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }

    /// Returns the platform-specific configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns the platform-specific configuration directory.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mds").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MdsError::Config(format!("Parse error: {}", e)))
    }

    /// Load configuration from the default platform-specific path.
    ///
    /// If no config file exists, returns the default configuration.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            MdsError::Config(format!("Parse error in {}: {}", path.display(), e))
        })
    }

    /// Load configuration with an optional override file or string.
    ///
    /// 1. Load the base config from the default location
    /// 2. If an override is provided:
    ///    - If it's a path to an existing file, load and merge it
    ///    - Otherwise, treat it as a TOML string and parse it
    pub fn load_with_override(override_config: Option<&str>) -> Result<Self> {
        let mut config = Self::load()?;

        if let Some(override_str) = override_config {
            config.merge(&Self::resolve_override(override_str)?);
        }

        Ok(config)
    }

    /// Interpret an override argument as a file path or inline TOML.
    pub fn resolve_override(override_str: &str) -> Result<ConfigOverride> {
        let override_path = Path::new(override_str);
        if override_path.exists() {
            let content = std::fs::read_to_string(override_path)?;
            toml::from_str(&content).map_err(|e| {
                MdsError::Config(format!(
                    "Parse error in {}: {}",
                    override_path.display(),
                    e
                ))
            })
        } else {
            ConfigOverride::from_toml(override_str)
        }
    }

    /// Merge an override into this config.
    ///
    /// Markdown flags the override sets take precedence; component
    /// registrations accumulate.
    ///
    /// # Example
    ///
    /// ```
    /// use mds_config::{Config, ConfigOverride};
    ///
    /// let mut base = Config::default();
    /// let override_config = ConfigOverride::from_toml(r#"
    ///     [markdown]
    ///     Math = false
    ///     [components]
    ///     Registered = ["quiz"]
    /// "#).unwrap();
    ///
    /// base.merge(&override_config);
    /// assert!(!base.markdown.math);
    /// assert_eq!(base.components.registered, vec!["quiz"]);
    /// ```
    pub fn merge(&mut self, other: &ConfigOverride) {
        self.markdown.merge(&other.markdown);
        self.components.merge(&other.components);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.markdown.tables);
        assert!(config.markdown.math);
        assert!(!config.markdown.smart_punctuation);
        assert!(config.components.registered.is_empty());
    }

    #[test]
    fn test_default_toml_matches_default() {
        let config = Config::from_toml(DEFAULT_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_merge() {
        let mut base = Config::default();
        let override_config = ConfigOverride::from_toml(
            r#"
            [markdown]
            Tables = false
            [components]
            Registered = ["card", "quiz"]
        "#,
        )
        .unwrap();

        base.merge(&override_config);
        assert!(!base.markdown.tables);
        assert!(base.markdown.footnotes);
        assert_eq!(base.components.registered, vec!["card", "quiz"]);
    }

    #[test]
    fn test_merge_without_markdown_section_keeps_flags() {
        let mut base = Config::from_toml("[markdown]\nMath = false").unwrap();
        let override_config =
            Config::resolve_override("[components]\nRegistered = [\"card\"]").unwrap();

        base.merge(&override_config);
        assert!(!base.markdown.math);
        assert!(base.markdown.tables);
        assert_eq!(base.components.registered, vec!["card"]);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("[markdown\nTables = ").unwrap_err();
        assert!(matches!(err, MdsError::Config(_)));
    }

    #[test]
    fn test_resolve_inline_override() {
        let config = Config::resolve_override("[components]\nRegistered = [\"card\"]").unwrap();
        assert_eq!(config.components.registered, vec!["card"]);
    }

    #[test]
    fn test_config_path() {
        // On CI/containers this might be None, so we just check it doesn't panic
        if let Some(p) = Config::config_path() {
            assert!(p.to_string_lossy().contains("mds"));
        }
    }

    #[test]
    fn test_roundtrip_serialization() {
        let mut config = Config::default();
        config.components.registered.push("card".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
