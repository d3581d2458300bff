//! Service configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML mapping for each
//! section. `#[serde(default)]` fills missing fields from `Default`, so a
//! config file only needs the keys it changes.
//!
//! ```toml
//! [completion]
//! trigger_characters = ".("
//!
//! [debounce]
//! window_ms = 80
//! ```

use pinelens_assist::CompletionOptions;
use pinelens_scanner::ScanOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion behavior
    pub completion: CompletionConfig,

    /// Declaration scanner switches
    pub scanner: ScannerConfig,

    /// Request coalescing
    pub debounce: DebounceConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("pinelens").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Saves the config as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            trigger_characters: self.completion.trigger_characters.clone(),
            language_ids: self.completion.language_ids.clone(),
            suppress_in_comments_and_strings: self.completion.suppress_in_comments_and_strings,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            balanced_parameter_lists: self.scanner.balanced_parameter_lists,
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce.window_ms)
    }
}

/// Completion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Typing any of these characters re-opens completion
    pub trigger_characters: String,

    /// Language tags served, compared case-insensitively
    pub language_ids: Vec<String>,

    /// Return nothing while the cursor is in a comment or open string
    pub suppress_in_comments_and_strings: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        let options = CompletionOptions::default();
        Self {
            trigger_characters: options.trigger_characters,
            language_ids: options.language_ids,
            suppress_in_comments_and_strings: options.suppress_in_comments_and_strings,
        }
    }
}

/// Scanner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Match parentheses when finding the end of a parameter list
    pub balanced_parameter_lists: bool,
}

/// Debounce configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Window in milliseconds; 0 runs every request
    pub window_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { window_ms: 150 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.completion.trigger_characters, ".(,");
        assert_eq!(config.completion.language_ids, vec!["pine", "pinescript"]);
        assert!(config.completion.suppress_in_comments_and_strings);
        assert!(!config.scanner.balanced_parameter_lists);
        assert_eq!(config.debounce_window(), Duration::from_millis(150));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[scanner]\nbalanced_parameter_lists = true\n").unwrap();
        assert!(config.scan_options().balanced_parameter_lists);
        assert_eq!(config.completion_options(), CompletionOptions::default());
        assert_eq!(config.debounce.window_ms, 150);
    }

    #[test]
    fn test_load_and_save_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.completion.trigger_characters = ".".to_string();
        config.debounce.window_ms = 0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.debounce_window(), Duration::ZERO);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[debounce]\nwindow_ms = \"soon\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
