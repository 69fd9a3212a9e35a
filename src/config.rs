//! Configuration file parser for ~/.config/postfeed/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::{ErrorPolicy, TargetKind, ViewMode};

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "POSTFEED_BASE_URL";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the listing backend.
    pub base_url: String,

    /// Posts requested per page (`per_page` query parameter).
    pub per_page: u32,

    /// Title truncation limit in characters.
    pub title_limit: usize,

    /// Body truncation limit for grid cards.
    pub grid_body_limit: usize,

    /// Body truncation limit for list cards.
    pub list_body_limit: usize,

    /// Layout on wide viewports.
    pub default_view: ViewMode,

    /// Viewports at or below this width (px) start in list view.
    pub narrow_viewport_width: u32,

    /// Whether a failed page stops pagination or allows a retry.
    pub on_error: ErrorPolicy,

    /// Element watched for infinite scroll.
    pub trigger_target: TargetKind,

    /// Visible fraction of the target that counts as "in view".
    pub trigger_threshold: f64,

    /// Minimum spacing between scroll triggers, in milliseconds.
    pub trigger_debounce_ms: u64,

    /// Per-request timeout in seconds. 0 = HTTP client default.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            per_page: 20,
            title_limit: 100,
            grid_body_limit: 300,
            list_body_limit: 1500,
            default_view: ViewMode::Grid,
            narrow_viewport_width: 1064,
            on_error: ErrorPolicy::Stop,
            trigger_target: TargetKind::Sentinel,
            trigger_threshold: 0.5,
            trigger_debounce_ms: 250,
            request_timeout_secs: 0,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: &'static [&'static str] = &[
        "base_url",
        "per_page",
        "title_limit",
        "grid_body_limit",
        "list_body_limit",
        "default_view",
        "narrow_viewport_width",
        "on_error",
        "trigger_target",
        "trigger_threshold",
        "trigger_debounce_ms",
        "request_timeout_secs",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::Invalid("per_page must be at least 1".to_string()));
        }
        if self.grid_body_limit >= self.list_body_limit {
            return Err(ConfigError::Invalid(format!(
                "grid_body_limit ({}) must be smaller than list_body_limit ({})",
                self.grid_body_limit, self.list_body_limit
            )));
        }
        if !(self.trigger_threshold > 0.0 && self.trigger_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "trigger_threshold must be in (0, 1], got {}",
                self.trigger_threshold
            )));
        }
        Ok(())
    }

    /// Backend URL, with `POSTFEED_BASE_URL` taking precedence over the file.
    pub fn effective_base_url(&self) -> String {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.base_url.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.per_page, 20);
        assert_eq!(config.title_limit, 100);
        assert_eq!(config.grid_body_limit, 300);
        assert_eq!(config.list_body_limit, 1500);
        assert_eq!(config.default_view, ViewMode::Grid);
        assert_eq!(config.on_error, ErrorPolicy::Stop);
        assert_eq!(config.trigger_target, TargetKind::Sentinel);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/postfeed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.per_page, 20);
    }

    #[test]
    fn test_whitespace_only_returns_default() {
        let config = Config::parse("   \n  \n  ").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_full_config_from_file() {
        let dir = std::env::temp_dir().join("postfeed_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
base_url = "https://feed.example.com/api"
per_page = 50
title_limit = 80
grid_body_limit = 200
list_body_limit = 2000
default_view = "list"
narrow_viewport_width = 900
on_error = "retain"
trigger_target = "last_item"
trigger_threshold = 0.25
trigger_debounce_ms = 100
request_timeout_secs = 15
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://feed.example.com/api");
        assert_eq!(config.per_page, 50);
        assert_eq!(config.title_limit, 80);
        assert_eq!(config.default_view, ViewMode::List);
        assert_eq!(config.on_error, ErrorPolicy::Retain);
        assert_eq!(config.trigger_target, TargetKind::LastItem);
        assert_eq!(config.trigger_threshold, 0.25);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::parse("per_page = 10\n").unwrap();
        assert_eq!(config.per_page, 10);
        assert_eq!(config.list_body_limit, 1500);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::parse("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_view_mode_rejected() {
        assert!(matches!(
            Config::parse("default_view = \"table\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("per_page = 5\ntotally_fake_key = 1\n").unwrap();
        assert_eq!(config.per_page, 5);
    }

    #[test]
    fn test_limits_must_differ_between_modes() {
        let err = Config::parse("grid_body_limit = 1500\nlist_body_limit = 1500\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_per_page_rejected() {
        assert!(matches!(
            Config::parse("per_page = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_threshold_range() {
        assert!(Config::parse("trigger_threshold = 0.0\n").is_err());
        assert!(Config::parse("trigger_threshold = 1.5\n").is_err());
        assert!(Config::parse("trigger_threshold = 1.0\n").is_ok());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("postfeed_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
