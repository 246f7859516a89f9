//! Engine configuration
//!
//! Loaded from TOML; every field has a default so a partial file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_dom::Selector;
use quill_net::RequesterId;
use serde::Deserialize;

use crate::{ConfigError, PollPolicy};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub poll: PollConfig,
    pub injection: InjectionConfig,
    pub service: ServiceConfig,
    /// Where the requester id is kept; the platform data dir when unset
    pub state_dir: Option<PathBuf>,
    pub selectors: SelectorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_poll_timeout")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InjectionConfig {
    #[serde(default = "default_settle")]
    pub settle_ms: u64,
    #[serde(default = "default_focus_delay")]
    pub focus_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_timeout")]
    pub timeout_secs: u64,
}

/// Selectors describing the host's feed markup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_item_selector")]
    pub item: String,
    #[serde(default = "default_text_selector")]
    pub text: String,
    #[serde(default = "default_text_fallback_selector")]
    pub text_fallback: String,
    #[serde(default = "default_link_selector")]
    pub link: String,
    #[serde(default = "default_reply_action_selector")]
    pub reply_action: String,
}

fn default_poll_interval() -> u64 {
    50
}
fn default_poll_timeout() -> u64 {
    5000
}
fn default_settle() -> u64 {
    100
}
fn default_focus_delay() -> u64 {
    200
}
fn default_endpoint() -> String {
    "http://localhost:8000".to_string()
}
fn default_service_timeout() -> u64 {
    30
}
fn default_item_selector() -> String {
    r#"[data-testid="tweet"]"#.to_string()
}
fn default_text_selector() -> String {
    r#"[data-testid="tweetText"]"#.to_string()
}
fn default_text_fallback_selector() -> String {
    "div[lang]".to_string()
}
fn default_link_selector() -> String {
    r#"a[href*="/status/"]"#.to_string()
}
fn default_reply_action_selector() -> String {
    r#"[data-testid="reply"]"#.to_string()
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval(),
            timeout_ms: default_poll_timeout(),
        }
    }
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle(),
            focus_delay_ms: default_focus_delay(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_service_timeout(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: default_item_selector(),
            text: default_text_selector(),
            text_fallback: default_text_fallback_selector(),
            link: default_link_selector(),
            reply_action: default_reply_action_selector(),
        }
    }
}

impl SelectorConfig {
    /// Parse one configured selector, naming the field on failure
    pub fn parse(field: &'static str, value: &str) -> Result<Selector, ConfigError> {
        Selector::parse(value).map_err(|source| ConfigError::Selector { field, source })
    }

    pub fn reply_action_selector(&self) -> Result<Selector, ConfigError> {
        Self::parse("reply_action", &self.reply_action)
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from_millis(self.poll.interval_ms, self.poll.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.injection.settle_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.injection.focus_delay_ms)
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Configured state directory, or the per-user default
    pub fn resolved_state_dir(&self) -> Option<PathBuf> {
        self.state_dir.clone().or_else(RequesterId::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.poll_policy(), PollPolicy::default());
        assert_eq!(config.settle(), Duration::from_millis(100));
        assert_eq!(config.focus_delay(), Duration::from_millis(200));
        assert_eq!(config.service.endpoint, "http://localhost:8000");
        assert_eq!(config.service_timeout(), Duration::from_secs(30));
        assert!(config.state_dir.is_none());
    }

    #[test]
    fn test_empty_file_equals_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            state_dir = "/tmp/quill"

            [poll]
            timeout_ms = 800

            [service]
            endpoint = "https://replies.example"

            [selectors]
            item = "article"
            "#,
        )
        .unwrap();

        assert_eq!(config.poll.timeout_ms, 800);
        assert_eq!(config.poll.interval_ms, 50);
        assert_eq!(config.service.endpoint, "https://replies.example");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.selectors.item, "article");
        assert_eq!(config.selectors.text, default_text_selector());
        assert_eq!(config.resolved_state_dir(), Some(PathBuf::from("/tmp/quill")));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[injection]\nsettle_ms = 250\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.settle(), Duration::from_millis(250));
        assert_eq!(config.focus_delay(), Duration::from_millis(200));

        let missing = EngineConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            EngineConfig::from_toml_str("[poll]\ninterval_ms = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SelectorConfig::parse("item", "[data-testid="),
            Err(ConfigError::Selector { field: "item", .. })
        ));
    }
}
