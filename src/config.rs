use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AutoCommitError, Result};

/// Complete configuration for git-autocommit.
///
/// Everything has a sensible default so the tool works with no config file at all.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub version_file: VersionFileConfig,

    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// Which remote to pull from and push to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
        }
    }
}

/// Tag naming, e.g. "v{version}" -> "v1.2.3".
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            pattern: default_tag_pattern(),
        }
    }
}

impl TagConfig {
    /// Format a version according to the pattern
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace("{version}", version)
    }
}

/// The version-bearing file updated before committing (only with --write-version).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionFileConfig {
    #[serde(default = "default_version_file")]
    pub path: String,
}

fn default_version_file() -> String {
    "VERSION".to_string()
}

impl Default for VersionFileConfig {
    fn default() -> Self {
        VersionFileConfig {
            path: default_version_file(),
        }
    }
}

/// Verb style requested from the rewrite collaborator.
///
/// Historical prompt variants disagreed on this, so it is a policy knob
/// rather than a hardcoded choice.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    #[default]
    Imperative,
    Present,
}

/// Settings for the remote message-rewrite call.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RewriteConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Explicit API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub style: MessageStyle,
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            enabled: true,
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            style: MessageStyle::default(),
        }
    }
}

impl RewriteConfig {
    /// Effective timeout, with a one second floor
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.max(1)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitautocommit.toml` in the current directory
/// 3. `.gitautocommit.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitautocommit.toml").exists() {
        fs::read_to_string("./gitautocommit.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitautocommit.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| AutoCommitError::config(format!("Cannot parse config file: {}", e)))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.remote.name, "origin");
        assert_eq!(config.tag.pattern, "v{version}");
        assert_eq!(config.version_file.path, "VERSION");
        assert!(config.rewrite.enabled);
        assert_eq!(config.rewrite.timeout_secs, 30);
        assert_eq!(config.rewrite.style, MessageStyle::Imperative);
    }

    #[test]
    fn test_tag_pattern_format() {
        let tag = TagConfig::default();
        assert_eq!(tag.format("1.2.3"), "v1.2.3");

        let custom = TagConfig {
            pattern: "release-{version}".to_string(),
        };
        assert_eq!(custom.format("1.2.3"), "release-1.2.3");
    }

    #[test]
    fn test_timeout_floor() {
        let rewrite = RewriteConfig {
            timeout_secs: 0,
            ..RewriteConfig::default()
        };
        assert_eq!(rewrite.timeout_secs(), 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[rewrite]
model = "gpt-4o"
style = "present"
"#,
        )
        .unwrap();
        assert_eq!(config.rewrite.model, "gpt-4o");
        assert_eq!(config.rewrite.style, MessageStyle::Present);
        assert_eq!(config.remote.name, "origin");
        assert!(config.rewrite.enabled);
    }
}
