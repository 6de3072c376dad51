//! Configuration loading for swift-idiom-linter
//!
//! Loads configuration from a `.swift-idiom-lint.toml` file

use crate::models::{Severity, SeverityConfiguration};
use crate::version::SwiftVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".swift-idiom-lint.toml";

/// Keyword selecting every rule in `enable`
pub const ALL: &str = "ALL";

const DEFAULT_EXCLUDES: &[&str] = &[
    ".build",
    ".swiftpm",
    ".git",
    "Pods",
    "Carthage",
    "DerivedData",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rules to enable (empty means all rules, or use ["ALL"])
    #[serde(default)]
    pub enable: Vec<String>,

    /// Rules to disable
    #[serde(default)]
    pub disable: Vec<String>,

    /// Paths to exclude from linting
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Swift version the code base is compiled with
    #[serde(default)]
    pub swift_version: Option<SwiftVersion>,

    /// Rule-specific configuration, keyed by rule identifier
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

/// Rule-specific configuration
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub severity: Option<Severity>,
}

impl Config {
    /// Severity configuration for a rule, defaulting to warning
    pub fn severity_for(&self, rule_id: &str) -> SeverityConfiguration {
        self.rules
            .get(rule_id)
            .and_then(|rule| rule.severity)
            .map(SeverityConfiguration::new)
            .unwrap_or_default()
    }

    pub fn swift_version(&self) -> SwiftVersion {
        self.swift_version.unwrap_or_default()
    }
}

/// Find the configuration file starting from a path and walking up
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_file() {
        start_path.parent()?
    } else {
        start_path
    };

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from an explicit path, or search upward from the
/// working directory. Returns `Ok(None)` when no file is found by search.
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>, ConfigError> {
    let config_path = match path {
        Some(p) if p.is_file() => p.to_path_buf(),
        Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
        None => {
            let Some(found) = std::env::current_dir()
                .ok()
                .and_then(|cwd| find_config_file(&cwd))
            else {
                return Ok(None);
            };
            found
        }
    };

    log::debug!("loading configuration from {}", config_path.display());

    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;

    parse_config(&content, &config_path).map(Some)
}

/// All rule IDs except the disabled ones
fn all_except(all_rules: &[String], disabled: &[String]) -> Vec<String> {
    all_rules
        .iter()
        .filter(|r| !disabled.contains(r))
        .cloned()
        .collect()
}

fn resolve_enabled(all_rules: &[String], enable: &[String], disable: &[String]) -> Option<Vec<String>> {
    if enable.iter().any(|r| r == ALL) {
        Some(all_except(all_rules, disable))
    } else if !enable.is_empty() {
        Some(enable.to_vec())
    } else if !disable.is_empty() {
        Some(all_except(all_rules, disable))
    } else {
        None
    }
}

/// Merge command line arguments with config file settings
/// CLI arguments take precedence
pub fn merge_config(
    config: Option<&Config>,
    all_rules: &[String],
    cli_enable: &[String],
    cli_disable: &[String],
    cli_exclude: &[String],
) -> (Option<Vec<String>>, Vec<String>) {
    let mut exclude = Vec::new();

    let cli_enabled = resolve_enabled(all_rules, cli_enable, cli_disable);
    let enable = match (cli_enabled, config) {
        (Some(enabled), _) => Some(enabled),
        (None, Some(cfg)) => resolve_enabled(all_rules, &cfg.enable, &cfg.disable),
        (None, None) => None,
    };

    if let Some(cfg) = config {
        exclude.extend(cfg.exclude.iter().cloned());
    }
    exclude.extend(cli_exclude.iter().cloned());

    for default in DEFAULT_EXCLUDES {
        if !exclude.iter().any(|e| e == default) {
            exclude.push(default.to_string());
        }
    }

    (enable, exclude)
}
