//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Statistics window for the rolling average
//! - Remote advisor endpoint, model and request limits
//! - Log filter for the CLI
//!
//! Configuration is stored at `<data_dir>/config.toml`. The advisor API key
//! is never written here; it lives in the OS keyring.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::stats::MAX_WINDOW_DAYS;

/// File name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Statistics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Window for the rolling average, in days. Values <= 0 yield 0.0.
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: i64,
}

/// Chat-completion advisor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL; `v1/chat/completions` is joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_analysis_max_tokens")]
    pub analysis_max_tokens: u32,
    #[serde(default = "default_advice_max_tokens")]
    pub advice_max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `streakroom_core=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_rolling_window_days() -> i64 {
    7
}
fn default_true() -> bool {
    true
}
fn default_base_url() -> String {
    "https://api.openai.com/".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_analysis_max_tokens() -> u32 {
    500
}
fn default_advice_max_tokens() -> u32 {
    100
}
fn default_temperature() -> f64 {
    0.7
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            rolling_window_days: default_rolling_window_days(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            analysis_max_tokens: default_analysis_max_tokens(),
            advice_max_tokens: default_advice_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot assign a whole section".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from disk, writing and returning the default if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Every leaf key with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) else {
            return out;
        };
        for (section, fields) in sections {
            if let serde_json::Value::Object(fields) = fields {
                for (name, value) in fields {
                    let rendered = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    out.push((format!("{section}.{name}"), rendered));
                }
            }
        }
        out
    }

    /// Set a config value by key in memory. Call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.advisor.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "advisor.base_url".into(),
            message: e.to_string(),
        })?;
        if self.advisor.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "advisor.timeout_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.stats.rolling_window_days) {
            return Err(ConfigError::InvalidValue {
                key: "stats.rolling_window_days".into(),
                message: format!("must be between 1 and {MAX_WINDOW_DAYS}"),
            });
        }
        if !(0.0..=2.0).contains(&self.advisor.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "advisor.temperature".into(),
                message: "must be between 0.0 and 2.0".into(),
            });
        }
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default config");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[advisor]\nmodel = \"local-llama\"\n").unwrap();
        assert_eq!(parsed.advisor.model, "local-llama");
        assert_eq!(parsed.advisor.timeout_secs, 30);
        assert_eq!(parsed.stats.rolling_window_days, 7);
        assert_eq!(parsed.log.filter, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("stats.rolling_window_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("advisor.enabled").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("advisor.base_url").as_deref(),
            Some("https://api.openai.com/")
        );
        assert!(cfg.get("advisor").is_none());
        assert!(cfg.get("stats.missing_key").is_none());
    }

    #[test]
    fn set_updates_number_bool_and_string() {
        let mut cfg = Config::default();
        cfg.set("stats.rolling_window_days", "14").unwrap();
        cfg.set("advisor.enabled", "false").unwrap();
        cfg.set("advisor.model", "gpt-4o-mini").unwrap();
        cfg.set("advisor.temperature", "0.2").unwrap();
        assert_eq!(cfg.stats.rolling_window_days, 14);
        assert!(!cfg.advisor.enabled);
        assert_eq!(cfg.advisor.model, "gpt-4o-mini");
        assert!((cfg.advisor.temperature - 0.2).abs() < 1e-9);
    }

    #[test]
    fn set_accepts_negative_window() {
        let mut cfg = Config::default();
        cfg.set("stats.rolling_window_days", "-1").unwrap();
        assert_eq!(cfg.stats.rolling_window_days, -1);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("stats.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values_and_keeps_old_state() {
        let mut cfg = Config::default();
        assert!(cfg.set("advisor.enabled", "not_a_bool").is_err());
        assert!(cfg.set("advisor.timeout_secs", "0").is_err());
        assert!(cfg.set("advisor.base_url", "not a url").is_err());
        assert!(cfg.set("advisor", "{}").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn rolling_window_is_bounded() {
        let mut cfg = Config::default();
        for bad in ["0", "-7", "3651", "200000000"] {
            assert!(matches!(
                cfg.set("stats.rolling_window_days", bad),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
        assert_eq!(cfg.stats.rolling_window_days, 7);
        cfg.set("stats.rolling_window_days", "3650").unwrap();
        assert_eq!(cfg.stats.rolling_window_days, 3650);
    }

    #[test]
    fn entries_lists_every_leaf() {
        let entries = Config::default().entries();
        assert!(entries.contains(&("log.filter".to_string(), "warn".to_string())));
        assert!(entries.iter().any(|(k, _)| k == "advisor.model"));
        assert_eq!(entries.len(), 9);
    }

    #[test]
    fn load_from_missing_file_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("log.filter", "debug").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().log.filter, "debug");
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "stats = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
