//! TOML-based application configuration.
//!
//! Stores the goal targets, refresh cadence, and provider endpoint at
//! `~/.config/legboard/config.toml`. Set `LEGBOARD_ENV=dev` to use
//! `~/.config/legboard-dev/` instead.
//!
//! Every knob the derivation and refresh layers consume lives here, so
//! retuning the operation never touches the engine code.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::metrics::Targets;

/// Goal targets and pace classification boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_target")]
    pub daily_target: u32,
    #[serde(default = "default_percent_ceiling")]
    pub percent_ceiling: f64,
    #[serde(default = "default_pace_thresholds")]
    pub pace_thresholds: [f64; 4],
}

/// Refresh loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_poll_period_secs")]
    pub poll_period_secs: u64,
    #[serde(default = "default_celebration_decay_ms")]
    pub celebration_decay_ms: u64,
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: usize,
    /// IANA timezone identifier forwarded to the provider.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Live provider endpoint. With no `base_url` the synthetic data source is
/// used instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/legboard/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

// Default functions
fn default_daily_target() -> u32 {
    13
}
fn default_percent_ceiling() -> f64 {
    120.0
}
fn default_pace_thresholds() -> [f64; 4] {
    [8.0, 11.0, 13.0, 16.0]
}
fn default_poll_period_secs() -> u64 {
    180
}
fn default_celebration_decay_ms() -> u64 {
    1500
}
fn default_upcoming_days() -> usize {
    7
}
fn default_timezone() -> String {
    "America/New_York".into()
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_target: default_daily_target(),
            percent_ceiling: default_percent_ceiling(),
            pace_thresholds: default_pace_thresholds(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_period_secs: default_poll_period_secs(),
            celebration_decay_ms: default_celebration_decay_ms(),
            upcoming_days: default_upcoming_days(),
            timezone: default_timezone(),
        }
    }
}

/// Returns `~/.config/legboard[-dev]/` based on LEGBOARD_ENV.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LEGBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("legboard-dev")
    } else {
        base_dir.join("legboard")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    /// Derivation targets for the metrics layer.
    pub fn targets(&self) -> Targets {
        Targets {
            daily: self.goal.daily_target,
            percent_ceiling: self.goal.percent_ceiling,
            pace_thresholds: self.goal.pace_thresholds,
        }
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default config on first use.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Set a config value without persisting.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

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
        let unknown = || ConfigError::MissingKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::MissingKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as number"),
                                })?
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(ConfigError::MissingKey(key.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = Config::default();
        assert_eq!(config.goal.daily_target, 13);
        assert_eq!(config.goal.percent_ceiling, 120.0);
        assert_eq!(config.goal.pace_thresholds, [8.0, 11.0, 13.0, 16.0]);
        assert_eq!(config.refresh.poll_period_secs, 180);
        assert_eq!(config.refresh.celebration_decay_ms, 1500);
        assert_eq!(config.refresh.upcoming_days, 7);
        assert!(config.provider.base_url.is_none());
    }

    #[test]
    fn roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.goal.daily_target = 15;
        config.provider.base_url = Some("https://ops.example.com/api/goal".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.goal.daily_target, 15);
        assert_eq!(
            loaded.provider.base_url.as_deref(),
            Some("https://ops.example.com/api/goal")
        );
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[goal]\ndaily_target = 10\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.goal.daily_target, 10);
        assert_eq!(loaded.refresh.poll_period_secs, 180);
    }

    #[test]
    fn dot_path_get_and_apply() {
        let mut config = Config::default();
        assert_eq!(config.get("goal.daily_target").as_deref(), Some("13"));
        assert_eq!(
            config.get("refresh.timezone").as_deref(),
            Some("America/New_York")
        );
        assert!(config.get("goal.nope").is_none());

        config.apply("goal.daily_target", "14").unwrap();
        assert_eq!(config.goal.daily_target, 14);
        config.apply("refresh.timezone", "Europe/Madrid").unwrap();
        assert_eq!(config.refresh.timezone, "Europe/Madrid");

        assert!(config.apply("goal.bogus", "1").is_err());
    }

    #[test]
    fn targets_reflect_goal_section() {
        let mut config = Config::default();
        config.goal.daily_target = 10;
        let targets = config.targets();
        assert_eq!(targets.daily, 10);
        assert_eq!(targets.yearly(), 3650);
        assert_eq!(targets.monthly(30), 300);
    }
}
