//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{PickerError, Result};
use crate::date::pattern::{DEFAULT_PATTERN, DisplayPattern};
use crate::picker::debounce::DEFAULT_DEBOUNCE_MS;
use crate::picker::preset::PresetTag;
use crate::picker::schedule::DEFAULT_CARET_DELAY_MS;
use crate::picker::store::Mode;

/// Longest debounce window accepted from configuration.
pub const MAX_DEBOUNCE_MS: u64 = 1_000;

/// Full picker configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub picker: PickerConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Behavior of one picker control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PickerConfig {
    pub mode: Mode,
    /// Display pattern built from `YYYY`, `MM` and `DD`.
    pub format: String,
    /// Longest inclusive span a range may commit.
    pub max_days: Option<u32>,
    pub default_preset: PresetTag,
    pub offered_presets: Vec<PresetTag>,
    /// Key passed to `onChange` in single-date mode.
    pub field_name: String,
    pub disabled: bool,
}

/// Debounce and caret timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub debounce_ms: u64,
    pub caret_delay_ms: u64,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub jsonl_log: PathBuf,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

/// Filesystem paths used by drp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Range,
            format: DEFAULT_PATTERN.to_string(),
            max_days: None,
            default_preset: PresetTag::Custom,
            offered_presets: PresetTag::ALL.to_vec(),
            field_name: "date".to_string(),
            disabled: false,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            caret_delay_ms: DEFAULT_CARET_DELAY_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jsonl_log: data_dir().join("activity.jsonl"),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: home_dir().join(".config").join("drp").join("config.toml"),
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[DRP-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("drp")
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, env_var)
    }

    /// Like [`Config::load`] with a custom environment lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| PickerError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(PickerError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for log correlation.
    ///
    /// FNV-1a over canonical JSON, stable across processes and toolchains.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|error| PickerError::Serialization {
            context: "toml",
            details: error.to_string(),
        })
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut lookup = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        if let Some(raw) = lookup("DRP_MODE") {
            self.picker.mode = parse_env("DRP_MODE", &raw)?;
        }
        if let Some(raw) = lookup("DRP_FORMAT") {
            self.picker.format = raw;
        }
        if let Some(raw) = lookup("DRP_MAX_DAYS") {
            self.picker.max_days = match raw.trim() {
                "none" | "off" => None,
                other => Some(parse_env::<u32>("DRP_MAX_DAYS", other)?),
            };
        }
        if let Some(raw) = lookup("DRP_DEFAULT_PRESET") {
            self.picker.default_preset = parse_env("DRP_DEFAULT_PRESET", &raw)?;
        }
        if let Some(raw) = lookup("DRP_DISABLED") {
            self.picker.disabled = parse_env_bool("DRP_DISABLED", &raw)?;
        }

        if let Some(raw) = lookup("DRP_DEBOUNCE_MS") {
            self.timing.debounce_ms = parse_env("DRP_DEBOUNCE_MS", &raw)?;
        }
        if let Some(raw) = lookup("DRP_CARET_DELAY_MS") {
            self.timing.caret_delay_ms = parse_env("DRP_CARET_DELAY_MS", &raw)?;
        }

        if let Some(raw) = lookup("DRP_LOG_ENABLED") {
            self.logging.enabled = parse_env_bool("DRP_LOG_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("DRP_LOG_PATH") {
            self.logging.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        DisplayPattern::parse(&self.picker.format)?;

        if self.picker.max_days == Some(0) {
            return Err(PickerError::InvalidConfig {
                details: "picker.max_days must be at least 1".to_string(),
            });
        }
        if self.picker.offered_presets.is_empty() {
            return Err(PickerError::InvalidConfig {
                details: "picker.offered_presets must not be empty".to_string(),
            });
        }
        if self.picker.mode == Mode::Range {
            if !self.picker.offered_presets.contains(&PresetTag::Custom) {
                return Err(PickerError::InvalidConfig {
                    details: "picker.offered_presets must include custom in range mode"
                        .to_string(),
                });
            }
            if !self
                .picker
                .offered_presets
                .contains(&self.picker.default_preset)
            {
                return Err(PickerError::InvalidConfig {
                    details: format!(
                        "picker.default_preset {} is not in picker.offered_presets",
                        self.picker.default_preset
                    ),
                });
            }
        }
        if self.picker.field_name.trim().is_empty() {
            return Err(PickerError::InvalidConfig {
                details: "picker.field_name must not be empty".to_string(),
            });
        }

        if self.timing.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(PickerError::InvalidConfig {
                details: format!(
                    "timing.debounce_ms must be <= {MAX_DEBOUNCE_MS}, got {}",
                    self.timing.debounce_ms
                ),
            });
        }

        if self.logging.max_size_bytes == 0 {
            return Err(PickerError::InvalidConfig {
                details: "logging.max_size_bytes must be > 0".to_string(),
            });
        }
        if self.logging.max_rotated_files == 0 {
            return Err(PickerError::InvalidConfig {
                details: "logging.max_rotated_files must be > 0".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|error| PickerError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "on" => Ok(true),
        "0" | "no" | "off" => Ok(false),
        other => parse_env(name, other),
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, PickerError};
    use crate::picker::preset::PresetTag;
    use crate::picker::store::Mode;
    use std::collections::HashMap;
    use std::path::Path;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    fn load_from(toml: &str, env: &[(&str, &str)]) -> crate::core::errors::Result<Config> {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml).expect("write config");
        let env = vars(env);
        Config::load_with(Some(&path), |name| env.get(name).cloned())
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timing.debounce_ms, 10);
        assert_eq!(cfg.picker.format, "YYYY-MM-DD");
    }

    #[test]
    fn toml_sections_override_defaults() {
        let cfg = load_from(
            "[picker]\nmode = \"date\"\nformat = \"DD/MM/YYYY\"\nfield_name = \"created\"\n",
            &[],
        )
        .expect("load");
        assert_eq!(cfg.picker.mode, Mode::Single);
        assert_eq!(cfg.picker.format, "DD/MM/YYYY");
        assert_eq!(cfg.picker.field_name, "created");
        assert_eq!(cfg.timing.caret_delay_ms, 10);
    }

    #[test]
    fn env_overrides_win_over_file() {
        let cfg = load_from(
            "[picker]\nmax_days = 90\n",
            &[
                ("DRP_MAX_DAYS", "30"),
                ("DRP_DEFAULT_PRESET", "week"),
                ("DRP_DISABLED", "yes"),
                ("DRP_LOG_PATH", "/var/tmp/drp.jsonl"),
            ],
        )
        .expect("load");
        assert_eq!(cfg.picker.max_days, Some(30));
        assert_eq!(cfg.picker.default_preset, PresetTag::Week);
        assert!(cfg.picker.disabled);
        assert_eq!(
            cfg.logging.jsonl_log,
            std::path::PathBuf::from("/var/tmp/drp.jsonl")
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let cfg = load_from("", &[("DRP_MODE", "  ")]).expect("load");
        assert_eq!(cfg.picker.mode, Mode::Range);
    }

    #[test]
    fn invalid_env_value_reports_variable() {
        let err = load_from("", &[("DRP_DEBOUNCE_MS", "soon")]).unwrap_err();
        assert!(matches!(err, PickerError::ConfigParse { .. }));
        assert!(err.to_string().contains("DRP_DEBOUNCE_MS"));
    }

    #[test]
    fn pattern_without_day_token_rejected() {
        let mut cfg = Config::default();
        cfg.picker.format = "YYYY-MM".to_string();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.code(), "DRP-1101");
    }

    #[test]
    fn zero_max_days_rejected() {
        let mut cfg = Config::default();
        cfg.picker.max_days = Some(0);
        assert!(matches!(
            cfg.validate(),
            Err(PickerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn default_preset_must_be_offered() {
        let mut cfg = Config::default();
        cfg.picker.offered_presets = vec![PresetTag::Month, PresetTag::Custom];
        cfg.picker.default_preset = PresetTag::Week;
        let err = cfg.validate().expect_err("expected invalid default preset");
        assert!(err.to_string().contains("default_preset"));
    }

    #[test]
    fn range_mode_requires_custom_preset() {
        let mut cfg = Config::default();
        cfg.picker.offered_presets = vec![PresetTag::Week];
        cfg.picker.default_preset = PresetTag::Week;
        assert!(cfg.validate().is_err());
        cfg.picker.mode = Mode::Single;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn debounce_window_is_bounded() {
        let mut cfg = Config::default();
        cfg.timing.debounce_ms = 5_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_returns_error_for_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/drp/config.toml")));
        assert!(matches!(result, Err(PickerError::MissingConfig { .. })));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = load_from("[picker\nmode = ", &[]).unwrap_err();
        assert_eq!(err.code(), "DRP-1003");
    }

    #[test]
    fn stable_hash_changes_when_config_changes() {
        let cfg = Config::default();
        let hash_before = cfg.stable_hash().expect("hash should compute");
        let mut modified = Config::default();
        modified.picker.max_days = Some(7);
        let hash_after = modified.stable_hash().expect("hash should compute");
        assert_ne!(hash_before, hash_after);
        assert_eq!(hash_before, cfg.stable_hash().expect("hash"));
    }

    #[test]
    fn toml_rendering_reloads_identically() {
        let mut cfg = Config::default();
        cfg.picker.max_days = Some(31);
        let rendered = cfg.to_toml().expect("render");
        let reparsed: Config = toml::from_str(&rendered).expect("parse");
        assert_eq!(reparsed, cfg);
    }
}
