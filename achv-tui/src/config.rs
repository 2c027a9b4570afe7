//! Configuration loading for the achv TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use crate::theme::{Palette, THEME_NAMES};
use achv_core::Region;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_ENV_VAR: &str = "ACHV_TUI_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub tick_rate_ms: u64,
    pub cache_path: PathBuf,
    pub state_path: PathBuf,
    pub error_log_path: PathBuf,
    pub export_dir: PathBuf,
    /// Program and arguments that receive exported markdown on stdin.
    /// Empty means exports always go to a file.
    #[serde(default)]
    pub clipboard_command: Vec<String>,
    pub default_region: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or ACHV_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid("api_base_url", "must start with http:// or https://"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be > 0"));
        }
        if self.tick_rate_ms == 0 {
            return Err(invalid("tick_rate_ms", "must be > 0"));
        }
        for (field, path) in [
            ("cache_path", &self.cache_path),
            ("state_path", &self.state_path),
            ("error_log_path", &self.error_log_path),
            ("export_dir", &self.export_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        if self
            .clipboard_command
            .first()
            .is_some_and(|program| program.trim().is_empty())
        {
            return Err(invalid("clipboard_command", "program must not be blank"));
        }
        if let Err(err) = Region::from_str(&self.default_region) {
            return Err(invalid("default_region", &err.to_string()));
        }
        if Palette::named(&self.theme.name).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: format!("expected one of: {}", THEME_NAMES.join(", ")),
            });
        }
        Ok(())
    }

    /// The configured starting region, falling back to the default region
    /// when the value does not parse.
    pub fn region(&self) -> Region {
        Region::from_str(&self.default_region).unwrap_or_default()
    }

    pub fn palette(&self) -> Palette {
        Palette::named(&self.theme.name).unwrap_or_default()
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
