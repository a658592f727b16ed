//! Configuration management for pcs-admin
//!
//! Loads the JSONC config file, applies environment overrides and writes
//! it back.

pub mod paths;
pub mod schema;
pub mod validation;

use jsonc_parser::ParseOptions;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use schema::Config;
pub use validation::{ValidationError, ValidationWarning, validate_config};

/// Overrides `server_url`
pub const URL_ENV: &str = "PCS_ADMIN_URL";
/// Overrides `token`
pub const TOKEN_ENV: &str = "PCS_ADMIN_TOKEN";

/// Errors that can occur while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config syntax: {0}")]
    Syntax(String),

    #[error("Invalid config: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Load the config file, or defaults when it does not exist
///
/// Environment overrides are applied on top.
pub fn load_config_or_default() -> Result<Config, ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigDir)?;
    let mut config = load_config_from(&path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Load a config file without environment overrides
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}

/// Parse JSONC config text (comments and trailing commas allowed)
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(contents, &ParseOptions::default())
        .map_err(|e| ConfigError::Syntax(e.to_string()))?;
    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Config::default()),
    }
}

/// Write the config file (without environment overrides)
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = paths::get_config_path().ok_or(ConfigError::NoConfigDir)?;
    save_config_to(config, &path)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let payload = serde_json::to_string_pretty(config)?;
    fs::write(path, payload).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Config saved");
    Ok(())
}

/// Apply `PCS_ADMIN_URL` / `PCS_ADMIN_TOKEN` from `lookup`
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(URL_ENV).filter(|v| !v.is_empty()) {
        config.server_url = url;
    }
    if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
        config.token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parses_jsonc_with_comments() {
        let text = r#"{
            // appliance address
            "version": 1,
            "server_url": "https://pcs.example.com",
            "poll_interval_ms": 3000,
        }"#;
        let config = parse_config(text).unwrap();
        assert_eq!(config.server_url, "https://pcs.example.com");
        assert_eq!(config.poll_interval_ms, 3000);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse_config("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax(_)));
    }

    #[test]
    fn unknown_field_is_schema_error() {
        let err = parse_config(r#"{"version": 1, "colour": "red"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Schema(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            token: Some("abc".to_string()),
            ..Config::default()
        };
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn env_overrides_win() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| match key {
            URL_ENV => Some("https://override.example".to_string()),
            TOKEN_ENV => Some("env-token".to_string()),
            _ => None,
        });
        assert_eq!(config.server_url, "https://override.example");
        assert_eq!(config.token.as_deref(), Some("env-token"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |_| Some(String::new()));
        assert_eq!(config, Config::default());
    }
}
