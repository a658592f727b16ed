//! Config set subcommand
//!
//! Updates a single value in the config file. Environment overrides are
//! not written back.

use anyhow::{Result, anyhow, bail};
use console::style;
use dialoguer::Password;
use pcs_admin_core::config::{self, validate_config};
use pcs_admin_core::{Config, save_config};

/// Keys accepted by `config set`
const SETTABLE_KEYS: &[&str] = &[
    "server_url",
    "token",
    "poll_interval_ms",
    "request_timeout_secs",
];

/// Set a configuration value
///
/// Omitting the value for `token` prompts for it without echo.
pub fn cmd_config_set(key: &str, value: Option<&str>, quiet: bool) -> Result<()> {
    let path = config::paths::get_config_path()
        .ok_or_else(|| anyhow!("Could not determine config path"))?;
    let mut config = config::load_config_from(&path)?;

    let value = match value {
        Some(value) => value.to_string(),
        None if key == "token" => Password::new()
            .with_prompt("Session token")
            .allow_empty_password(true)
            .interact()?,
        None => bail!("A value is required for {key}"),
    };

    apply_setting(&mut config, key, &value)?;

    let warnings = validate_config(&config).map_err(|e| {
        anyhow!(
            "Invalid {}: {}\n\n  Fix: {}",
            e.field,
            e.message,
            e.fix_command
        )
    })?;

    save_config(&config)?;

    if !quiet {
        let shown = match (key, value.is_empty()) {
            (_, true) => "(not set)",
            ("token", false) => "********",
            _ => value.as_str(),
        };
        println!("{} {} = {}", style("Set").green().bold(), key, shown);
        for warning in warnings {
            eprintln!(
                "{} {} ({})",
                style("Warning:").yellow().bold(),
                warning.message,
                style(warning.fix_command).dim()
            );
        }
    }

    Ok(())
}

/// Apply one key/value pair to `config`
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "server_url" => config.server_url = value.trim().to_string(),
        // An empty token clears it
        "token" => config.token = Some(value.trim().to_string()).filter(|t| !t.is_empty()),
        "poll_interval_ms" => config.poll_interval_ms = parse_number(key, value)?,
        "request_timeout_secs" => config.request_timeout_secs = parse_number(key, value)?,
        _ => bail!(
            "Unknown config key: {key}\n\n  Valid keys: {}",
            SETTABLE_KEYS.join(", ")
        ),
    }
    Ok(())
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("{key} must be a whole number, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_server_url() {
        let mut config = Config::default();
        apply_setting(&mut config, "server_url", " https://pcs.example.com ").unwrap();
        assert_eq!(config.server_url, "https://pcs.example.com");
    }

    #[test]
    fn empty_token_clears_it() {
        let mut config = Config {
            token: Some("old".to_string()),
            ..Config::default()
        };
        apply_setting(&mut config, "token", "").unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn parses_numbers() {
        let mut config = Config::default();
        apply_setting(&mut config, "poll_interval_ms", "5000").unwrap();
        apply_setting(&mut config, "request_timeout_secs", "30").unwrap();
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn rejects_non_numeric_interval() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "poll_interval_ms", "fast").unwrap_err();
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn rejects_unknown_key() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "colour", "red").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
