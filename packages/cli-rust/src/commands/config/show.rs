//! Config show subcommand
//!
//! Displays current configuration in table or JSON format.
//! Uses serde serialization to automatically include all Config fields.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, Table};
use pcs_admin_core::{Config, config};
use serde_json::Value;

/// Fields that should have their values masked in output
const SENSITIVE_FIELDS: &[&str] = &["token"];

/// Show current configuration
///
/// Reflects `PCS_ADMIN_URL`/`PCS_ADMIN_TOKEN` and `--url` overrides.
/// The token is masked.
pub fn cmd_config_show(config: &Config, json: bool, _quiet: bool) -> Result<()> {
    if json {
        let mut value = serde_json::to_value(config)?;
        mask_sensitive_fields(&mut value);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    show_table(config)
}

fn show_table(config: &Config) -> Result<()> {
    let value = serde_json::to_value(config)?;
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("Config did not serialize to an object"))?;

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);

    // Token is skipped when unset; list it anyway
    if !obj.contains_key("token") {
        table.add_row(vec![Cell::new("token"), Cell::new("(not set)")]);
    }
    for (key, val) in obj {
        let cell = apply_cell_styling(key, format_value(key, val));
        table.add_row(vec![Cell::new(key), cell]);
    }

    println!("{table}");

    if let Some(path) = config::paths::get_config_path() {
        println!();
        println!("Config file: {}", path.display());
    }

    Ok(())
}

fn mask_sensitive_fields(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    for field in SENSITIVE_FIELDS {
        if let Some(entry) = obj.get_mut(*field) {
            *entry = Value::String(format_sensitive(entry));
        }
    }
}

/// Format a JSON value for display
fn format_value(key: &str, value: &Value) -> String {
    if SENSITIVE_FIELDS.contains(&key) {
        return format_sensitive(value);
    }

    match value {
        Value::Null => "(not set)".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_sensitive(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => "********".to_string(),
        _ => "(not set)".to_string(),
    }
}

/// Highlight a plain-http server URL
fn apply_cell_styling(key: &str, display_value: String) -> Cell {
    if key == "server_url" && display_value.starts_with("http://") {
        return Cell::new(display_value).fg(Color::Yellow);
    }
    if key == "server_url" {
        return Cell::new(display_value).fg(Color::Green);
    }
    Cell::new(display_value)
}
