//! Env command implementation
//!
//! Shows the appliance environment. The default password is masked unless
//! `--show-secrets` is passed.

use super::self_check::{api_failure, server_url};
use crate::Client;
use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table};
use serde_json::{Map, Value};

/// Arguments for the env command
#[derive(Args)]
pub struct EnvArgs {
    /// Show the default password in clear text
    #[arg(long)]
    show_secrets: bool,

    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,
}

pub async fn cmd_env(args: &EnvArgs, client: &Client, quiet: bool) -> Result<()> {
    let info = client
        .environment()
        .await
        .map_err(|e| api_failure(&e, server_url(client)))?;
    let entries = info.data.entries(args.show_secrets);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries_json(&entries))?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in &entries {
        let cell = if value == "(not set)" {
            Cell::new(value).fg(Color::DarkGrey)
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(key), cell]);
    }
    println!("{table}");
    Ok(())
}

fn entries_json(entries: &[(&'static str, String)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcs_admin_core::EnvironmentData;

    #[test]
    fn json_output_keeps_password_masked() {
        let data = EnvironmentData {
            domain: Some("pcs.example.com".to_string()),
            default_password: Some("hunter2".to_string()),
            ..EnvironmentData::default()
        };
        let value = entries_json(&data.entries(false));
        let text = value.to_string();
        assert!(text.contains("pcs.example.com"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn json_output_reveals_when_asked() {
        let data = EnvironmentData {
            default_password: Some("hunter2".to_string()),
            ..EnvironmentData::default()
        };
        let text = entries_json(&data.entries(true)).to_string();
        assert!(text.contains("hunter2"));
    }
}
