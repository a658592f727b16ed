//! Update channel command implementation
//!
//! Shows the channel the appliance pulls updates from and switches it.
//! Saving a channel starts a self-check so the new source is verified.

use super::self_check::{api_failure, run_in_view, server_url};
use crate::Client;
use crate::output::{CommandSpinner, format_kv};
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::style;
use dialoguer::Confirm;
use pcs_admin_core::{Action, ChannelKind, UpdateChannelConfig};
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the channel command
#[derive(Args)]
pub struct ChannelArgs {
    #[command(subcommand)]
    command: Option<ChannelCommands>,
}

#[derive(Subcommand)]
enum ChannelCommands {
    /// Show the current update channel
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch the update channel
    Set {
        /// Channel to switch to
        #[arg(value_enum)]
        kind: ChannelKind,
        /// Archive URL (custom channel only)
        #[arg(long)]
        url: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Do not follow the self-check started after saving
        #[arg(long)]
        no_watch: bool,
    },
}

pub async fn cmd_channel(
    args: &ChannelArgs,
    client: &Arc<Client>,
    poll_interval: Duration,
    quiet: bool,
) -> Result<()> {
    match &args.command {
        Some(ChannelCommands::Show { json }) => show_channel(client, *json, quiet).await,
        None => show_channel(client, false, quiet).await,
        Some(ChannelCommands::Set {
            kind,
            url,
            yes,
            no_watch,
        }) => {
            let target = requested_channel(*kind, url.as_deref())?;
            set_channel(client, poll_interval, target, *yes, *no_watch, quiet).await
        }
    }
}

async fn show_channel(client: &Client, json: bool, quiet: bool) -> Result<()> {
    let channel = client
        .get_update_channel()
        .await
        .map_err(|e| api_failure(&e, server_url(client)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&channel)?);
        return Ok(());
    }
    if quiet {
        println!("{}", channel.channel);
        return Ok(());
    }

    println!(
        "{}",
        format_kv("Channel:", style(channel.channel).cyan().bold())
    );
    println!("{}", format_kv("Update URL:", channel.display_url()));
    Ok(())
}

/// Build the target channel from CLI input
///
/// The URL itself is checked by `UpdateChannelConfig::to_url` before any
/// request is sent.
fn requested_channel(kind: ChannelKind, url: Option<&str>) -> Result<UpdateChannelConfig> {
    match (kind, url) {
        (ChannelKind::Custom, url) => Ok(UpdateChannelConfig::custom(url.unwrap_or_default())),
        (_, Some(_)) => bail!("--url can only be used with the custom channel"),
        (kind, None) => Ok(UpdateChannelConfig::new(kind)),
    }
}

async fn set_channel(
    client: &Arc<Client>,
    poll_interval: Duration,
    target: UpdateChannelConfig,
    yes: bool,
    no_watch: bool,
    quiet: bool,
) -> Result<()> {
    let url = server_url(client);
    let new_url = target.to_url().map_err(|e| api_failure(&e, url))?;

    let spinner = CommandSpinner::new_maybe("Reading current channel...", quiet);
    let current = match client.get_update_channel().await {
        Ok(current) => current,
        Err(e) => {
            spinner.fail("Could not read current channel");
            return Err(api_failure(&e, url));
        }
    };
    spinner.success(&format!("Current channel: {}", current.channel));
    drop(spinner);

    if current == target {
        if !quiet {
            println!(
                "Update channel is already {}.",
                style(target.channel).cyan()
            );
        }
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Switch update channel from {} to {} ({})?",
                current.channel,
                target.channel,
                display_target(&new_url)
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            if !quiet {
                println!("Channel change cancelled.");
            }
            return Ok(());
        }
    }

    run_in_view(
        client,
        poll_interval,
        Action::SaveUpdateChannel(target),
        no_watch,
        quiet,
    )
    .await
}

fn display_target(url: &str) -> &str {
    if url.is_empty() { "default" } else { url }
}
