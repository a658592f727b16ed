//! Config subcommand implementations
//!
//! Provides `pcs-admin config` subcommands for viewing and managing configuration.

mod reset;
mod set;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};
use pcs_admin_core::Config;

pub use reset::cmd_config_reset;
pub use set::cmd_config_set;
pub use show::cmd_config_show;

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration management subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current configuration
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set (e.g., "server_url", "token", "poll_interval_ms")
        key: String,
        /// Value to set (omit for token to prompt securely)
        value: Option<String>,
    },
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Handle config command
///
/// Routes to the appropriate handler based on the subcommand.
/// If no subcommand is given, defaults to Show.
pub fn cmd_config(args: ConfigArgs, config: &Config, quiet: bool) -> Result<()> {
    match args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(config, json, quiet),
        Some(ConfigSubcommands::Set { key, value }) => {
            cmd_config_set(&key, value.as_deref(), quiet)
        }
        Some(ConfigSubcommands::Reset { force }) => cmd_config_reset(force, quiet),
        None => {
            // Default to show when no subcommand given
            cmd_config_show(config, args.json, quiet)
        }
    }
}
