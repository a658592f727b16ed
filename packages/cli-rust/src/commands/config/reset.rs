//! Config reset subcommand
//!
//! Resets configuration to default values.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use pcs_admin_core::{Config, save_config};

/// Reset configuration to defaults
///
/// Prompts for confirmation unless --force is specified. The stored token
/// is discarded too.
pub fn cmd_config_reset(force: bool, quiet: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults? The stored token will be removed.")
            .default(false)
            .interact()?;

        if !confirmed {
            if !quiet {
                println!("Reset cancelled.");
            }
            return Ok(());
        }
    }

    save_config(&Config::default())?;

    if !quiet {
        println!(
            "{} Configuration reset to defaults",
            style("Success:").green().bold()
        );
    }

    Ok(())
}
