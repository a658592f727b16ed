//! pcs-admin CLI - Administer a Personal Cloud Server appliance
//!
//! This module contains the CLI implementation used by the binary.

mod commands;
mod output;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use console::style;
use pcs_admin_core::config::{self, validate_config};
use pcs_admin_core::{AdminClient, Config, HttpTransport, get_version, load_config_or_default};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Administer your Personal Cloud Server
#[derive(Parser)]
#[command(name = "pcs-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Administer your Personal Cloud Server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Appliance URL (overrides server_url and PCS_ADMIN_URL)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or run the appliance self-check
    SelfCheck(commands::SelfCheckArgs),
    /// Show or change the update channel
    Channel(commands::ChannelArgs),
    /// Show container image update status
    Images(commands::ImagesArgs),
    /// Show the appliance environment
    Env(commands::EnvArgs),
    /// Manage pcs-admin configuration
    Config(commands::ConfigArgs),
}

/// Admin client type used by all API commands
pub(crate) type Client = AdminClient<HttpTransport>;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("pcs_admin={default_level},pcs_admin_core={default_level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build an admin client from config
pub(crate) fn build_client(config: &Config) -> Result<Arc<Client>> {
    debug!(
        server = %config.server_url,
        authenticated = config.token.is_some(),
        "Building admin client"
    );
    let transport = HttpTransport::new(
        &config.server_url,
        config.token.clone(),
        config.request_timeout(),
    )?;
    Ok(Arc::new(AdminClient::new(transport)))
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let config_path = config::paths::get_config_path()
        .ok_or_else(|| anyhow!("Could not determine config path"))?;

    let mut config = match load_config_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {e}");
            eprintln!();
            eprintln!("  Config file: {}", style(config_path.display()).yellow());
            eprintln!();
            eprintln!(
                "  {} Fix the file or run: {}",
                style("Tip:").cyan(),
                style("pcs-admin config reset").green()
            );
            std::process::exit(1);
        }
    };
    if let Some(url) = cli.url.clone() {
        config.server_url = url;
    }

    if cli.verbose > 0 {
        eprintln!(
            "{} Config: {}",
            style("[info]").cyan(),
            config_path.display()
        );
        eprintln!("{} Server: {}", style("[info]").cyan(), config.server_url);
    }

    let command = match cli.command {
        None => {
            print_help_hint();
            return Ok(());
        }
        // Config commands must work even when the current config is invalid
        Some(Commands::Config(args)) => return commands::cmd_config(args, &config, cli.quiet),
        Some(command) => command,
    };

    match validate_config(&config) {
        Ok(warnings) => {
            if !cli.quiet {
                for warning in warnings {
                    eprintln!(
                        "{} {} ({})",
                        style("Warning:").yellow().bold(),
                        warning.message,
                        style(warning.fix_command).dim()
                    );
                }
            }
        }
        Err(error) => {
            return Err(anyhow!(
                "Invalid {}: {}\n\n  Fix: {}",
                error.field,
                error.message,
                error.fix_command
            ));
        }
    }

    let client = build_client(&config)?;
    let poll_interval = config.poll_interval();
    let rt = tokio::runtime::Runtime::new()?;
    match command {
        Commands::SelfCheck(args) => rt.block_on(commands::cmd_self_check(
            &args,
            &client,
            poll_interval,
            cli.quiet,
        )),
        Commands::Channel(args) => rt.block_on(commands::cmd_channel(
            &args,
            &client,
            poll_interval,
            cli.quiet,
        )),
        Commands::Images(args) => rt.block_on(commands::cmd_images(&args, &client, cli.quiet)),
        Commands::Env(args) => rt.block_on(commands::cmd_env(&args, &client, cli.quiet)),
        Commands::Config(args) => commands::cmd_config(args, &config, cli.quiet),
    }
}

fn print_help_hint() {
    println!(
        "{} {}",
        style("pcs-admin").cyan().bold(),
        style(get_version()).dim()
    );
    println!();
    println!("Run {} for available commands.", style("--help").green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_url_flag_parses_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pcs-admin",
            "self-check",
            "status",
            "--url",
            "https://pcs.example.com",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://pcs.example.com"));
        assert!(matches!(cli.command, Some(Commands::SelfCheck(_))));
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["pcs-admin", "-vv", "images"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
