//! Images command implementation
//!
//! Shows whether newer versions of the appliance's container images are
//! available.

use super::self_check::{api_failure, server_url};
use crate::Client;
use crate::output::CommandSpinner;
use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table};
use console::style;
use pcs_admin_core::{ComposeStatus, ImageStatus, api::short_digest};

/// Arguments for the images command
#[derive(Args)]
pub struct ImagesArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,
}

pub async fn cmd_images(args: &ImagesArgs, client: &Client, quiet: bool) -> Result<()> {
    let spinner = CommandSpinner::new_maybe("Checking image updates...", quiet || args.json);
    let status = match client.compose_status().await {
        Ok(status) => status,
        Err(e) => {
            spinner.fail("Image check failed");
            return Err(api_failure(&e, server_url(client)));
        }
    };
    spinner.success(&summary(&status));
    drop(spinner);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    if let Some(error) = &status.error {
        println!("{} {}", style("Warning:").yellow().bold(), error);
    }
    if status.images.is_empty() {
        println!("No images reported.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Image", "Current", "Available", "Status"]);
    for image in &status.images {
        table.add_row(vec![
            Cell::new(&image.image),
            Cell::new(digest_cell(image.current_digest.as_deref())),
            Cell::new(digest_cell(image.available_digest.as_deref())),
            status_cell(image),
        ]);
    }
    println!("{table}");
    println!();
    println!("Checked: {}", style(&status.timestamp).dim());
    Ok(())
}

fn summary(status: &ComposeStatus) -> String {
    let outdated = status.outdated().count();
    let mut line = match outdated {
        0 => format!("{} images up to date", status.total_images),
        n => format!("{n} of {} images have updates", status.total_images),
    };
    let failed = status.failed().count();
    if failed > 0 {
        line.push_str(&format!(", {failed} could not be checked"));
    }
    line
}

fn digest_cell(digest: Option<&str>) -> &str {
    digest.map(short_digest).unwrap_or("-")
}

fn status_cell(image: &ImageStatus) -> Cell {
    if let Some(error) = &image.error {
        return Cell::new(format!("error: {error}")).fg(Color::Red);
    }
    if image.has_update {
        return Cell::new("update available").fg(Color::Yellow);
    }
    Cell::new(&image.status).fg(Color::Green)
}
