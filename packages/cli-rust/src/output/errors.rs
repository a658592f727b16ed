//! Centralized admin API error formatting
//!
//! This module provides consistent, actionable error messages for admin
//! API errors across all CLI commands.

use console::style;
use pcs_admin_core::ApiError;

/// Format admin API errors with actionable guidance
///
/// Returns a styled, multi-line error message with a next step where one
/// exists.
pub fn format_api_error(e: &ApiError, server_url: &str) -> String {
    match e {
        ApiError::Auth(msg) => {
            format!(
                "{}\n\n  {}\n\n  {}\n  {}",
                style("Authentication required").red().bold(),
                msg,
                "Store a valid session token:",
                style("  pcs-admin config set token <TOKEN>").cyan()
            )
        }
        ApiError::Network(msg) => {
            format!(
                "{}\n\n  {}\n\n  {}\n  {}",
                style(format!("Cannot reach {server_url}")).red().bold(),
                msg,
                "Check that the appliance is up, or point pcs-admin elsewhere:",
                style("  pcs-admin config set server_url <URL>").cyan()
            )
        }
        ApiError::Http { status, message } if *status >= 500 => {
            format!(
                "{}\n\n  {}\n\n  {}",
                style(format!("Server error (HTTP {status})")).red().bold(),
                message,
                style("The appliance reported an internal error; retry shortly.").dim()
            )
        }
        ApiError::Parse(msg) => {
            format!(
                "{}\n\n  {}\n\n  {}",
                style("Unexpected response from the appliance").red().bold(),
                msg,
                style("The appliance may be running an incompatible version.").dim()
            )
        }
        _ => format!("{}", style(e.to_string()).red().bold()),
    }
}
