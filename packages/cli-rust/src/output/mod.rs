//! Output utilities for CLI commands
//!
//! This module provides terminal output helpers including spinners
//! with elapsed time display for long-running requests, color utilities
//! for consistent self-check state styling, and actionable error text.

pub mod colors;
pub mod errors;
pub mod spinner;

pub use colors::{display_state_style, outcome_style};
pub use errors::format_api_error;
pub use spinner::CommandSpinner;

const LABEL_WIDTH: usize = 15;

/// Format a `Label:  value` line with aligned values
pub fn format_kv(label: &str, value: impl std::fmt::Display) -> String {
    format!("{label:<LABEL_WIDTH$} {value}")
}
