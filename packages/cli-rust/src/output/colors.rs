//! Color utilities for CLI output
//!
//! Provides consistent color styling for self-check states and script
//! outcomes.

use console::{Style, StyledObject};
use pcs_admin_core::{DisplayState, ScriptOutcome};

/// Style a self-check display state with its label
///
/// - passed -> green bold
/// - failed, error -> red
/// - running, partial -> yellow
/// - other -> dim
pub fn display_state_style(state: &DisplayState) -> StyledObject<&'static str> {
    let style = match state {
        DisplayState::SettledSuccess => Style::new().green().bold(),
        DisplayState::SettledFailure | DisplayState::Error(_) => Style::new().red(),
        DisplayState::Running | DisplayState::SettledPartial => Style::new().yellow(),
        DisplayState::NoData | DisplayState::SettledNeverRun => Style::new().dim(),
    };
    style.apply_to(state.label())
}

/// Check mark or cross for a script outcome
pub fn outcome_style(outcome: ScriptOutcome) -> StyledObject<&'static str> {
    match outcome {
        ScriptOutcome::Pass => Style::new().green().apply_to("✓"),
        ScriptOutcome::Fail => Style::new().red().apply_to("✗"),
    }
}
