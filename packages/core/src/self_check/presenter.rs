//! Snapshot to display-state mapping
//!
//! Pure functions; no network access and no mutation of the snapshot.

use super::{OverallStatus, StatusSnapshot};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// What the self-check panel should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    NoData,
    Error(String),
    Running,
    SettledSuccess,
    SettledFailure,
    SettledPartial,
    SettledNeverRun,
}

impl DisplayState {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayState::NoData => "no data",
            DisplayState::Error(_) => "error",
            DisplayState::Running => "running",
            DisplayState::SettledSuccess => "passed",
            DisplayState::SettledFailure => "failed",
            DisplayState::SettledPartial => "partial",
            DisplayState::SettledNeverRun => "never run",
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            DisplayState::SettledSuccess
                | DisplayState::SettledFailure
                | DisplayState::SettledPartial
                | DisplayState::SettledNeverRun
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    Pass,
    Fail,
}

/// One line of the per-script table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRow {
    pub name: String,
    pub outcome: ScriptOutcome,
    pub message: String,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub state: DisplayState,
    pub scripts: Vec<ScriptRow>,
    pub last_run: Option<DateTime<Utc>>,
    pub connection_error: Option<String>,
    /// Whether a new run may be started from this view
    pub can_run: bool,
}

pub fn display_state(snapshot: Option<&StatusSnapshot>, error: Option<&str>) -> DisplayState {
    if let Some(message) = error {
        return DisplayState::Error(message.to_string());
    }
    let Some(snapshot) = snapshot else {
        return DisplayState::NoData;
    };
    if snapshot.is_running {
        return DisplayState::Running;
    }
    match snapshot.overall_status {
        OverallStatus::Success => DisplayState::SettledSuccess,
        OverallStatus::Failure => DisplayState::SettledFailure,
        OverallStatus::Partial => DisplayState::SettledPartial,
        OverallStatus::NeverRun => DisplayState::SettledNeverRun,
    }
}

/// Rows in script order; each row depends only on its own result
pub fn script_rows(snapshot: &StatusSnapshot) -> Vec<ScriptRow> {
    snapshot
        .scripts
        .iter()
        .map(|(name, result)| ScriptRow {
            name: name.clone(),
            outcome: if result.success {
                ScriptOutcome::Pass
            } else {
                ScriptOutcome::Fail
            },
            message: result.message.clone(),
            duration: result.duration.map(Duration::from_millis),
        })
        .collect()
}

pub fn present(snapshot: Option<&StatusSnapshot>, busy: bool, error: Option<&str>) -> Presentation {
    let running = snapshot.is_some_and(|s| s.is_running);
    Presentation {
        state: display_state(snapshot, error),
        scripts: snapshot.map(script_rows).unwrap_or_default(),
        last_run: snapshot.and_then(|s| s.last_run),
        connection_error: snapshot.and_then(|s| s.connection_error.clone()),
        can_run: !busy && !running,
    }
}
