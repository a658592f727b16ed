//! Self-check command implementation
//!
//! `status` fetches once, `run` starts a run and follows it, `watch`
//! follows whatever is in progress until it settles.

use crate::Client;
use crate::output::{
    CommandSpinner, display_state_style, format_api_error, format_kv, outcome_style,
};
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use console::style;
use pcs_admin_core::{
    Action, ApiError, DisplayState, PollPhase, Presentation, SelfCheckView, ViewError, ViewState,
    present,
};
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the self-check command
#[derive(Args)]
pub struct SelfCheckArgs {
    #[command(subcommand)]
    command: SelfCheckCommands,
}

#[derive(Subcommand)]
enum SelfCheckCommands {
    /// Show the result of the last self-check
    Status {
        /// Output the raw status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a self-check run
    Run {
        /// Return once the run is started instead of following it
        #[arg(long)]
        no_watch: bool,
    },
    /// Follow a running self-check until it finishes
    Watch,
}

pub async fn cmd_self_check(
    args: &SelfCheckArgs,
    client: &Arc<Client>,
    poll_interval: Duration,
    quiet: bool,
) -> Result<()> {
    match args.command {
        SelfCheckCommands::Status { json } => show_status(client, json, quiet).await,
        SelfCheckCommands::Run { no_watch } => {
            run_in_view(client, poll_interval, Action::RunSelfCheck, no_watch, quiet).await
        }
        SelfCheckCommands::Watch => {
            let view = SelfCheckView::mount(Arc::clone(client), poll_interval);
            let result = follow(&view, server_url(client), quiet).await;
            view.close();
            result
        }
    }
}

async fn show_status(client: &Client, json: bool, quiet: bool) -> Result<()> {
    let snapshot = client
        .fetch_self_check_status()
        .await
        .map_err(|e| api_failure(&e, server_url(client)))?;
    let presentation = present(Some(&snapshot), false, None);

    if quiet {
        // Exit code reflects the outcome for scripting
        if presentation.state == DisplayState::SettledSuccess {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    render_presentation(&presentation, Utc::now());
    Ok(())
}

/// Mount a view, trigger `action` through it and follow the run
pub(crate) async fn run_in_view(
    client: &Arc<Client>,
    poll_interval: Duration,
    action: Action,
    no_watch: bool,
    quiet: bool,
) -> Result<()> {
    let url = server_url(client);
    let view = SelfCheckView::mount(Arc::clone(client), poll_interval);

    let (started, done) = action_messages(&action);
    let spinner = CommandSpinner::new_maybe(started, quiet);
    let outcome = match view.run(action).await {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.fail("Request failed");
            return Err(view_failure(e, url));
        }
    };

    let snapshot = match outcome.refreshed {
        Ok(snapshot) => snapshot,
        Err(e) => {
            spinner.fail("Could not refresh status");
            return Err(api_failure(&e, url));
        }
    };
    spinner.success(done);

    if no_watch || PollPhase::of(Some(&snapshot)) != PollPhase::Watching {
        if !quiet {
            println!();
            render_presentation(&present(Some(&snapshot), false, None), Utc::now());
        }
        return Ok(());
    }

    let result = follow(&view, url, quiet).await;
    view.close();
    result
}

fn action_messages(action: &Action) -> (&'static str, &'static str) {
    match action {
        Action::RunSelfCheck => ("Starting self-check...", "Self-check started"),
        Action::SaveUpdateChannel(_) => ("Saving update channel...", "Update channel saved"),
    }
}

/// Print state changes until the view settles or Ctrl+C is pressed
async fn follow(view: &SelfCheckView, url: &str, quiet: bool) -> Result<()> {
    let mut updates = view.subscribe();
    let spinner = CommandSpinner::new_maybe("Waiting for self-check status...", quiet);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let state = updates.borrow_and_update().clone();
        match watch_step(&state) {
            WatchStep::Wait(message) => spinner.update(&message),
            WatchStep::Failed(e) => {
                spinner.fail("Self-check status unavailable");
                return Err(api_failure(&e, url));
            }
            WatchStep::Settled(presentation) => {
                let label = presentation.state.label();
                if presentation.state == DisplayState::SettledSuccess {
                    spinner.success("Self-check passed");
                } else {
                    spinner.fail(&format!("Self-check {label}"));
                }
                if !quiet {
                    println!();
                    render_presentation(&presentation, Utc::now());
                }
                if presentation.state == DisplayState::SettledFailure
                    || presentation.state == DisplayState::SettledPartial
                {
                    bail!("Self-check finished with status: {label}");
                }
                return Ok(());
            }
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    spinner.fail("Stopped");
                    bail!("Self-check view closed unexpectedly");
                }
            }
            _ = &mut ctrl_c => {
                spinner.fail("Stopped watching");
                return Ok(());
            }
        }
    }
}

#[derive(Debug)]
enum WatchStep {
    Wait(String),
    Failed(ApiError),
    Settled(Presentation),
}

fn watch_step(state: &ViewState) -> WatchStep {
    let phase = PollPhase::of(state.snapshot.as_ref());
    if let Some(error) = &state.error {
        // A failed poll is retried on the next tick while a run is in
        // progress; a rejected session never recovers on its own
        if phase != PollPhase::Watching || error.is_auth() {
            return WatchStep::Failed(error.clone());
        }
        return WatchStep::Wait(format!("Self-check running (retrying: {error})"));
    }

    match (&state.snapshot, phase) {
        (None, _) => WatchStep::Wait("Waiting for self-check status...".to_string()),
        (Some(snapshot), PollPhase::Watching) => WatchStep::Wait(format!(
            "Self-check running ({} scripts reported)",
            snapshot.scripts.len()
        )),
        _ if state.busy => WatchStep::Wait("Waiting for self-check status...".to_string()),
        (Some(_), _) => WatchStep::Settled(state.presentation()),
    }
}

fn render_presentation(presentation: &Presentation, now: DateTime<Utc>) {
    println!(
        "{}",
        format_kv("Self-check:", display_state_style(&presentation.state))
    );
    if let DisplayState::Error(message) = &presentation.state {
        println!("{}", format_kv("Error:", style(message).red()));
    }
    println!(
        "{}",
        format_kv("Last run:", format_last_run(presentation.last_run, now))
    );
    if let Some(connection) = &presentation.connection_error {
        println!("{}", format_kv("Connection:", style(connection).yellow()));
    }

    if presentation.scripts.is_empty() {
        return;
    }
    println!();
    let width = presentation
        .scripts
        .iter()
        .map(|row| row.name.len())
        .max()
        .unwrap_or_default();
    for row in &presentation.scripts {
        let duration = row
            .duration
            .map(|d| format!(" ({})", humantime::format_duration(d)))
            .unwrap_or_default();
        println!(
            "  {} {:<width$}  {}{}",
            outcome_style(row.outcome),
            row.name,
            row.message,
            style(duration).dim()
        );
    }
}

/// `2024-05-01 12:00:00 UTC (5m ago)`, or `never`
fn format_last_run(last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = last_run else {
        return "never".to_string();
    };
    let stamp = at.format("%Y-%m-%d %H:%M:%S UTC");
    match (now - at).to_std() {
        Ok(elapsed) => {
            let elapsed = Duration::from_secs(elapsed.as_secs());
            if elapsed.is_zero() {
                format!("{stamp} (just now)")
            } else {
                format!("{stamp} ({} ago)", humantime::format_duration(elapsed))
            }
        }
        Err(_) => stamp.to_string(),
    }
}

pub(crate) fn server_url(client: &Client) -> &str {
    client.transport().base_url()
}

pub(crate) fn api_failure(e: &ApiError, url: &str) -> anyhow::Error {
    anyhow!("{}", format_api_error(e, url))
}

fn view_failure(e: ViewError, url: &str) -> anyhow::Error {
    match e {
        ViewError::Api(e) => api_failure(&e, url),
        other => anyhow!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use indexmap::IndexMap;
    use pcs_admin_core::{OverallStatus, ScriptResult, StatusSnapshot};

    fn snapshot(status: OverallStatus, is_running: bool) -> StatusSnapshot {
        let mut scripts = IndexMap::new();
        scripts.insert(
            "disk".to_string(),
            ScriptResult {
                success: true,
                message: "ok".to_string(),
                duration: Some(120),
            },
        );
        StatusSnapshot {
            overall_status: status,
            is_running,
            last_run: None,
            connection_error: None,
            scripts,
        }
    }

    #[test]
    fn waits_before_first_fetch() {
        assert!(matches!(watch_step(&ViewState::default()), WatchStep::Wait(_)));
    }

    #[test]
    fn waits_while_running() {
        let state = ViewState {
            snapshot: Some(snapshot(OverallStatus::NeverRun, true)),
            ..ViewState::default()
        };
        let WatchStep::Wait(message) = watch_step(&state) else {
            panic!("expected wait");
        };
        assert!(message.contains("1 scripts"));
    }

    #[test]
    fn poll_error_while_running_keeps_waiting() {
        let state = ViewState {
            snapshot: Some(snapshot(OverallStatus::NeverRun, true)),
            busy: false,
            error: Some(ApiError::Network("timeout".to_string())),
        };
        assert!(matches!(watch_step(&state), WatchStep::Wait(_)));
    }

    #[test]
    fn auth_error_while_running_fails() {
        let state = ViewState {
            snapshot: Some(snapshot(OverallStatus::NeverRun, true)),
            busy: false,
            error: Some(ApiError::Auth("expired".to_string())),
        };
        assert!(matches!(watch_step(&state), WatchStep::Failed(ApiError::Auth(_))));
    }

    #[test]
    fn error_without_snapshot_fails() {
        let state = ViewState {
            error: Some(ApiError::Auth("expired".to_string())),
            ..ViewState::default()
        };
        assert!(matches!(watch_step(&state), WatchStep::Failed(ApiError::Auth(_))));
    }

    #[test]
    fn settled_snapshot_finishes() {
        let state = ViewState {
            snapshot: Some(snapshot(OverallStatus::Success, false)),
            ..ViewState::default()
        };
        let WatchStep::Settled(presentation) = watch_step(&state) else {
            panic!("expected settled");
        };
        assert_eq!(presentation.state, DisplayState::SettledSuccess);
    }

    #[test]
    fn busy_view_is_not_settled_yet() {
        let state = ViewState {
            snapshot: Some(snapshot(OverallStatus::Success, false)),
            busy: true,
            error: None,
        };
        assert!(matches!(watch_step(&state), WatchStep::Wait(_)));
    }

    #[test]
    fn last_run_formatting() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_last_run(None, now), "never");
        assert_eq!(
            format_last_run(Some(at), now),
            "2024-05-01 12:00:00 UTC (5m ago)"
        );
        assert_eq!(
            format_last_run(Some(now), now),
            "2024-05-01 12:05:00 UTC (just now)"
        );
        assert_eq!(format_last_run(Some(now), at), "2024-05-01 12:05:00 UTC");
    }
}
