//! Self-check status lifecycle
//!
//! This module provides:
//! - The status snapshot decoded from the backend
//! - Fixed-cadence poll scheduling
//! - One-shot actions with chained status refresh
//! - Pure presentation of a snapshot
//! - The view that ties them together for one consumer

mod action;
mod presenter;
mod scheduler;
mod snapshot;
mod view;

pub use action::{Action, ActionOutcome, run_action};
pub use presenter::{
    DisplayState, Presentation, ScriptOutcome, ScriptRow, display_state, present, script_rows,
};
pub use scheduler::{DEFAULT_POLL_INTERVAL, PollPhase, PollScheduler};
pub use snapshot::{OverallStatus, ScriptResult, StatusSnapshot};
pub use view::{SelfCheckView, ViewError, ViewState};
