//! Self-check status snapshot
//!
//! A snapshot is only ever created by decoding a status response and is
//! replaced wholesale on every successful fetch.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate result of the last self-check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Success,
    Failure,
    Partial,
    NeverRun,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverallStatus::Success => "success",
            OverallStatus::Failure => "failure",
            OverallStatus::Partial => "partial",
            OverallStatus::NeverRun => "never run",
        };
        f.write_str(label)
    }
}

/// Outcome of one named check script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub success: bool,
    pub message: String,
    /// Run time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Last known health state reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub overall_status: OverallStatus,
    pub is_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_error: Option<String>,
    /// Insertion order is display order
    #[serde(default)]
    pub scripts: IndexMap<String, ScriptResult>,
}
