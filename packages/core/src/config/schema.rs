//! Configuration schema for pcs-admin
//!
//! Defines the structure and defaults for the config.json file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for pcs-admin
///
/// Serialized to/from `~/.config/pcs-admin/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// Base URL of the appliance (default: "http://localhost:8080")
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Bearer token for the admin session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Milliseconds between status polls while a self-check runs (default: 2000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            server_url: default_server_url(),
            token: None,
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
