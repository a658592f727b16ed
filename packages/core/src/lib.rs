//! pcs-admin-core - Core library for pcs-admin
//!
//! This library provides shared functionality for the admin CLI:
//! - Typed client for the Personal Cloud Server admin API
//! - Self-check status polling, actions and presentation
//! - Update channel inference
//! - Configuration management

pub mod api;
pub mod config;
pub mod self_check;
pub mod update_channel;

pub use api::{
    AdminClient, AdminTransport, ApiError, ComposeStatus, EnvironmentData, EnvironmentInfo,
    HttpTransport, ImageStatus,
};
pub use config::{Config, ConfigError, load_config_or_default, save_config};
pub use self_check::{
    Action, ActionOutcome, DisplayState, OverallStatus, PollPhase, PollScheduler, Presentation,
    ScriptOutcome, ScriptResult, ScriptRow, SelfCheckView, StatusSnapshot, ViewError, ViewState,
    present, run_action,
};
pub use update_channel::{ChannelKind, DEV_CHANNEL_URL, UpdateChannelConfig};

/// Get the version of the core library
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version_returns_valid_version() {
        let version = get_version();
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert_eq!(parts.len(), 3);
    }
}
