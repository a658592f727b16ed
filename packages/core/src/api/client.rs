//! Typed admin API client
//!
//! Each method performs exactly one round trip and decodes the body.
//! Retry policy belongs to callers.

use super::{AdminTransport, ApiError, ComposeStatus, EnvironmentInfo};
use crate::self_check::StatusSnapshot;
use crate::update_channel::UpdateChannelConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

pub const SELF_CHECK_STATUS_PATH: &str = "/api/admin/self-check-status";
pub const SELF_CHECK_RUN_PATH: &str = "/api/admin/self-check-run";
pub const UPDATE_CHANNEL_PATH: &str = "/api/admin/update-channel";
pub const COMPOSE_STATUS_PATH: &str = "/api/admin/docker-compose-status";
pub const ENVIRONMENT_PATH: &str = "/api/admin/get-environment";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateChannelResponse {
    #[serde(default)]
    update_url: Option<String>,
}

/// Admin API client over any transport
#[derive(Debug, Clone)]
pub struct AdminClient<T> {
    transport: T,
}

impl<T: AdminTransport> AdminClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the current self-check snapshot
    pub async fn fetch_self_check_status(&self) -> Result<StatusSnapshot, ApiError> {
        let body = self.transport.get(SELF_CHECK_STATUS_PATH).await?;
        let snapshot: StatusSnapshot = decode(&body, "self-check status")?;
        debug!(
            running = snapshot.is_running,
            scripts = snapshot.scripts.len(),
            "Fetched self-check status"
        );
        Ok(snapshot)
    }

    /// Ask the backend to start a self-check run
    pub async fn start_self_check(&self) -> Result<(), ApiError> {
        self.transport.post(SELF_CHECK_RUN_PATH, None).await?;
        Ok(())
    }

    /// Read the persisted update URL and infer the channel from it
    pub async fn get_update_channel(&self) -> Result<UpdateChannelConfig, ApiError> {
        let body = self.transport.get(UPDATE_CHANNEL_PATH).await?;
        let response: UpdateChannelResponse = decode(&body, "update channel")?;
        Ok(UpdateChannelConfig::infer(response.update_url.as_deref()))
    }

    /// Persist a raw update URL
    pub async fn set_update_url(&self, url: &str) -> Result<(), ApiError> {
        self.transport
            .post(UPDATE_CHANNEL_PATH, Some(json!({ "updateUrl": url })))
            .await?;
        Ok(())
    }

    /// Compare running image digests against the registry
    pub async fn compose_status(&self) -> Result<ComposeStatus, ApiError> {
        let body = self.transport.get(COMPOSE_STATUS_PATH).await?;
        decode(&body, "docker compose status")
    }

    /// Read the appliance environment
    pub async fn environment(&self) -> Result<EnvironmentInfo, ApiError> {
        let body = self.transport.get(ENVIRONMENT_PATH).await?;
        let info: EnvironmentInfo = decode(&body, "environment")?;
        if !info.is_success() {
            return Err(ApiError::Rejected(format!(
                "environment request returned status '{}'",
                info.status
            )));
        }
        Ok(info)
    }
}

fn decode<R: DeserializeOwned>(body: &str, what: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(format!("Invalid {what} body: {e}")))
}
