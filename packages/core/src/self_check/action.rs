//! One-shot admin actions
//!
//! The trigger is stateless: overlapping invocations are the caller's
//! concern (see `SelfCheckView`).

use super::StatusSnapshot;
use crate::api::{AdminClient, AdminTransport, ApiError};
use crate::update_channel::UpdateChannelConfig;
use tracing::{info, warn};

/// A user-initiated operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RunSelfCheck,
    SaveUpdateChannel(UpdateChannelConfig),
}

/// Result of the follow-up chained after a successful primary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub refreshed: Result<StatusSnapshot, ApiError>,
}

/// Run an action and its follow-up.
///
/// A failed primary request is returned as `Err` and nothing else is sent.
/// Once the primary request succeeds, exactly one status fetch follows
/// (a channel save first starts a self-check run), and its result is
/// returned in `ActionOutcome::refreshed`.
pub async fn run_action<T: AdminTransport>(
    client: &AdminClient<T>,
    action: &Action,
) -> Result<ActionOutcome, ApiError> {
    match action {
        Action::RunSelfCheck => {
            client.start_self_check().await?;
            info!("Self-check run requested");
        }
        Action::SaveUpdateChannel(config) => {
            let url = config.to_url()?;
            client.set_update_url(&url).await?;
            info!(channel = %config.channel, "Update channel saved");

            if let Err(e) = client.start_self_check().await {
                warn!(error = %e, "Self-check run after channel save failed");
                return Ok(ActionOutcome { refreshed: Err(e) });
            }
        }
    }

    Ok(ActionOutcome {
        refreshed: client.fetch_self_check_status().await,
    })
}
