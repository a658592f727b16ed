//! Update channel selection
//!
//! The backend stores a single update URL. The channel is inferred from
//! that string by exact match against known sentinels, and converted back
//! when saving.

use crate::api::ApiError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source archive used by the dev channel
pub const DEV_CHANNEL_URL: &str =
    "https://github.com/Yundera/template-root/archive/refs/heads/main.zip";

/// Sentinel stored for the local channel
pub const LOCAL_CHANNEL_VALUE: &str = "local";

/// Label shown for the stable channel's empty URL
pub const STABLE_DISPLAY_URL: &str = "Default (no value)";

/// Update channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Stable,
    Dev,
    Local,
    Custom,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Stable => "stable",
            ChannelKind::Dev => "dev",
            ChannelKind::Local => "local",
            ChannelKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Channel selection as presented to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateChannelConfig {
    pub channel: ChannelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

impl UpdateChannelConfig {
    pub fn new(channel: ChannelKind) -> Self {
        Self {
            channel,
            custom_url: None,
        }
    }

    pub fn custom(url: impl Into<String>) -> Self {
        Self {
            channel: ChannelKind::Custom,
            custom_url: Some(url.into()),
        }
    }

    /// Infer the channel from the stored URL (exact string match)
    pub fn infer(stored: Option<&str>) -> Self {
        match stored.unwrap_or("") {
            "" => Self::new(ChannelKind::Stable),
            LOCAL_CHANNEL_VALUE => Self::new(ChannelKind::Local),
            DEV_CHANNEL_URL => Self::new(ChannelKind::Dev),
            other => Self::custom(other),
        }
    }

    /// URL to persist for this selection
    ///
    /// Fails with a validation error when a custom channel has no URL.
    pub fn to_url(&self) -> Result<String, ApiError> {
        match self.channel {
            ChannelKind::Stable => Ok(String::new()),
            ChannelKind::Local => Ok(LOCAL_CHANNEL_VALUE.to_string()),
            ChannelKind::Dev => Ok(DEV_CHANNEL_URL.to_string()),
            ChannelKind::Custom => match self.custom_url.as_deref() {
                Some(url) if !url.trim().is_empty() => Ok(url.to_string()),
                _ => Err(ApiError::Validation(
                    "A custom update URL is required for the custom channel".to_string(),
                )),
            },
        }
    }

    /// URL as shown next to the channel
    pub fn display_url(&self) -> String {
        match self.channel {
            ChannelKind::Stable => STABLE_DISPLAY_URL.to_string(),
            ChannelKind::Local => LOCAL_CHANNEL_VALUE.to_string(),
            ChannelKind::Dev => DEV_CHANNEL_URL.to_string(),
            ChannelKind::Custom => self.custom_url.clone().unwrap_or_default(),
        }
    }
}
