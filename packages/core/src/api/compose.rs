//! Docker Compose image update status
//!
//! The backend compares the digest of every image referenced by the
//! appliance's compose file against the registry and reports the result.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/admin/docker-compose-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeStatus {
    pub timestamp: String,
    #[serde(default)]
    pub images: Vec<ImageStatus>,
    #[serde(default)]
    pub total_images: usize,
    #[serde(default)]
    pub has_updates: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Digest comparison for a single image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatus {
    pub image: String,
    #[serde(default)]
    pub current_digest: Option<String>,
    #[serde(default)]
    pub available_digest: Option<String>,
    #[serde(default)]
    pub has_update: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComposeStatus {
    /// Images with a newer digest available
    pub fn outdated(&self) -> impl Iterator<Item = &ImageStatus> {
        self.images.iter().filter(|image| image.has_update)
    }

    /// Images the backend could not check
    pub fn failed(&self) -> impl Iterator<Item = &ImageStatus> {
        self.images.iter().filter(|image| image.error.is_some())
    }
}

/// Shorten a digest for display: `sha256:0123456789abcdef...` -> `0123456789ab`
pub fn short_digest(digest: &str) -> &str {
    let hex = digest
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(digest);
    match hex.char_indices().nth(12) {
        Some((end, _)) => &hex[..end],
        None => hex,
    }
}
