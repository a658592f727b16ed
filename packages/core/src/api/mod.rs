//! Admin API module
//!
//! This module provides access to the appliance's admin endpoints:
//! - Transport abstraction with a reqwest-backed implementation
//! - API error types
//! - Typed client for self-check, update channel, compose and environment
//!   endpoints

mod client;
mod compose;
mod environment;
mod error;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use client::{
    AdminClient, COMPOSE_STATUS_PATH, ENVIRONMENT_PATH, SELF_CHECK_RUN_PATH,
    SELF_CHECK_STATUS_PATH, UPDATE_CHANNEL_PATH,
};
pub use compose::{ComposeStatus, ImageStatus, short_digest};
pub use environment::{EnvironmentData, EnvironmentInfo};
pub use error::ApiError;
pub use transport::{AdminTransport, HttpTransport};
