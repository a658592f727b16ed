//! CLI command implementations
//!
//! This module contains the implementations for the admin API commands.

mod channel;
mod config;
mod env;
mod images;
mod self_check;

pub use channel::{ChannelArgs, cmd_channel};
pub use config::{ConfigArgs, cmd_config};
pub use env::{EnvArgs, cmd_env};
pub use images::{ImagesArgs, cmd_images};
pub use self_check::{SelfCheckArgs, cmd_self_check};
