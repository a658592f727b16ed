//! Config file locations
//!
//! Uses the platform config directory unless `PCS_ADMIN_CONFIG_DIR` is set.

use directories::BaseDirs;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "PCS_ADMIN_CONFIG_DIR";

const APP_DIR_NAME: &str = "pcs-admin";
const CONFIG_FILE_NAME: &str = "config.json";

/// Directory holding pcs-admin configuration
pub fn get_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR_NAME))
}

/// Full path of the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
