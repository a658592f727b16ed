//! Configuration validation with actionable error messages
//!
//! Validates the configuration and provides exact commands to fix issues.

use super::schema::Config;

/// Poll intervals below this put needless load on the appliance
const MIN_RECOMMENDED_POLL_MS: u64 = 500;

/// A configuration validation error with an actionable fix command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The config field that has an error
    pub field: String,
    /// Description of what's wrong
    pub message: String,
    /// Exact pcs-admin command to fix the issue
    pub fix_command: String,
}

/// A configuration validation warning (non-fatal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The config field with a potential issue
    pub field: String,
    /// Description of the warning
    pub message: String,
    /// Suggested pcs-admin command to address the warning
    pub fix_command: String,
}

/// Validate configuration and return warnings or first error
///
/// Returns Ok(warnings) if validation passes (possibly with non-fatal warnings).
/// Returns Err(error) on the first fatal validation error encountered.
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>, ValidationError> {
    let mut warnings = Vec::new();

    let url = config.server_url.trim();
    let Some(host) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .filter(|rest| !rest.is_empty())
    else {
        return Err(ValidationError {
            field: "server_url".to_string(),
            message: "server_url must start with http:// or https://".to_string(),
            fix_command: "pcs-admin config set server_url https://pcs.example.com".to_string(),
        });
    };

    if config.poll_interval_ms == 0 {
        return Err(ValidationError {
            field: "poll_interval_ms".to_string(),
            message: "poll_interval_ms must be > 0".to_string(),
            fix_command: "pcs-admin config set poll_interval_ms 2000".to_string(),
        });
    }

    if config.request_timeout_secs == 0 {
        return Err(ValidationError {
            field: "request_timeout_secs".to_string(),
            message: "request_timeout_secs must be > 0".to_string(),
            fix_command: "pcs-admin config set request_timeout_secs 10".to_string(),
        });
    }

    if url.starts_with("http://") && config.token.is_some() && !is_loopback_host(host) {
        warnings.push(ValidationWarning {
            field: "server_url".to_string(),
            message: "Session token is sent over plain HTTP to a remote host".to_string(),
            fix_command: format!(
                "pcs-admin config set server_url {}",
                url.replacen("http://", "https://", 1)
            ),
        });
    }

    if config.poll_interval_ms < MIN_RECOMMENDED_POLL_MS {
        warnings.push(ValidationWarning {
            field: "poll_interval_ms".to_string(),
            message: format!(
                "Polling every {}ms is aggressive; {MIN_RECOMMENDED_POLL_MS}ms or more is recommended",
                config.poll_interval_ms
            ),
            fix_command: "pcs-admin config set poll_interval_ms 2000".to_string(),
        });
    }

    Ok(warnings)
}

fn is_loopback_host(host_and_path: &str) -> bool {
    let host = host_and_path
        .split(['/', '?'])
        .next()
        .unwrap_or_default();
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}
