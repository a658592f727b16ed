//! Appliance environment information

use serde::{Deserialize, Serialize};

/// Response of `GET /api/admin/get-environment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub status: String,
    #[serde(default)]
    pub data: EnvironmentData,
}

/// Environment variables exposed by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EnvironmentData {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default, rename = "PROVIDER_STR")]
    pub provider: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, rename = "DEFAULT_PWD")]
    pub default_password: Option<String>,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub default_user: Option<String>,
}

impl EnvironmentInfo {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

impl EnvironmentData {
    /// Labeled entries in display order; the password is masked unless `reveal`
    pub fn entries(&self, reveal: bool) -> Vec<(&'static str, String)> {
        let show = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or("(not set)")
                .to_string()
        };
        let password = match self.default_password.as_deref() {
            None | Some("") => "(not set)".to_string(),
            Some(pwd) if reveal => pwd.to_string(),
            Some(_) => "********".to_string(),
        };

        vec![
            ("Domain", show(&self.domain)),
            ("Provider", show(&self.provider)),
            ("UID", show(&self.uid)),
            ("Public IP", show(&self.public_ip)),
            ("Default user", show(&self.default_user)),
            ("Default password", password),
        ]
    }
}
