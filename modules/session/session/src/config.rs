//! Configuration for the session module.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Module configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Backend origin the API paths are resolved against.
    pub base_url: String,

    /// Optional personal API key sent as a bearer token.
    ///
    /// Never serialized, so printing the effective configuration does not leak it.
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub auth_token: Option<SecretString>,

    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,

    /// Quiet window for team and organization switches, in milliseconds.
    pub switch_debounce_ms: u64,

    /// Full-page navigation target that terminates the server session.
    pub logout_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_owned(),
            auth_token: None,
            request_timeout_ms: 10_000,
            switch_debounce_ms: 10,
            logout_path: "/logout".to_owned(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn switch_debounce(&self) -> Duration {
        Duration::from_millis(self.switch_debounce_ms)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}
