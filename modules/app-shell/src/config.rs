//! Configuration for the application shell.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Delay before a loading spinner may appear, in milliseconds.
    pub spinner_delay_ms: u64,

    /// How long to wait for feature flags before proceeding without them, in milliseconds.
    pub flags_timeout_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            spinner_delay_ms: 1_000,
            flags_timeout_ms: 3_000,
        }
    }
}

impl ShellConfig {
    #[must_use]
    pub fn spinner_delay(&self) -> Duration {
        Duration::from_millis(self.spinner_delay_ms)
    }

    #[must_use]
    pub fn flags_timeout(&self) -> Duration {
        Duration::from_millis(self.flags_timeout_ms)
    }
}
