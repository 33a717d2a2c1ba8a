//! Feature flags as delivered by the analytics collaborator.

use session_sdk::FeatureFlags;
use tokio::sync::watch;
use tracing::debug;

/// Flag that mounts the support chat widget.
pub const CHAT_WIDGET_FLAG: &str = "papercups-enabled";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureFlagsState {
    /// At least one flag payload has arrived.
    pub received: bool,
    pub flags: FeatureFlags,
}

impl FeatureFlagsState {
    #[must_use]
    pub fn chat_widget_enabled(&self) -> bool {
        self.flags.is_enabled(CHAT_WIDGET_FLAG)
    }
}

/// Holder of the most recently received flags.
pub struct FeatureFlagsStore {
    state: watch::Sender<FeatureFlagsState>,
}

impl Default for FeatureFlagsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureFlagsStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(FeatureFlagsState::default()),
        }
    }

    /// Replace the flags with a fresh payload.
    pub fn receive(&self, flags: FeatureFlags) {
        debug!(count = flags.len(), "feature flags received");
        self.state.send_modify(|state| {
            state.received = true;
            state.flags = flags;
        });
    }

    #[must_use]
    pub fn state(&self) -> FeatureFlagsState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeatureFlagsState> {
        self.state.subscribe()
    }
}
