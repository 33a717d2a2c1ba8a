//! One-time deployment status check.

use session_sdk::{Preflight, SessionApi};
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreflightState {
    pub loading: bool,
    pub preflight: Option<Preflight>,
}

/// Holder of the preflight result.
pub struct PreflightStore {
    state: watch::Sender<PreflightState>,
}

impl Default for PreflightStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreflightStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(PreflightState::default()),
        }
    }

    /// Mark the check as in flight before the request is spawned.
    pub fn begin(&self) {
        self.state.send_modify(|state| state.loading = true);
    }

    /// Run the check. A failure leaves the result absent.
    pub async fn load(&self, api: &dyn SessionApi) {
        self.begin();
        let result = api.get_preflight().await;
        self.state.send_modify(|state| {
            state.loading = false;
            match result {
                Ok(preflight) => {
                    info!(
                        cloud = preflight.cloud,
                        initiated = preflight.initiated,
                        "preflight loaded"
                    );
                    state.preflight = Some(preflight);
                }
                Err(err) => warn!(error = %err, "preflight check failed"),
            }
        });
    }

    #[must_use]
    pub fn state(&self) -> PreflightState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PreflightState> {
        self.state.subscribe()
    }
}
