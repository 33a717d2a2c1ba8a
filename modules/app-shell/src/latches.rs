//! One-shot timers started when the shell mounts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Values latched by the mount timers. Each starts `false`, flips to `true`
/// once and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatchState {
    /// Loading indicator may be shown; avoids flashing it for short waits.
    pub spinner_visible: bool,
    /// Stopped waiting for feature flags.
    pub flags_timed_out: bool,
}

/// Owner of the mount timers.
///
/// Dropping it cancels any timer that has not fired yet.
pub struct MountLatches {
    state: Arc<watch::Sender<LatchState>>,
    _timers: DropGuard,
}

impl MountLatches {
    /// Start both timers. Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(spinner_delay: Duration, flags_timeout: Duration) -> Self {
        let state = Arc::new(watch::Sender::new(LatchState::default()));
        let cancel = CancellationToken::new();

        spawn_latch(
            Arc::clone(&state),
            cancel.clone(),
            spinner_delay,
            "spinner_visible",
            |latches| latches.spinner_visible = true,
        );
        spawn_latch(
            Arc::clone(&state),
            cancel.clone(),
            flags_timeout,
            "flags_timed_out",
            |latches| latches.flags_timed_out = true,
        );

        Self {
            state,
            _timers: cancel.drop_guard(),
        }
    }

    #[must_use]
    pub fn state(&self) -> LatchState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LatchState> {
        self.state.subscribe()
    }
}

fn spawn_latch(
    state: Arc<watch::Sender<LatchState>>,
    cancel: CancellationToken,
    delay: Duration,
    name: &'static str,
    set: fn(&mut LatchState),
) {
    tokio::spawn(async move {
        tokio::select! {
            () = cancel.cancelled() => {}
            () = tokio::time::sleep(delay) => {
                debug!(latch = name, "mount latch set");
                state.send_modify(set);
            }
        }
    });
}
