//! "Show the app" gate.
//!
//! The shell waits on three independent sources before rendering a scene.
//! Each source contributes one gate; the app is ready once every gate clears.

use session::SessionState;

use crate::flags::FeatureFlagsState;
use crate::latches::LatchState;
use crate::preflight::PreflightState;

/// Current-user gate: clears once the load settles or a user is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserGate {
    pub loading: bool,
    pub present: bool,
}

/// Feature-flag gate: clears when flags arrive or the wait times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagsGate {
    pub received: bool,
    pub timed_out: bool,
}

/// Preflight gate: clears once the check settles or a result is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreflightGate {
    pub loading: bool,
    pub present: bool,
}

impl UserGate {
    #[must_use]
    pub fn is_clear(self) -> bool {
        !self.loading || self.present
    }
}

impl FlagsGate {
    #[must_use]
    pub fn is_clear(self) -> bool {
        self.received || self.timed_out
    }
}

impl PreflightGate {
    #[must_use]
    pub fn is_clear(self) -> bool {
        !self.loading || self.present
    }
}

/// The upstream values the readiness decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadinessInputs {
    pub user: UserGate,
    pub flags: FlagsGate,
    pub preflight: PreflightGate,
}

impl ReadinessInputs {
    /// Collect the gates from the individual state holders.
    #[must_use]
    pub fn collect(
        session: &SessionState,
        flags: &FeatureFlagsState,
        latches: LatchState,
        preflight: &PreflightState,
    ) -> Self {
        Self {
            user: UserGate {
                loading: session.user_loading,
                present: session.user.is_some(),
            },
            flags: FlagsGate {
                received: flags.received,
                timed_out: latches.flags_timed_out,
            },
            preflight: PreflightGate {
                loading: preflight.loading,
                present: preflight.preflight.is_some(),
            },
        }
    }

    #[must_use]
    pub fn is_ready(self) -> bool {
        self.user.is_clear() && self.flags.is_clear() && self.preflight.is_clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_clear() -> ReadinessInputs {
        ReadinessInputs {
            user: UserGate {
                loading: false,
                present: true,
            },
            flags: FlagsGate {
                received: true,
                timed_out: false,
            },
            preflight: PreflightGate {
                loading: false,
                present: true,
            },
        }
    }

    #[test]
    fn ready_once_every_gate_clears() {
        assert!(all_clear().is_ready());
    }

    #[test]
    fn pending_preflight_blocks_regardless_of_other_gates() {
        for user_loading in [false, true] {
            for user_present in [false, true] {
                for received in [false, true] {
                    for timed_out in [false, true] {
                        let inputs = ReadinessInputs {
                            user: UserGate {
                                loading: user_loading,
                                present: user_present,
                            },
                            flags: FlagsGate {
                                received,
                                timed_out,
                            },
                            preflight: PreflightGate {
                                loading: true,
                                present: false,
                            },
                        };
                        assert!(!inputs.is_ready(), "{inputs:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn known_values_clear_their_gate_while_reloading() {
        let mut inputs = all_clear();
        inputs.user.loading = true;
        inputs.preflight.loading = true;
        assert!(inputs.is_ready());

        inputs.user.present = false;
        assert!(!inputs.is_ready());
    }

    #[test]
    fn flags_timeout_substitutes_for_flags() {
        let mut inputs = all_clear();
        inputs.flags.received = false;
        assert!(!inputs.is_ready());

        inputs.flags.timed_out = true;
        assert!(inputs.is_ready());
    }

    #[test]
    fn anonymous_visitor_is_ready_once_load_settles() {
        let mut inputs = all_clear();
        inputs.user = UserGate {
            loading: false,
            present: false,
        };
        assert!(inputs.is_ready());
    }
}
