//! Session module
//!
//! Owns the current-user record for the console and the operations that load
//! and mutate it:
//!
//! - [`SessionStore`] - observable user state with load, update, context
//!   switching, and logout
//! - [`Debouncer`] - last-call-wins quiet window used by the context switches
//! - [`HttpSessionApi`] - HTTP adapter for [`session_sdk::SessionApi`]
//! - [`SessionConfig`] - module configuration

pub mod config;
pub mod domain;
pub mod infra;

pub use config::SessionConfig;
pub use domain::debounce::Debouncer;
pub use domain::store::{
    SessionCollaborators, SessionFailure, SessionState, SessionStore, SuccessCallback,
    SwitchOutcome,
};
pub use infra::http_client::HttpSessionApi;
