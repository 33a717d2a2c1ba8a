//! Session SDK
//!
//! This crate provides the public contract of the `session` module:
//!
//! - [`SessionApi`] - Backend trait for the current-user and preflight endpoints
//! - [`ErrorReporter`], [`Analytics`], [`Navigator`], [`Notifier`] - Collaborator ports
//! - [`User`], [`Organization`], [`Team`], [`Preflight`], [`FeatureFlags`] - Models
//! - [`SessionError`] - Error types
//!
//! ## Usage
//!
//! Implementations of the backend trait are injected into the session store:
//!
//! ```ignore
//! use session_sdk::{SessionApi, UserPatch};
//!
//! let api: Arc<dyn SessionApi> = Arc::new(HttpSessionApi::new(&config)?);
//!
//! let user = api.get_current_user().await?;
//! let updated = api.update_current_user(&UserPatch::switch_team(2)).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod ports;

// Re-export main types at crate root
pub use api::SessionApi;
pub use error::SessionError;
pub use models::{
    FeatureFlags, FlagValue, Organization, OrganizationId, Preflight, Team, TeamBasic, TeamId,
    User, UserPatch,
};
pub use ports::{Analytics, ErrorReporter, Navigator, Notification, Notifier, ReportedUser};
