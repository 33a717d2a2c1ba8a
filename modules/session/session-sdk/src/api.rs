//! Backend API trait for the session module.
//!
//! The session store talks to the backend exclusively through this trait.
//! The HTTP adapter lives in the `session` crate; tests substitute in-memory
//! fakes.

use async_trait::async_trait;

use crate::error::SessionError;
use crate::models::{Preflight, User, UserPatch};

/// Backend operations used by the session store and the app shell.
///
/// ```ignore
/// let api: Arc<dyn SessionApi> = Arc::new(HttpSessionApi::new(&config.session)?);
///
/// // Load the signed-in user
/// let user = api.get_current_user().await?;
///
/// // Switch the active project server-side
/// api.update_current_user(&UserPatch::switch_team(team_id)).await?;
///
/// // One-time deployment check
/// let preflight = api.get_preflight().await?;
/// ```
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Fetch the user bound to the current session.
    ///
    /// # Errors
    ///
    /// - `Status` with 401/403 when there is no authenticated session
    /// - `Transport`, `Timeout` or `Decode` on network or payload failures
    async fn get_current_user(&self) -> Result<User, SessionError>;

    /// Submit a partial update of the current user.
    ///
    /// Only fields set on the patch are sent. Setting
    /// `set_current_team` or `set_current_organization` switches the
    /// server-side active context.
    ///
    /// # Errors
    ///
    /// Same classes as [`SessionApi::get_current_user`].
    async fn update_current_user(&self, patch: &UserPatch) -> Result<User, SessionError>;

    /// Fetch the deployment preflight status.
    ///
    /// # Errors
    ///
    /// Same classes as [`SessionApi::get_current_user`].
    async fn get_preflight(&self) -> Result<Preflight, SessionError>;
}
