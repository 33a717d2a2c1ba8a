use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

use session_sdk::{
    Analytics, ErrorReporter, Navigator, Notification, Notifier, OrganizationId, ReportedUser,
    SessionApi, SessionError, TeamId, User, UserPatch,
};

use super::debounce::Debouncer;
use crate::config::SessionConfig;

/// Identity tag of the "preferences saved" notification.
pub const UPDATE_NOTIFICATION_ID: &str = "updateUser";

/// Callback invoked after a successful update, before the state is published.
pub type SuccessCallback = Box<dyn FnOnce() + Send>;

/// External collaborators the store drives as side effects.
#[derive(Clone)]
pub struct SessionCollaborators {
    pub error_reporter: Arc<dyn ErrorReporter>,
    pub analytics: Arc<dyn Analytics>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// Named failure of the most recent load or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionFailure {
    LoadFailed(String),
    UpdateFailed(String),
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub user_loading: bool,
    pub user_update_loading: bool,
    pub last_failure: Option<SessionFailure>,
}

impl SessionState {
    /// The active project is the demo project and it is the organization's only one.
    #[must_use]
    pub fn demo_only_project(&self) -> bool {
        self.user.as_ref().is_some_and(|user| {
            user.team.as_ref().is_some_and(|team| team.is_demo)
                && user
                    .organization
                    .as_ref()
                    .is_some_and(|org| org.teams.len() == 1)
        })
    }
}

/// Result of a team or organization switch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The requested context is already active; nothing was sent.
    AlreadyActive,
    /// A later call of the same operation took over during the quiet window.
    Superseded,
    /// The backend switched context and a full navigation was issued.
    Switched { destination: String },
}

/// Owner of the current-user record.
///
/// State changes are published through a `watch` channel; consumers call
/// [`SessionStore::subscribe`] and react to `changed()`.
pub struct SessionStore {
    api: Arc<dyn SessionApi>,
    collaborators: SessionCollaborators,
    state: watch::Sender<SessionState>,
    team_switch: Debouncer,
    organization_switch: Debouncer,
    logout_path: String,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        api: Arc<dyn SessionApi>,
        collaborators: SessionCollaborators,
        config: &SessionConfig,
    ) -> Self {
        Self {
            api,
            collaborators,
            state: watch::Sender::new(SessionState::default()),
            team_switch: Debouncer::new(config.switch_debounce()),
            organization_switch: Debouncer::new(config.switch_debounce()),
            logout_path: config.logout_path.clone(),
        }
    }

    /// Create the store and run the initial load once.
    pub async fn mount(
        api: Arc<dyn SessionApi>,
        collaborators: SessionCollaborators,
        config: &SessionConfig,
    ) -> Arc<Self> {
        let store = Arc::new(Self::new(api, collaborators, config));
        store.load(false).await;
        store
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().user_loading
    }

    #[must_use]
    pub fn demo_only_project(&self) -> bool {
        self.state.borrow().demo_only_project()
    }

    /// Fetch the current user and identify it with the collaborators.
    ///
    /// Failures are logged and recorded as [`SessionFailure::LoadFailed`];
    /// the store then holds no user and `None` is returned.
    #[instrument(skip(self))]
    pub async fn load(&self, reset_on_failure: bool) -> Option<User> {
        self.state.send_modify(|state| state.user_loading = true);

        match self.api.get_current_user().await {
            Ok(user) => {
                self.identify(&user);
                debug!(user_id = user.id, "current user loaded");
                self.state.send_modify(|state| {
                    state.user = Some(user.clone());
                    state.user_loading = false;
                    state.last_failure = None;
                });
                Some(user)
            }
            Err(err) => {
                error!(error = %err, "failed to load current user");
                if reset_on_failure {
                    self.collaborators.analytics.reset();
                }
                self.state.send_modify(|state| {
                    state.user = None;
                    state.user_loading = false;
                    state.last_failure = Some(SessionFailure::LoadFailed(err.to_string()));
                });
                None
            }
        }
    }

    /// Submit a partial update of the loaded user.
    ///
    /// On success the callback runs, the stored user is replaced with the
    /// server response, and the "saved" notification replaces any pending one.
    /// Network failures are logged, recorded as
    /// [`SessionFailure::UpdateFailed`] and resolve to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] without contacting the backend when
    /// no user has been loaded.
    #[instrument(skip_all)]
    pub async fn update(
        &self,
        patch: UserPatch,
        on_success: Option<SuccessCallback>,
    ) -> Result<Option<User>, SessionError> {
        if self.state.borrow().user.is_none() {
            return Err(SessionError::NotLoaded);
        }

        self.state
            .send_modify(|state| state.user_update_loading = true);

        match self.api.update_current_user(&patch).await {
            Ok(user) => {
                if let Some(callback) = on_success {
                    callback();
                }
                self.state.send_modify(|state| {
                    state.user = Some(user.clone());
                    state.user_update_loading = false;
                    state.last_failure = None;
                });
                self.notify_saved();
                Ok(Some(user))
            }
            Err(err) => {
                error!(error = %err, "failed to update current user");
                self.state.send_modify(|state| {
                    state.user_update_loading = false;
                    state.last_failure = Some(SessionFailure::UpdateFailed(err.to_string()));
                });
                Ok(None)
            }
        }
    }

    /// Switch the active project and reload the page at `destination` (or `/`).
    ///
    /// # Errors
    ///
    /// Propagates the backend error when the switch request fails; no
    /// navigation happens in that case.
    #[instrument(skip(self))]
    pub async fn switch_team(
        &self,
        team_id: TeamId,
        destination: Option<&str>,
    ) -> Result<SwitchOutcome, SessionError> {
        let current = self.state.borrow().user.as_ref().and_then(User::team_id);
        if current == Some(team_id) {
            // Still the latest request: a pending switch elsewhere is dropped.
            self.team_switch.preempt();
            return Ok(SwitchOutcome::AlreadyActive);
        }
        if !self.team_switch.settle().await {
            debug!("team switch superseded by a later request");
            return Ok(SwitchOutcome::Superseded);
        }
        self.switch_context(UserPatch::switch_team(team_id), destination)
            .await
    }

    /// Switch the active organization and reload the page at `destination` (or `/`).
    ///
    /// # Errors
    ///
    /// Propagates the backend error when the switch request fails; no
    /// navigation happens in that case.
    #[instrument(skip(self))]
    pub async fn switch_organization(
        &self,
        organization_id: OrganizationId,
        destination: Option<&str>,
    ) -> Result<SwitchOutcome, SessionError> {
        let current = self
            .state
            .borrow()
            .user
            .as_ref()
            .and_then(User::organization_id);
        if current == Some(organization_id) {
            self.organization_switch.preempt();
            return Ok(SwitchOutcome::AlreadyActive);
        }
        if !self.organization_switch.settle().await {
            debug!("organization switch superseded by a later request");
            return Ok(SwitchOutcome::Superseded);
        }
        self.switch_context(UserPatch::switch_organization(organization_id), destination)
            .await
    }

    /// Forget the analytics identity and leave through the logout endpoint.
    pub fn logout(&self) {
        info!("logging out");
        self.collaborators.analytics.reset();
        self.collaborators.navigator.assign(&self.logout_path);
    }

    async fn switch_context(
        &self,
        patch: UserPatch,
        destination: Option<&str>,
    ) -> Result<SwitchOutcome, SessionError> {
        self.api
            .update_current_user(&patch)
            .await
            .inspect_err(|err| error!(error = %err, "failed to switch active context"))?;

        let destination = destination.unwrap_or("/").to_owned();
        info!(destination = %destination, "active context switched, reloading");
        self.collaborators.navigator.assign(&destination);
        Ok(SwitchOutcome::Switched { destination })
    }

    fn identify(&self, user: &User) {
        let Some(uuid) = user.uuid else {
            return;
        };

        self.collaborators.error_reporter.set_user(&ReportedUser {
            id: uuid,
            email: user.email.clone(),
        });

        let analytics = &self.collaborators.analytics;
        // Not anonymous any more, and attributed to someone else: start clean.
        let distinct_id = analytics.distinct_id();
        if analytics.device_id() != distinct_id
            && distinct_id.as_deref() != Some(user.distinct_id.as_str())
        {
            analytics.reset();
        }

        analytics.identify(&user.distinct_id);

        let mut person = Map::new();
        let email = if user.anonymize_data {
            Value::Null
        } else {
            Value::String(user.email.clone())
        };
        person.insert("email".to_owned(), email);
        analytics.set_person_properties(&person);

        let mut properties = Map::new();
        properties.insert(
            "is_demo_project".to_owned(),
            user.team
                .as_ref()
                .map_or(Value::Null, |team| Value::Bool(team.is_demo)),
        );
        analytics.register(&properties);
    }

    fn notify_saved(&self) {
        let notifier = &self.collaborators.notifier;
        notifier.dismiss(UPDATE_NOTIFICATION_ID);
        notifier.show(&Notification {
            id: UPDATE_NOTIFICATION_ID.to_owned(),
            title: "Your preferences have been saved!".to_owned(),
            body: "All set. Click here to dismiss.".to_owned(),
        });
    }
}
