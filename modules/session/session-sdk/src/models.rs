//! Public models for the session module.
//!
//! These mirror the backend's current-user and preflight payloads. The client
//! treats them as read-only snapshots; mutations go through [`UserPatch`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Project (team) identifier.
pub type TeamId = i64;

/// Organization identifier.
pub type OrganizationId = Uuid;

/// The signed-in user as returned by the current-user endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub uuid: Option<Uuid>,
    pub distinct_id: String,
    pub first_name: String,
    pub email: String,
    pub email_opt_in: bool,
    pub anonymize_data: bool,
    pub organization: Option<Organization>,
    pub team: Option<Team>,
}

impl User {
    /// Whether the active project has finished ingestion onboarding.
    ///
    /// A user without a project has not onboarded anything.
    #[must_use]
    pub fn completed_onboarding(&self) -> bool {
        self.team
            .as_ref()
            .is_some_and(|team| team.completed_snippet_onboarding)
    }

    #[must_use]
    pub fn team_id(&self) -> Option<TeamId> {
        self.team.as_ref().map(|team| team.id)
    }

    #[must_use]
    pub fn organization_id(&self) -> Option<OrganizationId> {
        self.organization.as_ref().map(|org| org.id)
    }
}

/// Organization the user is currently acting in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    /// Projects belonging to the organization.
    pub teams: Vec<TeamBasic>,
    pub membership_level: Option<u8>,
}

/// Minimal project reference listed under an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TeamBasic {
    pub id: TeamId,
    pub name: String,
}

/// The user's active project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub is_demo: bool,
    pub completed_snippet_onboarding: bool,
}

/// Partial update of the current user.
///
/// Unset fields are omitted from the request body so the backend leaves them
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_opt_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymize_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_current_team: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_current_organization: Option<OrganizationId>,
    /// Additional backend fields passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserPatch {
    #[must_use]
    pub fn switch_team(team_id: TeamId) -> Self {
        Self {
            set_current_team: Some(team_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn switch_organization(organization_id: OrganizationId) -> Self {
        Self {
            set_current_organization: Some(organization_id),
            ..Self::default()
        }
    }
}

/// Deployment status returned by the preflight endpoint.
///
/// The `Option` fields are only reported to authenticated sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Preflight {
    pub django: bool,
    pub redis: bool,
    pub plugins: bool,
    pub celery: bool,
    pub db: bool,
    /// At least one user exists on the instance.
    pub initiated: bool,
    /// Multi-tenant hosted deployment.
    pub cloud: bool,
    pub available_social_auth_providers: HashMap<String, bool>,
    pub ee_available: Option<bool>,
    pub is_clickhouse_enabled: Option<bool>,
    pub db_backend: Option<String>,
    pub posthog_version: Option<String>,
    pub email_service_available: Option<bool>,
    pub is_debug: Option<bool>,
    pub site_url: Option<String>,
    pub licensed_users_available: Option<i64>,
}

impl Preflight {
    /// Self-managed instance that already has users, so open signup is closed.
    #[must_use]
    pub fn is_initiated_self_managed(&self) -> bool {
        !self.cloud && self.initiated
    }
}

/// Value of a single feature flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Enabled(bool),
    Variant(String),
}

impl FlagValue {
    /// `true` for an enabled boolean flag or any multivariate variant.
    #[must_use]
    pub fn is_on(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Variant(_) => true,
        }
    }
}

/// Feature flags evaluated for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FeatureFlags(HashMap<String, FlagValue>);

impl FeatureFlags {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// Unknown flags are off.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).is_some_and(FlagValue::is_on)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FlagValue)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (String, FlagValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
