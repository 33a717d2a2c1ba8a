//! Scene catalogue, route table and per-scene configuration.

use std::collections::BTreeMap;

use serde::Serialize;

/// A named, routable top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    Login,
    Signup,
    InviteSignup,
    PreflightCheck,
    OrganizationCreateFirst,
    ProjectCreateFirst,
    Ingestion,
    Personalization,
    Insights,
    Dashboards,
    Dashboard,
    Events,
    Sessions,
    Persons,
    Person,
    Cohorts,
    FeatureFlags,
    Action,
    Annotations,
    OrganizationSettings,
    ProjectSettings,
    MySettings,
    Billing,
    Plugins,
    SystemStatus,
    InstanceLicenses,
    NotFound,
}

/// Who may see a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Requires a signed-in user.
    #[default]
    Authenticated,
    /// Rendered with or without a user.
    AllowUnauthenticated,
    /// Meant for anonymous visitors; signed-in users are sent home.
    OnlyUnauthenticated,
}

/// Rendering configuration of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SceneConfig {
    pub access: Access,
    /// Minimal shell without side navigation.
    pub plain: bool,
    /// Drop the top navigation from the plain shell.
    pub hide_top_nav: bool,
    pub hide_demo_warnings: bool,
    /// Dark content background.
    pub dark: bool,
}

impl SceneConfig {
    /// Whether the scene may render without a signed-in user.
    #[must_use]
    pub fn renders_without_user(self) -> bool {
        self.access != Access::Authenticated
    }
}

impl Scene {
    pub const ALL: [Self; 27] = [
        Self::Login,
        Self::Signup,
        Self::InviteSignup,
        Self::PreflightCheck,
        Self::OrganizationCreateFirst,
        Self::ProjectCreateFirst,
        Self::Ingestion,
        Self::Personalization,
        Self::Insights,
        Self::Dashboards,
        Self::Dashboard,
        Self::Events,
        Self::Sessions,
        Self::Persons,
        Self::Person,
        Self::Cohorts,
        Self::FeatureFlags,
        Self::Action,
        Self::Annotations,
        Self::OrganizationSettings,
        Self::ProjectSettings,
        Self::MySettings,
        Self::Billing,
        Self::Plugins,
        Self::SystemStatus,
        Self::InstanceLicenses,
        Self::NotFound,
    ];

    #[must_use]
    pub fn config(self) -> SceneConfig {
        let base = SceneConfig::default();
        match self {
            Self::Login | Self::Signup | Self::PreflightCheck => SceneConfig {
                access: Access::OnlyUnauthenticated,
                ..base
            },
            Self::InviteSignup => SceneConfig {
                access: Access::AllowUnauthenticated,
                plain: true,
                ..base
            },
            Self::OrganizationCreateFirst | Self::ProjectCreateFirst | Self::Ingestion => {
                SceneConfig { plain: true, ..base }
            }
            Self::Personalization => SceneConfig {
                plain: true,
                hide_top_nav: true,
                ..base
            },
            Self::Insights | Self::Dashboards => SceneConfig { dark: true, ..base },
            Self::Billing => SceneConfig {
                hide_demo_warnings: true,
                ..base
            },
            _ => base,
        }
    }
}

/// Well-known navigation targets.
pub mod paths {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const ORGANIZATION_CREATE: &str = "/organization/create";
    pub const PROJECT_CREATE: &str = "/project/create";
    pub const ONBOARDING: &str = "/ingestion";
    pub const PERSONALIZATION: &str = "/personalization";
}

// `:name` captures one segment, a trailing `*` captures the rest.
const ROUTES: &[(&str, Scene)] = &[
    ("/", Scene::Insights),
    ("/login", Scene::Login),
    ("/signup", Scene::Signup),
    ("/signup/:id", Scene::InviteSignup),
    ("/preflight", Scene::PreflightCheck),
    ("/organization/create", Scene::OrganizationCreateFirst),
    ("/project/create", Scene::ProjectCreateFirst),
    ("/ingestion", Scene::Ingestion),
    ("/ingestion/*", Scene::Ingestion),
    ("/personalization", Scene::Personalization),
    ("/insights", Scene::Insights),
    ("/dashboard", Scene::Dashboards),
    ("/dashboard/:id", Scene::Dashboard),
    ("/events", Scene::Events),
    ("/sessions", Scene::Sessions),
    ("/persons", Scene::Persons),
    ("/person/*", Scene::Person),
    ("/cohorts", Scene::Cohorts),
    ("/feature_flags", Scene::FeatureFlags),
    ("/action/:id", Scene::Action),
    ("/annotations", Scene::Annotations),
    ("/organization/settings", Scene::OrganizationSettings),
    ("/organization/billing", Scene::Billing),
    ("/project/settings", Scene::ProjectSettings),
    ("/project/plugins", Scene::Plugins),
    ("/me/settings", Scene::MySettings),
    ("/instance/status", Scene::SystemStatus),
    ("/instance/licenses", Scene::InstanceLicenses),
];

/// A path resolved against the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub scene: Scene,
    /// Captured `:name` segments; the `*` tail is stored under `"*"`.
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    /// Resolve a location to a scene. Query and fragment are ignored;
    /// unknown paths resolve to [`Scene::NotFound`].
    #[must_use]
    pub fn resolve(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        ROUTES
            .iter()
            .find_map(|(pattern, scene)| {
                match_pattern(pattern, path).map(|params| Self {
                    scene: *scene,
                    params,
                })
            })
            .unwrap_or_else(|| Self {
                scene: Scene::NotFound,
                params: BTreeMap::new(),
            })
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    let mut actual = segments(path);

    for expected in segments(pattern) {
        if expected == "*" {
            let rest: Vec<&str> = actual.by_ref().collect();
            if rest.is_empty() {
                return None;
            }
            params.insert("*".to_owned(), rest.join("/"));
            return Some(params);
        }
        let segment = actual.next()?;
        if let Some(name) = expected.strip_prefix(':') {
            params.insert(name.to_owned(), segment.to_owned());
        } else if expected != segment {
            return None;
        }
    }

    actual.next().is_none().then_some(params)
}
