//! Navigation the shell forces before a scene is rendered.
//!
//! [`decide_redirect`] is a pure function of a [`RouteSnapshot`]. The caller
//! re-evaluates it whenever the snapshot changes and applies the result with
//! a history-replacing navigation.

use serde::Serialize;
use session_sdk::{Preflight, User};

use crate::scenes::{Access, Scene, paths};

/// Everything the redirect rules look at.
#[derive(Debug, Clone, Copy)]
pub struct RouteSnapshot<'a> {
    pub scene: Scene,
    pub path: &'a str,
    /// `None` while no user is known.
    pub user: Option<&'a User>,
    /// `None` until the preflight check has produced a result.
    pub preflight: Option<&'a Preflight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// Initialized self-managed instances have no open signup.
    SignupClosed,
    /// The scene is for anonymous visitors only.
    AlreadySignedIn,
    MissingOrganization,
    MissingProject,
    OnboardingIncomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: &'static str,
    pub reason: RedirectReason,
}

impl Redirect {
    const fn new(to: &'static str, reason: RedirectReason) -> Self {
        Self { to, reason }
    }
}

/// Decide where to go instead of the snapshot's scene, if anywhere.
///
/// Rules are checked in priority order and the first one that applies wins.
/// Unknown user or preflight data disables the rules that depend on it.
#[must_use]
pub fn decide_redirect(snapshot: &RouteSnapshot<'_>) -> Option<Redirect> {
    if snapshot.scene == Scene::Signup
        && snapshot
            .preflight
            .is_some_and(Preflight::is_initiated_self_managed)
    {
        return Some(Redirect::new(paths::LOGIN, RedirectReason::SignupClosed));
    }

    let user = snapshot.user?;

    if snapshot.scene.config().access == Access::OnlyUnauthenticated {
        return Some(Redirect::new(paths::HOME, RedirectReason::AlreadySignedIn));
    }

    if snapshot.scene == Scene::InviteSignup {
        return None;
    }

    // Organization is assumed to exist before any project, so the project
    // rule is only reached for users that have one.
    if user.organization.is_none() {
        return (snapshot.path != paths::ORGANIZATION_CREATE).then_some(Redirect::new(
            paths::ORGANIZATION_CREATE,
            RedirectReason::MissingOrganization,
        ));
    }

    if user.team.is_none() {
        return (snapshot.path != paths::PROJECT_CREATE).then_some(Redirect::new(
            paths::PROJECT_CREATE,
            RedirectReason::MissingProject,
        ));
    }

    if !user.completed_onboarding()
        && !snapshot.path.starts_with(paths::ONBOARDING)
        && !snapshot.path.starts_with(paths::PERSONALIZATION)
    {
        return Some(Redirect::new(
            paths::ONBOARDING,
            RedirectReason::OnboardingIncomplete,
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_sdk::{Organization, Team};

    fn onboarded_user() -> User {
        User {
            id: 1,
            distinct_id: "d-1".to_owned(),
            email: "ada@example.com".to_owned(),
            organization: Some(Organization::default()),
            team: Some(Team {
                id: 2,
                completed_snippet_onboarding: true,
                ..Team::default()
            }),
            ..User::default()
        }
    }

    fn preflight(cloud: bool, initiated: bool) -> Preflight {
        Preflight {
            cloud,
            initiated,
            ..Preflight::default()
        }
    }

    fn snapshot<'a>(
        scene: Scene,
        path: &'a str,
        user: Option<&'a User>,
        preflight: Option<&'a Preflight>,
    ) -> RouteSnapshot<'a> {
        RouteSnapshot {
            scene,
            path,
            user,
            preflight,
        }
    }

    #[test]
    fn signup_on_initiated_self_managed_goes_to_login() {
        let status = preflight(false, true);
        let redirect = decide_redirect(&snapshot(Scene::Signup, "/signup", None, Some(&status)));
        assert_eq!(
            redirect,
            Some(Redirect::new(paths::LOGIN, RedirectReason::SignupClosed))
        );
    }

    #[test]
    fn signup_rule_needs_every_condition() {
        let cloud = preflight(true, true);
        let fresh = preflight(false, false);
        let closed = preflight(false, true);

        for (scene, status) in [
            (Scene::Signup, Some(&cloud)),
            (Scene::Signup, Some(&fresh)),
            (Scene::Signup, None),
            (Scene::Login, Some(&closed)),
        ] {
            assert_eq!(
                decide_redirect(&snapshot(scene, "/signup", None, status)),
                None,
                "{scene:?} {status:?}"
            );
        }
    }

    #[test]
    fn signed_in_user_leaves_anonymous_only_scenes() {
        let user = onboarded_user();
        for (scene, path) in [
            (Scene::Login, "/login"),
            (Scene::Signup, "/signup"),
            (Scene::PreflightCheck, "/preflight"),
        ] {
            assert_eq!(
                decide_redirect(&snapshot(scene, path, Some(&user), None)),
                Some(Redirect::new(paths::HOME, RedirectReason::AlreadySignedIn))
            );
        }
    }

    #[test]
    fn user_without_organization_is_sent_to_create_one() {
        let user = User {
            organization: None,
            ..onboarded_user()
        };
        assert_eq!(
            decide_redirect(&snapshot(Scene::Events, "/events", Some(&user), None)),
            Some(Redirect::new(
                paths::ORGANIZATION_CREATE,
                RedirectReason::MissingOrganization
            ))
        );
        assert_eq!(
            decide_redirect(&snapshot(
                Scene::OrganizationCreateFirst,
                paths::ORGANIZATION_CREATE,
                Some(&user),
                None
            )),
            None
        );
    }

    #[test]
    fn invite_signup_is_exempt_from_context_rules() {
        let user = User {
            organization: None,
            team: None,
            ..onboarded_user()
        };
        assert_eq!(
            decide_redirect(&snapshot(
                Scene::InviteSignup,
                "/signup/abc",
                Some(&user),
                None
            )),
            None
        );
    }

    #[test]
    fn user_without_project_is_sent_to_create_one() {
        let user = User {
            team: None,
            ..onboarded_user()
        };
        assert_eq!(
            decide_redirect(&snapshot(Scene::Insights, "/insights", Some(&user), None)),
            Some(Redirect::new(paths::PROJECT_CREATE, RedirectReason::MissingProject))
        );
        assert_eq!(
            decide_redirect(&snapshot(
                Scene::ProjectCreateFirst,
                paths::PROJECT_CREATE,
                Some(&user),
                None
            )),
            None
        );
    }

    #[test]
    fn missing_organization_wins_over_missing_project() {
        let user = User {
            organization: None,
            team: None,
            ..onboarded_user()
        };
        let redirect = decide_redirect(&snapshot(
            Scene::ProjectCreateFirst,
            paths::PROJECT_CREATE,
            Some(&user),
            None,
        ));
        assert_eq!(redirect.map(|r| r.to), Some(paths::ORGANIZATION_CREATE));
    }

    #[test]
    fn unfinished_onboarding_is_resumed_outside_onboarding_areas() {
        let mut user = onboarded_user();
        if let Some(team) = user.team.as_mut() {
            team.completed_snippet_onboarding = false;
        }

        assert_eq!(
            decide_redirect(&snapshot(Scene::Events, "/events", Some(&user), None)),
            Some(Redirect::new(
                paths::ONBOARDING,
                RedirectReason::OnboardingIncomplete
            ))
        );
        for path in ["/ingestion", "/ingestion/web", "/personalization"] {
            let scene = crate::scenes::RouteMatch::resolve(path).scene;
            assert_eq!(
                decide_redirect(&snapshot(scene, path, Some(&user), None)),
                None
            );
        }
    }

    #[test]
    fn onboarded_user_stays_put() {
        let user = onboarded_user();
        assert_eq!(
            decide_redirect(&snapshot(Scene::Events, "/events", Some(&user), None)),
            None
        );
    }

    #[test]
    fn unknown_user_disables_user_rules() {
        assert_eq!(
            decide_redirect(&snapshot(Scene::Login, "/login", None, None)),
            None
        );
        assert_eq!(
            decide_redirect(&snapshot(Scene::Events, "/events", None, None)),
            None
        );
    }
}
