use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use session::SessionStore;
use session_sdk::{FeatureFlags, Navigator, Preflight, SessionApi, User};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::ShellConfig;
use crate::flags::{FeatureFlagsState, FeatureFlagsStore};
use crate::latches::{LatchState, MountLatches};
use crate::layout::{AppView, RenderInput, render};
use crate::preflight::{PreflightState, PreflightStore};
use crate::readiness::ReadinessInputs;
use crate::redirect::{RouteSnapshot, decide_redirect};
use crate::scenes::{RouteMatch, Scene};

// Upper bound on redirects applied within one evaluation.
const MAX_REDIRECT_HOPS: usize = 4;

/// Values the redirect policy was last evaluated against.
#[derive(Debug, Clone, PartialEq)]
struct EvaluatedSnapshot {
    scene: Scene,
    path: String,
    user: Option<User>,
    preflight: Option<Preflight>,
}

/// Top-level orchestrator of the console.
///
/// Owns the preflight and feature-flag state and the mount latches, and
/// turns them together with the session state into an [`AppView`].
pub struct AppShell {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    preflight: Arc<PreflightStore>,
    flags: FeatureFlagsStore,
    latches: MountLatches,
    loaded_scenes: Mutex<HashSet<Scene>>,
    last_evaluated: Mutex<Option<EvaluatedSnapshot>>,
    view: watch::Sender<AppView>,
}

impl AppShell {
    /// Mount the shell: start the latches and the one-time preflight check.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(
        session: Arc<SessionStore>,
        api: Arc<dyn SessionApi>,
        navigator: Arc<dyn Navigator>,
        config: &ShellConfig,
    ) -> Arc<Self> {
        let preflight = Arc::new(PreflightStore::new());
        preflight.begin();
        let loader = Arc::clone(&preflight);
        tokio::spawn(async move { loader.load(api.as_ref()).await });

        debug!(
            spinner_delay_ms = config.spinner_delay_ms,
            flags_timeout_ms = config.flags_timeout_ms,
            "app shell mounted"
        );

        Arc::new(Self {
            session,
            navigator,
            preflight,
            flags: FeatureFlagsStore::new(),
            latches: MountLatches::start(config.spinner_delay(), config.flags_timeout()),
            loaded_scenes: Mutex::new(HashSet::new()),
            last_evaluated: Mutex::new(None),
            view: watch::Sender::new(AppView::Nothing),
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Deliver a feature flag payload from the analytics collaborator.
    pub fn receive_feature_flags(&self, flags: FeatureFlags) {
        self.flags.receive(flags);
    }

    /// Record that a scene's component is available to mount.
    pub fn mark_scene_loaded(&self, scene: Scene) {
        self.loaded_scenes.lock().insert(scene);
    }

    #[must_use]
    pub fn preflight(&self) -> PreflightState {
        self.preflight.state()
    }

    #[must_use]
    pub fn feature_flags(&self) -> FeatureFlagsState {
        self.flags.state()
    }

    #[must_use]
    pub fn latches(&self) -> LatchState {
        self.latches.state()
    }

    #[must_use]
    pub fn readiness(&self) -> ReadinessInputs {
        ReadinessInputs::collect(
            &self.session.snapshot(),
            &self.flags.state(),
            self.latches.state(),
            &self.preflight.state(),
        )
    }

    /// Most recently rendered view.
    #[must_use]
    pub fn subscribe_view(&self) -> watch::Receiver<AppView> {
        self.view.subscribe()
    }

    /// Apply any pending redirect and render the current location.
    pub fn evaluate(&self) -> AppView {
        let session = self.session.snapshot();
        let preflight = self.preflight.state();
        let flags = self.flags.state();
        let latches = self.latches.state();
        let ready = ReadinessInputs::collect(&session, &flags, latches, &preflight).is_ready();

        let mut route = RouteMatch::resolve(&self.navigator.current_path());
        if ready {
            route = self.apply_redirects(route, session.user.as_ref(), preflight.preflight.as_ref());
        }

        let scene_loaded = self.loaded_scenes.lock().contains(&route.scene);
        let view = render(&RenderInput {
            ready,
            spinner_visible: latches.spinner_visible,
            route: &route,
            scene_loaded,
            user: session.user.as_ref(),
            demo_only_project: session.demo_only_project(),
            chat_widget: flags.chat_widget_enabled(),
        });

        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                current.clone_from(&view);
                true
            }
        });
        view
    }

    /// Re-evaluate whenever the location or the session, preflight, flag or
    /// latch state changes, until `cancel` fires.
    #[instrument(skip_all)]
    pub async fn watch(self: Arc<Self>, cancel: CancellationToken) {
        let mut session = self.session.subscribe();
        let mut preflight = self.preflight.subscribe();
        let mut flags = self.flags.subscribe();
        let mut latches = self.latches.subscribe();
        let mut location = self.navigator.subscribe();

        loop {
            self.evaluate();

            let open = tokio::select! {
                () = cancel.cancelled() => false,
                changed = session.changed() => changed.is_ok(),
                changed = preflight.changed() => changed.is_ok(),
                changed = flags.changed() => changed.is_ok(),
                changed = latches.changed() => changed.is_ok(),
                changed = location.changed() => changed.is_ok(),
            };
            if !open {
                break;
            }
        }
        debug!("app shell watch stopped");
    }

    // The redirect effect only runs when the snapshot differs from the one it
    // last saw, so an unchanged snapshot never navigates twice.
    fn apply_redirects(
        &self,
        mut route: RouteMatch,
        user: Option<&User>,
        preflight: Option<&Preflight>,
    ) -> RouteMatch {
        for _ in 0..MAX_REDIRECT_HOPS {
            let path = self.navigator.current_path();
            let snapshot = EvaluatedSnapshot {
                scene: route.scene,
                path: path.clone(),
                user: user.cloned(),
                preflight: preflight.cloned(),
            };
            {
                let mut last = self.last_evaluated.lock();
                if last.as_ref() == Some(&snapshot) {
                    break;
                }
                *last = Some(snapshot);
            }

            let Some(redirect) = decide_redirect(&RouteSnapshot {
                scene: route.scene,
                path: &path,
                user,
                preflight,
            }) else {
                break;
            };

            info!(from = %path, to = redirect.to, reason = ?redirect.reason, "redirecting");
            self.navigator.replace(redirect.to);
            route = RouteMatch::resolve(&self.navigator.current_path());
        }
        route
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;
