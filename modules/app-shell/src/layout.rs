//! Layout shell selection.
//!
//! [`render`] turns the readiness decision, the routed scene and the current
//! user into an [`AppView`]: a description of what the console shows, free
//! of any presentation toolkit.

use serde::Serialize;
use session_sdk::User;

use crate::scenes::RouteMatch;

/// What occupies the scene slot of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneSlot {
    Scene(RouteMatch),
    /// Scene component still loading, delayed spinner visible.
    Spinner,
    /// Scene component still loading, within the spinner delay.
    Empty,
}

/// Overlays wrapped around the full shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    UpgradePrompt,
    CommandPalette,
}

/// Banners stacked above the scene in the full shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Banner {
    DemoWarning,
    BillingAlert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shell", rename_all = "snake_case")]
pub enum Layout {
    /// Scene only; anonymous visitors on scenes that allow them.
    Bare { slot: SceneSlot },
    /// Optional top navigation and the scene, no side navigation.
    Plain {
        top_navigation: bool,
        slot: SceneSlot,
    },
    /// Side and top navigation, banners and back navigation around the scene.
    Full {
        top_navigation: bool,
        dark: bool,
        banners: Vec<Banner>,
        back_navigation: bool,
        slot: SceneSlot,
        overlays: Vec<Overlay>,
    },
}

/// Always-mounted companions of a rendered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Essentials {
    pub chat_widget: bool,
    pub toast_host: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AppView {
    Nothing,
    Spinner,
    Frame {
        layout: Layout,
        essentials: Essentials,
    },
}

impl AppView {
    /// Scene mounted by this view, if any.
    #[must_use]
    pub fn scene(&self) -> Option<&RouteMatch> {
        let Self::Frame { layout, .. } = self else {
            return None;
        };
        let slot = match layout {
            Layout::Bare { slot } | Layout::Plain { slot, .. } | Layout::Full { slot, .. } => slot,
        };
        match slot {
            SceneSlot::Scene(route) => Some(route),
            SceneSlot::Spinner | SceneSlot::Empty => None,
        }
    }
}

/// Inputs of a single render pass.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderInput<'a> {
    pub ready: bool,
    pub spinner_visible: bool,
    pub route: &'a RouteMatch,
    /// The scene's component is available to mount.
    pub scene_loaded: bool,
    pub user: Option<&'a User>,
    pub demo_only_project: bool,
    pub chat_widget: bool,
}

#[must_use]
pub fn render(input: &RenderInput<'_>) -> AppView {
    if !input.ready {
        return if input.spinner_visible {
            AppView::Spinner
        } else {
            AppView::Nothing
        };
    }

    let config = input.route.scene.config();
    if input.user.is_none() && !config.renders_without_user() {
        return AppView::Nothing;
    }

    let slot = if input.scene_loaded {
        SceneSlot::Scene(input.route.clone())
    } else if input.spinner_visible {
        SceneSlot::Spinner
    } else {
        SceneSlot::Empty
    };

    let layout = if input.user.is_none() {
        Layout::Bare { slot }
    } else if config.plain {
        Layout::Plain {
            top_navigation: !config.hide_top_nav,
            slot,
        }
    } else {
        let mut banners = Vec::with_capacity(2);
        if input.demo_only_project && !config.hide_demo_warnings {
            banners.push(Banner::DemoWarning);
        }
        banners.push(Banner::BillingAlert);
        Layout::Full {
            top_navigation: !config.hide_top_nav,
            dark: config.dark,
            banners,
            back_navigation: true,
            slot,
            overlays: vec![Overlay::UpgradePrompt, Overlay::CommandPalette],
        }
    };

    AppView::Frame {
        layout,
        essentials: Essentials {
            chat_widget: input.chat_widget,
            toast_host: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::Scene;

    fn input<'a>(route: &'a RouteMatch, user: Option<&'a User>) -> RenderInput<'a> {
        RenderInput {
            ready: true,
            spinner_visible: false,
            route,
            scene_loaded: true,
            user,
            demo_only_project: false,
            chat_widget: false,
        }
    }

    #[test]
    fn not_ready_shows_spinner_only_after_delay() {
        let route = RouteMatch::resolve("/events");
        let mut pass = input(&route, None);
        pass.ready = false;
        assert_eq!(render(&pass), AppView::Nothing);

        pass.spinner_visible = true;
        assert_eq!(render(&pass), AppView::Spinner);
    }

    #[test]
    fn authenticated_scene_without_user_renders_nothing() {
        let route = RouteMatch::resolve("/events");
        assert_eq!(render(&input(&route, None)), AppView::Nothing);
    }

    #[test]
    fn anonymous_scenes_use_bare_shell() {
        let route = RouteMatch::resolve("/login");
        let view = render(&input(&route, None));
        let AppView::Frame { layout, essentials } = view else {
            panic!("expected a frame");
        };
        assert_eq!(
            layout,
            Layout::Bare {
                slot: SceneSlot::Scene(route)
            }
        );
        assert!(essentials.toast_host);
    }

    #[test]
    fn plain_scene_respects_hidden_top_navigation() {
        let user = User::default();
        let route = RouteMatch::resolve("/personalization");
        let AppView::Frame { layout, .. } = render(&input(&route, Some(&user))) else {
            panic!("expected a frame");
        };
        assert!(matches!(
            layout,
            Layout::Plain {
                top_navigation: false,
                ..
            }
        ));

        let invite = RouteMatch::resolve("/signup/xyz");
        let AppView::Frame { layout, .. } = render(&input(&invite, Some(&user))) else {
            panic!("expected a frame");
        };
        assert!(matches!(
            layout,
            Layout::Plain {
                top_navigation: true,
                ..
            }
        ));
    }

    #[test]
    fn anonymous_invitee_gets_bare_shell() {
        let invite = RouteMatch::resolve("/signup/xyz");
        let AppView::Frame { layout, .. } = render(&input(&invite, None)) else {
            panic!("expected a frame");
        };
        assert!(matches!(layout, Layout::Bare { .. }));
    }

    #[test]
    fn full_shell_carries_banners_and_overlays() {
        let user = User::default();
        let route = RouteMatch::resolve("/dashboard");
        let mut pass = input(&route, Some(&user));
        pass.demo_only_project = true;
        pass.chat_widget = true;

        let AppView::Frame { layout, essentials } = render(&pass) else {
            panic!("expected a frame");
        };
        assert!(essentials.chat_widget);
        match layout {
            Layout::Full {
                top_navigation,
                dark,
                banners,
                overlays,
                back_navigation,
                ..
            } => {
                assert!(top_navigation);
                assert!(dark);
                assert!(back_navigation);
                assert_eq!(banners, vec![Banner::DemoWarning, Banner::BillingAlert]);
                assert_eq!(
                    overlays,
                    vec![Overlay::UpgradePrompt, Overlay::CommandPalette]
                );
            }
            other => panic!("unexpected layout: {other:?}"),
        }
    }

    #[test]
    fn billing_hides_demo_warning() {
        let user = User::default();
        let route = RouteMatch::resolve("/organization/billing");
        let mut pass = input(&route, Some(&user));
        pass.demo_only_project = true;

        let AppView::Frame {
            layout: Layout::Full { banners, .. },
            ..
        } = render(&pass)
        else {
            panic!("expected the full shell");
        };
        assert_eq!(banners, vec![Banner::BillingAlert]);
    }

    #[test]
    fn unloaded_scene_falls_back() {
        let user = User::default();
        let route = RouteMatch::resolve("/events");
        let mut pass = input(&route, Some(&user));
        pass.scene_loaded = false;

        let view = render(&pass);
        assert_eq!(view.scene(), None);
        assert!(matches!(
            view,
            AppView::Frame {
                layout: Layout::Full {
                    slot: SceneSlot::Empty,
                    ..
                },
                ..
            }
        ));

        pass.spinner_visible = true;
        assert!(matches!(
            render(&pass),
            AppView::Frame {
                layout: Layout::Full {
                    slot: SceneSlot::Spinner,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn mounted_scene_is_reported() {
        let user = User::default();
        let route = RouteMatch::resolve("/events");
        let view = render(&input(&route, Some(&user)));
        assert_eq!(view.scene().map(|r| r.scene), Some(Scene::Events));
    }
}
