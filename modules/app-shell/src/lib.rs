//! Application shell
//!
//! Decides what the console shows before and around the routed scene:
//!
//! - [`readiness`] - combines user, feature-flag and preflight loading into
//!   a single "show app" decision, with the mount latches that bound the wait
//! - [`redirect`] - navigation the shell forces before rendering a scene
//! - [`scenes`] - scene catalogue, route table and per-scene configuration
//! - [`layout`] - layout shell selection and the rendered view
//! - [`filters`] - property filter toggling and link generation
//! - [`AppShell`] - orchestrator reacting to session, preflight and flag changes

pub mod config;
pub mod filters;
pub mod flags;
pub mod latches;
pub mod layout;
pub mod preflight;
pub mod readiness;
pub mod redirect;
pub mod scenes;
pub mod shell;

pub use config::ShellConfig;
pub use filters::{FilterError, FilterPropertyLink, PropertyFilter, PropertyValue};
pub use layout::{AppView, Layout, SceneSlot};
pub use readiness::ReadinessInputs;
pub use redirect::{Redirect, RedirectReason, RouteSnapshot, decide_redirect};
pub use scenes::{Access, RouteMatch, Scene, SceneConfig};
pub use shell::AppShell;
