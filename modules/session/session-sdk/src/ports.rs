//! Collaborator ports.
//!
//! The session store and the app shell never reach for ambient globals
//! (browser location, analytics singleton, toast container). Each external
//! collaborator is injected through one of these traits.

use serde_json::{Map, Value};
use tokio::sync::watch;
use uuid::Uuid;

/// Identity handed to the error-reporting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedUser {
    pub id: Uuid,
    pub email: String,
}

/// Error-reporting service (crash and exception tracking).
pub trait ErrorReporter: Send + Sync {
    /// Attach the identity to subsequently reported errors.
    fn set_user(&self, user: &ReportedUser);
}

/// Product analytics client.
pub trait Analytics: Send + Sync {
    /// Identifier of the device, stable across identities.
    fn device_id(&self) -> Option<String>;

    /// Identifier events are currently attributed to.
    fn distinct_id(&self) -> Option<String>;

    /// Drop the current identity and start a fresh anonymous one.
    fn reset(&self);

    /// Attribute subsequent events to `distinct_id`.
    fn identify(&self, distinct_id: &str);

    /// Set properties on the identified person.
    fn set_person_properties(&self, properties: &Map<String, Value>);

    /// Attach properties to every subsequent event.
    fn register(&self, properties: &Map<String, Value>);
}

/// Client-side router and page navigation.
pub trait Navigator: Send + Sync {
    /// Path of the current location, without query or fragment.
    fn current_path(&self) -> String;

    /// Soft navigation replacing the current history entry.
    fn replace(&self, path: &str);

    /// Soft navigation adding a history entry.
    fn push(&self, url: &str);

    /// Full page load; all client state is discarded.
    fn assign(&self, url: &str);

    /// Observe location changes, including ones not made through this handle
    /// (history navigation).
    fn subscribe(&self) -> watch::Receiver<String>;
}

/// Toast notification to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identity tag; showing a notification replaces any pending one with the same id.
    pub id: String,
    pub title: String,
    pub body: String,
}

/// Toast notification host.
pub trait Notifier: Send + Sync {
    fn show(&self, notification: &Notification);

    fn dismiss(&self, id: &str);
}
