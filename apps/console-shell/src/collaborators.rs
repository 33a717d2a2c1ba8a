//! Log-backed implementations of the session side-effect ports.
//!
//! The command-line host has no browser, analytics SDK or toast host; every
//! side effect is emitted as a tracing event instead.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use session::SessionCollaborators;
use session_sdk::{Analytics, ErrorReporter, Navigator, Notification, Notifier, ReportedUser};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn set_user(&self, user: &ReportedUser) {
        info!(user_id = %user.id, "error reporter user set");
    }
}

/// Analytics identity kept in memory, anonymous until identified.
pub struct LogAnalytics {
    identity: Mutex<Identity>,
}

struct Identity {
    device_id: String,
    distinct_id: String,
}

impl Identity {
    fn anonymous() -> Self {
        let device_id = Uuid::new_v4().to_string();
        Self {
            distinct_id: device_id.clone(),
            device_id,
        }
    }
}

impl LogAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: Mutex::new(Identity::anonymous()),
        }
    }
}

impl Default for LogAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl Analytics for LogAnalytics {
    fn device_id(&self) -> Option<String> {
        Some(self.identity.lock().device_id.clone())
    }

    fn distinct_id(&self) -> Option<String> {
        Some(self.identity.lock().distinct_id.clone())
    }

    fn reset(&self) {
        *self.identity.lock() = Identity::anonymous();
        info!("analytics identity reset");
    }

    fn identify(&self, distinct_id: &str) {
        distinct_id.clone_into(&mut self.identity.lock().distinct_id);
        info!(distinct_id, "analytics identify");
    }

    fn set_person_properties(&self, properties: &Map<String, Value>) {
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        debug!(?keys, "analytics person properties set");
    }

    fn register(&self, properties: &Map<String, Value>) {
        info!(properties = %serde_json::Value::Object(properties.clone()), "analytics super properties registered");
    }
}

/// In-memory location standing in for the browser history.
pub struct ConsoleNavigator {
    location: watch::Sender<String>,
}

impl ConsoleNavigator {
    #[must_use]
    pub fn new(location: &str) -> Self {
        Self {
            location: watch::Sender::new(location.to_owned()),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn current_path(&self) -> String {
        self.location.borrow().clone()
    }

    fn replace(&self, path: &str) {
        info!(to = path, "navigation replaced");
        self.location.send_replace(path.to_owned());
    }

    fn push(&self, url: &str) {
        info!(to = url, "navigation pushed");
        self.location.send_replace(url.to_owned());
    }

    fn assign(&self, url: &str) {
        info!(to = url, "full page navigation");
        self.location.send_replace(url.to_owned());
    }

    fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, notification: &Notification) {
        info!(id = %notification.id, title = %notification.title, "{}", notification.body);
    }

    fn dismiss(&self, id: &str) {
        debug!(id, "notification dismissed");
    }
}

/// Wire the log-backed collaborators around the given navigator.
#[must_use]
pub fn log_collaborators(navigator: Arc<ConsoleNavigator>) -> SessionCollaborators {
    SessionCollaborators {
        error_reporter: Arc::new(LogErrorReporter),
        analytics: Arc::new(LogAnalytics::new()),
        navigator,
        notifier: Arc::new(LogNotifier),
    }
}
