// ── Notification collaborator ──
//
// Transient, severity-tagged user messages ("toasts"). API call modules
// raise one on every failure; views raise their own on success.

use std::time::Duration;

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warn,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Colored,
}

/// Optional display hints. Front-ends ignore what they cannot honour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    pub duration: Option<Duration>,
    pub position: Option<Position>,
    pub theme: Option<Theme>,
}

/// Surfaces a message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str, options: &NotifyOptions);

    fn success(&self, message: &str) {
        self.notify(Severity::Success, message, &NotifyOptions::default());
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message, &NotifyOptions::default());
    }

    fn warn(&self, message: &str) {
        self.notify(Severity::Warn, message, &NotifyOptions::default());
    }

    fn info(&self, message: &str) {
        self.notify(Severity::Info, message, &NotifyOptions::default());
    }
}

/// Routes notifications into the log. For headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str, _options: &NotifyOptions) {
        match severity {
            Severity::Error => error!(target: "airq::notify", "{message}"),
            Severity::Warn => warn!(target: "airq::notify", "{message}"),
            Severity::Success | Severity::Info => {
                info!(target: "airq::notify", %severity, "{message}");
            }
        }
    }
}
