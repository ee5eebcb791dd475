//! Terminal notifications: one colored line on stderr per message.

use owo_colors::OwoColorize;

use airq_core::{Notifier, NotifyOptions, Severity};

#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    color: bool,
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    fn line(&self, severity: Severity, message: &str) -> String {
        let (marker, label) = match severity {
            Severity::Success => ("✓", "ok"),
            Severity::Error => ("✗", "error"),
            Severity::Warn => ("!", "warning"),
            Severity::Info => ("·", "info"),
        };
        if !self.color {
            return format!("{label}: {message}");
        }
        let marker = match severity {
            Severity::Success => marker.green().bold().to_string(),
            Severity::Error => marker.red().bold().to_string(),
            Severity::Warn => marker.yellow().bold().to_string(),
            Severity::Info => marker.cyan().to_string(),
        };
        format!("{marker} {message}")
    }
}

impl Notifier for TerminalNotifier {
    // Display hints have no terminal equivalent.
    fn notify(&self, severity: Severity, message: &str, _options: &NotifyOptions) {
        if self.quiet && severity != Severity::Error {
            return;
        }
        eprintln!("{}", self.line(severity, message));
    }
}
