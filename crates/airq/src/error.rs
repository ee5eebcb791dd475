//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use airq_config::ConfigError;
use airq_core::{CoreError, FormErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const PERMISSION: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Authorization ────────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(airq::login_required),
        help("Run: airq login")
    )]
    LoginRequired,

    #[error("This command requires the {role} role")]
    #[diagnostic(
        code(airq::forbidden),
        help("Ask an administrator to grant you access.")
    )]
    Forbidden { role: String },

    // ── API ──────────────────────────────────────────────────────────
    /// The failure was already shown to the user by the notifier.
    #[error("{message}")]
    #[diagnostic(code(airq::request_failed))]
    RequestFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid input")]
    #[diagnostic(code(airq::validation), help("{errors}"))]
    Form { errors: FormErrors },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(airq::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(airq::config),
        help("Check the file printed by `airq config path`, or run: airq config init")
    )]
    Config(#[from] ConfigError),

    #[error("Could not set up the API client: {0}")]
    #[diagnostic(
        code(airq::client_setup),
        help("Check api_url and ca_cert in your configuration.")
    )]
    ClientSetup(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(
        code(airq::prompt),
        help("Pass the value as a flag in non-interactive contexts.")
    )]
    Prompt(String),

    // ── IO ───────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoginRequired => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::Form { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Whether the notifier has already shown this to the user.
    pub fn already_reported(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }
}

impl From<FormErrors> for CliError {
    fn from(errors: FormErrors) -> Self {
        Self::Form { errors }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Client(e) => Self::ClientSetup(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::LoginRequired.exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::Forbidden {
                role: "ADMIN".into()
            }
            .exit_code(),
            exit_code::PERMISSION
        );
        assert_eq!(
            CliError::from(FormErrors::default()).exit_code(),
            exit_code::USAGE
        );
        let failed = CliError::RequestFailed {
            message: "Sensor not found".into(),
        };
        assert_eq!(failed.exit_code(), exit_code::GENERAL);
        assert!(failed.already_reported());
    }

    #[test]
    fn client_setup_failure_is_general() {
        let err = CliError::from(CoreError::Client(airq_api::Error::Tls(
            "bad certificate".into(),
        )));
        assert!(matches!(err, CliError::ClientSetup(ref m) if m.contains("bad certificate")));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert!(!err.already_reported());
    }
}
