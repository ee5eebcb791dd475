use thiserror::Error;

/// Top-level error type for the `airq-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, server-reported failures, and payload decoding.
/// `airq-core` turns these into `ApiResult` failures and notifications.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the bearer token (HTTP 401).
    ///
    /// Kept distinct from [`Error::Api`] so a single composition point
    /// can react to it (logout + redirect) without the client knowing.
    #[error("Authentication rejected{}", fmt_message(.message.as_deref()))]
    Unauthenticated { message: Option<String> },

    /// A bearer token could not be encoded as a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A path segment that would not address a single resource (empty,
    /// `.` or `..`), or a base URL that cannot take path segments.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-success response. `message` is the body's `message` field, if any.
    #[error("API error (HTTP {status}){}", fmt_message(.message.as_deref()))]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn fmt_message(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl Error {
    /// Returns `true` if the server rejected our credentials.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// Returns `true` if no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The human-readable message the server sent back, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated { message } | Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthenticated { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
