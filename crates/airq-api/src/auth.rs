use secrecy::SecretString;

/// Which credential flow a particular [`ApiClient`](crate::ApiClient) uses.
///
/// Marker enum (no data) -- the bearer token itself is pulled from a
/// [`TokenSource`] at send time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Attach `Authorization: Bearer <token>` when a token is available.
    Bearer,
    /// Never attach credentials (registration and login only).
    Anonymous,
}

/// Supplies the current bearer token to an authenticated client.
///
/// Read once per outgoing request, so a token change (login, logout,
/// forced logout on 401) takes effect on the very next call without
/// rebuilding the client.
pub trait TokenSource: Send + Sync {
    /// The token to attach, or `None` to send the request without one.
    fn bearer_token(&self) -> Option<SecretString>;
}

/// A fixed token, for scripts and tests that manage credentials themselves.
#[derive(Debug, Clone)]
pub struct StaticToken(pub SecretString);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}
