// ── API gateway ──
//
// The one place that wires the HTTP clients to the session, the
// notifier, and the navigator. Clients report a 401 as a distinct error
// kind; only this module reacts to it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use airq_api::{ApiClient, AuthMode, Error, TokenSource, TransportConfig};

use super::ApiResult;
use super::requests::Requests;
use super::sensors::Sensors;
use super::subscriptions::Subscriptions;
use super::users::Users;
use crate::error::CoreError;
use crate::navigate::{Destination, Navigator};
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Shown when the server failed without saying why.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
/// Shown when no response was received at all.
pub const UNREACHABLE: &str = "Unable to reach the server. Check your connection and try again.";
/// Shown when a bearer request is rejected without a server message.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Resource calls normalized to [`ApiResult`].
///
/// Owns the authenticated and anonymous clients. Every failure is logged,
/// surfaced through the [`Notifier`] exactly once, and returned as
/// [`ApiResult::Failure`]; nothing escapes as an `Err`. A 401 on the
/// authenticated client additionally logs the session out and navigates
/// to [`Destination::Login`].
pub struct Gateway {
    authed: ApiClient,
    anon: ApiClient,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.authed.base_url().as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Build both clients against `base_url`; the authenticated one reads
    /// its token from `session`.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        let tokens: Arc<dyn TokenSource> = session.clone();
        let authed = ApiClient::authenticated(base_url.clone(), transport, tokens)?;
        let anon = ApiClient::anonymous(base_url, transport)?;
        Ok(Self::from_clients(authed, anon, session, notifier, navigator))
    }

    /// Assemble from pre-built clients.
    pub fn from_clients(
        authed: ApiClient,
        anon: ApiClient,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            authed,
            anon,
            session,
            notifier,
            navigator,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    // ── Resource facades ─────────────────────────────────────────────

    pub fn sensors(&self) -> Sensors<'_> {
        Sensors::new(self)
    }

    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(self)
    }

    pub fn requests(&self) -> Requests<'_> {
        Requests::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    // ── Normalization ────────────────────────────────────────────────

    pub(crate) fn authed(&self) -> &ApiClient {
        &self.authed
    }

    pub(crate) fn anon(&self) -> &ApiClient {
        &self.anon
    }

    /// Issue `call` on `client` and wrap its body. A 401 is treated as an
    /// expired session only when `client` sends bearer credentials.
    pub(crate) async fn call<'a, T, F, Fut>(
        &self,
        op: &'static str,
        client: &'a ApiClient,
        call: F,
    ) -> ApiResult<T>
    where
        F: FnOnce(&'a ApiClient) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        match call(client).await {
            Ok(data) => {
                debug!(op, "api call succeeded");
                ApiResult::ok(data)
            }
            Err(e) => self.fail(op, &e, client.mode()),
        }
    }

    /// Like [`call`](Self::call) for operations with no meaningful payload.
    pub(crate) async fn call_unit<'a, F, Fut>(
        &self,
        op: &'static str,
        client: &'a ApiClient,
        call: F,
    ) -> ApiResult<()>
    where
        F: FnOnce(&'a ApiClient) -> Fut,
        Fut: Future<Output = Result<(), Error>>,
    {
        match call(client).await {
            Ok(()) => {
                debug!(op, "api call succeeded");
                ApiResult::done()
            }
            Err(e) => self.fail(op, &e, client.mode()),
        }
    }

    fn fail<T>(&self, op: &'static str, err: &Error, mode: AuthMode) -> ApiResult<T> {
        if err.is_unauthenticated() && mode == AuthMode::Bearer {
            warn!(op, "credentials rejected; ending session");
            self.session.logout();
            self.navigator.navigate(Destination::Login);
        }

        let message = failure_message(err, mode);
        warn!(op, error = %err, status = ?err.status(), "api call failed");
        self.notifier.error(&message);
        ApiResult::failure(message)
    }
}

/// The user-facing text for a failed call.
///
/// The server's `message` wins when present; otherwise a fallback chosen
/// by failure kind.
pub fn failure_message(err: &Error, mode: AuthMode) -> String {
    if let Some(message) = err.server_message() {
        return message.to_owned();
    }
    match err {
        Error::Transport(e) if e.status().is_none() => UNREACHABLE.to_owned(),
        Error::Unauthenticated { .. } if mode == AuthMode::Bearer => SESSION_EXPIRED.to_owned(),
        _ => GENERIC_FAILURE.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use secrecy::SecretString;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::notify::TracingNotifier;
    use crate::session::MemoryStorage;

    #[derive(Default)]
    struct Visits(Mutex<Vec<Destination>>);

    impl Navigator for Visits {
        fn navigate(&self, to: Destination) {
            self.0.lock().unwrap().push(to);
        }
    }

    #[test]
    fn server_message_wins() {
        let err = Error::Api {
            status: 404,
            message: Some("Sensor not found".into()),
        };
        assert_eq!(failure_message(&err, AuthMode::Bearer), "Sensor not found");

        let err = Error::Unauthenticated {
            message: Some("Token expired".into()),
        };
        assert_eq!(failure_message(&err, AuthMode::Bearer), "Token expired");
    }

    #[test]
    fn fallbacks_by_kind() {
        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(failure_message(&err, AuthMode::Bearer), GENERIC_FAILURE);

        let err = Error::Unauthenticated { message: None };
        assert_eq!(failure_message(&err, AuthMode::Bearer), SESSION_EXPIRED);
        assert_eq!(failure_message(&err, AuthMode::Anonymous), GENERIC_FAILURE);

        let err = Error::Deserialization {
            message: "expected value".into(),
            body: String::new(),
        };
        assert_eq!(failure_message(&err, AuthMode::Anonymous), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn expiry_follows_the_client_that_was_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        session.initialize();
        let profile = serde_json::from_value(serde_json::json!({
            "id": "u1", "email": "ada@example.com", "role": "VIEWER"
        }))
        .unwrap();
        session.login(SecretString::from("tok-1".to_owned()), profile);
        let visits = Arc::new(Visits::default());
        let gw = Gateway::new(
            base_url,
            &TransportConfig::default(),
            session.clone(),
            Arc::new(TracingNotifier),
            visits.clone(),
        )
        .unwrap();

        let anon = gw.call("me", gw.anon(), |c| c.current_user()).await;
        assert_eq!(anon.error(), Some(GENERIC_FAILURE));
        assert!(session.is_logged_in());
        assert!(visits.0.lock().unwrap().is_empty());

        let authed = gw.call("me", gw.authed(), |c| c.current_user()).await;
        assert_eq!(authed.error(), Some(SESSION_EXPIRED));
        assert!(!session.is_logged_in());
        assert_eq!(*visits.0.lock().unwrap(), vec![Destination::Login]);
    }
}
