#![allow(clippy::unwrap_used)]
// Integration tests for `Gateway` against a wiremock backend.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use airq_api::{LoginRequest, TransportConfig, UserProfile};
use airq_core::api::{GENERIC_FAILURE, SESSION_EXPIRED, UNREACHABLE};
use airq_core::{
    ApiResult, Destination, Gateway, MemoryStorage, Navigator, Notifier, NotifyOptions,
    SessionStorage, SessionStore, Severity, StorageKey,
};

// ── Recording collaborators ─────────────────────────────────────────

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<(Severity, String)>>);

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str, _options: &NotifyOptions) {
        self.0.lock().unwrap().push((severity, message.to_owned()));
    }
}

impl RecordingNotifier {
    fn seen(&self) -> Vec<(Severity, String)> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<Destination>>);

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: Destination) {
        self.0.lock().unwrap().push(to);
    }
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<Destination> {
        self.0.lock().unwrap().clone()
    }
}

struct Harness {
    server: MockServer,
    gateway: Gateway,
    storage: Arc<MemoryStorage>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

fn user(role: &str) -> UserProfile {
    serde_json::from_value(json!({ "id": "u1", "email": "ada@example.com", "role": role }))
        .unwrap()
}

async fn setup() -> Harness {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    gateway_for(server, base_url)
}

fn gateway_for(server: MockServer, base_url: Url) -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.initialize();
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let gateway = Gateway::new(
        base_url,
        &TransportConfig::default(),
        session,
        notifier.clone(),
        navigator.clone(),
    )
    .unwrap();
    Harness {
        server,
        gateway,
        storage,
        notifier,
        navigator,
    }
}

async fn logged_in() -> Harness {
    let h = setup().await;
    h.gateway
        .session()
        .login(SecretString::from("tok-1".to_owned()), user("VIEWER"));
    h
}

// ── Success paths ───────────────────────────────────────────────────

#[tokio::test]
async fn test_success_wraps_body_and_sends_token() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s-1", "name": "Pier", "latitude": 1.0, "longitude": 2.0 }
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    let result = h.gateway.sensors().list().await;
    assert!(result.is_success());
    assert_eq!(result.data().unwrap()[0].name, "Pier");
    assert!(h.notifier.seen().is_empty());
}

#[tokio::test]
async fn test_delete_has_no_data() {
    let h = logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/api/subscriptions/sub-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&h.server)
        .await;

    let result = h.gateway.subscriptions().delete("sub-1").await;
    assert_eq!(result, ApiResult::done());
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "success": true })
    );
}

#[tokio::test]
async fn test_login_starts_session() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "pw123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "user": { "id": "u1", "email": "ada@example.com", "role": "ADMIN" }
        })))
        .mount(&h.server)
        .await;

    let result = h
        .gateway
        .users()
        .login(&LoginRequest {
            email: "ada@example.com".into(),
            password: "pw123456".to_owned().into(),
        })
        .await;

    assert!(result.data().unwrap().role.is_admin());
    let session = h.gateway.session().snapshot();
    assert!(session.is_logged_in());
    assert_eq!(session.token.unwrap().expose_secret(), "fresh-token");
    assert_eq!(
        h.storage.read(StorageKey::Token).unwrap().as_deref(),
        Some("fresh-token")
    );
}

#[tokio::test]
async fn test_update_profile_merges_into_session() {
    let h = logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/api/users/me"))
        .and(body_json(json!({ "name": "Grace" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1", "email": "ada@example.com", "name": "Grace", "role": "VIEWER"
        })))
        .mount(&h.server)
        .await;

    let changes = json!({ "name": "Grace" }).as_object().cloned().unwrap();
    let result = h.gateway.users().update_profile(&changes).await;

    assert!(result.is_success());
    let current = h.gateway.session().current_user().unwrap();
    assert_eq!(current.name.as_deref(), Some("Grace"));
}

// ── Failure paths ───────────────────────────────────────────────────

#[tokio::test]
async fn test_401_logs_out_and_redirects_once() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    let result = h.gateway.subscriptions().list().await;

    assert_eq!(result.error(), Some(SESSION_EXPIRED));
    assert_eq!(h.navigator.visits(), vec![Destination::Login]);
    assert_eq!(
        h.notifier.seen(),
        vec![(Severity::Error, SESSION_EXPIRED.to_owned())]
    );

    let session = h.gateway.session().snapshot();
    assert!(session.is_empty());
    assert!(session.is_initialized);
    assert_eq!(h.storage.read(StorageKey::Token).unwrap(), None);
    assert_eq!(h.storage.read(StorageKey::User).unwrap(), None);
}

#[tokio::test]
async fn test_401_with_message_uses_server_text() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&h.server)
        .await;

    let result = h.gateway.users().me().await;
    assert_eq!(result.error(), Some("Token expired"));
    assert!(!h.gateway.session().is_logged_in());
}

#[tokio::test]
async fn test_server_message_surfaced_verbatim() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Sensor not found" })),
        )
        .mount(&h.server)
        .await;

    let result = h.gateway.sensors().get("missing").await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "success": false, "error": "Sensor not found" })
    );
    assert_eq!(
        h.notifier.seen(),
        vec![(Severity::Error, "Sensor not found".to_owned())]
    );
    // Non-401 failures leave the session alone.
    assert!(h.gateway.session().is_logged_in());
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_failed_login_does_not_touch_session() {
    let h = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Invalid email or password" })),
        )
        .mount(&h.server)
        .await;

    let result = h
        .gateway
        .users()
        .login(&LoginRequest {
            email: "ada@example.com".into(),
            password: "wrong".to_owned().into(),
        })
        .await;

    assert_eq!(result.error(), Some("Invalid email or password"));
    assert!(h.gateway.session().is_logged_in());
    assert!(h.navigator.visits().is_empty());
    assert_eq!(h.notifier.seen().len(), 1);
}

#[tokio::test]
async fn test_generic_fallback_without_message() {
    let h = logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/api/requests/r-1/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&h.server)
        .await;

    let result = h.gateway.requests().approve("r-1").await;
    assert_eq!(result.error(), Some(GENERIC_FAILURE));
}

#[tokio::test]
async fn test_unreachable_fallback() {
    let server = MockServer::start().await;
    // Nothing listens on port 1.
    let h = gateway_for(server, Url::parse("http://127.0.0.1:1/api").unwrap());

    let result = h.gateway.sensors().list().await;
    assert_eq!(result.error(), Some(UNREACHABLE));
    assert_eq!(h.notifier.seen(), vec![(Severity::Error, UNREACHABLE.to_owned())]);
}
