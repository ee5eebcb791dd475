// Account operations. Registration and login go through the anonymous
// client; a successful login is the only place a session is created.

use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::warn;

use airq_api::{LoginRequest, RegisterRequest, Role, UserProfile};

use super::{ApiResult, Gateway};

#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    gw: &'a Gateway,
}

impl<'a> Users<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<UserProfile> {
        self.gw
            .call("users.register", self.gw.anon(), |c| c.register(request))
            .await
    }

    /// Exchange credentials for a token and start a session.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<UserProfile> {
        let result = self
            .gw
            .call("users.login", self.gw.anon(), |c| c.login(request))
            .await;

        result.map(|auth| {
            self.gw
                .session()
                .login(SecretString::from(auth.token), auth.user.clone());
            auth.user
        })
    }

    /// End the session locally. No server round-trip.
    pub fn logout(&self) {
        self.gw.session().logout();
    }

    /// The profile behind the current token.
    pub async fn me(&self) -> ApiResult<UserProfile> {
        self.gw
            .call("users.me", self.gw.authed(), |c| c.current_user())
            .await
    }

    /// Patch the current profile and fold the server's record into the session.
    pub async fn update_profile(&self, changes: &Map<String, Value>) -> ApiResult<UserProfile> {
        let result = self
            .gw
            .call("users.update_profile", self.gw.authed(), |c| c.update_current_user(changes))
            .await;

        if let Some(user) = result.data() {
            match serde_json::to_value(user) {
                Ok(Value::Object(record)) => {
                    self.gw.session().user_update(&record);
                }
                Ok(_) | Err(_) => warn!("updated profile could not be merged into the session"),
            }
        }
        result
    }

    pub async fn list(&self) -> ApiResult<Vec<UserProfile>> {
        self.gw
            .call("users.list", self.gw.authed(), |c| c.list_users())
            .await
    }

    pub async fn set_role(&self, id: &str, role: &Role) -> ApiResult<UserProfile> {
        self.gw
            .call("users.set_role", self.gw.authed(), |c| c.set_user_role(id, role))
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.gw
            .call_unit("users.delete", self.gw.authed(), |c| c.delete_user(id))
            .await
    }
}
