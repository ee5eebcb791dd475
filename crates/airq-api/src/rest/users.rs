// User endpoints
//
// The current user's profile plus admin-only account management.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::models::{Role, UserProfile};

impl ApiClient {
    /// Fetch the profile behind the current token.
    ///
    /// `GET /users/me`
    pub async fn current_user(&self) -> Result<UserProfile, Error> {
        self.get(&["users", "me"]).await
    }

    /// Patch the current user's profile with the given fields.
    ///
    /// `PATCH /users/me` -- returns the full updated record.
    pub async fn update_current_user(
        &self,
        changes: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<UserProfile, Error> {
        debug!(fields = ?changes.keys().collect::<Vec<_>>(), "updating profile");
        self.patch(&["users", "me"], changes).await
    }

    /// List every account (admin only).
    ///
    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, Error> {
        self.get(&["users"]).await
    }

    /// Change a user's role (admin only).
    ///
    /// `PATCH /users/{id}/role` with `{"role": "..."}`
    pub async fn set_user_role(&self, user_id: &str, role: &Role) -> Result<UserProfile, Error> {
        debug!(user_id, %role, "changing user role");
        self.patch(&["users", user_id, "role"], &json!({ "role": role }))
            .await
    }

    /// Remove an account (admin only).
    ///
    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        debug!(user_id, "deleting user");
        self.delete(&["users", user_id]).await
    }
}
