// Account endpoints
//
// Registration and login are the only calls made on the anonymous client.
// Login returns the bearer token and user record; storing them is the
// caller's business.

use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};

impl ApiClient {
    /// Create a new account.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, Error> {
        debug!(email = %request.email, "registering account");
        self.post(&["auth", "register"], request).await
    }

    /// Exchange credentials for a bearer token.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, Error> {
        debug!(email = %request.email, "logging in");
        self.post(&["auth", "login"], request).await
    }
}
