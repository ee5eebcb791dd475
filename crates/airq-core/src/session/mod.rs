// ── Client session ──
//
// Who is logged in, and how that survives a restart.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, StorageKey};
pub use store::SessionStore;

use secrecy::{ExposeSecret, SecretString};

use airq_api::UserProfile;

/// The client's record of the current authenticated user and credential.
///
/// There is no stored `is_logged_in` flag: [`is_logged_in`](Self::is_logged_in)
/// is derived from `token` and `user`, so it cannot disagree with them.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<SecretString>,
    pub user: Option<UserProfile>,
    /// Set once hydration from storage has been attempted. Never reset.
    pub is_initialized: bool,
}

impl Session {
    /// `true` iff both a token and a user are present.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// `true` when neither credential nor user is held.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        let tokens_match = match (&self.token, &other.token) {
            (Some(a), Some(b)) => a.expose_secret() == b.expose_secret(),
            (None, None) => true,
            _ => false,
        };
        tokens_match && self.user == other.user && self.is_initialized == other.is_initialized
    }
}
