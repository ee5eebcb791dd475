// ── Session store ──
//
// Single source of truth for "who is logged in". The current `Session`
// lives in a `watch` channel so guards and views can react to changes;
// persisted storage is written and cleared only from here.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use airq_api::{TokenSource, UserProfile};

use super::Session;
use super::storage::{MemoryStorage, SessionStorage, StorageKey};

/// Process-wide session state, shared by reference (usually in an `Arc`).
///
/// Every operation takes `&self`, never fails, and is safe to call from
/// outside any view -- e.g. from the HTTP layer after a 401. Storage
/// problems are logged and degrade to "not logged in" rather than
/// propagating.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<Session>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("is_initialized", &session.is_initialized)
            .field("is_logged_in", &session.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty, uninitialized store over the given storage.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self { storage, state }
    }

    /// A store whose persistence lasts only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    // ── Observation ──────────────────────────────────────────────────

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribe to session changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().is_initialized
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Hydrate from persisted storage.
    ///
    /// Populates the session only when both the token and a parseable user
    /// record are present; anything missing, malformed, or unreadable leaves
    /// the session empty, and malformed leftovers are cleared. Always marks
    /// the store initialized.
    /// Once initialized, further calls change nothing.
    pub fn initialize(&self) {
        if self.state.borrow().is_initialized {
            debug!("session already initialized");
            return;
        }

        let hydration = self.hydrate();
        let corrupt = matches!(hydration, Hydration::Corrupt);
        let mut logged_in = false;

        let applied = self.state.send_if_modified(|session| {
            // A concurrent login may have won the race; keep its state.
            if session.is_initialized {
                return false;
            }
            if let Hydration::Restored(token, user) = hydration {
                session.token = Some(token);
                session.user = Some(user);
                logged_in = true;
            }
            session.is_initialized = true;
            true
        });

        if applied {
            if corrupt {
                self.clear_storage();
            }
            info!(logged_in, "session initialized");
        }
    }

    /// Replace any existing session with a freshly authenticated one.
    pub fn login(&self, token: SecretString, user: UserProfile) {
        self.persist(StorageKey::Token, token.expose_secret());
        self.persist_user(&user);

        info!(user_id = %user.id, role = %user.role, "logged in");
        self.state.send_modify(|session| {
            session.token = Some(token);
            session.user = Some(user);
            session.is_initialized = true;
        });
    }

    /// Merge `changes` into the current user record and persist it.
    ///
    /// Returns `false` (and does nothing) when nobody is logged in, or when
    /// the merged record would no longer be a valid profile.
    pub fn user_update(&self, changes: &Map<String, Value>) -> bool {
        let mut merged = None;

        self.state.send_if_modified(|session| {
            let Some(user) = session.user.as_mut() else {
                debug!("user update ignored: no current user");
                return false;
            };
            match merge_user(user, changes) {
                Ok(updated) => {
                    let changed = *user != updated;
                    *user = updated.clone();
                    merged = Some(updated);
                    changed
                }
                Err(e) => {
                    warn!(error = %e, "user update rejected: merged profile is invalid");
                    false
                }
            }
        });

        match merged {
            Some(user) => {
                self.persist_user(&user);
                true
            }
            None => false,
        }
    }

    /// Forget the current session, in memory and in storage.
    ///
    /// The store stays initialized: a logged-out state is a resolved state.
    pub fn logout(&self) {
        self.clear_storage();

        let was_logged_in = self.state.send_if_modified(|session| {
            if session.is_empty() {
                return false;
            }
            session.token = None;
            session.user = None;
            true
        });

        if was_logged_in {
            info!("logged out");
        }
    }

    // ── Storage helpers ──────────────────────────────────────────────

    fn hydrate(&self) -> Hydration {
        let token = match self.storage.read(StorageKey::Token) {
            Ok(Some(token)) if !token.trim().is_empty() => token.trim().to_owned(),
            Ok(_) => {
                debug!("no persisted session token");
                return Hydration::Absent;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted token");
                return Hydration::Unreadable;
            }
        };

        let raw_user = match self.storage.read(StorageKey::User) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!("persisted token without a user record; discarding");
                return Hydration::Corrupt;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted user");
                return Hydration::Unreadable;
            }
        };

        match serde_json::from_str::<UserProfile>(&raw_user) {
            Ok(user) => Hydration::Restored(SecretString::from(token), user),
            Err(e) => {
                warn!(error = %e, "persisted user record is malformed; discarding");
                Hydration::Corrupt
            }
        }
    }

    fn persist(&self, key: StorageKey, value: &str) {
        if let Err(e) = self.storage.write(key, value) {
            warn!(key = %key, error = %e, "failed to persist session entry");
        }
    }

    fn persist_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(json) => self.persist(StorageKey::User, &json),
            Err(e) => warn!(error = %e, "failed to serialize user record"),
        }
    }

    fn clear_storage(&self) {
        for key in [StorageKey::Token, StorageKey::User] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key = %key, error = %e, "failed to clear session entry");
            }
        }
    }
}

impl TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<SecretString> {
        self.state.borrow().token.clone()
    }
}

/// Outcome of reading the persisted session.
enum Hydration {
    Restored(SecretString, UserProfile),
    Absent,
    /// Partial or malformed entries; cleared so storage agrees with memory.
    Corrupt,
    /// Storage itself failed; left untouched for the next process.
    Unreadable,
}

/// Shallow-merge `changes` over `user`'s JSON form.
fn merge_user(user: &UserProfile, changes: &Map<String, Value>) -> serde_json::Result<UserProfile> {
    let mut value = serde_json::to_value(user)?;
    if let Value::Object(fields) = &mut value {
        for (k, v) in changes {
            fields.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(value)
}
