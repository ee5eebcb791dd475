// ── Route guard ──
//
// Gates a view until authorization is resolved:
//
//   Pending ─▶ Unauthenticated ─▶ (redirect /login)
//          ├─▶ Unauthorized    ─▶ (redirect /unauthorized)
//          └─▶ Authorized      ─▶ render
//
// Re-evaluated from scratch on every session change; no cycles.

use tokio::sync::watch;
use tracing::debug;

use airq_api::{Role, UserProfile};

use crate::navigate::{Destination, Navigator};
use crate::session::Session;

/// Outcome of evaluating a guard against a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session hydration has not finished. Render nothing, redirect nowhere.
    Pending,
    Unauthenticated,
    Unauthorized,
    Authorized,
}

impl GuardState {
    /// Where this state sends the user, if anywhere.
    pub fn redirect(self) -> Option<Destination> {
        match self {
            Self::Unauthenticated => Some(Destination::Login),
            Self::Unauthorized => Some(Destination::Unauthorized),
            Self::Pending | Self::Authorized => None,
        }
    }
}

/// Authentication and (optional) role requirement for a view.
///
/// Admins satisfy every role requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    required_role: Option<Role>,
}

impl RouteGuard {
    pub fn new(required_role: Option<Role>) -> Self {
        Self { required_role }
    }

    /// Any logged-in user passes.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Only users holding `role` (or admins) pass.
    pub fn require(role: impl Into<Role>) -> Self {
        Self::new(Some(role.into()))
    }

    pub fn required_role(&self) -> Option<&Role> {
        self.required_role.as_ref()
    }

    pub fn set_required_role(&mut self, role: Option<Role>) {
        self.required_role = role;
    }

    /// Classify `session` without side effects.
    pub fn evaluate(&self, session: &Session) -> GuardState {
        if !session.is_initialized {
            return GuardState::Pending;
        }
        let Some(user) = session.user.as_ref().filter(|_| session.is_logged_in()) else {
            return GuardState::Unauthenticated;
        };
        if self.permits(user) {
            GuardState::Authorized
        } else {
            GuardState::Unauthorized
        }
    }

    /// Evaluate and, for the two redirect states, navigate.
    pub fn enforce(&self, session: &Session, navigator: &dyn Navigator) -> GuardState {
        let state = self.evaluate(session);
        if let Some(to) = state.redirect() {
            debug!(?state, %to, required_role = ?self.required_role, "guard redirecting");
            navigator.navigate(to);
        }
        state
    }

    /// Run `child` only when authorized; otherwise render nothing.
    pub fn render<T>(
        &self,
        session: &Session,
        navigator: &dyn Navigator,
        child: impl FnOnce(&UserProfile) -> T,
    ) -> Option<T> {
        match self.enforce(session, navigator) {
            GuardState::Authorized => session.user.as_ref().map(child),
            _ => None,
        }
    }

    /// Wait until the session is initialized, then enforce once.
    ///
    /// Returns [`GuardState::Pending`] if the store is dropped first.
    pub async fn resolve(
        &self,
        session: &mut watch::Receiver<Session>,
        navigator: &dyn Navigator,
    ) -> GuardState {
        let resolved = match session.wait_for(|s| s.is_initialized).await {
            Ok(s) => s.clone(),
            Err(_) => return GuardState::Pending,
        };
        self.enforce(&resolved, navigator)
    }

    /// Re-evaluate on every session change until the store goes away.
    ///
    /// `on_change` sees each distinct state. Redirects fire only on a
    /// transition into a redirect state, not on every notification.
    pub async fn watch(
        &self,
        mut session: watch::Receiver<Session>,
        navigator: &dyn Navigator,
        mut on_change: impl FnMut(GuardState),
    ) {
        let mut last = None;
        loop {
            let state = {
                let current = session.borrow_and_update();
                self.evaluate(&current)
            };
            if last != Some(state) {
                if let Some(to) = state.redirect() {
                    navigator.navigate(to);
                }
                on_change(state);
                last = Some(state);
            }
            if session.changed().await.is_err() {
                return;
            }
        }
    }

    fn permits(&self, user: &UserProfile) -> bool {
        match &self.required_role {
            None => true,
            Some(required) => user.role.is_admin() || user.role == *required,
        }
    }
}
