// ── Navigation collaborator ──
//
// Guards and the 401 handler hand control to navigation instead of
// rendering. What "navigating" means is up to the front-end.

use std::fmt;

/// Where an authorization failure sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Sign-in. Used both by guards and after a forced logout.
    Login,
    /// Logged in, but lacking the required role.
    Unauthorized,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Unauthorized => "/unauthorized",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Redirects the current view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Destination);
}
