//! A one-shot command cannot switch views, so a redirect is recorded and
//! turned into an exit status by the dispatcher.

use std::sync::Mutex;

use tracing::debug;

use airq_core::{Destination, Navigator};

use crate::error::CliError;

#[derive(Debug, Default)]
pub struct RedirectRecorder {
    pending: Mutex<Option<Destination>>,
}

impl RedirectRecorder {
    /// The most recent redirect, clearing it.
    pub fn take(&self) -> Option<Destination> {
        self.pending.lock().ok().and_then(|mut p| p.take())
    }
}

impl Navigator for RedirectRecorder {
    fn navigate(&self, to: Destination) {
        debug!(%to, "redirect requested");
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(to);
        }
    }
}

/// The error a redirect amounts to on the command line.
pub fn redirect_error(to: Destination, required_role: Option<&str>) -> CliError {
    match to {
        Destination::Login => CliError::LoginRequired,
        Destination::Unauthorized => CliError::Forbidden {
            role: required_role.unwrap_or("required").to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears() {
        let nav = RedirectRecorder::default();
        assert_eq!(nav.take(), None);
        nav.navigate(Destination::Unauthorized);
        nav.navigate(Destination::Login);
        assert_eq!(nav.take(), Some(Destination::Login));
        assert_eq!(nav.take(), None);
    }

    #[test]
    fn redirects_map_to_exit_codes() {
        assert_eq!(redirect_error(Destination::Login, None).exit_code(), 3);
        assert_eq!(
            redirect_error(Destination::Unauthorized, Some("ADMIN")).exit_code(),
            5
        );
    }
}
