//! Session, authorization, and API call layer between `airq-api` and
//! front-ends (the `airq` CLI, or any embedding UI).
//!
//! - **[`SessionStore`]**: who is logged in. State lives in a
//!   `tokio::sync::watch` channel; persistence goes through a
//!   [`SessionStorage`] ([`FileStorage`] or [`MemoryStorage`]).
//!   Never fails: corrupt or unreadable storage degrades to logged out.
//!
//! - **[`RouteGuard`]**: gates a view on initialization, login, and an
//!   optional role, redirecting through a [`Navigator`]. Admins pass
//!   every role check.
//!
//! - **[`Gateway`]**: the single composition point. Wraps the
//!   authenticated and anonymous clients, normalizes every call into an
//!   [`ApiResult`], notifies on failure via a [`Notifier`], and turns a
//!   401 into logout plus a redirect to [`Destination::Login`].
//!
//! - **Forms** ([`forms`]): `validator` schemas checked before any
//!   request is built.

pub mod api;
pub mod error;
pub mod forms;
pub mod guard;
pub mod navigate;
pub mod notify;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{ApiResult, Gateway};
pub use error::CoreError;
pub use forms::{
    FormErrors, LoginForm, PlacementRequestForm, RegisterForm, SensorForm, SubscriptionForm,
};
pub use guard::{GuardState, RouteGuard};
pub use navigate::{Destination, Navigator};
pub use notify::{Notifier, NotifyOptions, Position, Severity, Theme, TracingNotifier};
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore, StorageKey};
