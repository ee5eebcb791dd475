//! Async Rust client for the airq air-quality monitoring REST API.
//!
//! - **[`ApiClient`]**: one `reqwest` client per credential flow:
//!   [`ApiClient::authenticated`] pulls a bearer token from a
//!   [`TokenSource`] before every request, [`ApiClient::anonymous`] never
//!   sends one. Endpoint groups (sensors, subscriptions, placement
//!   requests, users) are inherent methods.
//! - **[`Error`]**: transport outcome taxonomy. HTTP 401 is reported as
//!   [`Error::Unauthenticated`]; reacting to it is left to the caller.
//! - **Models** ([`models`]): wire types shared with `airq-core`.

pub mod auth;
pub mod error;
pub mod rest;
pub mod transport;

pub use auth::{AuthMode, StaticToken, TokenSource};
pub use error::Error;
pub use rest::ApiClient;
pub use rest::models;
pub use rest::models::{
    AlertChannel, AuthResponse, LoginRequest, NewPlacementRequest, NewSensor, NewSubscription,
    PlacementRequest, Reading, RegisterRequest, RequestStatus, Role, Sensor, SensorStatus,
    SensorUpdate, Subscription, UserProfile,
};
pub use transport::{TlsMode, TransportConfig};
