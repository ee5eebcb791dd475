// REST API client (bearer-token auth, JSON bodies)

pub mod auth;
pub mod client;
pub mod models;
pub mod requests;
pub mod sensors;
pub mod subscriptions;
pub mod users;

pub use client::ApiClient;
