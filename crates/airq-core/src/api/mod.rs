// ── API call modules ──
//
// Per-resource facades over the HTTP clients, normalized to `ApiResult`.

mod gateway;
mod requests;
mod result;
mod sensors;
mod subscriptions;
mod users;

pub use gateway::{GENERIC_FAILURE, Gateway, SESSION_EXPIRED, UNREACHABLE, failure_message};
pub use requests::Requests;
pub use result::ApiResult;
pub use sensors::Sensors;
pub use subscriptions::Subscriptions;
pub use users::Users;
