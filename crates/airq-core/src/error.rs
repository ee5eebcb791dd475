// ── Core error types ──
//
// Setup failures only. Resource calls report through `ApiResult`, form
// checks through `FormErrors`, and session storage never fails outward.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Building an HTTP client failed (bad TLS material, invalid URL).
    #[error("Client setup failed: {0}")]
    Client(#[from] airq_api::Error),
}
