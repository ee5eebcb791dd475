// Community sensor-placement request endpoints
//
// Anyone logged in may file a request; approving or rejecting one is an
// admin action enforced server-side.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::models::{NewPlacementRequest, PlacementRequest, RequestStatus};

impl ApiClient {
    /// `GET /requests`
    pub async fn list_requests(&self) -> Result<Vec<PlacementRequest>, Error> {
        self.get(&["requests"]).await
    }

    /// `POST /requests`
    pub async fn create_request(
        &self,
        request: &NewPlacementRequest,
    ) -> Result<PlacementRequest, Error> {
        debug!(lat = request.latitude, lon = request.longitude, "filing placement request");
        self.post(&["requests"], request).await
    }

    /// Move a request to `approved` or `rejected`.
    ///
    /// `PATCH /requests/{id}/status` with `{"status": "..."}`
    pub async fn set_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<(), Error> {
        debug!(request_id, %status, "updating request status");
        self.patch_no_response(
            &["requests", request_id, "status"],
            &json!({ "status": status }),
        )
        .await
    }

    /// `DELETE /requests/{id}`
    pub async fn delete_request(&self, request_id: &str) -> Result<(), Error> {
        debug!(request_id, "deleting placement request");
        self.delete(&["requests", request_id]).await
    }
}
