use airq_api::{NewPlacementRequest, PlacementRequest, RequestStatus};

use super::{ApiResult, Gateway};

/// Community sensor-placement requests. Approval is admin-only server-side.
#[derive(Debug, Clone, Copy)]
pub struct Requests<'a> {
    gw: &'a Gateway,
}

impl<'a> Requests<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> ApiResult<Vec<PlacementRequest>> {
        self.gw
            .call("requests.list", self.gw.authed(), |c| c.list_requests())
            .await
    }

    pub async fn create(&self, request: &NewPlacementRequest) -> ApiResult<PlacementRequest> {
        self.gw
            .call("requests.create", self.gw.authed(), |c| c.create_request(request))
            .await
    }

    pub async fn approve(&self, id: &str) -> ApiResult<()> {
        self.set_status("requests.approve", id, RequestStatus::Approved)
            .await
    }

    pub async fn reject(&self, id: &str) -> ApiResult<()> {
        self.set_status("requests.reject", id, RequestStatus::Rejected)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.gw
            .call_unit("requests.delete", self.gw.authed(), |c| c.delete_request(id))
            .await
    }

    async fn set_status(&self, op: &'static str, id: &str, status: RequestStatus) -> ApiResult<()> {
        self.gw
            .call_unit(op, self.gw.authed(), |c| c.set_request_status(id, status))
            .await
    }
}
