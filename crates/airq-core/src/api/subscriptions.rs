use airq_api::{NewSubscription, Subscription};

use super::{ApiResult, Gateway};

/// Alert subscriptions belonging to the current user.
#[derive(Debug, Clone, Copy)]
pub struct Subscriptions<'a> {
    gw: &'a Gateway,
}

impl<'a> Subscriptions<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> ApiResult<Vec<Subscription>> {
        self.gw
            .call("subscriptions.list", self.gw.authed(), |c| c.list_subscriptions())
            .await
    }

    pub async fn create(&self, subscription: &NewSubscription) -> ApiResult<Subscription> {
        self.gw
            .call("subscriptions.create", self.gw.authed(), |c| c.create_subscription(subscription))
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.gw
            .call_unit("subscriptions.delete", self.gw.authed(), |c| c.delete_subscription(id))
            .await
    }
}
