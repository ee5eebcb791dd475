// Alert subscription endpoints

use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::models::{NewSubscription, Subscription};

impl ApiClient {
    /// The current user's subscriptions.
    ///
    /// `GET /subscriptions`
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, Error> {
        self.get(&["subscriptions"]).await
    }

    /// `POST /subscriptions`
    pub async fn create_subscription(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, Error> {
        debug!(sensor_id = %subscription.sensor_id, "subscribing to sensor");
        self.post(&["subscriptions"], subscription).await
    }

    /// `DELETE /subscriptions/{id}`
    pub async fn delete_subscription(&self, subscription_id: &str) -> Result<(), Error> {
        debug!(subscription_id, "unsubscribing");
        self.delete(&["subscriptions", subscription_id])
            .await
    }
}
