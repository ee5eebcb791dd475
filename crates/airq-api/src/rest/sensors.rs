// Sensor endpoints
//
// CRUD over registered sensors plus the reading history used by charts.

use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::models::{NewSensor, Reading, Sensor, SensorUpdate};

impl ApiClient {
    /// List all sensors visible to the caller.
    ///
    /// `GET /sensors`
    pub async fn list_sensors(&self) -> Result<Vec<Sensor>, Error> {
        debug!("listing sensors");
        self.get(&["sensors"]).await
    }

    /// `GET /sensors/{id}`
    pub async fn get_sensor(&self, sensor_id: &str) -> Result<Sensor, Error> {
        self.get(&["sensors", sensor_id]).await
    }

    /// `POST /sensors`
    pub async fn create_sensor(&self, sensor: &NewSensor) -> Result<Sensor, Error> {
        debug!(name = %sensor.name, "creating sensor");
        self.post(&["sensors"], sensor).await
    }

    /// `PUT /sensors/{id}`
    pub async fn update_sensor(
        &self,
        sensor_id: &str,
        update: &SensorUpdate,
    ) -> Result<Sensor, Error> {
        debug!(sensor_id, "updating sensor");
        self.put(&["sensors", sensor_id], update).await
    }

    /// `DELETE /sensors/{id}`
    pub async fn delete_sensor(&self, sensor_id: &str) -> Result<(), Error> {
        debug!(sensor_id, "deleting sensor");
        self.delete(&["sensors", sensor_id]).await
    }

    /// Recent readings, newest first.
    ///
    /// `GET /sensors/{id}/readings?limit=N`
    pub async fn sensor_readings(
        &self,
        sensor_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Reading>, Error> {
        let params: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        self.get_with_params(&["sensors", sensor_id, "readings"], &params)
            .await
    }
}
