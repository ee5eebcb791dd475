use airq_api::{NewSensor, Reading, Sensor, SensorUpdate};

use super::{ApiResult, Gateway};

/// Sensor operations on the authenticated client.
#[derive(Debug, Clone, Copy)]
pub struct Sensors<'a> {
    gw: &'a Gateway,
}

impl<'a> Sensors<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> ApiResult<Vec<Sensor>> {
        self.gw
            .call("sensors.list", self.gw.authed(), |c| c.list_sensors())
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Sensor> {
        self.gw
            .call("sensors.get", self.gw.authed(), |c| c.get_sensor(id))
            .await
    }

    /// Recent readings, newest first. `limit` caps the count server-side.
    pub async fn readings(&self, id: &str, limit: Option<u32>) -> ApiResult<Vec<Reading>> {
        self.gw
            .call("sensors.readings", self.gw.authed(), |c| c.sensor_readings(id, limit))
            .await
    }

    pub async fn create(&self, sensor: &NewSensor) -> ApiResult<Sensor> {
        self.gw
            .call("sensors.create", self.gw.authed(), |c| c.create_sensor(sensor))
            .await
    }

    pub async fn update(&self, id: &str, changes: &SensorUpdate) -> ApiResult<Sensor> {
        self.gw
            .call("sensors.update", self.gw.authed(), |c| c.update_sensor(id, changes))
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.gw
            .call_unit("sensors.delete", self.gw.authed(), |c| c.delete_sensor(id))
            .await
    }
}
