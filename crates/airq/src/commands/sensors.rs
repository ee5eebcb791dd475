//! Sensor command handlers.

use tabled::Tabled;

use airq_api::{Reading, Sensor, SensorStatus};
use airq_core::SensorForm;

use crate::cli::{SensorStatusArg, SensorsArgs, SensorsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Coordinates")]
    coords: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "AQI")]
    aqi: String,
    #[tabled(rename = "Last reading")]
    last_reading: String,
}

impl From<&Sensor> for SensorRow {
    fn from(s: &Sensor) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            location: util::truncate(&s.location, 32),
            coords: util::fmt_coords(s.latitude, s.longitude),
            status: s.status.to_string(),
            aqi: util::fmt_opt(s.aqi),
            last_reading: util::fmt_time(s.last_reading_at),
        }
    }
}

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "AQI")]
    aqi: u32,
    #[tabled(rename = "PM2.5")]
    pm25: String,
    #[tabled(rename = "PM10")]
    pm10: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Humidity %")]
    humidity: String,
}

impl From<&Reading> for ReadingRow {
    fn from(r: &Reading) -> Self {
        Self {
            time: util::fmt_time(Some(r.timestamp)),
            aqi: r.aqi,
            pm25: util::fmt_opt(r.pm25),
            pm10: util::fmt_opt(r.pm10),
            temperature: util::fmt_opt(r.temperature),
            humidity: util::fmt_opt(r.humidity),
        }
    }
}

fn sensor_detail(s: &Sensor) -> String {
    output::detail(&[
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("Location", s.location.clone()),
        ("Coordinates", util::fmt_coords(s.latitude, s.longitude)),
        ("Status", s.status.to_string()),
        ("AQI", util::fmt_opt(s.aqi)),
        ("Last reading", util::fmt_time(s.last_reading_at)),
        ("Owner", s.owner_id.clone().unwrap_or_default()),
    ])
}

fn status(arg: SensorStatusArg) -> SensorStatus {
    match arg {
        SensorStatusArg::Active => SensorStatus::Active,
        SensorStatusArg::Inactive => SensorStatus::Inactive,
        SensorStatusArg::Maintenance => SensorStatus::Maintenance,
    }
}

fn print_sensor(ctx: &Ctx, sensor: &Sensor) {
    let out = output::render_single(ctx.output, sensor, sensor_detail, |s| s.id.clone());
    ctx.print(&out);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SensorsArgs, ctx: &Ctx) -> Result<(), CliError> {
    let sensors = ctx.gateway.sensors();

    match args.command {
        SensorsCommand::List => {
            ctx.require_login().await?;
            let list = ctx.finish(sensors.list().await)?.unwrap_or_default();
            let out = output::render_list(
                ctx.output,
                &list,
                |s| SensorRow::from(s),
                |s| s.id.clone(),
            );
            ctx.print(&out);
            Ok(())
        }

        SensorsCommand::Get { id } => {
            ctx.require_login().await?;
            if let Some(sensor) = ctx.finish(sensors.get(&id).await)? {
                print_sensor(ctx, &sensor);
            }
            Ok(())
        }

        SensorsCommand::Readings { id, limit } => {
            ctx.require_login().await?;
            let readings = ctx
                .finish(sensors.readings(&id, limit).await)?
                .unwrap_or_default();
            let out = output::render_list(ctx.output, &readings, |r| ReadingRow::from(r), |r| {
                format!("{}\t{}", r.timestamp.to_rfc3339(), r.aqi)
            });
            ctx.print(&out);
            Ok(())
        }

        SensorsCommand::Create {
            name,
            location,
            lat,
            lon,
            status: st,
        } => {
            ctx.require_admin().await?;
            let body = SensorForm {
                name,
                location,
                latitude: lat,
                longitude: lon,
                status: st.map(status),
            }
            .into_request()?;

            if let Some(sensor) = ctx.finish(sensors.create(&body).await)? {
                ctx.notifier().success(&format!("Sensor '{}' created", sensor.name));
                print_sensor(ctx, &sensor);
            }
            Ok(())
        }

        SensorsCommand::Update {
            id,
            name,
            location,
            lat,
            lon,
            status: st,
        } => {
            ctx.require_admin().await?;
            let Some(current) = ctx.finish(sensors.get(&id).await)? else {
                return Ok(());
            };
            // Validate the sensor as it will be after the change.
            let body = SensorForm {
                name: name.unwrap_or(current.name),
                location: location.unwrap_or(current.location),
                latitude: lat.unwrap_or(current.latitude),
                longitude: lon.unwrap_or(current.longitude),
                status: Some(st.map_or(current.status, status)),
            }
            .into_update()?;

            if let Some(sensor) = ctx.finish(sensors.update(&id, &body).await)? {
                ctx.notifier().success(&format!("Sensor '{}' updated", sensor.name));
                print_sensor(ctx, &sensor);
            }
            Ok(())
        }

        SensorsCommand::Delete { id } => {
            ctx.require_admin().await?;
            if !util::confirm(&format!("Delete sensor '{id}' and its readings?"), ctx.yes)? {
                return Ok(());
            }
            ctx.finish(sensors.delete(&id).await)?;
            ctx.notifier().success("Sensor deleted");
            Ok(())
        }
    }
}
