//! `sensors` command: project the sensor set from one fetch.

use std::collections::BTreeMap;

use serde::Serialize;
use tabled::Tabled;

use spyder_core::{DeviceClass, Sensor, SensorValue, StateClass, build_sensors};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// One projected reading, fully resolved against the fetched document.
#[derive(Serialize)]
struct SensorReading {
    unique_id: String,
    name: String,
    value: SensorValue,
    unit: Option<&'static str>,
    device_class: Option<DeviceClass>,
    state_class: Option<StateClass>,
    attributes: BTreeMap<&'static str, serde_json::Value>,
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "UNIT")]
    unit: String,
}

impl SensorRow {
    fn new(reading: &SensorReading) -> Self {
        Self {
            id: reading.unique_id.clone(),
            name: reading.name.clone(),
            value: reading.value.to_string(),
            unit: reading.unit.unwrap_or("").to_owned(),
        }
    }
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let settings = super::resolve(global)?;
    let client = super::build_client(&settings)?;

    let doc = client.fetch_status().await?;
    let sensors = build_sensors(&doc);

    let readings = sensors
        .iter()
        .map(|sensor| resolve_reading(sensor, &doc))
        .collect::<Result<Vec<_>, CliError>>()?;

    let out = match settings.output {
        OutputFormat::Table => {
            let rows: Vec<SensorRow> = readings.iter().map(SensorRow::new).collect();
            output::table(&rows)
        }
        OutputFormat::Json => output::json(&readings),
        OutputFormat::JsonCompact => output::json_compact(&readings),
        OutputFormat::Yaml => output::yaml(&readings),
        // One unique id per line, for scripting.
        OutputFormat::Plain => readings
            .iter()
            .map(|r| r.unique_id.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    output::print(&out, global.quiet);
    Ok(())
}

fn resolve_reading(
    sensor: &Sensor,
    doc: &spyder_api::StatusDocument,
) -> Result<SensorReading, CliError> {
    Ok(SensorReading {
        unique_id: sensor.unique_id().to_owned(),
        name: sensor.name(doc)?,
        value: sensor.value(doc)?,
        unit: sensor.unit().map(spyder_core::Unit::as_str),
        device_class: sensor.device_class(),
        state_class: sensor.state_class(),
        attributes: sensor.extra_attributes(doc)?,
    })
}
