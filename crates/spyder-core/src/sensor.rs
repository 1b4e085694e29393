// ── Sensor projection ──
//
// Fixed descriptors mapping status-document fields to displayed readings.
// A Sensor owns its identity (unique id, device class, unit) and projects
// name/value/attributes as pure reads of whatever document it is handed —
// no state of its own beyond the descriptor.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use spyder_api::{OutputStatus, StatusDocument};

use crate::error::CoreError;

// ── Descriptor metadata ──────────────────────────────────────────────

/// What a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorKind {
    Temperature,
    Power,
    HighAlarm,
    LowAlarm,
    InternalTemperature,
    PowerResets,
    SafetyRelay,
}

/// Whether a sensor reads a per-output block or the system block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorScope {
    Output(u32),
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    Fahrenheit,
    Percent,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Percent => "%",
        }
    }
}

// ── Values ───────────────────────────────────────────────────────────

/// A single projected reading. Values pass through exactly as the device
/// reports them — no unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Temperature(f64),
    Percent(f64),
    Count(u64),
    Status(String),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature(v) | Self::Percent(v) => write!(f, "{v}"),
            Self::Count(v) => write!(f, "{v}"),
            Self::Status(v) => write!(f, "{v}"),
        }
    }
}

// ── Sensor ───────────────────────────────────────────────────────────

/// One read-only sensor: immutable identity plus pure projections over
/// the current status document.
#[derive(Debug, Clone, Serialize)]
pub struct Sensor {
    kind: SensorKind,
    scope: SensorScope,
    unique_id: String,
    device_class: Option<DeviceClass>,
    state_class: Option<StateClass>,
    unit: Option<Unit>,
}

impl Sensor {
    fn for_output(kind: SensorKind, index: u32) -> Self {
        let (suffix, device_class, unit) = match kind {
            SensorKind::Temperature => ("temperature", DeviceClass::Temperature, Unit::Fahrenheit),
            SensorKind::Power => ("power", DeviceClass::Power, Unit::Percent),
            SensorKind::HighAlarm => ("high_alarm", DeviceClass::Temperature, Unit::Fahrenheit),
            SensorKind::LowAlarm => ("low_alarm", DeviceClass::Temperature, Unit::Fahrenheit),
            _ => unreachable!("system kinds never scope to an output"),
        };

        Self {
            kind,
            scope: SensorScope::Output(index),
            unique_id: format!("spyder_output{index}_{suffix}"),
            device_class: Some(device_class),
            state_class: Some(StateClass::Measurement),
            unit: Some(unit),
        }
    }

    fn for_system(kind: SensorKind) -> Self {
        let (unique_id, device_class, state_class, unit) = match kind {
            SensorKind::InternalTemperature => (
                "spyder_internal_temperature",
                Some(DeviceClass::Temperature),
                Some(StateClass::Measurement),
                Some(Unit::Fahrenheit),
            ),
            SensorKind::PowerResets => ("spyder_power_resets", None, Some(StateClass::Total), None),
            SensorKind::SafetyRelay => ("spyder_safety_relay", None, None, None),
            _ => unreachable!("output kinds never scope to the system"),
        };

        Self {
            kind,
            scope: SensorScope::System,
            unique_id: unique_id.into(),
            device_class,
            state_class,
            unit,
        }
    }

    // ── Identity accessors ───────────────────────────────────────────

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn scope(&self) -> SensorScope {
        self.scope
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_class(&self) -> Option<DeviceClass> {
        self.device_class
    }

    pub fn state_class(&self) -> Option<StateClass> {
        self.state_class
    }

    pub fn unit(&self) -> Option<Unit> {
        self.unit
    }

    // ── Projections ──────────────────────────────────────────────────

    /// Display name, derived from the output nickname where scoped.
    pub fn name(&self, doc: &StatusDocument) -> Result<String, CoreError> {
        let label = match self.kind {
            SensorKind::Temperature => "Temperature",
            SensorKind::Power => "Power",
            SensorKind::HighAlarm => "High Alarm",
            SensorKind::LowAlarm => "Low Alarm",
            SensorKind::InternalTemperature => return Ok("Spyder Internal Temperature".into()),
            SensorKind::PowerResets => return Ok("Spyder Power Resets".into()),
            SensorKind::SafetyRelay => return Ok("Spyder Safety Relay".into()),
        };

        let output = self.output(doc)?;
        Ok(format!("Spyder {} {label}", output.nickname))
    }

    /// Current reading, straight off the document.
    pub fn value(&self, doc: &StatusDocument) -> Result<SensorValue, CoreError> {
        let value = match self.kind {
            SensorKind::Temperature => SensorValue::Temperature(self.output(doc)?.probe_temp),
            SensorKind::Power => SensorValue::Percent(self.output(doc)?.power_output),
            SensorKind::HighAlarm => SensorValue::Temperature(self.output(doc)?.high_alarm),
            SensorKind::LowAlarm => SensorValue::Temperature(self.output(doc)?.low_alarm),
            SensorKind::InternalTemperature => {
                SensorValue::Temperature(doc.system.internal_temp)
            }
            SensorKind::PowerResets => SensorValue::Count(doc.system.power_resets),
            SensorKind::SafetyRelay => SensorValue::Status(doc.system.safety_relay.clone()),
        };
        Ok(value)
    }

    /// Secondary fields for richer display.
    pub fn extra_attributes(
        &self,
        doc: &StatusDocument,
    ) -> Result<BTreeMap<&'static str, serde_json::Value>, CoreError> {
        let mut attrs = BTreeMap::new();

        match self.kind {
            SensorKind::Temperature => {
                let output = self.output(doc)?;
                attrs.insert("max_temp", output.probe_temp_max.into());
                attrs.insert("min_temp", output.probe_temp_min.into());
                attrs.insert("current_setting", output.current_setting.into());
                attrs.insert("error_code", output.error_code.into());
                attrs.insert("error_description", output.error_description.clone().into());
            }
            SensorKind::Power => {
                let output = self.output(doc)?;
                attrs.insert("power_limit", output.power_limit.into());
                attrs.insert("mode", output.mode.clone().into());
            }
            SensorKind::InternalTemperature => {
                attrs.insert("max_temp", doc.system.internal_temp_max.into());
            }
            _ => {}
        }

        Ok(attrs)
    }

    /// Resolve this sensor's output block, failing loudly if the device
    /// stopped reporting it.
    fn output<'a>(&self, doc: &'a StatusDocument) -> Result<&'a OutputStatus, CoreError> {
        let SensorScope::Output(index) = self.scope else {
            return Err(CoreError::MalformedDocument {
                message: "system sensor has no output block".into(),
            });
        };
        doc.output(index)
            .ok_or(CoreError::OutputNotFound { index })
    }
}

// ── Sensor-set construction ──────────────────────────────────────────

/// Build the full sensor set for a document: four sensors per active
/// (non-"Disabled") output, in output order, then the three system
/// sensors. Exactly 4×N + 3 for N active outputs.
pub fn build_sensors(doc: &StatusDocument) -> Vec<Sensor> {
    let mut sensors = Vec::with_capacity(doc.outputs.len() * 4 + 3);

    for (index, _) in doc.active_outputs() {
        sensors.push(Sensor::for_output(SensorKind::Temperature, index));
        sensors.push(Sensor::for_output(SensorKind::Power, index));
        sensors.push(Sensor::for_output(SensorKind::HighAlarm, index));
        sensors.push(Sensor::for_output(SensorKind::LowAlarm, index));
    }

    sensors.push(Sensor::for_system(SensorKind::InternalTemperature));
    sensors.push(Sensor::for_system(SensorKind::PowerResets));
    sensors.push(Sensor::for_system(SensorKind::SafetyRelay));

    sensors
}
