// ── Status document models ──
//
// Typed decode of the device's `/rawstatus` JSON. Serde renames carry the
// firmware's exact key casing (`probereadingTEMP`, `poweroutputLIMIT`).
// Per-output blocks arrive as top-level `output{N}` keys, validated
// against `numberofoutputs` at decode time so a missing key surfaces as
// an explicit error instead of a lookup failure later.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Mode string the firmware reports for outputs that are switched off.
pub const DISABLED_MODE: &str = "Disabled";

/// System-wide block of the status document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(rename = "numberofoutputs")]
    pub number_of_outputs: u32,

    #[serde(rename = "internaltemp")]
    pub internal_temp: f64,

    #[serde(rename = "internaltempmax")]
    pub internal_temp_max: f64,

    #[serde(rename = "powerresets")]
    pub power_resets: u64,

    #[serde(rename = "safetyrelay")]
    pub safety_relay: String,
}

/// One independently controlled output channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputStatus {
    #[serde(rename = "outputnickname")]
    pub nickname: String,

    #[serde(rename = "outputmode")]
    pub mode: String,

    #[serde(rename = "probereadingTEMP")]
    pub probe_temp: f64,

    #[serde(rename = "probereadingTEMPMAX")]
    pub probe_temp_max: f64,

    #[serde(rename = "probereadingTEMPMIN")]
    pub probe_temp_min: f64,

    #[serde(rename = "currentsetting")]
    pub current_setting: f64,

    #[serde(rename = "errorcode")]
    pub error_code: i64,

    #[serde(rename = "errorcodedescription")]
    pub error_description: String,

    #[serde(rename = "poweroutput")]
    pub power_output: f64,

    #[serde(rename = "poweroutputLIMIT")]
    pub power_limit: f64,

    #[serde(rename = "highalarm")]
    pub high_alarm: f64,

    #[serde(rename = "lowalarm")]
    pub low_alarm: f64,
}

impl OutputStatus {
    pub fn is_disabled(&self) -> bool {
        self.mode == DISABLED_MODE
    }
}

/// Wire shape: `system` plus sibling `output{N}` keys we collect and
/// validate in [`StatusDocument::from_raw`].
#[derive(Deserialize)]
struct RawStatusDocument {
    system: SystemStatus,

    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

/// The full snapshot returned by the device's status endpoint.
///
/// Replaced wholesale on every successful poll; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDocument {
    pub system: SystemStatus,

    /// Outputs keyed by index (1-based, matching the `output{N}` keys).
    pub outputs: BTreeMap<u32, OutputStatus>,
}

impl StatusDocument {
    /// Decode a raw response body.
    ///
    /// Every `output{N}` for N = 1..=numberofoutputs must be present and
    /// well-formed, or the whole document is rejected.
    pub fn parse(body: &str) -> Result<Self, Error> {
        let raw: RawStatusDocument =
            serde_json::from_str(body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", body_preview(body)),
                body: body.to_owned(),
            })?;
        Self::from_raw(raw, body)
    }

    fn from_raw(raw: RawStatusDocument, body: &str) -> Result<Self, Error> {
        let expected = raw.system.number_of_outputs;
        let mut outputs = BTreeMap::new();

        for index in 1..=expected {
            let key = format!("output{index}");
            let value = raw
                .rest
                .get(&key)
                .ok_or(Error::MissingOutput { index, expected })?;

            let output: OutputStatus =
                serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
                    message: format!("{key}: {e}"),
                    body: body.to_owned(),
                })?;
            outputs.insert(index, output);
        }

        Ok(Self {
            system: raw.system,
            outputs,
        })
    }

    /// Look up a single output block by index.
    pub fn output(&self, index: u32) -> Option<&OutputStatus> {
        self.outputs.get(&index)
    }

    /// Outputs whose mode is not `"Disabled"`, in index order.
    pub fn active_outputs(&self) -> impl Iterator<Item = (u32, &OutputStatus)> {
        self.outputs
            .iter()
            .filter(|(_, output)| !output.is_disabled())
            .map(|(index, output)| (*index, output))
    }
}

/// Truncate a response body for error messages.
fn body_preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .take_while(|(i, _)| *i < 200)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output_block(nickname: &str, mode: &str) -> serde_json::Value {
        json!({
            "outputnickname": nickname,
            "outputmode": mode,
            "probereadingTEMP": 68,
            "probereadingTEMPMAX": 80,
            "probereadingTEMPMIN": 40,
            "currentsetting": 50,
            "errorcode": 0,
            "errorcodedescription": "None",
            "poweroutput": 30,
            "poweroutputLIMIT": 100,
            "highalarm": 85,
            "lowalarm": 30
        })
    }

    #[test]
    fn parse_single_output_document() {
        let body = json!({
            "system": {
                "numberofoutputs": 1,
                "internaltemp": 70,
                "internaltempmax": 90,
                "powerresets": 2,
                "safetyrelay": "OK"
            },
            "output1": output_block("Porch", "Dimmer")
        })
        .to_string();

        let doc = StatusDocument::parse(&body).unwrap();
        assert_eq!(doc.system.number_of_outputs, 1);
        assert_eq!(doc.system.safety_relay, "OK");

        let output = doc.output(1).unwrap();
        assert_eq!(output.nickname, "Porch");
        assert!((output.probe_temp - 68.0).abs() < f64::EPSILON);
        assert!(!output.is_disabled());
    }

    #[test]
    fn missing_output_key_is_rejected() {
        let body = json!({
            "system": {
                "numberofoutputs": 2,
                "internaltemp": 70,
                "internaltempmax": 90,
                "powerresets": 0,
                "safetyrelay": "OK"
            },
            "output1": output_block("Porch", "Dimmer")
        })
        .to_string();

        let err = StatusDocument::parse(&body).unwrap_err();
        assert!(
            matches!(err, Error::MissingOutput { index: 2, expected: 2 }),
            "expected MissingOutput, got: {err:?}"
        );
    }

    #[test]
    fn malformed_output_block_is_rejected() {
        let body = json!({
            "system": {
                "numberofoutputs": 1,
                "internaltemp": 70,
                "internaltempmax": 90,
                "powerresets": 0,
                "safetyrelay": "OK"
            },
            "output1": { "outputnickname": "Porch" }
        })
        .to_string();

        let err = StatusDocument::parse(&body).unwrap_err();
        assert!(
            matches!(err, Error::Deserialization { .. }),
            "expected Deserialization, got: {err:?}"
        );
    }

    #[test]
    fn active_outputs_skips_disabled() {
        let body = json!({
            "system": {
                "numberofoutputs": 3,
                "internaltemp": 70,
                "internaltempmax": 90,
                "powerresets": 0,
                "safetyrelay": "OK"
            },
            "output1": output_block("Porch", "Dimmer"),
            "output2": output_block("Spare", "Disabled"),
            "output3": output_block("Driveway", "On/Off")
        })
        .to_string();

        let doc = StatusDocument::parse(&body).unwrap();
        let active: Vec<u32> = doc.active_outputs().map(|(i, _)| i).collect();
        assert_eq!(active, vec![1, 3]);
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        // Firmware updates may add fields; only the declared outputs matter.
        let body = json!({
            "system": {
                "numberofoutputs": 1,
                "internaltemp": 70,
                "internaltempmax": 90,
                "powerresets": 0,
                "safetyrelay": "OK"
            },
            "output1": output_block("Porch", "Dimmer"),
            "firmwareversion": "3.1.4"
        })
        .to_string();

        let doc = StatusDocument::parse(&body).unwrap();
        assert_eq!(doc.outputs.len(), 1);
    }
}
