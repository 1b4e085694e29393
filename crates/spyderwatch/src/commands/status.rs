//! `status` command: one fetch, rendered system + output views.

use std::fmt::Write as _;

use tabled::Tabled;

use spyder_api::{OutputStatus, StatusDocument};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct OutputRow {
    #[tabled(rename = "OUTPUT")]
    index: u32,
    #[tabled(rename = "NICKNAME")]
    nickname: String,
    #[tabled(rename = "MODE")]
    mode: String,
    #[tabled(rename = "TEMP °F")]
    temp: f64,
    #[tabled(rename = "POWER %")]
    power: f64,
    #[tabled(rename = "HIGH ALARM")]
    high_alarm: f64,
    #[tabled(rename = "LOW ALARM")]
    low_alarm: f64,
    #[tabled(rename = "ERROR")]
    error: String,
}

impl OutputRow {
    fn new(index: u32, output: &OutputStatus) -> Self {
        Self {
            index,
            nickname: output.nickname.clone(),
            mode: output.mode.clone(),
            temp: output.probe_temp,
            power: output.power_output,
            high_alarm: output.high_alarm,
            low_alarm: output.low_alarm,
            error: output.error_description.clone(),
        }
    }
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let settings = super::resolve(global)?;
    let client = super::build_client(&settings)?;

    let doc = client.fetch_status().await?;

    let out = match settings.output {
        OutputFormat::Table => detail_view(&doc),
        OutputFormat::Json => output::json(&doc),
        OutputFormat::JsonCompact => output::json_compact(&doc),
        OutputFormat::Yaml => output::yaml(&doc),
        OutputFormat::Plain => plain_view(&doc),
    };
    output::print(&out, global.quiet);
    Ok(())
}

/// Human-oriented detail view: system summary plus an output table.
fn detail_view(doc: &StatusDocument) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "internal temp: {}°F (max {}°F)   power resets: {}   safety relay: {}",
        doc.system.internal_temp,
        doc.system.internal_temp_max,
        doc.system.power_resets,
        doc.system.safety_relay,
    );

    let rows: Vec<OutputRow> = doc
        .outputs
        .iter()
        .map(|(index, output)| OutputRow::new(*index, output))
        .collect();
    if rows.is_empty() {
        text.push_str("(no outputs)");
    } else {
        text.push_str(&output::table(&rows));
    }
    text
}

/// Scripting view: one line per output.
fn plain_view(doc: &StatusDocument) -> String {
    doc.outputs
        .iter()
        .map(|(index, output)| {
            format!(
                "output{index} {} {} {} {}",
                output.nickname, output.mode, output.probe_temp, output.power_output
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
