//! Shared rendering primitives for the `--output` formats.
//!
//! Each command decides what its table, plain lines, or structured dump
//! look like and dispatches on [`OutputFormat`](crate::cli::OutputFormat)
//! itself; this module only supplies the common pieces.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::ColorMode;

/// Whether escape codes should go to stdout for this invocation.
///
/// `auto` means an interactive terminal with `NO_COLOR` unset.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Write a rendered block to stdout. `--quiet` drops it entirely.
pub fn print(out: &str, quiet: bool) {
    if quiet || out.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{out}");
}

/// Rounded-border table from `Tabled` rows.
pub fn table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn json<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Single-line JSON, one value per line for stream consumers.
pub fn json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

pub fn yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "VALUE")]
        value: f64,
    }

    fn rows() -> Vec<Row> {
        vec![Row {
            id: "spyder_output1_temperature".into(),
            value: 68.0,
        }]
    }

    #[test]
    fn table_carries_headers_and_cells() {
        let text = table(&rows());
        assert!(text.contains("ID"));
        assert!(text.contains("VALUE"));
        assert!(text.contains("spyder_output1_temperature"));
        assert!(text.contains("68"));
    }

    #[test]
    fn json_compact_is_one_line() {
        let text = json_compact(&rows());
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\"value\":68.0"));
    }

    #[test]
    fn color_mode_overrides_win() {
        assert!(should_color(ColorMode::Always));
        assert!(!should_color(ColorMode::Never));
    }
}
