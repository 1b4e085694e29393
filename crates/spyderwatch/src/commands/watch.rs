//! `watch` command: continuous polling with a line of output per refresh.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use tracing::debug;

use spyder_core::{Monitor, Sensor, StatusDocument, Unit};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts, args: &WatchArgs) -> Result<(), CliError> {
    let settings = super::resolve(global)?;
    let client = super::build_client(&settings)?;
    let color = output::should_color(global.color);

    let monitor = Monitor::new(client, settings.poll_interval);
    monitor.start().await?;

    if !global.quiet {
        println!(
            "polling {} every {} (Ctrl-C to stop)",
            settings.host,
            humantime::format_duration(settings.poll_interval)
        );
    }

    let mut snapshots = monitor.store().subscribe();
    let mut availability = monitor.store().subscribe_availability();
    availability.mark_unchanged();

    // The eager first refresh is already in the store; report it before
    // waiting on the channel.
    let mut refreshes: u64 = 0;
    if let Some(doc) = snapshots.borrow_and_update().clone() {
        print_refresh(&doc, monitor.sensors(), settings.output, global.quiet)?;
        refreshes += 1;
    }

    let result = loop {
        if args.count.is_some_and(|n| refreshes >= n) {
            break Ok(());
        }

        tokio::select! {
            interrupt = tokio::signal::ctrl_c() => {
                debug!("interrupt received");
                break interrupt.map_err(CliError::from);
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let doc = snapshots.borrow_and_update().clone();
                if let Some(doc) = doc {
                    if let Err(e) =
                        print_refresh(&doc, monitor.sensors(), settings.output, global.quiet)
                    {
                        break Err(e);
                    }
                    refreshes += 1;
                }
            }
            changed = availability.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let available = *availability.borrow_and_update();
                if !available && !global.quiet {
                    let line = "controller unavailable, keeping last readings";
                    if color {
                        eprintln!("{}", line.red());
                    } else {
                        eprintln!("{line}");
                    }
                }
            }
        }
    };

    monitor.stop().await;
    result
}

/// Emit one refresh in the selected format. Structured formats get the
/// whole document, one per refresh; table and plain get a timestamped
/// sensor listing.
fn print_refresh(
    doc: &StatusDocument,
    sensors: &[Sensor],
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    if quiet {
        return Ok(());
    }

    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            println!("{}", output::json_compact(doc));
        }
        OutputFormat::Yaml => {
            println!("---\n{}", output::yaml(doc).trim_end());
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let stamp = chrono::Local::now().format("%H:%M:%S");
            let mut text = String::new();
            let _ = writeln!(text, "[{stamp}] refresh");
            for sensor in sensors {
                let _ = writeln!(
                    text,
                    "  {} = {}{}",
                    sensor.name(doc)?,
                    sensor.value(doc)?,
                    sensor.unit().map_or("", Unit::as_str),
                );
            }
            print!("{text}");
        }
    }
    Ok(())
}
