//! Command handlers and shared resolution helpers.

pub mod config_cmd;
pub mod sensors;
pub mod status;
pub mod watch;

use std::time::Duration;

use clap::ValueEnum;

use spyder_api::{SpyderClient, TransportConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Effective settings: config file + env merged with CLI flag overrides.
pub(crate) struct Settings {
    pub host: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub output: OutputFormat,
}

/// Resolve settings for commands that talk to a controller.
///
/// Precedence: CLI flag > environment > config file > default.
pub(crate) fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let cfg = spyder_config::load_config_or_default();

    let host = global
        .host
        .clone()
        .or_else(|| cfg.host.clone())
        .ok_or_else(|| CliError::NoHost {
            path: spyder_config::config_path().display().to_string(),
        })?;
    spyder_config::validate_host(&host)?;

    let timeout = global
        .timeout
        .map_or_else(|| cfg.timeout(), Duration::from_secs);
    let poll_interval = global
        .interval
        .map_or_else(|| cfg.poll_interval(), Duration::from_secs);

    Ok(Settings {
        host,
        timeout,
        poll_interval,
        output: resolve_output(global, &cfg),
    })
}

/// Resolve the output format without requiring a host.
pub(crate) fn resolve_output(global: &GlobalOpts, cfg: &spyder_config::Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Build a one-shot client from resolved settings.
pub(crate) fn build_client(settings: &Settings) -> Result<SpyderClient, CliError> {
    let transport = TransportConfig::with_timeout(settings.timeout);
    SpyderClient::new(&settings.host, &transport).map_err(CliError::from)
}
