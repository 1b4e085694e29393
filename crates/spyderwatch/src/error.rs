//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use spyder_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const DEVICE: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No host configured")]
    #[diagnostic(
        code(spyder::no_host),
        help(
            "Pass --host, set SPYDER_HOST, or run: spyderwatch config init <host>\n\
             Config file expected at: {path}"
        )
    )]
    NoHost { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(spyder::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(spyder::config))]
    Config(Box<figment::Error>),

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Spyder controller")]
    #[diagnostic(
        code(spyder::connection_failed),
        help(
            "Check that the controller is powered on and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout:?}")]
    #[diagnostic(
        code(spyder::timeout),
        help("Increase --timeout or check controller responsiveness.")
    )]
    Timeout { timeout: Duration },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device error: {message}")]
    #[diagnostic(code(spyder::device_error))]
    DeviceError {
        message: String,
        status: Option<u16>,
    },

    #[error("Malformed status document: {message}")]
    #[diagnostic(
        code(spyder::malformed_status),
        help(
            "The controller answered with a document this tool doesn't\n\
             understand. A firmware update may have changed the format."
        )
    )]
    MalformedStatus { message: String },

    #[error("Output {index} vanished from the status document")]
    #[diagnostic(
        code(spyder::output_missing),
        help("Restart the watch to rebuild the sensor set from a fresh document.")
    )]
    OutputMissing { index: u32 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(spyder::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::DeviceError { .. } | Self::MalformedStatus { .. } | Self::OutputMissing { .. } => {
                exit_code::DEVICE
            }
            Self::NoHost { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout } => CliError::Timeout { timeout },

            CoreError::OutputNotFound { index } => CliError::OutputMissing { index },

            CoreError::MalformedDocument { message } => CliError::MalformedStatus { message },

            CoreError::Device { message, status } => CliError::DeviceError { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "host".into(),
                reason: message,
            },
        }
    }
}

impl From<spyder_api::Error> for CliError {
    fn from(err: spyder_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<spyder_config::ConfigError> for CliError {
    fn from(err: spyder_config::ConfigError) -> Self {
        match err {
            spyder_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            spyder_config::ConfigError::NoHost => CliError::NoHost {
                path: spyder_config::config_path().display().to_string(),
            },
            spyder_config::ConfigError::Figment(e) => CliError::Config(e),
            spyder_config::ConfigError::Io(e) => CliError::Io(e),
            spyder_config::ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
        }
    }
}
