// ── Core error types ──
//
// User-facing errors from spyder-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<spyder_api::Error>`
// impl translates transport-layer errors into domain variants.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach Spyder controller: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Data errors ──────────────────────────────────────────────────
    /// A sensor references an output that is no longer in the current
    /// document. The sensor set is fixed at first refresh, so this is a
    /// firmware contract violation, not a recoverable state.
    #[error("Output {index} missing from status document")]
    OutputNotFound { index: u32 },

    #[error("Malformed status document: {message}")]
    MalformedDocument { message: String },

    #[error("Device error: {message}")]
    Device {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<spyder_api::Error> for CoreError {
    fn from(err: spyder_api::Error) -> Self {
        match err {
            spyder_api::Error::InvalidHost { reason } => CoreError::Config {
                message: format!("invalid host: {reason}"),
            },
            spyder_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            spyder_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            spyder_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            spyder_api::Error::Http { status, message } => CoreError::Device {
                message,
                status: Some(status),
            },
            spyder_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedDocument { message }
            }
            spyder_api::Error::MissingOutput { index, expected } => CoreError::MalformedDocument {
                message: format!("output{index} absent (numberofoutputs = {expected})"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_keeps_configured_duration() {
        let err = CoreError::from(spyder_api::Error::Timeout {
            timeout: Duration::from_secs(1),
        });

        assert_eq!(err.to_string(), "Request timed out after 1s");
        match err {
            CoreError::Timeout { timeout } => assert_eq!(timeout, Duration::from_secs(1)),
            other => panic!("expected Timeout, got: {other:?}"),
        }
    }
}
