use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `spyder-api` crate.
///
/// Covers every failure mode of a single fetch attempt: host/URL
/// construction, transport, HTTP status, and document decoding.
/// `spyder-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// The configured host is empty or otherwise unusable.
    #[error("Invalid host: {reason}")]
    InvalidHost { reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request exceeded the client's configured timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The device answered with a non-success status code.
    #[error("Device returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The document advertises `numberofoutputs` outputs but one of the
    /// `output{N}` keys is absent. Treated as a malformed firmware
    /// response — fatal for this poll cycle, never defaulted.
    #[error("Status document is missing output{index} (numberofoutputs = {expected})")]
    MissingOutput { index: u32, expected: u32 },
}

impl Error {
    /// Returns `true` if this is a transient error that the next
    /// scheduled poll may resolve.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
