// Shared transport configuration for building reqwest::Client instances.
//
// The Spyder controller speaks plain HTTP on the local network, so the
// only knob here is the per-request timeout. A fetch that exceeds it is
// abandoned and reported as a failure; the next poll is the retry.

use std::time::Duration;

/// Timeout matching the device's worst observed response latency.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("spyderwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
