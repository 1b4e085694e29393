// Spyder status HTTP client
//
// Wraps `reqwest::Client` with the fixed `/rawstatus` endpoint and the
// status-document decode. One GET per invocation, bounded by the
// transport timeout — no retry, no backoff. The device exposes no other
// endpoints and no authentication.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::model::StatusDocument;
use crate::transport::TransportConfig;

/// HTTP client for a single Spyder controller.
pub struct SpyderClient {
    http: reqwest::Client,
    status_url: Url,
    timeout: Duration,
}

impl SpyderClient {
    /// Create a client for the controller at `host` (hostname or
    /// `host:port`). The status endpoint is always
    /// `http://{host}/rawstatus`.
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let status_url = status_url(host)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            status_url,
            timeout: transport.timeout,
        })
    }

    /// The resolved status endpoint URL.
    pub fn status_url(&self) -> &Url {
        &self.status_url
    }

    /// Fetch and decode the current status document.
    ///
    /// A single attempt: transport failures, non-2xx responses, and
    /// decode failures are all surfaced to the caller, whose next
    /// scheduled poll is the retry.
    pub async fn fetch_status(&self) -> Result<StatusDocument, Error> {
        debug!("GET {}", self.status_url);

        let resp = self
            .http
            .get(self.status_url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        StatusDocument::parse(&body)
    }

    /// Classify a reqwest failure, attaching the configured timeout to
    /// deadline overruns so diagnostics report the real limit.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.timeout,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Build `http://{host}/rawstatus`, rejecting empty hosts up front.
fn status_url(host: &str) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::InvalidHost {
            reason: "host must not be empty".into(),
        });
    }

    Url::parse(&format!("http://{host}/rawstatus")).map_err(Error::InvalidUrl)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_url_from_plain_host() {
        let url = status_url("192.168.1.50").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50/rawstatus");
    }

    #[test]
    fn status_url_keeps_port() {
        let url = status_url("spyder.local:8080").unwrap();
        assert_eq!(url.as_str(), "http://spyder.local:8080/rawstatus");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = status_url("   ").unwrap_err();
        assert!(matches!(err, Error::InvalidHost { .. }));
    }
}
