#![allow(clippy::unwrap_used)]
// Integration tests for `SpyderClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spyder_api::{Error, SpyderClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SpyderClient) {
    let server = MockServer::start().await;
    let client = SpyderClient::new(&server.address().to_string(), &TransportConfig::default())
        .expect("client should build from mock server address");
    (server, client)
}

fn output_block(nickname: &str, mode: &str, temp: f64) -> serde_json::Value {
    json!({
        "outputnickname": nickname,
        "outputmode": mode,
        "probereadingTEMP": temp,
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

fn system_block(outputs: u32) -> serde_json::Value {
    json!({
        "numberofoutputs": outputs,
        "internaltemp": 70,
        "internaltempmax": 90,
        "powerresets": 2,
        "safetyrelay": "OK"
    })
}

// ── Fetch tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_status_success() {
    let (server, client) = setup().await;

    let body = json!({
        "system": system_block(2),
        "output1": output_block("Porch", "Dimmer", 68.0),
        "output2": output_block("Driveway", "On/Off", 41.5),
    });

    Mock::given(method("GET"))
        .and(path("/rawstatus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let doc = client.fetch_status().await.unwrap();

    assert_eq!(doc.system.number_of_outputs, 2);
    assert_eq!(doc.system.power_resets, 2);
    assert_eq!(doc.outputs.len(), 2);
    assert_eq!(doc.output(1).unwrap().nickname, "Porch");
    assert!((doc.output(2).unwrap().probe_temp - 41.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rawstatus"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.fetch_status().await;

    match result {
        Err(Error::Http { status: 500, ref message }) => {
            assert_eq!(message, "boom");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rawstatus"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_status().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_output_key() {
    let (server, client) = setup().await;

    // numberofoutputs says 3, but only output1 is present.
    let body = json!({
        "system": system_block(3),
        "output1": output_block("Porch", "Dimmer", 68.0),
    });

    Mock::given(method("GET"))
        .and(path("/rawstatus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let result = client.fetch_status().await;

    assert!(
        matches!(result, Err(Error::MissingOutput { index: 2, expected: 3 })),
        "expected MissingOutput error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout_is_transient() {
    let server = MockServer::start().await;

    let body = json!({
        "system": system_block(0),
    });

    Mock::given(method("GET"))
        .and(path("/rawstatus"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&body)
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::with_timeout(Duration::from_millis(50));
    let client = SpyderClient::new(&server.address().to_string(), &transport).unwrap();

    let err = client.fetch_status().await.unwrap_err();

    assert!(err.is_transient(), "timeout should be transient: {err:?}");
}

#[tokio::test]
async fn test_timeout_reports_configured_duration() {
    let server = MockServer::start().await;

    let body = json!({
        "system": system_block(0),
    });

    Mock::given(method("GET"))
        .and(path("/rawstatus"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&body)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    // Shorter than the default 10s; the error must name this value.
    let transport = TransportConfig::with_timeout(Duration::from_secs(1));
    let client = SpyderClient::new(&server.address().to_string(), &transport).unwrap();

    let err = client.fetch_status().await.unwrap_err();

    assert!(
        matches!(err, Error::Timeout { timeout } if timeout == Duration::from_secs(1)),
        "expected Timeout carrying the configured limit, got: {err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 1s");
}
