#![allow(clippy::unwrap_used)]
// Integration tests for `ThinqClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thinqlink_api::{CommandKind, Error, Session, ThinqClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn session() -> Session {
    Session {
        access_token: "test-token".to_string().into(),
        country: "US".into(),
        language: "en-US".into(),
    }
}

async fn setup() -> (MockServer, ThinqClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = ThinqClient::new(base_url, &TransportConfig::default()).unwrap();
    client.set_session(session());
    (server, client)
}

// ── Session state ───────────────────────────────────────────────────

#[tokio::test]
async fn not_logged_in_short_circuits_without_a_request() {
    // No mocks mounted: if the client issued a request the test would
    // fail with a transport error instead of NotLoggedIn.
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = ThinqClient::new(base_url, &TransportConfig::default()).unwrap();

    assert!(!client.is_logged_in());
    let result = client.get_device("dev-1").await;
    assert!(matches!(result, Err(Error::NotLoggedIn)));
}

#[tokio::test]
async fn clear_session_logs_out() {
    let (_server, client) = setup().await;
    assert!(client.is_logged_in());
    client.clear_session();
    assert!(!client.is_logged_in());
}

// ── Device status ───────────────────────────────────────────────────

#[tokio::test]
async fn get_device_unwraps_snapshot() {
    let (server, client) = setup().await;

    let envelope = json!({
        "resultCode": "0000",
        "result": {
            "snapshot": {
                "airState.operation": 1,
                "airState.opMode": 0,
                "airState.windStrength": 4,
                "airState.tempState.target": 22
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/service/devices/dev-1"))
        .and(header("x-thinq-token", "test-token"))
        .and(header("x-country-code", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let device = client.get_device("dev-1").await.unwrap();

    assert_eq!(
        device.snapshot.get("airState.operation").and_then(serde_json::Value::as_i64),
        Some(1)
    );
    assert_eq!(
        device.snapshot.get("airState.windStrength").and_then(serde_json::Value::as_i64),
        Some(4)
    );
}

#[tokio::test]
async fn get_filter_status_extracts_counters() {
    let (server, client) = setup().await;

    let envelope = json!({
        "resultCode": "0000",
        "result": {
            "data": {
                "airState.filterMngStates.useTime": 10,
                "airState.filterMngStates.maxTime": 200
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/service/devices/dev-1/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let status = client.get_filter_status("dev-1").await.unwrap().unwrap();
    assert!((status.use_time - 10.0).abs() < f64::EPSILON);
    assert!((status.max_time - 200.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn get_filter_status_tolerates_missing_counters() {
    let (server, client) = setup().await;

    let envelope = json!({ "resultCode": "0000", "result": { "data": {} } });

    Mock::given(method("GET"))
        .and(path("/service/devices/dev-1/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let status = client.get_filter_status("dev-1").await.unwrap();
    assert!(status.is_none());
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn send_command_posts_control_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/service/devices/dev-1/control-sync"))
        .and(body_partial_json(json!({
            "ctrlKey": "basicCtrl",
            "command": "Set",
            "dataKey": "airState.windStrength",
            "dataValue": 6
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "resultCode": "0000", "result": {} })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client
        .send_command("dev-1", CommandKind::Set, "airState.windStrength", json!(6))
        .await
        .unwrap();
}

#[tokio::test]
async fn send_all_event_enable_uses_monitoring_ctrl_key() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/service/devices/dev-1/control-sync"))
        .and(body_partial_json(json!({ "ctrlKey": "allEventEnable" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "resultCode": "0000", "result": {} })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.send_all_event_enable("dev-1").await.unwrap();
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn vendor_error_code_maps_to_api_error() {
    let (server, client) = setup().await;

    let envelope = json!({ "resultCode": "0102", "result": null });

    Mock::given(method("GET"))
        .and(path("/service/devices/dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let result = client.get_device("dev-1").await;

    match result {
        Err(Error::Api { ref code, .. }) => assert_eq!(code, "0102"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn http_401_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_device("dev-1").await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn garbage_body_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/service/devices/dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.get_device("dev-1").await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Device discovery ────────────────────────────────────────────────

#[tokio::test]
async fn list_devices_returns_dashboard_items() {
    let (server, client) = setup().await;

    let envelope = json!({
        "resultCode": "0000",
        "result": {
            "item": [
                {
                    "deviceId": "dev-1",
                    "alias": "Living Room AC",
                    "modelName": "RAC_056905_WW",
                    "deviceType": 401
                },
                {
                    "deviceId": "dev-2",
                    "alias": "Washer",
                    "deviceType": 201
                }
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path("/service/application/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device_id, "dev-1");
    assert_eq!(devices[0].alias.as_deref(), Some("Living Room AC"));
    assert!(devices[0].is_air_conditioner());
    assert!(!devices[1].is_air_conditioner());
}
