#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use latchkey_api::models::card::CardDraft;
use latchkey_api::models::config::ConfigPayload;
use latchkey_api::models::firmware::{FirmwareImage, MAX_FIRMWARE_SIZE, ProgressFn};
use latchkey_api::models::schedule::{ScheduleDraft, ScheduleKind};
use latchkey_api::models::wifi::WifiCredentials;
use latchkey_api::{
    ConnectionDetails, DeviceClient, Error, MemoryStore, Session, SessionState, SessionStore,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn key(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let session = Arc::new(Session::in_memory());
    session
        .set_connection(ConnectionDetails::new(
            "127.0.0.1",
            server.address().port(),
            key("k1"),
        ))
        .unwrap();
    session.set_authorized(true).unwrap();
    let client = DeviceClient::new(session, &TransportConfig::default()).unwrap();
    (server, client)
}

fn api(suffix: &str) -> String {
    format!("/api/{suffix}")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "success", "code": 200, "message": "ok", "data": data
    }))
}

// ── Header injection ────────────────────────────────────────────────

#[tokio::test]
async fn test_auth_header_read_fresh_per_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("clear-logs")))
        .and(header("X-Auth-Key", "k1"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("clear-logs")))
        .and(header("X-Auth-Key", "k2"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.clear_logs().await.unwrap();
    client.session().rotate_auth_key(key("k2")).unwrap();
    client.clear_logs().await.unwrap();
}

#[tokio::test]
async fn test_config_update_rotates_session_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("config")))
        .respond_with(ok(json!({
            "auth_key": "k1",
            "door_lock_variant": "SOLENOID",
            "door_lock_duration": 3,
            "run_program_without_time": true,
            "active": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api("config")))
        .and(header("X-Auth-Key", "k1"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let config = client.get_config().await.unwrap();
    assert_eq!(config.door_lock_duration, 3);

    let mut payload = ConfigPayload::from_current(&config);
    payload.auth_key = key("k9");
    client.update_config(payload).await.unwrap();

    let stored = client.session().auth_key().unwrap();
    assert_eq!(stored.expose_secret(), "k9");
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_plain_text_error_gets_defaults() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("cards")))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let err = client.list_cards(1, 10).await.unwrap_err();
    match err {
        Error::Api {
            message,
            code,
            status,
        } => {
            assert_eq!(message, "An unexpected error occurred");
            assert_eq!(code, "UNKNOWN_ERROR");
            assert_eq!(status, Some(503));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_device_has_no_response() {
    let session = Arc::new(Session::in_memory());
    session
        .set_connection(ConnectionDetails::new("127.0.0.1", 1, key("k")))
        .unwrap();
    let client = DeviceClient::new(session, &TransportConfig::default()).unwrap();

    let err = client.list_logs(1, 100).await.unwrap_err();
    assert!(!err.has_response(), "got: {err:?}");
    assert_eq!(err.to_string(), "An unexpected error occurred");
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let (server, _) = setup().await;
    let session = Arc::new(Session::in_memory());
    session
        .set_connection(ConnectionDetails::new(
            "127.0.0.1",
            server.address().port(),
            key("k"),
        ))
        .unwrap();
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = DeviceClient::new(session, &transport).unwrap();

    Mock::given(method("GET"))
        .and(path(api("config")))
        .respond_with(ok(json!({})).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client.get_config().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_unauthorized_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api("card-reads")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error", "code": 401, "message": "Invalid auth key"
        })))
        .mount(&server)
        .await;

    let err = client.clear_card_reads().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(err.to_string(), "Unauthorized: Invalid auth key");
}

#[tokio::test]
async fn test_malformed_success_is_invalid_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("restart-schedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = client.list_restart_schedules(1, 10).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid response from server");
}

// ── Cards ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_cards_with_pagination() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("cards")))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{"id": 11, "number": "00AF12", "personal_id": null, "start_date": "2024-01-01"}],
            "pagination": {"total": 11, "page": 2, "per_page": 10, "total_pages": 2}
        })))
        .mount(&server)
        .await;

    let page = client.list_cards(2, 10).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].number, "00AF12");
    assert!(page.pagination.unwrap().is_consistent());
}

#[tokio::test]
async fn test_list_without_pagination_block() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("card-reads")))
        .respond_with(ok(json!([
            {"id": 1, "card_number": "AB", "timestamp": "2024-03-01 10:00:00", "type": "entry"}
        ])))
        .mount(&server)
        .await;

    let page = client.list_card_reads(1, 10).await.unwrap();
    assert_eq!(page.items[0].read_type, "entry");
    assert!(page.pagination.is_none());
}

#[tokio::test]
async fn test_create_card_201() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("cards")))
        .and(body_json(json!({"number": "00AF12", "start_date": "2024-01-01"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success", "code": 201, "message": "Card created",
            "data": {"number": "00AF12", "personal_id": null, "start_date": "2024-01-01"}
        })))
        .mount(&server)
        .await;

    let draft = CardDraft {
        number: Some("00AF12".into()),
        start_date: Some("2024-01-01".into()),
        ..CardDraft::default()
    };
    let created = client.create_card(&draft).await.unwrap();
    assert_eq!(created.code, Some(201));
    assert_eq!(created.message.as_deref(), Some("Card created"));
    assert_eq!(created.data.number, "00AF12");
}

#[tokio::test]
async fn test_create_card_200_is_not_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("cards")))
        .respond_with(ok(json!({"number": "X", "start_date": "2024-01-01"})))
        .mount(&server)
        .await;

    let err = client.create_card(&CardDraft::default()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_create_card_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("cards")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "status": "error", "code": 409, "message": "Card already exists",
            "data": {"card_number": "00AF12"}
        })))
        .mount(&server)
        .await;

    let err = client.create_card(&CardDraft::default()).await.unwrap_err();
    match err {
        Error::Conflict { message, data } => {
            assert_eq!(message, "Card already exists");
            assert_eq!(data["card_number"], "00AF12");
        }
        other => panic!("expected Conflict, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_and_delete_card() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(api("cards")))
        .and(body_json(json!({"id": 7, "personal_id": "P-1"})))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("cards")))
        .and(query_param("card_id", "7"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let draft = CardDraft {
        personal_id: Some("P-1".into()),
        ..CardDraft::default()
    };
    client.update_card(7, &draft).await.unwrap();
    client.delete_card(7).await.unwrap();
}

#[tokio::test]
async fn test_unregistered_cards() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("latest-card-reads")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "timestamp": 1_700_000_000, "count": 1,
            "data": [{"card_number": "FFEE", "last_seen": "2024-05-01 12:00:00"}]
        })))
        .mount(&server)
        .await;

    let unregistered = client.list_unregistered_cards().await.unwrap();
    assert_eq!(unregistered.count, 1);
    assert_eq!(unregistered.timestamp, Some(1_700_000_000));
    assert_eq!(unregistered.cards[0].card_number, "FFEE");
}

// ── Card reads ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_clear_card_reads() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api("card-reads")))
        .respond_with(ok(json!({"reads_removed": 42, "timestamp": 1_700_000_000})))
        .mount(&server)
        .await;

    let removed = client.clear_card_reads().await.unwrap();
    assert_eq!(removed.data.reads_removed, 42);
}

#[tokio::test]
async fn test_clear_card_reads_operation_error() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api("card-reads")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error", "code": 500, "message": "Failed to clear", "error": "fs"
        })))
        .mount(&server)
        .await;

    let err = client.clear_card_reads().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Failed to clear");
}

// ── WiFi ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wifi_list_and_mutations() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api("wifi")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "code": 200, "message": "ok", "timestamp": 1,
            "data": [{"id": 1, "ssid": "office", "password": "pw"}],
            "current_connection": {"ssid": "office", "ip": "10.0.0.5", "mac": "AA:BB"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api("wifi/1")))
        .and(body_json(json!({"ssid": "office", "password": "new"})))
        .respond_with(ok(json!({"id": 1, "ssid": "office", "password": "new"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("wifi/1")))
        .respond_with(ok(json!({"deleted": true})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("wifi")))
        .respond_with(ok(json!({"cleared_count": 3, "default_credentials_preserved": true})))
        .mount(&server)
        .await;

    let list = client.list_wifi_networks(1, 10).await.unwrap();
    assert_eq!(list.page.items[0].ssid, "office");
    assert_eq!(list.current_connection.unwrap().ip, "10.0.0.5");

    let creds = WifiCredentials {
        ssid: "office".into(),
        password: "new".into(),
    };
    client.update_wifi_network(1, &creds).await.unwrap();
    assert!(client.delete_wifi_network(1).await.unwrap().data.deleted);

    let cleared = client.clear_wifi_networks().await.unwrap();
    assert_eq!(cleared.data.cleared_count, 3);
    assert!(cleared.data.default_credentials_preserved);
}

// ── Logs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_log_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api("logs")))
        .and(query_param("id", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success", "message": "Log deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.delete_log("abc").await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Log deleted"));
}

// ── Restart schedules ───────────────────────────────────────────────

#[tokio::test]
async fn test_schedule_lifecycle() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("restart-schedules")))
        .and(body_json(json!({"schedule_type": "weekly", "time": "03:00", "days_of_week": [1, 5]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success", "code": 201, "timestamp": 5,
            "data": {"id": 3, "schedule_type": "weekly", "time": "03:00",
                     "days_of_week": [1, 5], "created_at": 5, "updated_at": 5}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("restart-schedules")))
        .and(query_param("schedule_id", "3"))
        .respond_with(ok(json!({"schedule_id": 3, "timestamp": 6})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("clear-restart-schedules")))
        .respond_with(ok(json!({"count": 0, "timestamp": 7})))
        .mount(&server)
        .await;

    let draft = ScheduleDraft::new(
        "03:00",
        ScheduleKind::Weekly {
            days_of_week: vec![1, 5],
        },
    );
    let created = client.create_restart_schedule(&draft).await.unwrap();
    assert_eq!(created.data.id, 3);

    assert_eq!(client.delete_restart_schedule(3).await.unwrap(), 3);
    assert_eq!(
        client
            .clear_restart_schedules()
            .await
            .unwrap()
            .data
            .cleared_count,
        0
    );
}

#[tokio::test]
async fn test_invalid_schedule_never_sent() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("restart-schedules")))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let draft = ScheduleDraft::new("25:00", ScheduleKind::Daily);
    let err = client.create_restart_schedule(&draft).await.unwrap_err();
    assert!(err.is_local());
}

#[tokio::test]
async fn test_schedule_with_stray_field_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(api("restart-schedules")))
        .respond_with(ok(json!({
            "id": 3, "schedule_type": "daily", "time": "03:00",
            "restart_date": "2024-01-01", "created_at": 1, "updated_at": 2
        })))
        .mount(&server)
        .await;

    let draft = ScheduleDraft::new("03:00", ScheduleKind::Daily);
    let err = client.update_restart_schedule(3, &draft).await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }), "got: {err:?}");
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_stats() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("stats")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api_version": "1.2", "status": "success",
            "wifi": {"rssi": -61, "strength": 78, "ssid": "office", "ip": "10.0.0.5", "mac": "AA"},
            "system": {"cpu_freq": 240, "uptime": "1d 2h", "timestamp": 1},
            "heap": {"free": "120KB", "total": "320KB", "minimum": "90KB", "usage_percent": 62.5},
            "storage": {
                "flash": {"size": "4MB", "speed": "80MHz"},
                "filesystem": {"total": "1MB", "used": "200KB", "free": "800KB", "usage_percent": 20.0}
            },
            "database": {
                "cards": {"total": 10, "active": 8, "inactive": 2, "active_percent": 80.0},
                "reads": {"today": 4, "total": 400}
            },
            "time": {"datetime": "2024-05-01 12:00:00", "is_valid": true,
                     "time_source": "ntp", "timezone": "UTC", "timestamp": 1}
        })))
        .mount(&server)
        .await;

    let stats = client.dashboard_stats().await.unwrap();
    assert_eq!(stats.wifi.rssi, -61);
    assert_eq!(stats.database.reads.total, 400);
}

// ── Firmware ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_firmware_at_limit_is_uploaded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("firmware-update")))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Update started"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let progress: ProgressFn = Arc::new(move |pct| sink.lock().unwrap().push(pct));

    let size = usize::try_from(MAX_FIRMWARE_SIZE).unwrap();
    let image = FirmwareImage::new("fw.bin", vec![0xA5u8; size]);
    let resp = client.upload_firmware(&image, Some(progress)).await.unwrap();
    assert!(resp.success);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.last(), Some(&100));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="firmware"; filename="fw.bin""#));
}

#[tokio::test]
async fn test_empty_firmware_still_reports_completion() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("firmware-update")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let progress: ProgressFn = Arc::new(move |pct| sink.lock().unwrap().push(pct));

    let image = FirmwareImage::new("empty.bin", Vec::new());
    client.upload_firmware(&image, Some(progress)).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![100]);
}

#[tokio::test]
async fn test_firmware_over_limit_makes_no_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("firmware-update")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let size = usize::try_from(MAX_FIRMWARE_SIZE).unwrap() + 1;
    let image = FirmwareImage::new("fw.bin", vec![0u8; size]);
    let err = client.upload_firmware(&image, None).await.unwrap_err();

    assert!(matches!(err, Error::FirmwareTooLarge { .. }));
    assert_eq!(
        err.to_string(),
        "Firmware file size (2.00MB) exceeds maximum allowed size (2MB)"
    );
}

#[tokio::test]
async fn test_firmware_rejected_by_device() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api("firmware-update")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Bad image header"})),
        )
        .mount(&server)
        .await;

    let image = FirmwareImage::new("fw.bin", vec![1u8; 1024]);
    let err = client.upload_firmware(&image, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Bad image header");
}

// ── Login ───────────────────────────────────────────────────────────

async fn login_setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::new(
        Arc::new(Session::in_memory()),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

#[tokio::test]
async fn test_login_success_persists_session() {
    let (server, client) = login_setup().await;
    let port = server.address().port();

    Mock::given(method("POST"))
        .and(path(api("auth-key")))
        .and(header("X-Auth-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client.is_authorized());
    assert!(client.login("127.0.0.1", port, key("secret")).await.unwrap());
    assert!(client.is_authorized());

    let conn = client.session().connection().unwrap();
    assert_eq!(conn.port, port);

    client.logout().unwrap();
    assert!(!client.is_authorized());
    assert!(client.session().connection().is_some());
}

async fn login_failure_message(status: u16, body: serde_json::Value) -> String {
    let (server, client) = login_setup().await;

    Mock::given(method("POST"))
        .and(path(api("auth-key")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;

    let err = client
        .login("127.0.0.1", server.address().port(), key("bad"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert!(!client.is_authorized());
    assert!(client.session().connection().is_none());
    err.to_string()
}

#[tokio::test]
async fn test_login_failure_messages() {
    assert_eq!(
        login_failure_message(400, json!({"success": false})).await,
        "Invalid authentication key"
    );
    assert_eq!(
        login_failure_message(500, json!({})).await,
        "Device error during authentication"
    );
    assert_eq!(
        login_failure_message(200, json!({"success": false})).await,
        "Authentication failed"
    );
    assert_eq!(
        login_failure_message(403, json!({})).await,
        "Authentication failed"
    );
}

#[tokio::test]
async fn test_login_network_error() {
    let (_, client) = login_setup().await;

    let err = client.login("127.0.0.1", 1, key("k")).await.unwrap_err();
    assert_eq!(err.to_string(), "Network error occurred");
    assert!(!err.has_response());
    assert!(client.session().connection().is_none());
}

/// Accepts every write except one that marks the session authorized.
#[derive(Default)]
struct RefuseAuthorizedStore(MemoryStore);

impl SessionStore for RefuseAuthorizedStore {
    fn load(&self) -> Result<SessionState, Error> {
        self.0.load()
    }

    fn save(&self, state: &SessionState) -> Result<(), Error> {
        if state.authorized {
            return Err(Error::Session("disk full".into()));
        }
        self.0.save(state)
    }
}

#[tokio::test]
async fn test_login_reverts_when_session_cannot_be_saved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("auth-key")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(RefuseAuthorizedStore::default());
    let session = Session::load(Arc::clone(&store) as Arc<dyn SessionStore>).unwrap();
    let client = DeviceClient::new(Arc::new(session), &TransportConfig::default()).unwrap();

    let err = client
        .login("127.0.0.1", server.address().port(), key("k1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Session(_)));
    assert!(!client.is_authorized());
    assert!(client.session().connection().is_none());
    assert_eq!(store.load().unwrap(), SessionState::default());
}
