#![allow(clippy::unwrap_used)]
// Dashboard and Home facade tests against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domus_api::{CredentialStore, MemoryStore, SessionGateway, StoreKey, TransportConfig};
use domus_core::{CoreError, DashboardEvent, Home, RefreshOutcome, RefreshState, Slice};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<MemoryStore>, Home) {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::with_endpoint(&server.uri()));
    let gateway = SessionGateway::new(store.clone(), TransportConfig::default()).unwrap();
    (server, store, Home::new(Arc::new(gateway)))
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ok(json!({
            "status": "success",
            "data": { "rooms": ["Salon", "Kuchnia"] }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ok(json!({
            "status": "success",
            "data": { "buttons": [
                { "id": 1, "name": "Lampa", "room": "Salon", "state": false },
                { "id": 2, "name": "Okap", "room": "Kuchnia", "state": true }
            ] }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/temperature_controls"))
        .respond_with(ok(json!({
            "status": "success",
            "data": { "temperature_controls": [
                { "id": 5, "name": "Grzejnik", "room": "Salon", "temperature": 21.0 }
            ] }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/security"))
        .respond_with(ok(json!({
            "status": "success",
            "security_state": "Wyłączony"
        })))
        .mount(server)
        .await;
}

fn drain(rx: &mut broadcast::Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

fn completed(outcome: RefreshOutcome) -> domus_core::RefreshReport {
    match outcome {
        RefreshOutcome::Completed(report) => report,
        RefreshOutcome::AlreadyRunning => panic!("expected a completed refresh"),
    }
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn login_then_refresh_publishes_once_then_completes() {
    let (server, _store, home) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ok(json!({
                "status": "success",
                "data": { "user": { "id": 1, "name": "jan", "role": "user" } }
            }))
            .insert_header("set-cookie", "session=s3cr3t; HttpOnly; Path=/"),
        )
        .mount(&server)
        .await;

    mount_dashboard(&server).await;

    let user = home
        .login("jan", &SecretString::from("pw".to_string()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "jan");
    assert!(home.is_logged_in());

    let mut events = home.subscribe();
    let report = completed(home.refresh_now().await);
    assert!(report.is_complete());
    assert_eq!(report.refreshed.len(), 4);

    let events = drain(&mut events);
    assert_eq!(events.len(), 2, "got {events:?}");
    match &events[0] {
        DashboardEvent::SnapshotUpdated(snap) => {
            assert_eq!(snap.rooms.len(), 2);
            assert_eq!(snap.devices.len(), 2);
            assert_eq!(snap.thermostats.len(), 1);
            assert_eq!(snap.security_state, "Wyłączony");
            assert!(snap.refreshed_at.is_some());
        }
        other => panic!("expected SnapshotUpdated, got {other:?}"),
    }
    assert!(matches!(events[1], DashboardEvent::RefreshComplete(_)));

    let received = server.received_requests().await.unwrap();
    let list_requests: Vec<_> = received
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .collect();
    assert_eq!(list_requests.len(), 4);
    for req in list_requests {
        assert_eq!(
            req.headers.get("cookie").unwrap().to_str().unwrap(),
            "session=s3cr3t"
        );
    }
}

#[tokio::test]
async fn one_failed_slice_keeps_its_previous_value() {
    let (server, _store, home) = setup().await;
    mount_dashboard(&server).await;
    completed(home.refresh_now().await);
    let before = home.snapshot();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ok(json!({ "status": "success", "data": { "rooms": ["Garaż"] } })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/temperature_controls"))
        .respond_with(ok(json!({ "status": "success", "data": { "temperature_controls": [] } })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/security"))
        .respond_with(ok(json!({ "status": "success", "security_state": "Załączony" })))
        .mount(&server)
        .await;

    let mut state_rx = home.dashboard().watch_state();
    state_rx.borrow_and_update();
    let mut events = home.subscribe();

    let report = completed(home.refresh_now().await);
    assert_eq!(report.refreshed.len(), 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Slice::Devices);
    assert!(report.failed[0].1.is_server_error());

    assert_eq!(home.dashboard().state(), RefreshState::Idle);
    assert!(state_rx.has_changed().unwrap());
    assert_eq!(*state_rx.borrow_and_update(), RefreshState::Idle);

    let after = home.snapshot();
    assert_eq!(after.rooms.len(), 1);
    assert_eq!(after.rooms[0].name, "Garaż");
    assert_eq!(after.devices, before.devices);
    assert!(after.thermostats.is_empty());
    assert!(after.is_armed());

    let events = drain(&mut events);
    let failed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            DashboardEvent::SliceFailed { slice, .. } => Some(*slice),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec![Slice::Devices]);
    let completions = events
        .iter()
        .filter(|e| matches!(e, DashboardEvent::RefreshComplete(_)))
        .count();
    assert_eq!(completions, 1);
}

#[tokio::test]
async fn all_slices_failing_still_returns_to_idle() {
    let (server, _store, home) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = completed(home.refresh_now().await);
    assert_eq!(report.failed.len(), 4);
    assert_eq!(home.dashboard().state(), RefreshState::Idle);
    assert!(home.snapshot().devices.is_empty());
}

#[tokio::test]
async fn concurrent_trigger_is_coalesced() {
    let (server, _store, home) = setup().await;
    Mock::given(method("GET"))
        .respond_with(
            ok(json!({ "status": "success", "data": [] })).set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let background = home.refresh();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(home.dashboard().state(), RefreshState::Refreshing);

    assert!(matches!(
        home.refresh_now().await,
        RefreshOutcome::AlreadyRunning
    ));
    completed(background.await.unwrap());
    assert_eq!(home.dashboard().state(), RefreshState::Idle);

    // one cycle worth of requests
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn cancelled_refresh_returns_to_idle() {
    let (server, _store, home) = setup().await;
    Mock::given(method("GET"))
        .respond_with(
            ok(json!({ "status": "success", "data": [] })).set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let timed_out = tokio::time::timeout(Duration::from_millis(50), home.refresh_now()).await;
    assert!(timed_out.is_err());
    assert_eq!(home.dashboard().state(), RefreshState::Idle);

    // The next trigger starts a real cycle instead of being coalesced.
    completed(home.refresh_now().await);
    assert_eq!(home.dashboard().state(), RefreshState::Idle);
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_server_error_leaves_device_unchanged() {
    let (server, _store, home) = setup().await;
    mount_dashboard(&server).await;
    completed(home.refresh_now().await);

    Mock::given(method("POST"))
        .and(path("/api/buttons/1/toggle"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "message": "Błąd serwera"
        })))
        .mount(&server)
        .await;

    let mut events = home.subscribe();
    let err = home.toggle_device("1").await.unwrap_err();
    match err {
        CoreError::Server { status, ref message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Błąd serwera");
        }
        ref other => panic!("expected Server error, got {other:?}"),
    }

    assert!(!home.snapshot().device("1").unwrap().state);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn confirmed_toggle_flips_snapshot() {
    let (server, _store, home) = setup().await;
    mount_dashboard(&server).await;
    completed(home.refresh_now().await);

    Mock::given(method("POST"))
        .and(path("/api/buttons/1/toggle"))
        .respond_with(ok(json!({ "status": "success", "message": "Przełączono" })))
        .mount(&server)
        .await;

    let mut events = home.subscribe();
    home.toggle_device("1").await.unwrap();
    assert!(home.snapshot().device("1").unwrap().state);
    assert!(matches!(
        drain(&mut events).as_slice(),
        [DashboardEvent::SnapshotUpdated(_)]
    ));
}

#[tokio::test]
async fn rejected_toggle_envelope_is_api_error() {
    let (server, _store, home) = setup().await;
    mount_dashboard(&server).await;
    completed(home.refresh_now().await);

    Mock::given(method("POST"))
        .and(path("/api/buttons/2/toggle"))
        .respond_with(ok(json!({
            "status": "error",
            "message": "Brak dostępu",
            "data": { "state": false }
        })))
        .mount(&server)
        .await;

    let err = home.toggle_device("2").await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));
    assert!(home.snapshot().device("2").unwrap().state);
}

#[tokio::test]
async fn thermostat_target_follows_confirmation() {
    let (server, _store, home) = setup().await;
    mount_dashboard(&server).await;
    completed(home.refresh_now().await);

    Mock::given(method("POST"))
        .and(path("/api/temperature_controls/5/temperature"))
        .respond_with(ok(json!({ "status": "success" })))
        .mount(&server)
        .await;

    home.set_thermostat_target("5", 23.5).await.unwrap();
    let t = home.snapshot().thermostat("5").unwrap().temperature;
    assert!((t - 23.5).abs() < f64::EPSILON);
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
    let (server, store, home) = setup().await;
    store.set(StoreKey::SessionToken, "abc");

    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(ok(json!({ "status": "success" })))
        .mount(&server)
        .await;

    home.logout().await;
    assert!(!home.is_logged_in());

    home.gateway().ping().await.unwrap();
    let received = server.received_requests().await.unwrap();
    let ping = received.iter().find(|r| r.url.path() == "/api/ping").unwrap();
    assert!(ping.headers.get("cookie").is_none());
}

#[tokio::test]
async fn failed_login_is_authentication_error() {
    let (server, store, home) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let err = home
        .login("jan", &SecretString::from("bad".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert_eq!(err.status(), Some(401));
    assert!(store.session_token().is_none());
}

#[tokio::test]
async fn empty_credentials_rejected_locally() {
    let (server, _store, home) = setup().await;
    let err = home
        .login("", &SecretString::from("pw".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Endpoint ────────────────────────────────────────────────────────

#[tokio::test]
async fn set_endpoint_validates_and_persists() {
    let (server, _store, home) = setup().await;
    assert_eq!(home.endpoint(), server.uri());

    assert!(matches!(
        home.set_endpoint("   "),
        Err(CoreError::Validation { .. })
    ));
    assert_eq!(home.endpoint(), server.uri());

    let url = home.set_endpoint("192.168.1.5:5000").unwrap();
    assert_eq!(url.as_str(), "http://192.168.1.5:5000/");
    assert_eq!(home.endpoint(), "192.168.1.5:5000");
}
