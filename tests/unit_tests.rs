use axum::{body::Body, http::Request};
use homedash::{
    create_app, services::spotify::PlaybackState, AppConfig, AppState, Device, PlaybackStatus,
    ResourceCollector, ResourceSnapshot, WebConfig,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    // No service credentials: every upstream endpoint must degrade to a
    // structured error body, never a transport failure.
    Arc::new(AppState::from_config(
        &AppConfig::default(),
        ResourceCollector::without_gpu(),
    ))
}

fn test_app() -> axum::Router {
    let config = WebConfig::default()
        .with_static_path(None)
        .with_index_path(None);
    create_app(test_state(), &config)
}

async fn get_json(app: axum::Router, uri: &str) -> (axum::http::StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// The worked shaping example: playing upstream JSON maps to the reduced
/// title/artist/cover response.
#[test]
fn test_playback_shaping_example() {
    let upstream = r#"{
        "is_playing": true,
        "item": {
            "name": "Song",
            "artists": [{"name": "Artist"}],
            "album": {"images": [{"url": "http://x/img.png"}]}
        }
    }"#;
    let playback: PlaybackState = serde_json::from_str(upstream).unwrap();
    let status = PlaybackStatus::from_playback(&playback);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["is_playing"], true);
    assert_eq!(json["title"], "Song");
    assert_eq!(json["artist"], "Artist");
    assert_eq!(json["image_url"], "http://x/img.png");
}

/// Stopped or device-less playback always carries a non-empty message.
#[test]
fn test_playback_stopped_states() {
    for status in [
        PlaybackStatus::inactive(),
        PlaybackStatus::from_playback(&PlaybackState {
            is_playing: false,
            item: None,
        }),
    ] {
        assert!(!status.is_playing);
        assert!(!status.message.unwrap().is_empty());
    }
}

/// Test Device serialization round trip
#[test]
fn test_device_serialization() {
    let device = Device {
        id: "abc123".to_string(),
        name: "Living room".to_string(),
        is_active: true,
    };
    let json = serde_json::to_string(&device).unwrap();
    let parsed: Device = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.id, "abc123");
    assert!(parsed.is_active);
}

/// Test WebConfig builder pattern
#[test]
fn test_web_config() {
    let config = WebConfig::default()
        .with_host("127.0.0.1")
        .with_port(9090)
        .with_cors(false)
        .with_static_path(Some("assets".to_string()))
        .with_index_path(None);

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9090);
    assert!(!config.enable_cors);
    assert_eq!(config.static_path.as_deref(), Some("assets"));
    assert!(config.index_path.is_none());
    assert_eq!(config.bind_address(), "127.0.0.1:9090");
}

/// Test ResourceSnapshot JSON shape
#[test]
fn test_resource_snapshot_fields() {
    let snapshot = ResourceSnapshot::default();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("cpu").is_some());
    assert!(json.get("ram").is_some());
    assert_eq!(json["gpu"], 0);
    assert_eq!(json["gpu_temp"], 0);
    assert_eq!(json["gpu_active"], false);
}

/// With GPU monitoring never initialized, snapshots stay zeroed regardless
/// of per-request conditions.
#[test]
fn test_gpu_disabled_snapshot() {
    let mut collector = ResourceCollector::without_gpu();
    let snapshot = collector.snapshot();
    assert_eq!(snapshot.gpu, 0);
    assert_eq!(snapshot.gpu_temp, 0);
    assert!(!snapshot.gpu_active);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json(test_app(), "/api/health").await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "homedash");
}

#[tokio::test]
async fn test_resources_endpoint() {
    let (status, body) = get_json(test_app(), "/api/resources").await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert!(body["cpu"].is_number());
    assert!(body["ram"].is_number());
    assert_eq!(body["gpu_active"], false);
}

/// An unconfigured upstream service returns HTTP 200 with an error body,
/// never a transport-level failure.
#[tokio::test]
async fn test_unconfigured_service_returns_error_body() {
    for uri in [
        "/api/spotify/current",
        "/api/spotify/play",
        "/api/spotify/volume?value=50",
        "/api/spotify/transfer/device123",
        "/api/weather",
        "/api/twitch/followed",
    ] {
        let (status, body) = get_json(test_app(), uri).await;
        assert_eq!(status, axum::http::StatusCode::OK, "{uri}");
        assert!(
            body.get("error").and_then(Value::as_str).is_some(),
            "{uri} should carry an error field, got {body}"
        );
    }
}

/// The calendar endpoint degrades the same way when the stored credential
/// file is missing.
#[tokio::test]
async fn test_calendar_missing_credential_returns_error_body() {
    let config = AppConfig {
        calendar: homedash::CalendarConfig {
            token_file: "/nonexistent/token.json".into(),
        },
        ..Default::default()
    };
    let state = Arc::new(AppState::from_config(
        &config,
        ResourceCollector::without_gpu(),
    ));
    let app = create_app(
        state,
        &WebConfig::default()
            .with_static_path(None)
            .with_index_path(None),
    );

    let (status, body) = get_json(app, "/api/calendar").await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("credential"));
}

#[tokio::test]
async fn test_root_serves_fallback_page() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("homedash"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
