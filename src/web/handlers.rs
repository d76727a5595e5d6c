//! HTTP handlers for the dashboard API endpoints.
//!
//! Every upstream-facing handler returns [`ApiResult`]; failures are mapped
//! to `{"error": <message>}` with HTTP 200 at the single [`ApiError`]
//! boundary. The front end inspects the body, never the status code.

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::metrics::{ResourceCollector, ResourceSnapshot};
use crate::services::spotify::{Device, PlaybackStatus};
use crate::services::{CalendarClient, SpotifyClient, TwitchClient, WeatherClient};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

/// Process-lifetime application state passed to every handler.
///
/// Service clients are built once at startup and only read afterwards; the
/// resource collector sits behind a mutex because sysinfo refreshes need
/// exclusive access.
pub struct AppState {
    pub spotify: Option<SpotifyClient>,
    pub weather: Option<WeatherClient>,
    pub calendar: CalendarClient,
    pub twitch: Option<TwitchClient>,
    pub resources: Mutex<ResourceCollector>,
}

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the state from configuration, constructing each upstream client.
    ///
    /// A Spotify client that cannot load its token cache degrades that
    /// feature with a log line rather than failing startup.
    pub fn from_config(config: &AppConfig, resources: ResourceCollector) -> Self {
        let spotify = config.spotify.as_ref().and_then(|c| {
            SpotifyClient::new(c)
                .map_err(|e| tracing::warn!("Spotify client unavailable: {e}"))
                .ok()
        });
        let weather = config.weather.as_ref().map(WeatherClient::new);
        let twitch = config.twitch.as_ref().map(TwitchClient::new);
        let calendar = CalendarClient::new(&config.calendar);

        Self {
            spotify,
            weather,
            calendar,
            twitch,
            resources: Mutex::new(resources),
        }
    }
}

/// Boundary error type: renders any [`ServiceError`] as a structured error
/// payload with a transport-success status.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("request failed: {}", self.0);
        (StatusCode::OK, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Handler result carrying either a JSON payload or the structured error.
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

fn spotify(state: &AppState) -> Result<&SpotifyClient, ApiError> {
    state
        .spotify
        .as_ref()
        .ok_or_else(|| ServiceError::config_error("Spotify is not configured").into())
}

fn weather(state: &AppState) -> Result<&WeatherClient, ApiError> {
    state
        .weather
        .as_ref()
        .ok_or_else(|| ServiceError::config_error("weather is not configured").into())
}

fn twitch(state: &AppState) -> Result<&TwitchClient, ApiError> {
    state
        .twitch
        .as_ref()
        .ok_or_else(|| ServiceError::config_error("Twitch is not configured").into())
}

/// `GET /api/spotify/current`
pub async fn spotify_current(State(state): State<SharedState>) -> ApiResult<PlaybackStatus> {
    Ok(Json(spotify(&state)?.get_current().await?))
}

/// `GET /api/spotify/play`
pub async fn spotify_play(State(state): State<SharedState>) -> ApiResult<Value> {
    spotify(&state)?.play().await?;
    Ok(Json(json!({ "status": "success" })))
}

/// `GET /api/spotify/pause`
pub async fn spotify_pause(State(state): State<SharedState>) -> ApiResult<Value> {
    spotify(&state)?.pause().await?;
    Ok(Json(json!({ "status": "success" })))
}

/// `GET /api/spotify/toggle`
pub async fn spotify_toggle(State(state): State<SharedState>) -> ApiResult<Value> {
    let status = spotify(&state)?.toggle().await?;
    Ok(Json(json!({ "status": status })))
}

/// `GET /api/spotify/next`
pub async fn spotify_next(State(state): State<SharedState>) -> ApiResult<Value> {
    spotify(&state)?.next().await?;
    Ok(Json(json!({ "status": "success" })))
}

/// `GET /api/spotify/prev`
pub async fn spotify_prev(State(state): State<SharedState>) -> ApiResult<Value> {
    spotify(&state)?.previous().await?;
    Ok(Json(json!({ "status": "success" })))
}

#[derive(Debug, Deserialize)]
pub struct VolumeParams {
    pub value: i64,
}

/// `GET /api/spotify/volume?value=v` — the value is forwarded unchanged.
pub async fn spotify_volume(
    State(state): State<SharedState>,
    Query(params): Query<VolumeParams>,
) -> ApiResult<Value> {
    spotify(&state)?.set_volume(params.value).await?;
    Ok(Json(json!({ "status": "success", "volume": params.value })))
}

/// `GET /api/spotify/devices`
pub async fn spotify_devices(State(state): State<SharedState>) -> ApiResult<Vec<Device>> {
    Ok(Json(spotify(&state)?.list_devices().await?))
}

/// `GET /api/spotify/transfer/{device_id}`
pub async fn spotify_transfer(
    State(state): State<SharedState>,
    Path(device_id): Path<String>,
) -> ApiResult<Value> {
    spotify(&state)?.transfer(&device_id).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// `GET /api/weather`
pub async fn weather_report(
    State(state): State<SharedState>,
) -> ApiResult<crate::services::weather::WeatherSnapshot> {
    Ok(Json(weather(&state)?.get_weather().await?))
}

/// `GET /api/calendar`
pub async fn calendar_events(State(state): State<SharedState>) -> ApiResult<Vec<Value>> {
    Ok(Json(state.calendar.get_events().await?))
}

/// `GET /api/resources`
pub async fn resources(State(state): State<SharedState>) -> Json<ResourceSnapshot> {
    let snapshot = state.resources.lock().await.snapshot();
    Json(snapshot)
}

/// `GET /api/twitch/followed`
pub async fn twitch_followed(State(state): State<SharedState>) -> ApiResult<Vec<Value>> {
    Ok(Json(twitch(&state)?.get_followed_streams().await?))
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "homedash",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Serve the dashboard HTML from the configured index file.
pub async fn serve_index(path: PathBuf) -> Result<Html<String>, StatusCode> {
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Ok(Html(content)),
        Err(e) => {
            error!("Failed to read {}: {e}", path.display());
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Serve a minimal built-in page when no index file is available.
pub async fn default_index() -> Html<&'static str> {
    Html(DEFAULT_INDEX_HTML)
}

const DEFAULT_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>homedash</title>
    <style>
        body { font-family: -apple-system, 'Segoe UI', sans-serif; margin: 40px auto; max-width: 640px; color: #333; }
        code { background: #f4f4f4; padding: 2px 6px; border-radius: 4px; }
        li { margin: 6px 0; }
    </style>
</head>
<body>
    <h1>homedash</h1>
    <p>No dashboard index file configured. The API is up:</p>
    <ul>
        <li><code>/api/spotify/current</code>, <code>/api/spotify/devices</code>, playback controls</li>
        <li><code>/api/weather</code></li>
        <li><code>/api/calendar</code></li>
        <li><code>/api/resources</code></li>
        <li><code>/api/twitch/followed</code></li>
        <li><code>/api/health</code></li>
    </ul>
</body>
</html>"#;
