//! Upstream service clients.
//!
//! One module per third-party API. Each client is built once at startup,
//! holds a `reqwest::Client`, and performs straight pass-through calls; any
//! non-success response is turned into [`ServiceError::Upstream`] carrying
//! the upstream message.

pub mod calendar;
pub mod spotify;
pub mod twitch;
pub mod weather;

pub use calendar::CalendarClient;
pub use spotify::SpotifyClient;
pub use twitch::TwitchClient;
pub use weather::WeatherClient;

use crate::error::{Result, ServiceError};
use serde_json::Value;

/// Check the response status, converting non-success codes into an upstream
/// error that carries the message from the response body when one is present.
pub(crate) async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("upstream request failed")
        .to_string();
    let message = match resp.json::<Value>().await {
        Ok(body) => extract_message(&body).unwrap_or(fallback),
        Err(_) => fallback,
    };

    Err(ServiceError::upstream_error(status.as_u16(), message))
}

/// Pull a human-readable message out of an upstream error body.
///
/// Upstreams disagree on shape: OpenWeatherMap and Twitch use a top-level
/// `message`, Spotify and Google nest it under `error.message`, and some
/// bodies only carry a bare `error` string.
pub(crate) fn extract_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            body.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(str::to_string)
}
