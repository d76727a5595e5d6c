//! # homedash - Personal Dashboard Backend
//!
//! A single-binary HTTP backend that aggregates status data from third-party
//! services (Spotify playback, OpenWeatherMap, Google Calendar, Twitch
//! followed streams) and the local machine (CPU/RAM/GPU) behind one JSON
//! API, plus static asset serving for the browser dashboard.
//!
//! ## Design
//!
//! - Every upstream client is built once at startup and carried in an
//!   explicit [`web::AppState`]; handlers never touch globals or the
//!   environment.
//! - Every upstream failure is mapped at one boundary to HTTP 200 with a
//!   `{"error": <message>}` body; the front end inspects the body.
//! - No caching, no retries, no client authentication.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use homedash::{AppConfig, ResourceCollector, start_web_server, AppState, WebConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env();
//!     let state = Arc::new(AppState::from_config(&config, ResourceCollector::new()));
//!     start_web_server(state, WebConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod services;
pub mod web;

// Re-export public API
pub use config::{AppConfig, CalendarConfig, SpotifyConfig, TwitchConfig, WeatherConfig};
pub use error::{Result, ServiceError};
pub use metrics::{ResourceCollector, ResourceSnapshot};
pub use services::{
    spotify::{Device, PlaybackStatus},
    weather::WeatherSnapshot,
    CalendarClient, SpotifyClient, TwitchClient, WeatherClient,
};
pub use web::{create_app, start_web_server, AppState, SharedState, WebConfig};

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 8000;
