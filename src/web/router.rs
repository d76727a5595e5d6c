//! Web application router and middleware setup.

use crate::web::config::WebConfig;
use crate::web::handlers::{self, SharedState};
use axum::{routing::get, Router};
use std::path::PathBuf;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Create the axum application with all routes and middleware.
pub fn create_app(state: SharedState, config: &WebConfig) -> Router {
    let mut app = Router::new()
        .route("/api/spotify/current", get(handlers::spotify_current))
        .route("/api/spotify/play", get(handlers::spotify_play))
        .route("/api/spotify/pause", get(handlers::spotify_pause))
        .route("/api/spotify/toggle", get(handlers::spotify_toggle))
        .route("/api/spotify/next", get(handlers::spotify_next))
        .route("/api/spotify/prev", get(handlers::spotify_prev))
        .route("/api/spotify/volume", get(handlers::spotify_volume))
        .route("/api/spotify/devices", get(handlers::spotify_devices))
        .route(
            "/api/spotify/transfer/:device_id",
            get(handlers::spotify_transfer),
        )
        .route("/api/weather", get(handlers::weather_report))
        .route("/api/calendar", get(handlers::calendar_events))
        .route("/api/resources", get(handlers::resources))
        .route("/api/twitch/followed", get(handlers::twitch_followed))
        .route("/api/health", get(handlers::health_check))
        .with_state(state);

    // Static assets under /static, when the directory exists
    if let Some(static_path) = &config.static_path {
        let static_path = PathBuf::from(static_path);
        if static_path.is_dir() {
            info!("Serving static files from: {}", static_path.display());
            app = app.nest_service("/static", ServeDir::new(&static_path));
        } else {
            tracing::warn!(
                "Static path {} does not exist, /static disabled",
                static_path.display()
            );
        }
    }

    // Dashboard entry point at /
    let index_file = config.index_path.as_ref().map(PathBuf::from);
    match index_file {
        Some(path) if path.is_file() => {
            info!("Serving dashboard from: {}", path.display());
            app = app.route("/", get(move || handlers::serve_index(path.clone())));
        }
        _ => {
            app = app.route("/", get(handlers::default_index));
        }
    }

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(TraceLayer::new_for_http())
}
