//! Environment-backed configuration for the dashboard services.
//!
//! All secrets and fixed parameters (API keys, the weather coordinate,
//! credential file paths) are read once at startup and carried in explicit
//! config structs; handlers never touch the environment themselves.

use std::env;
use std::path::PathBuf;

/// Default path of the stored Spotify OAuth token cache.
pub const DEFAULT_SPOTIFY_TOKEN_CACHE: &str = ".spotify_token.json";

/// Default path of the stored Google Calendar credential file, produced by
/// the external one-time authorization flow.
pub const DEFAULT_GOOGLE_TOKEN_FILE: &str = "token.json";

/// Top-level application configuration.
///
/// A service whose variables are absent is simply not configured; the
/// corresponding endpoint then reports a structured error instead of the
/// process refusing to start.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub spotify: Option<SpotifyConfig>,
    pub weather: Option<WeatherConfig>,
    pub calendar: CalendarConfig,
    pub twitch: Option<TwitchConfig>,
}

/// Spotify application credentials and token cache location.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_cache: PathBuf,
}

/// OpenWeatherMap key and the fixed coordinate the dashboard reports on.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub lat: f64,
    pub lon: f64,
}

/// Location of the stored Google Calendar credential.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub token_file: PathBuf,
}

/// Twitch Helix credentials. The access token is statically configured;
/// there is no refresh logic.
#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub access_token: String,
    pub user_id: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_GOOGLE_TOKEN_FILE),
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// Call after any `.env` file has been loaded. Never fails: services with
    /// missing or malformed variables are left unconfigured with a log line.
    pub fn from_env() -> Self {
        let spotify = SpotifyConfig::from_env();
        let weather = WeatherConfig::from_env();
        let twitch = TwitchConfig::from_env();
        let calendar = CalendarConfig::from_env();

        if spotify.is_none() {
            tracing::warn!("Spotify credentials not set, playback endpoints disabled");
        }
        if weather.is_none() {
            tracing::warn!("OpenWeatherMap configuration not set, weather endpoint disabled");
        }
        if twitch.is_none() {
            tracing::warn!("Twitch credentials not set, followed-streams endpoint disabled");
        }

        Self {
            spotify,
            weather,
            calendar,
            twitch,
        }
    }
}

impl SpotifyConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            client_id: var("SPOTIFY_CLIENT_ID")?,
            client_secret: var("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: var("SPOTIFY_REDIRECT_URI")?,
            token_cache: var("SPOTIFY_TOKEN_CACHE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SPOTIFY_TOKEN_CACHE)),
        })
    }
}

impl WeatherConfig {
    fn from_env() -> Option<Self> {
        Self::from_parts(var("OPENWEATHER_API_KEY")?, var("WEATHER_LAT")?, var("WEATHER_LON")?)
    }

    /// Assemble a weather configuration from raw string values, validating
    /// the coordinate.
    pub fn from_parts(api_key: String, lat: String, lon: String) -> Option<Self> {
        let lat = match lat.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("WEATHER_LAT is not a number: {lat}");
                return None;
            }
        };
        let lon = match lon.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("WEATHER_LON is not a number: {lon}");
                return None;
            }
        };
        Some(Self { api_key, lat, lon })
    }
}

impl CalendarConfig {
    fn from_env() -> Self {
        var("GOOGLE_TOKEN_FILE")
            .map(|p| Self {
                token_file: PathBuf::from(p),
            })
            .unwrap_or_default()
    }
}

impl TwitchConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            client_id: var("TWITCH_CLIENT_ID")?,
            access_token: var("TWITCH_ACCESS_TOKEN")?,
            user_id: var("TWITCH_USER_ID")?,
        })
    }
}

/// Read an environment variable, treating empty values as unset.
fn var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
