//! Spotify playback controller.
//!
//! Wraps the Web API player endpoints: read current playback and devices,
//! issue play/pause/skip/volume/transfer commands. The access token comes
//! from a stored OAuth token cache (produced by the external one-time
//! authorization flow) and is refreshed from the cached refresh token when
//! expired, matching the behavior of the auth manager the dashboard
//! originally relied on.

use crate::config::SpotifyConfig;
use crate::error::{Result, ServiceError};
use crate::services::check;
use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use tokio::sync::Mutex;

const API_BASE: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Refresh the access token this many seconds before it actually expires.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Reduced playback status served to the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A playback device as reported by the devices endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

/// Upstream playback state, as returned by `GET /me/player`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Album,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    #[serde(default)]
    devices: Vec<Device>,
}

/// Stored OAuth token material, in the shape the authorization flow caches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenCache {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

impl PlaybackStatus {
    /// Status for the "no active device" case.
    pub fn inactive() -> Self {
        Self {
            is_playing: false,
            title: None,
            artist: None,
            image_url: None,
            message: Some("No active device".to_string()),
        }
    }

    /// Shape the upstream playback state into the reduced status.
    ///
    /// A playing item maps to title/artist/cover fields; anything else maps
    /// to `is_playing: false` with a non-empty message.
    pub fn from_playback(playback: &PlaybackState) -> Self {
        match &playback.item {
            Some(item) if playback.is_playing => Self {
                is_playing: true,
                title: Some(item.name.clone()),
                artist: item.artists.first().map(|a| a.name.clone()),
                image_url: item.album.images.first().map(|i| i.url.clone()),
                message: None,
            },
            _ => Self {
                is_playing: false,
                title: None,
                artist: None,
                image_url: None,
                message: Some("Playback stopped".to_string()),
            },
        }
    }
}

/// Find the device currently selected as playback target, if any.
pub fn find_active_device(devices: &[Device]) -> Option<&Device> {
    devices.iter().find(|d| d.is_active)
}

/// Long-lived Spotify Web API client.
pub struct SpotifyClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Mutex<TokenCache>,
}

impl SpotifyClient {
    /// Create a client from the stored token cache.
    ///
    /// Fails if the cache file is missing or unreadable; the authorization
    /// flow must have been run once beforehand.
    pub fn new(config: &SpotifyConfig) -> Result<Self> {
        let raw = fs::read_to_string(&config.token_cache).map_err(|e| {
            ServiceError::config_error(format!(
                "cannot read Spotify token cache {}: {e}",
                config.token_cache.display()
            ))
        })?;
        let cache: TokenCache = serde_json::from_str(&raw)?;

        Ok(Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(cache),
        })
    }

    /// Return a valid access token, refreshing it from the cached refresh
    /// token when expired.
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.token.lock().await;

        if cache.expires_at <= Utc::now().timestamp() + TOKEN_EXPIRY_MARGIN_SECS {
            tracing::debug!("Spotify access token expired, refreshing");
            let resp = self
                .http
                .post(TOKEN_URL)
                .basic_auth(&self.client_id, Some(&self.client_secret))
                .form(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", cache.refresh_token.as_str()),
                ])
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(ServiceError::auth_error(format!(
                    "Spotify token refresh failed ({})",
                    resp.status()
                )));
            }

            let refreshed: RefreshResponse = resp.json().await?;
            cache.access_token = refreshed.access_token;
            cache.expires_at = Utc::now().timestamp() + refreshed.expires_in;
            if let Some(rt) = refreshed.refresh_token {
                cache.refresh_token = rt;
            }
        }

        Ok(cache.access_token.clone())
    }

    /// Raw playback state; `None` when nothing is active (204 or empty body).
    async fn playback_state(&self) -> Result<Option<PlaybackState>> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(format!("{API_BASE}/me/player"))
            .bearer_auth(&token)
            .send()
            .await?;

        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let resp = check(resp).await?;
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Current playback status, shaped for the front end.
    pub async fn get_current(&self) -> Result<PlaybackStatus> {
        match self.playback_state().await? {
            Some(playback) => Ok(PlaybackStatus::from_playback(&playback)),
            None => Ok(PlaybackStatus::inactive()),
        }
    }

    /// Resume playback on the current device.
    pub async fn play(&self) -> Result<()> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .put(format!("{API_BASE}/me/player/play"))
            .bearer_auth(&token)
            .body("")
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Pause playback, targeting the active device explicitly when one is
    /// reported; otherwise issue an unqualified pause.
    pub async fn pause(&self) -> Result<()> {
        let devices = self.list_devices().await?;
        let token = self.access_token().await?;

        let mut req = self
            .http
            .put(format!("{API_BASE}/me/player/pause"))
            .bearer_auth(&token);
        if let Some(active) = find_active_device(&devices) {
            req = req.query(&[("device_id", active.id.as_str())]);
        }

        check(req.body("").send().await?).await?;
        Ok(())
    }

    /// Toggle play/pause by reading the current state and inverting it.
    /// Returns the resulting state name (`"paused"` or `"playing"`).
    pub async fn toggle(&self) -> Result<&'static str> {
        let playing = self
            .playback_state()
            .await?
            .map(|p| p.is_playing)
            .unwrap_or(false);

        if playing {
            self.pause().await?;
            Ok("paused")
        } else {
            self.play().await?;
            Ok("playing")
        }
    }

    /// Skip to the next track.
    pub async fn next(&self) -> Result<()> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .post(format!("{API_BASE}/me/player/next"))
            .bearer_auth(&token)
            .body("")
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Skip back to the previous track.
    pub async fn previous(&self) -> Result<()> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .post(format!("{API_BASE}/me/player/previous"))
            .bearer_auth(&token)
            .body("")
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Set the playback volume. The value is forwarded unvalidated; an
    /// out-of-range value surfaces whatever error the upstream raises.
    pub async fn set_volume(&self, value: i64) -> Result<()> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .put(format!("{API_BASE}/me/player/volume"))
            .bearer_auth(&token)
            .query(&[("volume_percent", value)])
            .body("")
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// List the user's playback devices, in upstream order.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(format!("{API_BASE}/me/player/devices"))
            .bearer_auth(&token)
            .send()
            .await?;
        let resp = check(resp).await?;
        let list: DeviceList = resp.json().await?;
        Ok(list.devices)
    }

    /// Switch the active output device and force playback to continue there.
    pub async fn transfer(&self, device_id: &str) -> Result<()> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .put(format!("{API_BASE}/me/player"))
            .bearer_auth(&token)
            .json(&json!({ "device_ids": [device_id], "play": true }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_playing_track() {
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

        assert!(status.is_playing);
        assert_eq!(status.title.as_deref(), Some("Song"));
        assert_eq!(status.artist.as_deref(), Some("Artist"));
        assert_eq!(status.image_url.as_deref(), Some("http://x/img.png"));
        assert!(status.message.is_none());
    }

    #[test]
    fn paused_playback_has_message() {
        let playback = PlaybackState {
            is_playing: false,
            item: None,
        };
        let status = PlaybackStatus::from_playback(&playback);
        assert!(!status.is_playing);
        assert!(!status.message.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn playing_without_item_is_not_playing() {
        let playback = PlaybackState {
            is_playing: true,
            item: None,
        };
        let status = PlaybackStatus::from_playback(&playback);
        assert!(!status.is_playing);
        assert!(status.message.is_some());
    }

    #[test]
    fn inactive_status_has_message() {
        let status = PlaybackStatus::inactive();
        assert!(!status.is_playing);
        assert!(!status.message.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn finds_single_active_device() {
        let devices = vec![
            Device {
                id: "a".into(),
                name: "Desk".into(),
                is_active: false,
            },
            Device {
                id: "b".into(),
                name: "Living room".into(),
                is_active: true,
            },
        ];
        let active = find_active_device(&devices).unwrap();
        assert_eq!(active.id, "b");
    }

    #[test]
    fn no_active_device_yields_none() {
        let devices = vec![Device {
            id: "a".into(),
            name: "Desk".into(),
            is_active: false,
        }];
        assert!(find_active_device(&devices).is_none());
        assert!(find_active_device(&[]).is_none());
    }

    #[test]
    fn status_serialization_skips_absent_fields() {
        let status = PlaybackStatus::inactive();
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["is_playing"], false);
        assert!(value.get("title").is_none());
        assert!(value.get("artist").is_none());
        assert!(value["message"].is_string());
    }
}
