//! Calendar reader.
//!
//! Reads the stored Google OAuth credential from disk, exchanges the refresh
//! token for an access token, and lists the next upcoming events on the
//! primary calendar. The credential file is produced once by an external
//! authorization flow; this module only ever reads it.

use crate::config::CalendarConfig;
use crate::error::{Result, ServiceError};
use crate::services::check;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Upcoming events returned per request.
pub const MAX_EVENTS: usize = 10;

/// Stored credential in the shape the authorization flow writes it.
#[derive(Debug, Clone, Deserialize)]
struct StoredCredential {
    refresh_token: String,
    client_id: String,
    client_secret: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<Value>,
}

/// Google Calendar client reading the stored credential per request.
pub struct CalendarClient {
    http: reqwest::Client,
    token_file: PathBuf,
}

impl CalendarClient {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_file: config.token_file.clone(),
        }
    }

    /// List up to [`MAX_EVENTS`] upcoming events on the primary calendar,
    /// ordered by start time, recurring events expanded into instances.
    /// Items are passed through verbatim.
    pub async fn get_events(&self) -> Result<Vec<Value>> {
        let credential = self.load_credential().await?;
        let access_token = self.refresh_access_token(&credential).await?;

        let time_min = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let resp = self
            .http
            .get(EVENTS_URL)
            .bearer_auth(&access_token)
            .query(&[
                ("maxResults", MAX_EVENTS.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("timeMin", time_min),
            ])
            .send()
            .await?;

        let list: EventList = check(resp).await?.json().await?;
        Ok(list.items)
    }

    async fn load_credential(&self) -> Result<StoredCredential> {
        let raw = tokio::fs::read_to_string(&self.token_file).await.map_err(|e| {
            ServiceError::config_error(format!(
                "cannot read calendar credential {}: {e}",
                self.token_file.display()
            ))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn refresh_access_token(&self, credential: &StoredCredential) -> Result<String> {
        let resp = self
            .http
            .post(&credential.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credential.refresh_token.as_str()),
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ServiceError::auth_error(format!(
                "calendar token refresh failed ({status}); re-run the authorization flow"
            )));
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }
}
