//! Stream follow reporter.
//!
//! Calls the Twitch Helix "followed streams" endpoint for the configured
//! user with a statically configured access token. No refresh logic; an
//! expired token simply surfaces as the upstream 401 message.

use crate::config::TwitchConfig;
use crate::error::Result;
use crate::services::check;
use serde::Deserialize;
use serde_json::Value;

const FOLLOWED_URL: &str = "https://api.twitch.tv/helix/streams/followed";

#[derive(Debug, Deserialize)]
struct StreamList {
    #[serde(default)]
    data: Vec<Value>,
}

/// Twitch Helix client.
pub struct TwitchClient {
    http: reqwest::Client,
    client_id: String,
    access_token: String,
    user_id: String,
}

impl TwitchClient {
    pub fn new(config: &TwitchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            access_token: config.access_token.clone(),
            user_id: config.user_id.clone(),
        }
    }

    /// List currently live channels the user follows, passed through
    /// verbatim from the upstream `data` list.
    pub async fn get_followed_streams(&self) -> Result<Vec<Value>> {
        let resp = self
            .http
            .get(FOLLOWED_URL)
            .bearer_auth(&self.access_token)
            .header("Client-Id", &self.client_id)
            .query(&[("user_id", self.user_id.as_str())])
            .send()
            .await?;

        let list: StreamList = check(resp).await?.json().await?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_list_passes_data_through() {
        let raw = r#"{
            "data": [
                {"user_name": "streamer", "title": "speedrun", "game_name": "Celeste", "viewer_count": 1234}
            ],
            "pagination": {}
        }"#;
        let list: StreamList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0]["user_name"], "streamer");
        assert_eq!(list.data[0]["viewer_count"], 1234);
    }

    #[test]
    fn missing_data_field_is_empty() {
        let list: StreamList = serde_json::from_str("{}").unwrap();
        assert!(list.data.is_empty());
    }
}
