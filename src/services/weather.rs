//! Weather reporter.
//!
//! Fetches current conditions and the short 3-hour-resolution forecast from
//! OpenWeatherMap for the fixed configured coordinate, metric units, and
//! republishes a reduced field set.

use crate::config::WeatherConfig;
use crate::error::Result;
use crate::services::check;
use serde::{Deserialize, Serialize};

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Forecast entries kept in the response, covering roughly the next 12 hours
/// at the upstream's 3-hour resolution.
pub const FORECAST_ENTRIES: usize = 4;

/// Combined current conditions and short forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub description: String,
    pub icon: String,
    pub forecast: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: String,
    pub temp: f64,
    pub description: String,
    pub icon: String,
}

/// Upstream current-conditions response (fields we keep).
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainBlock {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub pressure: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Upstream forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItem {
    #[serde(default)]
    pub dt_txt: String,
    #[serde(default)]
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

impl WeatherSnapshot {
    /// Combine the two upstream responses into one reduced snapshot,
    /// truncating the forecast to [`FORECAST_ENTRIES`] entries. Missing
    /// condition arrays degrade to empty strings instead of failing.
    pub fn from_upstream(current: &CurrentConditions, forecast: &ForecastResponse) -> Self {
        let condition = current.weather.first();
        Self {
            temp: current.main.temp,
            humidity: current.main.humidity,
            pressure: current.main.pressure,
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
            forecast: forecast
                .list
                .iter()
                .take(FORECAST_ENTRIES)
                .map(|item| {
                    let condition = item.weather.first();
                    ForecastEntry {
                        time: item.dt_txt.clone(),
                        temp: item.main.temp,
                        description: condition.map(|c| c.description.clone()).unwrap_or_default(),
                        icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
                    }
                })
                .collect(),
        }
    }
}

/// OpenWeatherMap client bound to a fixed coordinate.
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: String,
    lat: f64,
    lon: f64,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            lat: config.lat,
            lon: config.lon,
        }
    }

    /// Fetch current conditions and the short forecast.
    ///
    /// Two independent upstream calls; a failure in either one is reported
    /// as a structured error, never an unhandled fault.
    pub async fn get_weather(&self) -> Result<WeatherSnapshot> {
        let query = [
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
            ("lang", "en".to_string()),
        ];

        let resp = self.http.get(CURRENT_URL).query(&query).send().await?;
        let current: CurrentConditions = check(resp).await?.json().await?;

        let resp = self.http.get(FORECAST_URL).query(&query).send().await?;
        let forecast: ForecastResponse = check(resp).await?.json().await?;

        Ok(WeatherSnapshot::from_upstream(&current, &forecast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> CurrentConditions {
        serde_json::from_value(serde_json::json!({
            "main": {"temp": 21.4, "humidity": 62, "pressure": 1013},
            "weather": [{"description": "scattered clouds", "icon": "03d"}]
        }))
        .unwrap()
    }

    fn forecast_of(len: usize) -> ForecastResponse {
        let items: Vec<_> = (0..len)
            .map(|i| {
                serde_json::json!({
                    "dt_txt": format!("2026-08-26 {:02}:00:00", 3 * i),
                    "main": {"temp": 20.0 + i as f64, "humidity": 60, "pressure": 1012},
                    "weather": [{"description": "clear sky", "icon": "01d"}]
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({ "list": items })).unwrap()
    }

    #[test]
    fn selects_current_fields() {
        let snapshot = WeatherSnapshot::from_upstream(&current(), &forecast_of(0));
        assert_eq!(snapshot.temp, 21.4);
        assert_eq!(snapshot.humidity, 62);
        assert_eq!(snapshot.pressure, 1013);
        assert_eq!(snapshot.description, "scattered clouds");
        assert_eq!(snapshot.icon, "03d");
    }

    #[test]
    fn forecast_truncated_to_four() {
        let snapshot = WeatherSnapshot::from_upstream(&current(), &forecast_of(8));
        assert_eq!(snapshot.forecast.len(), FORECAST_ENTRIES);
        assert_eq!(snapshot.forecast[0].temp, 20.0);
        assert_eq!(snapshot.forecast[3].temp, 23.0);
    }

    #[test]
    fn short_forecast_kept_whole() {
        let snapshot = WeatherSnapshot::from_upstream(&current(), &forecast_of(2));
        assert_eq!(snapshot.forecast.len(), 2);
    }

    #[test]
    fn missing_condition_array_degrades() {
        let current: CurrentConditions = serde_json::from_value(serde_json::json!({
            "main": {"temp": 10.0, "humidity": 50, "pressure": 1000}
        }))
        .unwrap();
        let snapshot = WeatherSnapshot::from_upstream(&current, &forecast_of(1));
        assert_eq!(snapshot.description, "");
        assert_eq!(snapshot.icon, "");
    }
}
