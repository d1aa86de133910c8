use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    config::OpenWeatherConfig,
    error::WeatherError,
    model::{Coordinates, ForecastEntry, ForecastSeries, WeatherSnapshot},
};

use super::{WeatherProvider, truncate_body};

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    config: OpenWeatherConfig,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.config.base_url)
            .field("units", &self.config.units)
            .field("language", &self.config.language)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: OpenWeatherConfig) -> Self {
        Self {
            api_key,
            config,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.config.units.as_str()),
                ("lang", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                WeatherError::RequestFailed(format!(
                    "Failed to send request to OpenWeather ({endpoint}): {e}"
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::RequestFailed(format!(
                "Failed to read OpenWeather {endpoint} response body: {e}"
            ))
        })?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::ParseError(format!("OpenWeather {endpoint} JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

impl From<OwCoord> for Coordinates {
    fn from(c: OwCoord) -> Self {
        Coordinates {
            lat: c.lat,
            lon: c.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    coord: OwCoord,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn describe(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "desconhecida".to_string())
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        WeatherSnapshot {
            condition: describe(&parsed.weather),
            city: parsed.name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            visibility_m: parsed.visibility,
            coordinates: parsed.coord.into(),
            observation_time: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
            utc_offset_secs: parsed.timezone,
        }
    }
}

impl From<OwForecastResponse> for ForecastSeries {
    fn from(parsed: OwForecastResponse) -> Self {
        let entries = parsed
            .list
            .into_iter()
            .take(ForecastSeries::MAX_ENTRIES)
            .map(|e| ForecastEntry {
                time: unix_to_utc(e.dt).unwrap_or_else(Utc::now),
                condition: describe(&e.weather),
                temperature_c: e.main.temp,
                feels_like_c: e.main.feels_like,
                humidity_pct: e.main.humidity,
                pressure_hpa: e.main.pressure,
                wind_speed_mps: e.wind.speed,
            })
            .collect();

        ForecastSeries {
            city: parsed.city.name,
            coordinates: parsed.city.coord.into(),
            utc_offset_secs: parsed.city.timezone,
            entries,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;
        debug!(name = %parsed.name, "Fetched current conditions");
        Ok(parsed.into())
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<ForecastSeries, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;
        if parsed.list.is_empty() {
            return Err(WeatherError::EmptyForecast(city.to_string()));
        }
        debug!(name = %parsed.city.name, entries = parsed.list.len(), "Fetched forecast");
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast_json(entries: usize) -> String {
        let list: Vec<serde_json::Value> = (0..entries)
            .map(|i| {
                serde_json::json!({
                    "dt": 1_714_564_800 + (i as i64) * 10_800,
                    "main": {
                        "temp": 20.0 + i as f64,
                        "feels_like": 19.0,
                        "pressure": 1012,
                        "humidity": 70
                    },
                    "weather": [{ "description": "céu limpo" }],
                    "wind": { "speed": 3.1 }
                })
            })
            .collect();

        serde_json::json!({
            "city": {
                "name": "Curitiba",
                "coord": { "lat": -25.43, "lon": -49.27 },
                "timezone": -10800
            },
            "list": list
        })
        .to_string()
    }

    #[test]
    fn forecast_is_capped_at_eight_entries() {
        let parsed: OwForecastResponse = serde_json::from_str(&forecast_json(40)).unwrap();
        let series = ForecastSeries::from(parsed);

        assert_eq!(series.entries.len(), ForecastSeries::MAX_ENTRIES);
        assert_eq!(series.city, "Curitiba");
        assert_eq!(series.utc_offset_secs, -10800);
        assert!(series.entries.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn current_without_visibility_or_weather() {
        let body = r#"{
            "name": "Manaus", "dt": 1714564800, "timezone": -14400,
            "coord": { "lat": -3.1, "lon": -60.02 },
            "main": { "temp": 31.2, "feels_like": 36.0, "pressure": 1009, "humidity": 66 },
            "weather": [],
            "wind": { "speed": 1.5 }
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let snapshot = WeatherSnapshot::from(parsed);

        assert_eq!(snapshot.visibility_m, None);
        assert_eq!(snapshot.condition, "desconhecida");
        assert_eq!(
            snapshot.coordinates,
            Coordinates {
                lat: -3.1,
                lon: -60.02,
            }
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let provider = OpenWeatherProvider::new("SECRET".into(), OpenWeatherConfig::default());
        assert!(!format!("{provider:?}").contains("SECRET"));
    }
}
