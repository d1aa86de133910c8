use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incoming question, as posted by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Point-in-time conditions for a city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    /// Metres; the provider omits it for some stations.
    pub visibility_m: Option<u32>,
    pub coordinates: Coordinates,
    pub observation_time: DateTime<Utc>,
    /// Offset from UTC in seconds for the city's local time.
    pub utc_offset_secs: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
}

/// Upcoming 3-hour steps for a city, at most [`ForecastSeries::MAX_ENTRIES`] long.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city: String,
    pub coordinates: Coordinates,
    pub utc_offset_secs: i32,
    pub entries: Vec<ForecastEntry>,
}

impl ForecastSeries {
    pub const MAX_ENTRIES: usize = 8;
}

/// Whatever the pipeline fetched for the composer.
#[derive(Debug, Clone, Default)]
pub struct WeatherData {
    pub current: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastSeries>,
}

/// Intent of a prompt. Serialized with the labels the classifier prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QueryType {
    #[default]
    #[serde(rename = "atual")]
    Current,
    #[serde(rename = "previsao")]
    Forecast,
    #[serde(rename = "geral")]
    General,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Current => "atual",
            QueryType::Forecast => "previsao",
            QueryType::General => "geral",
        }
    }

    /// Parse a model answer. Accepts the Portuguese labels (with or without
    /// accent) and their English names; anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
            .to_lowercase();

        match normalized.as_str() {
            "atual" | "current" => Some(QueryType::Current),
            "previsao" | "previsão" | "forecast" => Some(QueryType::Forecast),
            "geral" | "general" => Some(QueryType::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The answer returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResult {
    pub city: String,
    pub query_type: QueryType,
    pub response: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_type_parses_model_labels() {
        assert_eq!(QueryType::from_label("atual"), Some(QueryType::Current));
        assert_eq!(QueryType::from_label(" Previsão\n"), Some(QueryType::Forecast));
        assert_eq!(QueryType::from_label("\"geral\"."), Some(QueryType::General));
        assert_eq!(QueryType::from_label("forecast"), Some(QueryType::Forecast));
        assert_eq!(QueryType::from_label("amanhã"), None);
        assert_eq!(QueryType::from_label(""), None);
    }

    #[test]
    fn chat_result_uses_camel_case_fields() {
        let result = ChatResult {
            city: "Recife".into(),
            query_type: QueryType::Forecast,
            response: "Vai chover.".into(),
            timestamp: "2024-05-01T12:00:00.000Z".into(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["queryType"], "previsao");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn chat_request_city_is_optional() {
        let req: ChatRequest = serde_json::from_str(r#"{"prompt": "Vai chover?"}"#).unwrap();
        assert_eq!(req.prompt, "Vai chover?");
        assert!(req.city.is_none());
    }
}
