use crate::{
    Config,
    error::WeatherError,
    model::{ForecastSeries, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of weather data for a named city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastSeries, WeatherError>;
}

/// Construct the weather provider from config.
///
/// A missing API key is not an error here: the provider will reject the
/// calls and the pipeline reports them like any other lookup failure.
pub fn provider_from_config(config: &Config) -> Arc<dyn WeatherProvider> {
    let api_key = config.openweather_api_key.clone().unwrap_or_default();
    Arc::new(OpenWeatherProvider::new(api_key, config.openweather.clone()))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
