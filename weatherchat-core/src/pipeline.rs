//! The per-request flow: resolve city, classify, fetch, compose.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{error, info, instrument, warn};

use crate::{
    Config,
    classifier::PromptClassifier,
    composer::ResponseComposer,
    error::{ChatError, WeatherError},
    llm::{LanguageModel, model_from_config},
    model::{ChatRequest, ChatResult, QueryType, WeatherData},
    provider::{WeatherProvider, provider_from_config},
};

/// Answers weather questions. Built once at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct WeatherChat {
    classifier: PromptClassifier,
    composer: ResponseComposer,
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherChat {
    pub fn new(model: Arc<dyn LanguageModel>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            classifier: PromptClassifier::new(Arc::clone(&model)),
            composer: ResponseComposer::new(model),
            weather,
        }
    }

    /// Wire the Gemini and OpenWeather clients described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(model_from_config(config), provider_from_config(config))
    }

    #[instrument(skip_all, fields(prompt_len = request.prompt.len(), city = ?request.city))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResult, ChatError> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            warn!(stage = "validate", "Empty prompt");
            return Err(ChatError::missing_prompt());
        }

        let supplied = request.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        let city = match supplied {
            Some(city) => city,
            None => self.classifier.extract_city(prompt).await.ok_or_else(|| {
                warn!(stage = "extract_city", "No city in prompt");
                ChatError::unresolved_city()
            })?,
        };

        let query_type = self.classifier.classify(prompt).await;
        info!(%city, %query_type, "Prompt classified");

        let data = self.fetch(&city, query_type).await.map_err(|source| {
            warn!(stage = "fetch_weather", %city, error = %source, "Weather lookup failed");
            ChatError::NotFound {
                city: city.clone(),
                source,
            }
        })?;

        let response = self.composer.compose(prompt, &data, query_type).await.map_err(|e| {
            error!(stage = "compose", error = %e, "Response generation failed");
            ChatError::from(e)
        })?;

        Ok(ChatResult {
            city,
            query_type,
            response,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Forecast for forecast questions, current conditions for everything else.
    async fn fetch(
        &self,
        city: &str,
        query_type: QueryType,
    ) -> Result<WeatherData, WeatherError> {
        let mut data = WeatherData::default();
        match query_type {
            QueryType::Forecast => data.forecast = Some(self.weather.fetch_forecast(city).await?),
            QueryType::Current | QueryType::General => {
                data.current = Some(self.weather.fetch_current(city).await?)
            }
        }
        Ok(data)
    }
}
