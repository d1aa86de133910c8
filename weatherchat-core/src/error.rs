use thiserror::Error;

/// Failure to look up weather data for a city.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City '{0}' not found by the weather provider")]
    CityNotFound(String),

    #[error("Weather request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse weather response: {0}")]
    ParseError(String),

    #[error("Weather provider returned an empty forecast for '{0}'")]
    EmptyForecast(String),
}

/// Failure of a language-model call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Language model request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse language model response: {0}")]
    ParseError(String),

    #[error("Language model returned no text")]
    EmptyResponse,
}

/// Outcome of the chat pipeline, one variant per HTTP status class.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("Cidade '{city}' não encontrada")]
    NotFound {
        city: String,
        #[source]
        source: WeatherError,
    },

    #[error("Failed to generate response: {0}")]
    Upstream(#[from] LlmError),
}

impl ChatError {
    pub fn missing_prompt() -> Self {
        Self::Validation("O campo 'prompt' é obrigatório".to_string())
    }

    pub fn unresolved_city() -> Self {
        Self::Validation(
            "Não foi possível identificar a cidade. Por favor, especifique a cidade na pergunta \
             ou no campo 'city'."
                .to_string(),
        )
    }
}
