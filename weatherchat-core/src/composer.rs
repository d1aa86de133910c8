use std::{fmt::Write, sync::Arc};

use chrono::{FixedOffset, Offset, Utc};
use tracing::instrument;

use crate::{
    error::LlmError,
    llm::LanguageModel,
    model::{ForecastSeries, QueryType, WeatherData, WeatherSnapshot},
};

/// Turns fetched weather data into a conversational answer.
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    model: Arc<dyn LanguageModel>,
}

impl ResponseComposer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, prompt, data))]
    pub async fn compose(
        &self,
        prompt: &str,
        data: &WeatherData,
        query_type: QueryType,
    ) -> Result<String, LlmError> {
        let context = build_context(data, query_type);
        self.model.generate(&answer_prompt(prompt, &context)).await
    }
}

/// Context block for the answer prompt. Empty unless the data matching
/// `query_type` is present.
pub fn build_context(data: &WeatherData, query_type: QueryType) -> String {
    match (query_type, &data.current, &data.forecast) {
        (QueryType::Current, Some(current), _) => current_context(current),
        (QueryType::Forecast, _, Some(forecast)) => forecast_context(forecast),
        _ => String::new(),
    }
}

fn current_context(s: &WeatherSnapshot) -> String {
    let visibility = s
        .visibility_m
        .map(|m| format!("{} km", f64::from(m) / 1000.0))
        .unwrap_or_else(|| "não informada".to_string());

    format!(
        "Dados atuais do clima para {city}:\n\
         - Temperatura: {temp}°C (sensação térmica: {feels}°C)\n\
         - Condição: {condition}\n\
         - Umidade: {humidity}%\n\
         - Pressão: {pressure} hPa\n\
         - Vento: {wind} m/s\n\
         - Visibilidade: {visibility}\n\
         - Coordenadas: {lat}, {lon}\n",
        city = s.city,
        temp = s.temperature_c,
        feels = s.feels_like_c,
        condition = s.condition,
        humidity = s.humidity_pct,
        pressure = s.pressure_hpa,
        wind = s.wind_speed_mps,
        lat = s.coordinates.lat,
        lon = s.coordinates.lon,
    )
}

fn forecast_context(f: &ForecastSeries) -> String {
    let offset = FixedOffset::east_opt(f.utc_offset_secs).unwrap_or_else(|| Utc.fix());

    let mut context = format!("Previsão do tempo para {} nos próximos dias:\n", f.city);
    for entry in f.entries.iter().take(ForecastSeries::MAX_ENTRIES) {
        let local = entry.time.with_timezone(&offset);
        let _ = write!(
            context,
            "\n{date} às {time}:\n\
             - Temperatura: {temp}°C\n\
             - Condição: {condition}\n\
             - Umidade: {humidity}%\n\
             - Vento: {wind} m/s\n",
            date = local.format("%d/%m/%Y"),
            time = local.format("%H:%M"),
            temp = entry.temperature_c,
            condition = entry.condition,
            humidity = entry.humidity_pct,
            wind = entry.wind_speed_mps,
        );
    }
    context
}

fn answer_prompt(prompt: &str, context: &str) -> String {
    format!(
        "Você é um assistente especializado em clima. Responda de forma natural, amigável e \
         informativa em português brasileiro.\n\
         \n\
         Pergunta do usuário: \"{prompt}\"\n\
         \n\
         {context}\n\
         Baseado nos dados fornecidos, responda à pergunta do usuário de forma conversacional \
         e útil.\n\
         Se apropriado, forneça dicas ou recomendações relacionadas ao clima."
    )
}
