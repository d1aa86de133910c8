//! Prompt understanding: which city is the user asking about, and what kind
//! of answer do they want.
//!
//! Both operations are best-effort. A failed or unintelligible model answer
//! degrades to a default instead of failing the request.

use std::{fmt::Display, sync::Arc};

use tracing::{instrument, warn};

use crate::{error::LlmError, llm::LanguageModel, model::QueryType};

/// Answer the model gives when the prompt names no city.
pub const UNSPECIFIED_CITY: &str = "não especificada";

/// Recover from a failed best-effort step with a default value.
pub trait Fallback<T> {
    /// `Ok` passes through; `Err` is logged with `stage` and replaced by `default`.
    fn or_fallback(self, default: T, stage: &str) -> T;
}

impl<T, E: Display> Fallback<T> for Result<T, E> {
    fn or_fallback(self, default: T, stage: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!(stage, error = %err, "Falling back to default");
                default
            }
        }
    }
}

/// Why a model answer could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("unrecognised query type '{0}'")]
    Unrecognised(String),
}

#[derive(Debug, Clone)]
pub struct PromptClassifier {
    model: Arc<dyn LanguageModel>,
}

impl PromptClassifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// City named in `prompt`, or `None` when none is named or the model call fails.
    pub async fn extract_city(&self, prompt: &str) -> Option<String> {
        self.try_extract_city(prompt).await.or_fallback(None, "extract_city")
    }

    #[instrument(skip_all)]
    pub async fn try_extract_city(&self, prompt: &str) -> Result<Option<String>, LlmError> {
        let answer = self.model.generate(&extraction_prompt(prompt)).await?;
        Ok(parse_city(&answer))
    }

    /// Query type of `prompt`, [`QueryType::Current`] when the model fails or answers off-script.
    pub async fn classify(&self, prompt: &str) -> QueryType {
        self.try_classify(prompt).await.or_fallback(QueryType::Current, "classify")
    }

    #[instrument(skip_all)]
    pub async fn try_classify(&self, prompt: &str) -> Result<QueryType, ClassifyError> {
        let answer = self.model.generate(&classification_prompt(prompt)).await?;
        let label = answer.trim().to_lowercase();
        QueryType::from_label(&label).ok_or(ClassifyError::Unrecognised(label))
    }
}

fn extraction_prompt(prompt: &str) -> String {
    format!(
        "Analise o seguinte prompt e extraia APENAS o nome da cidade mencionada.\n\
         Se não houver cidade mencionada, responda com \"{UNSPECIFIED_CITY}\".\n\
         Responda APENAS com o nome da cidade, sem explicações adicionais.\n\
         \n\
         Prompt: \"{prompt}\""
    )
}

fn classification_prompt(prompt: &str) -> String {
    format!(
        "Analise o seguinte prompt sobre clima e classifique em uma dessas categorias:\n\
         - \"atual\": pergunta sobre o clima atual/agora\n\
         - \"previsao\": pergunta sobre previsão do tempo/próximos dias\n\
         - \"geral\": pergunta geral sobre clima\n\
         \n\
         Responda APENAS com uma das palavras: atual, previsao, ou geral.\n\
         \n\
         Prompt: \"{prompt}\""
    )
}

fn parse_city(answer: &str) -> Option<String> {
    let city = answer
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '.'));

    let lower = city.to_lowercase();
    if city.is_empty() || lower == UNSPECIFIED_CITY || lower == "nao especificada" {
        None
    } else {
        Some(city.to_string())
    }
}
