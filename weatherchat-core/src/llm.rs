use crate::{Config, error::LlmError, llm::gemini::GeminiClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod gemini;

/// Free-text completion: one prompt in, one answer out.
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Construct the language model from config. A missing key surfaces on the first call.
pub fn model_from_config(config: &Config) -> Arc<dyn LanguageModel> {
    let api_key = config.gemini_api_key.clone().unwrap_or_default();
    Arc::new(GeminiClient::new(api_key, config.gemini.clone()))
}
