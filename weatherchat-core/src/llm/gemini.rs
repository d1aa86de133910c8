use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{config::GeminiConfig, error::LlmError, provider::truncate_body};

use super::LanguageModel;

/// Client for the `generateContent` endpoint of the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    config: GeminiConfig,
    http: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: String, config: GeminiConfig) -> Self {
        Self {
            api_key,
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                LlmError::RequestFailed(format!("Failed to send request to Gemini: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            LlmError::RequestFailed(format!("Failed to read Gemini response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(LlmError::RequestFailed(format!(
                "Gemini request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::ParseError(e.to_string()))?;

        let text = parsed.into_text().ok_or(LlmError::EmptyResponse)?;
        debug!(model = %self.config.model, response_len = text.len(), "Gemini answered");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_format() {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "Olá" }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "contents": [{ "parts": [{ "text": "Olá" }] }] }));
    }

    #[test]
    fn text_parts_are_joined() {
        let body = r#"{"candidates":[{"content":{
            "parts":[{"text":"São "},{"text":"Paulo"}],"role":"model"}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("São Paulo"));
    }

    #[test]
    fn blocked_candidate_has_no_text() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(parsed.into_text().is_none());

        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(
            "KEY".into(),
            GeminiConfig {
                model: "gemini-2.5-flash".into(),
                base_url: "http://localhost/v1beta/".into(),
            },
        );
        assert_eq!(
            client.endpoint(),
            "http://localhost/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!format!("{client:?}").contains("KEY"));
    }
}
