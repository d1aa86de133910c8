//! Service metadata handler

use axum::Json;
use serde::Serialize;

/// Static description of the service
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub example: ExampleRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleRequest {
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'static str>,
}

pub fn service_info() -> InfoResponse {
    InfoResponse {
        name: "weatherchat",
        version: env!("CARGO_PKG_VERSION"),
        description: "Responde perguntas sobre o clima em linguagem natural usando dados do \
                      OpenWeather e o modelo Gemini",
        endpoints: vec![EndpointInfo {
            method: "POST",
            path: "/weather-chat",
            description: "Envie { \"prompt\": string, \"city\"?: string } e receba \
                          { city, queryType, response, timestamp }",
        }],
        example: ExampleRequest {
            prompt: "Como está o clima em São Paulo hoje?",
            city: None,
        },
    }
}

/// Describe the service
pub async fn info() -> Json<InfoResponse> {
    Json(service_info())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lists_chat_endpoint() {
        let info = service_info();
        assert_eq!(info.endpoints.len(), 1);
        assert_eq!(info.endpoints[0].path, "/weather-chat");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn example_omits_city() {
        let json = serde_json::to_value(service_info()).unwrap();
        assert_eq!(
            json["example"],
            serde_json::json!({ "prompt": "Como está o clima em São Paulo hoje?" })
        );
    }
}
