//! Application state shared across handlers

use std::sync::Arc;

use weatherchat_core::WeatherChat;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// The question-answering pipeline, built once at startup
    pub chat: Arc<WeatherChat>,
}

impl AppState {
    pub fn new(chat: WeatherChat) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}
