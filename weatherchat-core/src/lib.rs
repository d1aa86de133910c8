//! Core library for the `weatherchat` service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the weather provider and the language model
//! - Prompt classification and response composition
//! - The request pipeline tying them together ([`WeatherChat`])
//!
//! It is used by `weatherchat-server`, but has no HTTP-server code of its own.

pub mod classifier;
pub mod composer;
pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use classifier::{Fallback, PromptClassifier};
pub use composer::ResponseComposer;
pub use config::Config;
pub use error::{ChatError, LlmError, WeatherError};
pub use llm::LanguageModel;
pub use model::{ChatRequest, ChatResult, ForecastSeries, QueryType, WeatherData, WeatherSnapshot};
pub use pipeline::WeatherChat;
pub use provider::WeatherProvider;
