//! OpenAI-compatible chat completions provider.
//!
//! Sends the configured system message plus the user's prompt to
//! `{api_base}/chat/completions` and returns the first choice's content.
//! Any endpoint speaking the same protocol works by changing `api_base`.

mod types;

use crate::{Provider, ProviderError};
use async_trait::async_trait;
use convtree_core::ProviderConfig;
use std::time::Duration;
use tracing::debug;
use types::{ChatMessage, ChatRequest, ChatResponse};

/// Provider for OpenAI-style chat completion APIs.
///
/// Does not derive `Debug` so the API key never ends up in logs.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    system_prompt: String,
}

impl OpenAiProvider {
    /// Create a provider from explicit settings.
    pub fn new(api_key: impl Into<String>, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        })
    }

    /// Create a provider, reading the key from `config.api_key_env`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(api_key, config)
    }

    /// The model this provider requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending chat completion");

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => ProviderError::Authentication,
                code => ProviderError::Status {
                    status: code,
                    body: error_body,
                },
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)
    }
}
