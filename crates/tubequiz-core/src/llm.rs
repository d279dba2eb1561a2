use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{
    error::{Result, TubequizError},
    provider::Provider,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Prompt in, raw model text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionsModel {
    client: reqwest::Client,
    provider: Provider,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl ChatCompletionsModel {
    /// Build a client for `provider`, reading its API key from the environment.
    pub fn from_env(provider: Provider, timeout: Duration) -> Result<Self> {
        let api_key = provider.validate_api_key()?;
        Self::new(provider, api_key, timeout)
    }

    pub fn new(provider: Provider, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TubequizError::ModelRequestFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            provider,
            endpoint: provider.config().api_url.to_string(),
            model: provider.resolve_model(),
            api_key,
            timeout,
        })
    }

    /// Send requests to another OpenAI-compatible endpoint, such as a local proxy.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_error(&self, e: reqwest::Error) -> TubequizError {
        if e.is_timeout() {
            TubequizError::ModelTimedOut {
                seconds: self.timeout.as_secs(),
            }
        } else {
            TubequizError::ModelRequestFailed {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsModel {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            provider = self.name(),
            model = %self.model,
            prompt_len = prompt.len(),
            "sending prompt"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(provider = self.name(), %status, "model request rejected");
            return Err(TubequizError::ModelRequestFailed {
                reason: format!("{}: {}", status, body.trim()),
            });
        }

        let response = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| self.request_error(e))?;

        extract_content(&response)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response
pub fn extract_content(response: &serde_json::Value) -> Result<String> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(TubequizError::EmptyModelResponse);
    }
    Ok(content.to_string())
}
