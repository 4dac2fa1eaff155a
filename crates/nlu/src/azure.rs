// crates/nlu/src/azure.rs

use std::time::Duration;

use contavoz_core::{ContavozError, ContavozResult};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::LlmConfig;

/// Thin chat-completions client for an Azure OpenAI deployment. The API key
/// is read from the configured environment variable at request time.
pub struct AzureOpenAiClient {
    config: LlmConfig,
    client: Client,
}

impl AzureOpenAiClient {
    pub fn new(config: LlmConfig) -> ContavozResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_s))
            .build()
            .map_err(|e| ContavozError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Send one system + user exchange and return the assistant's raw text
    /// content.
    pub async fn complete(&self, system: &str, user: &str) -> ContavozResult<String> {
        let api_key = std::env::var(&self.config.api_key_env).map_err(|_| {
            ContavozError::Extraction(format!(
                "API key not found for env var {}",
                self.config.api_key_env
            ))
        })?;

        let url = format!(
            "{}openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint, self.config.deployment, self.config.api_version
        );

        let payload = json!({
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(&url)
            .header("api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ContavozError::Network(format!("LLM request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ContavozError::Extraction(format!(
                "LLM responded with status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ContavozError::Extraction(format!("Failed to parse LLM response: {e}")))?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| ContavozError::Extraction("Invalid LLM response format".to_string()))?;

        debug!(deployment = %self.config.deployment, "LLM completion received");

        Ok(content.to_string())
    }
}
