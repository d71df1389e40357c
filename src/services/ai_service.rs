use anyhow::{anyhow, Context};
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

use crate::config::Config;

/// Thin client for the generative text model (any OpenAI-compatible chat
/// endpoint). Returns the raw completion text: callers run it through
/// `utils::json::extract_json` and parse it themselves, because the output
/// is untrusted until proven otherwise.
#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl AIService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.ai_model.clone(),
            timeout: Duration::from_secs(config.ai_timeout_secs),
        }
    }

    /// One chat completion call. `json_output` requests JSON-object
    /// formatting from the model; the response is still treated as
    /// arbitrary text by the caller.
    pub async fn complete(&self, prompt: &str, json_output: bool) -> anyhow::Result<String> {
        let mut payload = json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.7
        });
        if json_output {
            payload["response_format"] = json!({ "type": "json_object" });
        }

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling text model");

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .context("Failed to call text model")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("Text model error {}: {}", status, text));
        }

        let body: JsonValue = res.json().await.context("Failed to read text model body")?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Text model response had no content"))
    }
}
