use crate::backend::{AssistantBackend, GenerationParams};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use solace_core::{AssistantConfig, ChatMessage, Sender};
use std::time::Duration;

/// Provider for the `generateContent` REST shape of the generative-language
/// API: `system_instruction` plus `user`/`model` role-tagged contents.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Fails when no credential is configured; callers treat that as
    /// "no backend" and run on the local fallbacks.
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("no API key configured (set GEMINI_API_KEY)")?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    async fn generate_content(
        &self,
        system: Option<&str>,
        contents: Vec<Value>,
        params: &GenerationParams,
    ) -> Result<String> {
        let mut payload = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_output_tokens,
            }
        });
        if let Some(system) = system {
            payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API Error ({}): {}", status, error_text);
        }

        let resp_json: Value = response.json().await?;
        let text = resp_json["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("Gemini returned no candidate text");
        }
        Ok(text)
    }
}

/// Role-tagged contents from the transcript prefix. The upstream API requires
/// the first content to carry the `user` role, so any bot greeting that
/// precedes the first user message is dropped.
fn transcript_contents(transcript: &[ChatMessage], user_text: &str) -> Vec<Value> {
    let first_user = transcript
        .iter()
        .position(|m| m.sender == Sender::User)
        .unwrap_or(transcript.len());

    let mut contents: Vec<Value> = transcript[first_user..]
        .iter()
        .map(|m| {
            let role = match m.sender {
                Sender::User => "user",
                Sender::Bot => "model",
            };
            json!({ "role": role, "parts": [{ "text": m.text }] })
        })
        .collect();

    contents.push(json!({ "role": "user", "parts": [{ "text": user_text }] }));
    contents
}

#[async_trait::async_trait]
impl AssistantBackend for GeminiClient {
    async fn generate_reply(
        &self,
        system: &str,
        transcript: &[ChatMessage],
        user_text: &str,
        params: GenerationParams,
    ) -> Result<String> {
        let contents = transcript_contents(transcript, user_text);
        self.generate_content(Some(system), contents, &params).await
    }

    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String> {
        let contents = vec![json!({ "role": "user", "parts": [{ "text": prompt }] })];
        self.generate_content(None, contents, &params).await
    }
}
