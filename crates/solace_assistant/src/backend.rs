use anyhow::Result;
use async_trait::async_trait;
use solace_core::ChatMessage;

/// Sampling parameters for a single generation request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// The external generative-language service, behind a request/response
/// contract. One method per upstream call shape: a chat-style reply over the
/// running transcript, and a single-prompt completion used for
/// classification. Implementations report failures as errors; the
/// [`Companion`](crate::Companion) owns every fallback.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Chat-style request: system instructions, the transcript so far, and
    /// the new user message. Returns free reply text.
    async fn generate_reply(
        &self,
        system: &str,
        transcript: &[ChatMessage],
        user_text: &str,
        params: GenerationParams,
    ) -> Result<String>;

    /// Single-prompt completion, used for structured classification.
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String>;
}
