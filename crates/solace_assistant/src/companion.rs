//! The companion orchestrator: every assistant interaction completes with
//! either the live backend's output or a deterministic local fallback —
//! never an error, never an indefinitely pending state.

use rand::seq::SliceRandom;
use std::sync::Arc;

use solace_core::safety::{contains_crisis_language, SAFETY_PREAMBLE};
use solace_core::ChatMessage;

use crate::backend::{AssistantBackend, GenerationParams};
use crate::classify::{self, Classification};
use crate::prompts;

/// Substituted for the live reply on any backend failure.
const FALLBACK_REPLIES: &[&str] = &[
    "I'm here with you. That sounds like a lot to carry — do you want to tell me more about it?",
    "Thank you for sharing that with me. Whatever you're feeling right now is okay.",
    "I hear you. Sometimes just putting it into words is already a step. What would feel kind to yourself right now?",
    "That sounds tough. Be gentle with yourself today — even a small pause counts.",
    "I'm listening. Take your time, there's no rush here.",
];

pub struct Companion {
    backend: Option<Arc<dyn AssistantBackend>>,
    params: GenerationParams,
    /// Most recent swallowed backend failure, for a non-blocking UI banner.
    last_error: Option<String>,
}

impl Companion {
    pub fn new(backend: Option<Arc<dyn AssistantBackend>>, params: GenerationParams) -> Self {
        if backend.is_none() {
            tracing::info!("No assistant backend configured; running on local fallbacks");
        }
        Self {
            backend,
            params,
            last_error: None,
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Produce the bot reply for a new user message. Crisis language is
    /// checked on the user message itself; when it matches, the safety
    /// preamble heads the reply regardless of which path produced the base
    /// text.
    pub async fn respond(&mut self, transcript: &[ChatMessage], user_text: &str) -> String {
        let crisis = contains_crisis_language(user_text);

        let base = match self.backend.clone() {
            Some(backend) => {
                match backend
                    .generate_reply(
                        prompts::SYSTEM_PROMPT,
                        transcript,
                        user_text,
                        self.params.clone(),
                    )
                    .await
                {
                    Ok(text) => {
                        self.last_error = None;
                        text.trim().to_string()
                    }
                    Err(e) => {
                        tracing::warn!("Assistant reply failed, using canned fallback: {:#}", e);
                        self.last_error = Some(format!("{:#}", e));
                        canned_reply()
                    }
                }
            }
            None => canned_reply(),
        };

        if crisis {
            format!("{}\n\n{}", SAFETY_PREAMBLE, base)
        } else {
            base
        }
    }

    /// Classify a single user message into a mood label and suggested action
    /// items. Any backend or parse failure falls through to the keyword rule
    /// engine, which always succeeds.
    pub async fn classify(&mut self, text: &str) -> Classification {
        if let Some(backend) = self.backend.clone() {
            let params = GenerationParams {
                // Structured output wants a cool head.
                temperature: 0.2,
                ..self.params.clone()
            };
            match backend
                .generate(&prompts::classification_prompt(text), params)
                .await
                .and_then(|raw| classify::parse_classification(&raw))
            {
                Ok(classification) => {
                    self.last_error = None;
                    return classification;
                }
                Err(e) => {
                    tracing::warn!("Classification failed, using keyword fallback: {:#}", e);
                    self.last_error = Some(format!("{:#}", e));
                }
            }
        }
        classify::fallback(text)
    }
}

fn canned_reply() -> String {
    FALLBACK_REPLIES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&FALLBACK_REPLIES[0])
        .to_string()
}
