pub mod backend;
pub mod classify;
pub mod companion;
pub mod gemini;
pub mod prompts;

pub use backend::{AssistantBackend, GenerationParams};
pub use classify::{Classification, SuggestedTodo};
pub use companion::Companion;
pub use gemini::GeminiClient;
