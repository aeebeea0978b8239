//! Prompt text for the two assistant calls.

pub const SYSTEM_PROMPT: &str = "\
You are Solace, a warm and supportive wellness companion. The user is \
tracking their mood, habits, sleep, and journaling in this app, and talks \
to you about how they feel. Validate their feelings first, keep replies to \
two to four sentences, and gently suggest at most one small, concrete next \
step when it fits the conversation. Never diagnose, never prescribe, and \
never claim to be a therapist.";

/// Single-prompt classification request. The response must be exactly one
/// JSON object; the parser still tolerates fences and surrounding prose.
pub fn classification_prompt(text: &str) -> String {
    format!(
        r#"Classify the user's message below for a wellness tracker.

Respond with ONLY a JSON object in this exact shape:
{{"mood": "<label>", "todos": [{{"title": "<short action>", "category": "<category>"}}]}}

- "mood" must be exactly one of: great, good, okay, poor, awful.
- "todos" must hold 3 to 5 small, concrete self-care action items.
- Each "category" must be one of: health, exercise, mindfulness, productivity, social.

Message: "{}""#,
        text
    )
}
