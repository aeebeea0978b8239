//! Crisis-language detection for outgoing user messages.
//!
//! A fixed, case-insensitive phrase list. When any phrase matches, the
//! companion prepends [`SAFETY_PREAMBLE`] to its reply no matter which path
//! (live backend or canned fallback) produced the reply text.

/// Prepended verbatim to the reply whenever crisis language is detected.
pub const SAFETY_PREAMBLE: &str = "It sounds like you're going through something really hard right now. \
You don't have to face this alone — please consider reaching out to someone you trust, \
or call or text 988 (Suicide & Crisis Lifeline) to talk to someone right away.";

const CRISIS_PATTERNS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "killing myself",
    "end my life",
    "ending my life",
    "take my own life",
    "want to die",
    "wanna die",
    "wish i was dead",
    "wish i were dead",
    "better off dead",
    "hurt myself",
    "hurting myself",
    "harm myself",
    "self-harm",
    "self harm",
    "no reason to live",
    "end it all",
    "can't go on",
];

/// Scan a user message for crisis language, case-insensitively.
pub fn contains_crisis_language(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CRISIS_PATTERNS.iter().any(|p| lowered.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_direct_phrases() {
        assert!(contains_crisis_language("I want to die"));
        assert!(contains_crisis_language("sometimes I think about suicide"));
        assert!(contains_crisis_language("I've been hurting myself"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(contains_crisis_language("I Want To DIE"));
        assert!(contains_crisis_language("SELF-HARM"));
    }

    #[test]
    fn test_phrase_inside_sentence() {
        assert!(contains_crisis_language(
            "honestly some days it feels like there's no reason to live anymore"
        ));
    }

    #[test]
    fn test_ordinary_messages_pass() {
        assert!(!contains_crisis_language("I had a rough day at work"));
        assert!(!contains_crisis_language("I'm so tired of this weather"));
        assert!(!contains_crisis_language(""));
    }

    #[test]
    fn test_preamble_is_nonempty() {
        assert!(!SAFETY_PREAMBLE.trim().is_empty());
    }
}
