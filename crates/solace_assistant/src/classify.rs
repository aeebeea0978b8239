//! Message classification: one mood label plus a handful of suggested action
//! items.
//!
//! The live path parses the backend's JSON leniently; the fallback is a
//! fixed, priority-ordered keyword rule table that always succeeds. Both
//! paths produce the same shape: 1-5 items, unique titles, every item tagged
//! with a habit category.

use anyhow::{Context, Result};
use serde::Deserialize;
use solace_core::{HabitCategory, Mood};

pub const MAX_SUGGESTIONS: usize = 5;

/// A suggested action item; becomes a todo (and its mirrored habit) when the
/// user accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedTodo {
    pub title: String,
    pub category: HabitCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub mood: Mood,
    pub todos: Vec<SuggestedTodo>,
}

// ============================================================================
// Lenient parsing of the backend response
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawClassification {
    mood: String,
    #[serde(default)]
    todos: Vec<RawTodo>,
}

#[derive(Debug, Deserialize)]
struct RawTodo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
}

/// Parse a backend response into a validated [`Classification`].
///
/// Errors when the JSON cannot be located, the mood label is not one of the
/// five known values, or no valid action item survives — the caller falls
/// back to [`fallback`] in every one of those cases.
pub fn parse_classification(text: &str) -> Result<Classification> {
    let raw = extract_json(text).context("No classification JSON found in response")?;

    let mood = Mood::parse(&raw.mood)
        .with_context(|| format!("Unknown mood label '{}'", raw.mood))?;

    let mut todos: Vec<SuggestedTodo> = Vec::new();
    for item in raw.todos {
        let title = item.title.trim();
        if title.is_empty() {
            continue;
        }
        if todos
            .iter()
            .any(|t| t.title.to_lowercase() == title.to_lowercase())
        {
            continue;
        }
        todos.push(SuggestedTodo {
            title: title.to_string(),
            // An off-list category is not worth discarding the item over.
            category: HabitCategory::parse(&item.category).unwrap_or_default(),
        });
        if todos.len() == MAX_SUGGESTIONS {
            break;
        }
    }

    if todos.is_empty() {
        anyhow::bail!("Classification contained no valid action items");
    }

    Ok(Classification { mood, todos })
}

/// Locate and parse the JSON object, tolerating markdown fences and leading
/// prose around it.
fn extract_json(text: &str) -> Option<RawClassification> {
    let trimmed = text.trim();

    if let Ok(raw) = serde_json::from_str::<RawClassification>(trimmed) {
        return Some(raw);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    serde_json::from_str::<RawClassification>(&trimmed[start..=end]).ok()
}

// ============================================================================
// Deterministic keyword fallback
// ============================================================================

struct Rule {
    keywords: &'static [&'static str],
    mood: Option<Mood>,
    suggestions: &'static [(&'static str, HabitCategory)],
}

/// Priority-ordered: the first matching rule with a mood vote decides the
/// mood; suggestions accumulate from every matching rule, in order.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["hopeless", "worthless", "falling apart", "can't cope", "cant cope"],
        mood: Some(Mood::Awful),
        suggestions: &[
            ("Reach out to someone you trust", HabitCategory::Social),
            ("Write down three feelings without judging them", HabitCategory::Mindfulness),
        ],
    },
    Rule {
        keywords: &[
            "anxious", "anxiety", "panic", "overwhelmed", "stressed", "stress", "worried",
            "worry", "nervous", "on edge",
        ],
        mood: Some(Mood::Poor),
        suggestions: &[
            ("Try a 5-minute breathing exercise", HabitCategory::Mindfulness),
            ("Step outside for some fresh air", HabitCategory::Health),
            ("Write down what's worrying you", HabitCategory::Mindfulness),
        ],
    },
    Rule {
        keywords: &["sad", "down", "depressed", "lonely", "crying", "miserable", "blue"],
        mood: Some(Mood::Poor),
        suggestions: &[
            ("Call or message a friend", HabitCategory::Social),
            ("Take a short walk outside", HabitCategory::Exercise),
        ],
    },
    Rule {
        keywords: &[
            "can't sleep", "cant sleep", "insomnia", "sleepless", "tired", "exhausted",
            "fatigued", "no energy",
        ],
        mood: Some(Mood::Poor),
        suggestions: &[
            ("Wind down screen-free for 30 minutes before bed", HabitCategory::Health),
            ("Keep a consistent bedtime tonight", HabitCategory::Health),
            ("Try a body-scan meditation", HabitCategory::Mindfulness),
        ],
    },
    Rule {
        keywords: &["angry", "furious", "frustrated", "annoyed", "irritated"],
        mood: Some(Mood::Poor),
        suggestions: &[
            ("Take ten slow breaths before responding", HabitCategory::Mindfulness),
            ("Go for a quick run or brisk walk", HabitCategory::Exercise),
        ],
    },
    Rule {
        keywords: &["procrastinat", "unproductive", "distracted", "can't focus", "cant focus"],
        mood: Some(Mood::Okay),
        suggestions: &[
            ("Pick one small task and finish it", HabitCategory::Productivity),
            ("Try 25 minutes of focused work", HabitCategory::Productivity),
        ],
    },
    Rule {
        keywords: &["happy", "amazing", "excited", "wonderful", "fantastic", "thrilled"],
        mood: Some(Mood::Great),
        suggestions: &[
            ("Write down what made today good", HabitCategory::Mindfulness),
            ("Share the good news with someone", HabitCategory::Social),
        ],
    },
    Rule {
        keywords: &["good", "fine", "better", "grateful", "calm", "relaxed"],
        mood: Some(Mood::Good),
        suggestions: &[
            ("Keep the streak going with a short walk", HabitCategory::Exercise),
            ("Note one thing you're grateful for", HabitCategory::Mindfulness),
        ],
    },
];

/// Used when no rule matched; priority-ordered.
const DEFAULT_SUGGESTIONS: &[(&str, HabitCategory)] = &[
    ("Take a short walk", HabitCategory::Exercise),
    ("Drink a glass of water", HabitCategory::Health),
    ("Pause for three deep breaths", HabitCategory::Mindfulness),
];

/// Deterministic keyword classification. Always succeeds, always returns at
/// least one action item and at most [`MAX_SUGGESTIONS`].
pub fn fallback(text: &str) -> Classification {
    let lowered = text.to_lowercase();

    let mut mood = None;
    let mut todos: Vec<SuggestedTodo> = Vec::new();

    for rule in RULES {
        if !rule.keywords.iter().any(|k| lowered.contains(k)) {
            continue;
        }
        if mood.is_none() {
            mood = rule.mood;
        }
        for (title, category) in rule.suggestions {
            if todos.len() == MAX_SUGGESTIONS {
                break;
            }
            if todos.iter().any(|t| t.title == *title) {
                continue;
            }
            todos.push(SuggestedTodo {
                title: title.to_string(),
                category: *category,
            });
        }
    }

    if todos.is_empty() {
        todos.extend(DEFAULT_SUGGESTIONS.iter().map(|(title, category)| {
            SuggestedTodo {
                title: title.to_string(),
                category: *category,
            }
        }));
    }

    Classification {
        mood: mood.unwrap_or(Mood::Okay),
        todos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Parsing ---

    #[test]
    fn test_parse_clean_json() {
        let json = r#"{"mood": "poor", "todos": [{"title": "Take a walk", "category": "exercise"}]}"#;
        let c = parse_classification(json).unwrap();
        assert_eq!(c.mood, Mood::Poor);
        assert_eq!(c.todos.len(), 1);
        assert_eq!(c.todos[0].title, "Take a walk");
        assert_eq!(c.todos[0].category, HabitCategory::Exercise);
    }

    #[test]
    fn test_parse_code_block_wrapped() {
        let text = "Here you go:\n```json\n{\"mood\": \"good\", \"todos\": [{\"title\": \"Stretch\", \"category\": \"exercise\"}]}\n```";
        let c = parse_classification(text).unwrap();
        assert_eq!(c.mood, Mood::Good);
        assert_eq!(c.todos[0].title, "Stretch");
    }

    #[test]
    fn test_parse_unknown_mood_fails() {
        let json = r#"{"mood": "ecstatic", "todos": [{"title": "Dance", "category": "exercise"}]}"#;
        assert!(parse_classification(json).is_err());
    }

    #[test]
    fn test_parse_zero_valid_items_fails() {
        assert!(parse_classification(r#"{"mood": "okay", "todos": []}"#).is_err());
        assert!(parse_classification(r#"{"mood": "okay", "todos": [{"title": "  "}]}"#).is_err());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_classification("I can't help with that").is_err());
    }

    #[test]
    fn test_parse_dedups_and_caps() {
        let json = r#"{"mood": "okay", "todos": [
            {"title": "Walk", "category": "exercise"},
            {"title": "walk", "category": "health"},
            {"title": "B", "category": "health"},
            {"title": "C", "category": "health"},
            {"title": "D", "category": "health"},
            {"title": "E", "category": "health"},
            {"title": "F", "category": "health"}
        ]}"#;
        let c = parse_classification(json).unwrap();
        assert_eq!(c.todos.len(), MAX_SUGGESTIONS);
        assert_eq!(c.todos[0].title, "Walk");
        assert_eq!(c.todos[1].title, "B");
    }

    #[test]
    fn test_parse_unknown_category_defaults_to_health() {
        let json = r#"{"mood": "okay", "todos": [{"title": "Nap", "category": "leisure"}]}"#;
        let c = parse_classification(json).unwrap();
        assert_eq!(c.todos[0].category, HabitCategory::Health);
    }

    // --- Fallback rules ---

    #[test]
    fn test_fallback_anxious_sleepless() {
        let c = fallback("I feel anxious and can't sleep");
        assert_eq!(c.mood, Mood::Poor);
        assert!(!c.todos.is_empty() && c.todos.len() <= MAX_SUGGESTIONS);

        assert!(
            c.todos.iter().any(|t| t.category == HabitCategory::Mindfulness
                && t.title.to_lowercase().contains("breathing")),
            "expected a breathing mindfulness item, got {:?}", c.todos
        );
        assert!(
            c.todos.iter().any(|t| t.category == HabitCategory::Health
                && t.title.to_lowercase().contains("bed")),
            "expected a sleep-hygiene health item, got {:?}", c.todos
        );

        let mut titles: Vec<&str> = c.todos.iter().map(|t| t.title.as_str()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), c.todos.len(), "duplicate titles in {:?}", c.todos);
    }

    #[test]
    fn test_fallback_neutral_text_uses_defaults() {
        let c = fallback("just checking in");
        assert_eq!(c.mood, Mood::Okay);
        assert!(!c.todos.is_empty());
        assert_eq!(c.todos[0].title, "Take a short walk");
    }

    #[test]
    fn test_fallback_positive_text() {
        let c = fallback("I got the job, I'm so excited!");
        assert_eq!(c.mood, Mood::Great);
    }

    #[test]
    fn test_fallback_mood_priority_is_first_match() {
        // Despair outranks the positive rule regardless of word order.
        let c = fallback("happy on the outside but hopeless underneath");
        assert_eq!(c.mood, Mood::Awful);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = fallback("stressed about the deadline");
        let b = fallback("stressed about the deadline");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fallback_caps_at_five() {
        let c = fallback("anxious, sad, can't sleep, angry, and distracted");
        assert!(c.todos.len() <= MAX_SUGGESTIONS);
    }
}
