//! Record types for the six wellness collections.
//!
//! These are plain data carriers: all behavior lives in the Store's mutation
//! operations, and records are only ever constructed there.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Enumerations
// ============================================================================

/// The five-point mood scale used everywhere a mood label appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Poor,
    Awful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Great,
        Mood::Good,
        Mood::Okay,
        Mood::Poor,
        Mood::Awful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Poor => "poor",
            Mood::Awful => "awful",
        }
    }

    /// Parse a label case-insensitively. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Mood> {
        match label.trim().to_lowercase().as_str() {
            "great" => Some(Mood::Great),
            "good" => Some(Mood::Good),
            "okay" => Some(Mood::Okay),
            "poor" => Some(Mood::Poor),
            "awful" => Some(Mood::Awful),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Habit (and todo) categories. `Health` is the default for bare habit adds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    #[default]
    Health,
    Exercise,
    Mindfulness,
    Productivity,
    Social,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 5] = [
        HabitCategory::Health,
        HabitCategory::Exercise,
        HabitCategory::Mindfulness,
        HabitCategory::Productivity,
        HabitCategory::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Health => "health",
            HabitCategory::Exercise => "exercise",
            HabitCategory::Mindfulness => "mindfulness",
            HabitCategory::Productivity => "productivity",
            HabitCategory::Social => "social",
        }
    }

    pub fn parse(label: &str) -> Option<HabitCategory> {
        match label.trim().to_lowercase().as_str() {
            "health" => Some(HabitCategory::Health),
            "exercise" => Some(HabitCategory::Exercise),
            "mindfulness" => Some(HabitCategory::Mindfulness),
            "productivity" => Some(HabitCategory::Productivity),
            "social" => Some(HabitCategory::Social),
            _ => None,
        }
    }
}

impl std::fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subjective sleep quality, four levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Fair => "fair",
            SleepQuality::Good => "good",
            SleepQuality::Excellent => "excellent",
        }
    }

    pub fn parse(label: &str) -> Option<SleepQuality> {
        match label.trim().to_lowercase().as_str() {
            "poor" => Some(SleepQuality::Poor),
            "fair" => Some(SleepQuality::Fair),
            "good" => Some(SleepQuality::Good),
            "excellent" => Some(SleepQuality::Excellent),
            _ => None,
        }
    }
}

impl std::fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

// ============================================================================
// Records
// ============================================================================

/// One logged mood, newest first in the Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub timestamp: DateTime<Utc>,
    pub mood: Mood,
    pub note: Option<String>,
}

/// A recurring habit. Names are unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitItem {
    pub id: Uuid,
    pub name: String,
    pub completed: bool,
    /// Completed-day count; never decremented when a completion is undone.
    pub streak: u32,
    pub category: HabitCategory,
    /// Set on the false→true toggle, cleared on the true→false toggle.
    pub completed_on: Option<NaiveDate>,
}

/// A one-off action item. Creating one mirrors a habit of the same title;
/// the two drift independently afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub category: HabitCategory,
}

/// Title/category pair used to create todos (and their mirrored habits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub category: HabitCategory,
}

/// One turn of the companion transcript, chronological in the Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// One night of sleep, keyed by wake date (at most one entry per date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub bedtime: NaiveTime,
    pub wake_time: NaiveTime,
    pub duration_minutes: u32,
    pub quality: SleepQuality,
}

/// A journal page. The only editable record in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub mood: Option<Mood>,
}

/// Partial update for a journal entry. `Some` fields overwrite, `None` fields
/// are left as they were.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
    pub mood: Option<Mood>,
}
