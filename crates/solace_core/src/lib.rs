pub mod config;
pub mod safety;
pub mod store;
pub mod types;

pub use config::{AssistantConfig, SolaceConfig, StorageConfig};
pub use store::{StoreChange, WellnessStore};
pub use types::{
    ChatMessage, HabitCategory, HabitItem, JournalEntry, JournalPatch, Mood, MoodEntry, NewTodo,
    Sender, SleepEntry, SleepQuality, TodoItem,
};
