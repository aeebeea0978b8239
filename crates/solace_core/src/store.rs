//! The wellness Store: single source of truth for all six collections.
//!
//! Every record is created, mutated, and deleted here and nowhere else.
//! Mutations take validated inputs and return nothing — invalid input
//! (unknown id, duplicate habit name, blank title) is a silent no-op, so
//! observers never see an error, only change events.
//!
//! Observers call [`WellnessStore::subscribe`] and receive one
//! [`StoreChange`] per collection a mutation touched, emitted after the
//! mutation is fully applied. The Store is mutated from a single logical
//! thread of event handling, so an observer draining its channel always
//! sees a consistent post-mutation snapshot.

use chrono::{Local, NaiveDate, NaiveTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::types::{
    ChatMessage, HabitCategory, HabitItem, JournalEntry, JournalPatch, Mood, MoodEntry, NewTodo,
    Sender, SleepEntry, SleepQuality, TodoItem,
};

/// Which slice of the Store a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    TodayMood,
    Moods,
    Habits,
    Todos,
    Chat,
    Sleep,
    Journal,
}

#[derive(Default)]
pub struct WellnessStore {
    today_mood: Option<Mood>,
    /// Newest first.
    moods: Vec<MoodEntry>,
    habits: Vec<HabitItem>,
    /// Newest first.
    todos: Vec<TodoItem>,
    /// Chronological, oldest first.
    chat: Vec<ChatMessage>,
    /// Newest first, at most one entry per wake date.
    sleep: Vec<SleepEntry>,
    /// Newest first.
    journal: Vec<JournalEntry>,
    subscribers: Vec<mpsc::UnboundedSender<StoreChange>>,
}

impl WellnessStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Register a change observer. Dropped receivers are pruned on the next
    /// emit; there is no explicit unsubscribe.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StoreChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, change: StoreChange) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn today_mood(&self) -> Option<Mood> {
        self.today_mood
    }

    pub fn moods(&self) -> &[MoodEntry] {
        &self.moods
    }

    pub fn habits(&self) -> &[HabitItem] {
        &self.habits
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn sleep(&self) -> &[SleepEntry] {
        &self.sleep
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    // ========================================================================
    // Mood
    // ========================================================================

    /// Set the current-session mood indicator. No history side effect.
    pub fn set_today_mood(&mut self, mood: Mood) {
        self.today_mood = Some(mood);
        self.emit(StoreChange::TodayMood);
    }

    /// Prepend a mood entry stamped now; also updates the session indicator.
    pub fn add_mood_entry(&mut self, mood: Mood, note: Option<String>) {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self.moods.insert(
            0,
            MoodEntry {
                timestamp: Utc::now(),
                mood,
                note,
            },
        );
        self.today_mood = Some(mood);
        self.emit(StoreChange::Moods);
        self.emit(StoreChange::TodayMood);
    }

    // ========================================================================
    // Habits
    // ========================================================================

    /// Append a habit unless a habit with the same name (case-insensitively)
    /// already exists.
    pub fn add_habit(&mut self, name: &str, category: HabitCategory) {
        if self.add_habit_inner(name, category) {
            self.emit(StoreChange::Habits);
        }
    }

    fn add_habit_inner(&mut self, name: &str, category: HabitCategory) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let lowered = name.to_lowercase();
        if self.habits.iter().any(|h| h.name.to_lowercase() == lowered) {
            tracing::debug!("habit '{}' already exists, ignoring", name);
            return false;
        }
        self.habits.push(HabitItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            completed: false,
            streak: 0,
            category,
            completed_on: None,
        });
        true
    }

    /// Flip a habit's completion flag. Completing bumps the streak and stamps
    /// today's date; un-completing clears the date and leaves the streak.
    pub fn toggle_habit(&mut self, id: Uuid) {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            return;
        };
        if habit.completed {
            habit.completed = false;
            habit.completed_on = None;
        } else {
            habit.completed = true;
            habit.streak += 1;
            habit.completed_on = Some(Local::now().date_naive());
        }
        self.emit(StoreChange::Habits);
    }

    pub fn delete_habit(&mut self, id: Uuid) {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        if self.habits.len() != before {
            self.emit(StoreChange::Habits);
        }
    }

    // ========================================================================
    // Todos
    // ========================================================================

    /// Prepend a todo per input item and mirror each into a habit of the same
    /// title and category. The mirroring is intentional denormalization: no
    /// identifier is shared and the two collections drift independently after
    /// creation.
    pub fn add_todos(&mut self, items: Vec<NewTodo>) {
        let mut added_todo = false;
        let mut added_habit = false;
        for item in items {
            let title = item.title.trim();
            if title.is_empty() {
                continue;
            }
            self.todos.insert(
                0,
                TodoItem {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    completed: false,
                    category: item.category,
                },
            );
            added_todo = true;
            added_habit |= self.add_habit_inner(title, item.category);
        }
        if added_todo {
            self.emit(StoreChange::Todos);
        }
        if added_habit {
            self.emit(StoreChange::Habits);
        }
    }

    /// Flip a todo's completion flag. Does not touch the mirrored habit.
    pub fn toggle_todo(&mut self, id: Uuid) {
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            return;
        };
        todo.completed = !todo.completed;
        self.emit(StoreChange::Todos);
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Append to the transcript, preserving chronological order.
    /// Returns the new message's id.
    pub fn add_chat_message(&mut self, sender: Sender, text: impl Into<String>) -> Uuid {
        let text = text.into();
        if text.trim().is_empty() {
            return Uuid::nil();
        }
        let id = Uuid::new_v4();
        self.chat.push(ChatMessage {
            id,
            text,
            sender,
            timestamp: Utc::now(),
        });
        self.emit(StoreChange::Chat);
        id
    }

    // ========================================================================
    // Sleep
    // ========================================================================

    /// Prepend a sleep entry, replacing any existing entry for the same wake
    /// date. Duration is derived from bedtime and wake time, wrapping across
    /// midnight.
    pub fn add_sleep_entry(
        &mut self,
        date: NaiveDate,
        bedtime: NaiveTime,
        wake_time: NaiveTime,
        quality: SleepQuality,
    ) {
        self.sleep.retain(|s| s.date != date);
        let duration_minutes = (wake_time - bedtime).num_minutes().rem_euclid(24 * 60) as u32;
        self.sleep.insert(
            0,
            SleepEntry {
                id: Uuid::new_v4(),
                date,
                bedtime,
                wake_time,
                duration_minutes,
                quality,
            },
        );
        self.emit(StoreChange::Sleep);
    }

    // ========================================================================
    // Journal
    // ========================================================================

    /// Prepend a journal entry. Blank titles are ignored.
    /// Returns the new entry's id, or nil on no-op.
    pub fn add_journal_entry(
        &mut self,
        title: &str,
        content: &str,
        date: NaiveDate,
        mood: Option<Mood>,
    ) -> Uuid {
        let title = title.trim();
        if title.is_empty() {
            return Uuid::nil();
        }
        let id = Uuid::new_v4();
        self.journal.insert(
            0,
            JournalEntry {
                id,
                title: title.to_string(),
                content: content.to_string(),
                date,
                mood,
            },
        );
        self.emit(StoreChange::Journal);
        id
    }

    /// Merge the patch's `Some` fields into the matching entry.
    pub fn update_journal_entry(&mut self, id: Uuid, patch: JournalPatch) {
        let Some(entry) = self.journal.iter_mut().find(|e| e.id == id) else {
            return;
        };
        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if !title.is_empty() {
                entry.title = title;
            }
        }
        if let Some(content) = patch.content {
            entry.content = content;
        }
        if let Some(date) = patch.date {
            entry.date = date;
        }
        if let Some(mood) = patch.mood {
            entry.mood = Some(mood);
        }
        self.emit(StoreChange::Journal);
    }

    pub fn delete_journal_entry(&mut self, id: Uuid) {
        let before = self.journal.len();
        self.journal.retain(|e| e.id != id);
        if self.journal.len() != before {
            self.emit(StoreChange::Journal);
        }
    }

    // ========================================================================
    // Hydration (Persistence Bridge startup only)
    // ========================================================================

    /// Replace the chat transcript wholesale. No change event: hydration is
    /// not a mutation, and runs once before any observer acts.
    pub fn hydrate_chat(&mut self, entries: Vec<ChatMessage>) {
        self.chat = entries;
    }

    pub fn hydrate_sleep(&mut self, entries: Vec<SleepEntry>) {
        self.sleep = entries;
    }

    pub fn hydrate_journal(&mut self, entries: Vec<JournalEntry>) {
        self.journal = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WellnessStore {
        WellnessStore::new()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    // --- Mood ---

    #[test]
    fn test_set_today_mood_leaves_history_alone() {
        let mut s = store();
        s.set_today_mood(Mood::Good);
        assert_eq!(s.today_mood(), Some(Mood::Good));
        assert!(s.moods().is_empty());
    }

    #[test]
    fn test_add_mood_entry_prepends_and_sets_today() {
        let mut s = store();
        s.add_mood_entry(Mood::Okay, None);
        s.add_mood_entry(Mood::Great, Some("long walk".to_string()));
        assert_eq!(s.moods().len(), 2);
        assert_eq!(s.moods()[0].mood, Mood::Great);
        assert_eq!(s.moods()[0].note.as_deref(), Some("long walk"));
        assert_eq!(s.today_mood(), Some(Mood::Great));
    }

    #[test]
    fn test_blank_mood_note_becomes_none() {
        let mut s = store();
        s.add_mood_entry(Mood::Okay, Some("   ".to_string()));
        assert_eq!(s.moods()[0].note, None);
    }

    // --- Habits ---

    #[test]
    fn test_duplicate_habit_name_is_noop() {
        let mut s = store();
        s.add_habit("Meditate", HabitCategory::Mindfulness);
        s.add_habit("meditate", HabitCategory::Health);
        s.add_habit("  MEDITATE ", HabitCategory::Exercise);
        assert_eq!(s.habits().len(), 1);
        assert_eq!(s.habits()[0].category, HabitCategory::Mindfulness);
    }

    #[test]
    fn test_blank_habit_name_is_noop() {
        let mut s = store();
        s.add_habit("   ", HabitCategory::Health);
        assert!(s.habits().is_empty());
    }

    #[test]
    fn test_toggle_habit_streak_and_date() {
        let mut s = store();
        s.add_habit("Stretch", HabitCategory::Exercise);
        let id = s.habits()[0].id;

        s.toggle_habit(id);
        let h = &s.habits()[0];
        assert!(h.completed);
        assert_eq!(h.streak, 1);
        assert_eq!(h.completed_on, Some(Local::now().date_naive()));

        s.toggle_habit(id);
        let h = &s.habits()[0];
        assert!(!h.completed);
        assert_eq!(h.streak, 1, "undo must not decrement the streak");
        assert_eq!(h.completed_on, None);
    }

    #[test]
    fn test_toggle_unknown_habit_is_noop() {
        let mut s = store();
        s.add_habit("Stretch", HabitCategory::Exercise);
        s.toggle_habit(Uuid::new_v4());
        assert!(!s.habits()[0].completed);
    }

    #[test]
    fn test_delete_habit() {
        let mut s = store();
        s.add_habit("Stretch", HabitCategory::Exercise);
        let id = s.habits()[0].id;
        s.delete_habit(id);
        assert!(s.habits().is_empty());
        s.delete_habit(id); // absent: no-op, no panic
    }

    // --- Todos and mirroring ---

    #[test]
    fn test_add_todos_mirrors_habits() {
        let mut s = store();
        s.add_todos(vec![NewTodo {
            title: "Walk".to_string(),
            category: HabitCategory::Exercise,
        }]);
        assert_eq!(s.todos().len(), 1);
        assert_eq!(s.habits().len(), 1);
        assert_eq!(s.habits()[0].name, "Walk");
        assert_eq!(s.habits()[0].category, HabitCategory::Exercise);
        assert_ne!(s.todos()[0].id, s.habits()[0].id, "no shared identifier");
    }

    #[test]
    fn test_add_todos_does_not_duplicate_existing_habit() {
        let mut s = store();
        s.add_habit("walk", HabitCategory::Health);
        s.add_todos(vec![NewTodo {
            title: "Walk".to_string(),
            category: HabitCategory::Exercise,
        }]);
        assert_eq!(s.todos().len(), 1);
        assert_eq!(s.habits().len(), 1, "mirror must respect name uniqueness");
    }

    #[test]
    fn test_add_todos_prepends_in_input_order() {
        let mut s = store();
        s.add_todos(vec![
            NewTodo {
                title: "First".to_string(),
                category: HabitCategory::Health,
            },
            NewTodo {
                title: "Second".to_string(),
                category: HabitCategory::Health,
            },
        ]);
        assert_eq!(s.todos()[0].title, "Second");
        assert_eq!(s.todos()[1].title, "First");
    }

    #[test]
    fn test_toggle_todo_leaves_mirrored_habit_alone() {
        let mut s = store();
        s.add_todos(vec![NewTodo {
            title: "Walk".to_string(),
            category: HabitCategory::Exercise,
        }]);
        let todo_id = s.todos()[0].id;
        s.toggle_todo(todo_id);
        assert!(s.todos()[0].completed);
        assert!(!s.habits()[0].completed, "collections drift independently");
    }

    // --- Chat ---

    #[test]
    fn test_chat_is_chronological() {
        let mut s = store();
        s.add_chat_message(Sender::User, "hi");
        s.add_chat_message(Sender::Bot, "hello!");
        assert_eq!(s.chat().len(), 2);
        assert_eq!(s.chat()[0].sender, Sender::User);
        assert_eq!(s.chat()[1].sender, Sender::Bot);
    }

    #[test]
    fn test_empty_chat_message_is_noop() {
        let mut s = store();
        let id = s.add_chat_message(Sender::User, "  ");
        assert!(id.is_nil());
        assert!(s.chat().is_empty());
    }

    // --- Sleep ---

    #[test]
    fn test_sleep_replace_by_date() {
        let mut s = store();
        let d = date("2026-08-06");
        s.add_sleep_entry(d, time("23:00"), time("07:00"), SleepQuality::Fair);
        s.add_sleep_entry(d, time("22:30"), time("06:30"), SleepQuality::Good);
        assert_eq!(s.sleep().len(), 1);
        assert_eq!(s.sleep()[0].quality, SleepQuality::Good);
        assert_eq!(s.sleep()[0].bedtime, time("22:30"));
    }

    #[test]
    fn test_sleep_duration_wraps_midnight() {
        let mut s = store();
        s.add_sleep_entry(
            date("2026-08-06"),
            time("23:30"),
            time("07:00"),
            SleepQuality::Good,
        );
        assert_eq!(s.sleep()[0].duration_minutes, 450);

        s.add_sleep_entry(
            date("2026-08-07"),
            time("01:00"),
            time("09:15"),
            SleepQuality::Fair,
        );
        assert_eq!(s.sleep()[0].duration_minutes, 495);
    }

    #[test]
    fn test_sleep_distinct_dates_accumulate_newest_first() {
        let mut s = store();
        s.add_sleep_entry(date("2026-08-05"), time("23:00"), time("07:00"), SleepQuality::Good);
        s.add_sleep_entry(date("2026-08-06"), time("23:00"), time("07:00"), SleepQuality::Poor);
        assert_eq!(s.sleep().len(), 2);
        assert_eq!(s.sleep()[0].date, date("2026-08-06"));
    }

    // --- Journal ---

    #[test]
    fn test_journal_add_update_delete() {
        let mut s = store();
        let id = s.add_journal_entry("Morning", "slow start", date("2026-08-06"), None);
        assert_eq!(s.journal().len(), 1);

        s.update_journal_entry(
            id,
            JournalPatch {
                content: Some("slow start, better by noon".to_string()),
                mood: Some(Mood::Good),
                ..Default::default()
            },
        );
        assert_eq!(s.journal()[0].content, "slow start, better by noon");
        assert_eq!(s.journal()[0].title, "Morning");
        assert_eq!(s.journal()[0].mood, Some(Mood::Good));

        s.delete_journal_entry(id);
        assert!(s.journal().is_empty());
    }

    #[test]
    fn test_journal_update_unknown_id_is_noop() {
        let mut s = store();
        s.add_journal_entry("Morning", "text", date("2026-08-06"), None);
        s.update_journal_entry(
            Uuid::new_v4(),
            JournalPatch {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(s.journal()[0].title, "Morning");
    }

    #[test]
    fn test_journal_blank_title_is_noop() {
        let mut s = store();
        let id = s.add_journal_entry("  ", "text", date("2026-08-06"), None);
        assert!(id.is_nil());
        assert!(s.journal().is_empty());
    }

    // --- Notification ---

    #[test]
    fn test_mutations_emit_changes_after_apply() {
        let mut s = store();
        let mut rx = s.subscribe();

        s.add_habit("Stretch", HabitCategory::Exercise);
        assert_eq!(rx.try_recv().unwrap(), StoreChange::Habits);

        s.add_todos(vec![NewTodo {
            title: "Read".to_string(),
            category: HabitCategory::Productivity,
        }]);
        assert_eq!(rx.try_recv().unwrap(), StoreChange::Todos);
        assert_eq!(rx.try_recv().unwrap(), StoreChange::Habits);

        // Duplicate habit: silent no-op, no event.
        s.add_habit("stretch", HabitCategory::Health);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_hydration_emits_nothing() {
        let mut s = store();
        let mut rx = s.subscribe();
        s.hydrate_chat(vec![]);
        s.hydrate_sleep(vec![]);
        s.hydrate_journal(vec![]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut s = store();
        let rx = s.subscribe();
        drop(rx);
        s.add_habit("Stretch", HabitCategory::Exercise); // must not panic
        assert_eq!(s.habits().len(), 1);
    }
}
