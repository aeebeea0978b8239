//! The Persistence Bridge: mirrors the chat, sleep, and journal collections
//! to the key-value store and rehydrates them once at startup.
//!
//! Persistence is best-effort: a failed read or write is logged and
//! swallowed, and the in-memory Store stays authoritative for the session.
//! Mood and habit collections are deliberately not mirrored; they reset each
//! process start.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use solace_core::{ChatMessage, JournalEntry, SleepEntry, StoreChange, WellnessStore};

use crate::kv::KvStore;

const CHAT_KEY: &str = "chat_messages";
const SLEEP_KEY: &str = "sleep_entries";
const JOURNAL_KEY: &str = "journal_entries";

/// Bumped on any persisted-field change; a mismatch on read is treated the
/// same as corrupt data and hydration keeps the in-memory default.
const SCHEMA_VERSION: u32 = 1;

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    entries: Vec<T>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    entries: &'a [T],
}

pub struct PersistenceBridge {
    kv: KvStore,
}

impl PersistenceBridge {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Startup pass: replace each of the three mirrored collections with its
    /// stored value, when one exists and decodes cleanly. Runs once, before
    /// any observer is active, so no change events are emitted.
    pub async fn hydrate(&self, store: &mut WellnessStore) {
        if let Some(entries) = self.load::<ChatMessage>(CHAT_KEY).await {
            store.hydrate_chat(entries);
        }
        if let Some(entries) = self.load::<SleepEntry>(SLEEP_KEY).await {
            store.hydrate_sleep(entries);
        }
        if let Some(entries) = self.load::<JournalEntry>(JOURNAL_KEY).await {
            store.hydrate_journal(entries);
        }
    }

    /// Write-through for one change event. Full-collection overwrite, not an
    /// incremental append; changes to unmirrored collections are ignored.
    pub async fn persist(&self, store: &WellnessStore, change: StoreChange) {
        match change {
            StoreChange::Chat => self.save(CHAT_KEY, store.chat()).await,
            StoreChange::Sleep => self.save(SLEEP_KEY, store.sleep()).await,
            StoreChange::Journal => self.save(JOURNAL_KEY, store.journal()).await,
            _ => {}
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Hydration read failed for {} (ignored): {:#}", key, e);
                return None;
            }
        };
        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.version == SCHEMA_VERSION => Some(envelope.entries),
            Ok(envelope) => {
                tracing::warn!(
                    "Stored {} has schema version {} (expected {}), keeping defaults",
                    key,
                    envelope.version,
                    SCHEMA_VERSION
                );
                None
            }
            Err(e) => {
                tracing::warn!("Stored {} is not decodable (ignored): {}", key, e);
                None
            }
        }
    }

    async fn save<T: Serialize>(&self, key: &str, entries: &[T]) {
        let envelope = EnvelopeRef {
            version: SCHEMA_VERSION,
            entries,
        };
        let payload = match serde_json::to_string(&envelope) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Serialization failed for {} (ignored): {}", key, e);
                return;
            }
        };
        if let Err(e) = self.kv.put(key, &payload).await {
            tracing::warn!("Persistence write failed for {} (ignored): {:#}", key, e);
        }
    }
}
