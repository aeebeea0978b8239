//! Simulated-restart round trips: persist from one Store, reopen the
//! database, hydrate a fresh Store, and compare.

use solace_core::{JournalPatch, Mood, Sender, SleepQuality, StoreChange, WellnessStore};
use solace_memory::{KvStore, PersistenceBridge};

async fn drain_into(
    bridge: &PersistenceBridge,
    store: &WellnessStore,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<StoreChange>,
) {
    while let Ok(change) = rx.try_recv() {
        bridge.persist(store, change).await;
    }
}

#[tokio::test]
async fn journal_round_trip_preserves_ids_values_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solace.db");

    let mut store = WellnessStore::new();
    let mut rx = store.subscribe();
    let first = store.add_journal_entry("Monday", "rough start", "2026-08-03".parse().unwrap(), Some(Mood::Poor));
    let second = store.add_journal_entry("Tuesday", "better", "2026-08-04".parse().unwrap(), Some(Mood::Good));
    store.update_journal_entry(
        first,
        JournalPatch {
            content: Some("rough start, salvaged by lunch".to_string()),
            ..Default::default()
        },
    );
    let original = store.journal().to_vec();

    {
        let bridge = PersistenceBridge::new(KvStore::open(&path).await.unwrap());
        drain_into(&bridge, &store, &mut rx).await;
    }

    // Simulated restart: new pool, new bridge, fresh store.
    let bridge = PersistenceBridge::new(KvStore::open(&path).await.unwrap());
    let mut fresh = WellnessStore::new();
    bridge.hydrate(&mut fresh).await;

    assert_eq!(fresh.journal(), &original[..]);
    assert_eq!(fresh.journal()[0].id, second, "order and ids must survive");
    assert_eq!(fresh.journal()[1].id, first);
}

#[tokio::test]
async fn chat_and_sleep_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solace.db");

    let mut store = WellnessStore::new();
    let mut rx = store.subscribe();
    store.add_chat_message(Sender::User, "rough week");
    store.add_chat_message(Sender::Bot, "That sounds heavy. Want to talk it through?");
    store.add_sleep_entry(
        "2026-08-05".parse().unwrap(),
        chrono::NaiveTime::parse_from_str("23:30", "%H:%M").unwrap(),
        chrono::NaiveTime::parse_from_str("07:00", "%H:%M").unwrap(),
        SleepQuality::Fair,
    );

    {
        let bridge = PersistenceBridge::new(KvStore::open(&path).await.unwrap());
        drain_into(&bridge, &store, &mut rx).await;
    }

    let bridge = PersistenceBridge::new(KvStore::open(&path).await.unwrap());
    let mut fresh = WellnessStore::new();
    bridge.hydrate(&mut fresh).await;

    assert_eq!(fresh.chat(), store.chat());
    assert_eq!(fresh.sleep(), store.sleep());
    // Unmirrored collections come back empty.
    assert!(fresh.moods().is_empty());
    assert!(fresh.habits().is_empty());
}

#[tokio::test]
async fn corrupted_storage_hydrates_to_empty_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solace.db");

    let kv = KvStore::open(&path).await.unwrap();
    kv.put("chat_messages", "\"not an envelope\"").await.unwrap();
    kv.put("sleep_entries", r#"{"version": 1, "entries": [{"bogus": true}]}"#)
        .await
        .unwrap();

    let bridge = PersistenceBridge::new(kv);
    let mut fresh = WellnessStore::new();
    bridge.hydrate(&mut fresh).await;
    assert!(fresh.chat().is_empty());
    assert!(fresh.sleep().is_empty());
}
