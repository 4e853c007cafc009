use omni_core::models::transcript::{Feedback, MessageRole, Sentiment, TranscriptMessage};
use omni_core::storage_keys::CHAT_HISTORY;
use omni_storage::store::{FileStore, KeyValueStore, MemoryStore};
use omni_storage::transcript::TranscriptStore;

fn welcome() -> TranscriptMessage {
    TranscriptMessage {
        id: "welcome".to_string(),
        role: MessageRole::Model,
        text: "Hello".to_string(),
        sentiment: Some(Sentiment::Positive),
        feedback: None,
        created_at: None,
    }
}

#[test]
fn missing_transcript_loads_welcome() {
    let store = TranscriptStore::new(MemoryStore::new());
    assert_eq!(store.load(&welcome()), [welcome()]);
}

#[test]
fn corrupt_or_empty_transcript_loads_welcome() {
    let kv = MemoryStore::new();
    let store = TranscriptStore::new(&kv);

    kv.set_item(CHAT_HISTORY, "{not json").unwrap();
    assert_eq!(store.load(&welcome()), [welcome()]);

    kv.set_item(CHAT_HISTORY, r#"{"id":"x"}"#).unwrap();
    assert_eq!(store.load(&welcome()), [welcome()]);

    kv.set_item(CHAT_HISTORY, "[]").unwrap();
    assert_eq!(store.load(&welcome()), [welcome()]);
}

#[test]
fn file_store_round_trip_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path().join("data"));
    let store = TranscriptStore::new(&kv);

    let mut reply = TranscriptMessage::model_placeholder();
    reply.text = "Answer".to_string();
    reply.feedback = Some(Feedback::Down);
    let messages = vec![
        welcome(),
        TranscriptMessage::user("Question", Sentiment::Neutral),
        reply,
    ];

    store.try_save(&messages).unwrap();
    assert!(kv.path_for(CHAT_HISTORY).exists());
    assert_eq!(store.load(&welcome()), messages);

    store.clear().unwrap();
    assert!(!kv.path_for(CHAT_HISTORY).exists());
    assert_eq!(store.load(&welcome()), [welcome()]);
    store.clear().unwrap();
}

#[test]
fn stored_json_uses_lowercase_roles() {
    let kv = MemoryStore::new();
    let store = TranscriptStore::new(&kv);
    store.save(&[welcome()]);

    let raw = kv.get_item(CHAT_HISTORY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["role"], "model");
    assert_eq!(value[0]["sentiment"], "positive");
}

#[cfg(unix)]
#[test]
fn stored_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path());
    kv.set_item("k", "v").unwrap();

    let mode = std::fs::metadata(kv.path_for("k")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
