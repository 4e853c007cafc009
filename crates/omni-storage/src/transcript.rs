//! The persisted chat transcript.
//!
//! The transcript is stored as a JSON array of messages under
//! [`storage_keys::CHAT_HISTORY`]. Reads never fail: anything unusable in
//! storage is logged and replaced by the welcome message. Writes that fail
//! are logged and otherwise ignored, so a broken disk never interrupts a
//! conversation.

use tracing::{info, warn};

use omni_core::models::transcript::TranscriptMessage;
use omni_core::storage_keys;

use crate::error::StorageError;
use crate::store::KeyValueStore;

pub struct TranscriptStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TranscriptStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, storage_keys::CHAT_HISTORY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored messages, or just `welcome` when nothing usable is stored.
    pub fn load(&self, welcome: &TranscriptMessage) -> Vec<TranscriptMessage> {
        match self.try_load() {
            Ok(Some(messages)) if !messages.is_empty() => {
                info!(count = messages.len(), "loaded chat transcript");
                messages
            }
            Ok(_) => vec![welcome.clone()],
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable chat transcript");
                vec![welcome.clone()]
            }
        }
    }

    fn try_load(&self) -> Result<Option<Vec<TranscriptMessage>>, StorageError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist `messages`, logging instead of failing.
    pub fn save(&self, messages: &[TranscriptMessage]) {
        if let Err(e) = self.try_save(messages) {
            warn!(key = %self.key, error = %e, "failed to save chat transcript");
        }
    }

    pub fn try_save(&self, messages: &[TranscriptMessage]) -> Result<(), StorageError> {
        let json = serde_json::to_string(messages)?;
        self.store.set_item(&self.key, &json)
    }

    /// Forget the stored transcript.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove_item(&self.key)?;
        info!(key = %self.key, "chat transcript removed");
        Ok(())
    }
}
