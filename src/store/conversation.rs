// Ordered conversation with snapshot persistence

use serde::{Deserialize, Serialize};

use super::local::{LocalStorage, MESSAGES_KEY};
use super::message::Message;
use crate::errors::StorageError;

/// Append-only list of messages, cleared only as a whole
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted snapshot
    ///
    /// Corrupt data is discarded (and its blob removed) so the session
    /// starts empty instead of failing.
    pub fn load(storage: &LocalStorage) -> Self {
        match storage.get::<Conversation>(MESSAGES_KEY) {
            Ok(Some(conversation)) => {
                tracing::debug!(messages = conversation.len(), "Loaded conversation snapshot");
                conversation
            }
            Ok(None) => Self::new(),
            Err(StorageError::Decode { source, .. }) => {
                tracing::warn!("Discarding corrupt conversation snapshot: {}", source);
                if let Err(e) = storage.remove(MESSAGES_KEY) {
                    tracing::warn!("Failed to remove corrupt snapshot: {}", e);
                }
                Self::new()
            }
            Err(e) => {
                tracing::warn!("Failed to read conversation snapshot: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &LocalStorage) -> Result<(), StorageError> {
        storage.set(MESSAGES_KEY, self)
    }

    /// Append a message, keeping timestamps non-decreasing
    pub fn push(&mut self, mut message: Message) -> &Message {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last `n` messages (fewer when the conversation is shorter)
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
