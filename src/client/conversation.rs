//! Conversation Store: the durable, append-only transcript

use std::sync::Arc;

use super::storage::{load_or_default, save_json, StateStorage, StorageError, CONVERSATION_KEY};
use crate::models::{Message, Transcript};

pub struct ConversationStore {
    storage: Arc<dyn StateStorage>,
    transcript: Transcript,
}

impl ConversationStore {
    /// Load the last persisted transcript, or start empty when there is none
    /// or it cannot be decoded.
    pub fn restore(storage: Arc<dyn StateStorage>) -> Self {
        let transcript: Transcript = load_or_default(storage.as_ref(), CONVERSATION_KEY);
        tracing::debug!(turns = transcript.len(), "conversation restored");
        Self {
            storage,
            transcript,
        }
    }

    /// Append a message and persist the whole transcript.
    ///
    /// The message is committed to memory only after the write succeeds,
    /// so the in-memory and persisted transcripts stay identical.
    pub fn append(&mut self, message: Message) -> Result<(), StorageError> {
        let mut next = Vec::with_capacity(self.transcript.len() + 1);
        next.extend_from_slice(&self.transcript);
        next.push(message);

        save_json(self.storage.as_ref(), CONVERSATION_KEY, &next)?;
        self.transcript = next;
        Ok(())
    }

    pub fn current_transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }
}
