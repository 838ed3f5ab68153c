pub mod export;

use log::debug;
use uuid::Uuid;
use crate::models::chat::ChatMessage;

/// In-memory, append-only log of the current session's messages.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    id: String,
    messages: Vec<ChatMessage>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
        }
    }

    /// Session id, used to correlate log lines. A new one is issued on clear.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append(&mut self, message: ChatMessage) {
        debug!("[{}] append {} message #{}", self.id, message.role, self.messages.len() + 1);
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        let previous = std::mem::replace(self, Self::new());
        debug!("Cleared conversation {} ({} messages)", previous.id, previous.messages.len());
    }

    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
