use crate::history::ConversationStore;
use crate::history::export::{ build_export, ExportError };
use crate::llm::ChatBackend;
use crate::llm::fallback::LocalResponder;
use crate::models::chat::{ ChatExport, ChatMessage };
use crate::models::events::{ ChatEvent, ServerStatus };

use log::{ info, warn, error, debug };
use std::sync::{ Arc, RwLock };
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

pub const APOLOGY_MESSAGE: &str =
    "Sorry, I encountered an error. Please try again or check your connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    Fallback,
    Apology,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: ChatMessage,
    pub source: ReplySource,
}

/// Orchestrates send -> backend or fallback -> append for one conversation.
pub struct ChatAgent {
    backend: Arc<dyn ChatBackend>,
    responder: LocalResponder,
    store: Mutex<ConversationStore>,
    status: RwLock<ServerStatus>,
    // Held for the whole of a send or clear so records always alternate.
    in_flight: Mutex<()>,
    events: Option<UnboundedSender<ChatEvent>>,
}

/// Publishes `ComposingStarted` on creation and `ComposingFinished` on drop.
struct ComposingGuard<'a> {
    agent: &'a ChatAgent,
}

impl<'a> ComposingGuard<'a> {
    fn acquire(agent: &'a ChatAgent) -> Self {
        agent.publish(ChatEvent::ComposingStarted);
        Self { agent }
    }
}

impl Drop for ComposingGuard<'_> {
    fn drop(&mut self) {
        self.agent.publish(ChatEvent::ComposingFinished);
    }
}

impl ChatAgent {
    pub fn new(backend: Arc<dyn ChatBackend>, responder: LocalResponder) -> Self {
        Self {
            backend,
            responder,
            store: Mutex::new(ConversationStore::new()),
            status: RwLock::new(ServerStatus::Disconnected),
            in_flight: Mutex::new(()),
            events: None,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<ChatEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn publish(&self, event: ChatEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                debug!("Chat event dropped, no renderer attached");
            }
        }
    }

    pub fn status(&self) -> ServerStatus {
        match self.status.read() {
            Ok(status) => *status,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    /// Stores `status`, returning the previous value.
    fn replace_status(&self, status: ServerStatus) -> ServerStatus {
        let mut guard = match self.status.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, status)
    }

    fn set_status(&self, status: ServerStatus) {
        if self.replace_status(status) != status {
            self.publish(ChatEvent::StatusChanged(status));
        }
    }

    /// Checks the backend once and records the result as the server status.
    pub async fn check_health(&self) -> ServerStatus {
        let status = self.backend.health_check().await;
        if !status.is_connected() {
            warn!("Chat backend status: {}, replies will use the local responder", status);
        }
        // Reported even when unchanged so the status line gets an initial value.
        self.replace_status(status);
        self.publish(ChatEvent::StatusChanged(status));
        status
    }

    /// Sends `input` and appends the user and assistant records.
    /// Returns `None` without touching the conversation when `input` is blank.
    pub async fn send(&self, input: &str) -> Option<Reply> {
        let text = input.trim();
        if text.is_empty() {
            debug!("Ignoring empty message");
            return None;
        }

        let _in_flight = self.in_flight.lock().await;

        let user_message = ChatMessage::user(text);
        let history = {
            let mut store = self.store.lock().await;
            store.append(user_message.clone());
            store.snapshot()
        };
        self.publish(ChatEvent::MessageAppended(user_message));

        let (content, source) = {
            let _composing = ComposingGuard::acquire(self);
            self.resolve_reply(text, &history).await
        };

        let reply = ChatMessage::assistant(content);
        {
            let mut store = self.store.lock().await;
            store.append(reply.clone());
            info!("[{}] {:?} reply, {} messages in conversation", store.id(), source, store.len());
        }
        self.publish(ChatEvent::MessageAppended(reply.clone()));

        Some(Reply { message: reply, source })
    }

    async fn resolve_reply(&self, text: &str, history: &[ChatMessage]) -> (String, ReplySource) {
        match self.backend.send_chat(text, history).await {
            Ok(response) => {
                self.set_status(ServerStatus::Connected);
                (response, ReplySource::Remote)
            }
            Err(e) => {
                error!("API call failed: {}", e);
                if self.is_connected() {
                    (APOLOGY_MESSAGE.to_string(), ReplySource::Apology)
                } else {
                    (self.responder.respond(text).await, ReplySource::Fallback)
                }
            }
        }
    }

    /// Resets the conversation locally and notifies the backend on a best-effort basis.
    pub async fn clear(&self) {
        let _in_flight = self.in_flight.lock().await;
        if let Err(e) = self.backend.clear_remote().await {
            warn!("Failed to clear conversation on server: {}", e);
        }
        self.store.lock().await.clear();
        self.publish(ChatEvent::Cleared);
    }

    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.store.lock().await.snapshot()
    }

    pub async fn export(&self) -> Result<ChatExport, ExportError> {
        build_export(&*self.store.lock().await)
    }
}
