use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use std::fmt;

pub const EXPORT_TITLE: &str = "AutoSphere AI Chat Export";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversation turn. Records are never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Downloadable transcript of a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExport {
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

impl ChatExport {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            title: EXPORT_TITLE.to_string(),
            timestamp: Utc::now(),
            messages,
        }
    }

    /// File name offered for the export, dated by the export timestamp.
    pub fn file_name(&self) -> String {
        format!("autosphere-chat-{}.json", self.timestamp.format("%Y-%m-%d"))
    }
}
