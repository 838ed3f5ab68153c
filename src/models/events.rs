use std::fmt;
use crate::models::chat::ChatMessage;

/// Backend reachability as last observed by the health check or a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    /// Health endpoint reported `healthy`, or a chat call succeeded.
    Connected,
    /// The server answered, but not with a healthy status.
    ServerError,
    #[default]
    Disconnected,
}

impl ServerStatus {
    pub fn is_connected(self) -> bool {
        self == ServerStatus::Connected
    }

    pub fn label(self) -> &'static str {
        match self {
            ServerStatus::Connected => "Connected",
            ServerStatus::ServerError => "Server Error",
            ServerStatus::Disconnected => "Disconnected",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Changes published by the dispatcher for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    MessageAppended(ChatMessage),
    ComposingStarted,
    ComposingFinished,
    Cleared,
    StatusChanged(ServerStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connected_counts_as_connected() {
        assert!(ServerStatus::Connected.is_connected());
        assert!(!ServerStatus::ServerError.is_connected());
        assert!(!ServerStatus::Disconnected.is_connected());
        assert_eq!(ServerStatus::default(), ServerStatus::Disconnected);
    }

    #[test]
    fn labels_match_status_line() {
        assert_eq!(ServerStatus::ServerError.to_string(), "Server Error");
        assert_eq!(ServerStatus::Connected.label(), "Connected");
    }
}
