pub mod telegram;

use serde::Serialize;

/// How a canonical message came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Edited,
    Unknown,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Edited => write!(f, "edited"),
            MessageKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A message received from the platform, normalized for handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalMessage {
    /// Platform message id
    pub source_id: i64,
    /// Originating chat/channel id
    pub chat_id: i64,
    pub chat_title: Option<String>,
    /// Unix seconds
    pub timestamp: i64,
    /// Message text, or the caption of a media message
    pub text: Option<String>,
    pub kind: MessageKind,
    /// Id of the update that carried this message, kept for diagnostics
    pub update_id: Option<i64>,
}

impl CanonicalMessage {
    /// Chat title when known, otherwise the numeric chat id.
    pub fn chat_label(&self) -> String {
        match &self.chat_title {
            Some(title) => title.clone(),
            None => self.chat_id.to_string(),
        }
    }
}
