use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::platform::{CanonicalMessage, MessageKind};

/// Telegram chat object (only the fields we read)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawChat {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Telegram message object. Every field is optional on the wire so that a
/// message missing its ids is skipped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawMessage {
    pub message_id: Option<i64>,
    #[serde(default)]
    pub chat: Option<RawChat>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// The one message-bearing field of an update, resolved in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePayload {
    ChannelPost(RawMessage),
    EditedChannelPost(RawMessage),
    Message(RawMessage),
    EditedMessage(RawMessage),
    Unrecognized,
}

impl UpdatePayload {
    fn is_edit(&self) -> bool {
        matches!(
            self,
            UpdatePayload::EditedChannelPost(_) | UpdatePayload::EditedMessage(_)
        )
    }

    fn message(&self) -> Option<&RawMessage> {
        match self {
            UpdatePayload::ChannelPost(m)
            | UpdatePayload::EditedChannelPost(m)
            | UpdatePayload::Message(m)
            | UpdatePayload::EditedMessage(m) => Some(m),
            UpdatePayload::Unrecognized => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            UpdatePayload::ChannelPost(_) => "channel_post",
            UpdatePayload::EditedChannelPost(_) => "edited_channel_post",
            UpdatePayload::Message(_) => "message",
            UpdatePayload::EditedMessage(_) => "edited_message",
            UpdatePayload::Unrecognized => "unrecognized",
        }
    }
}

/// An inbound webhook update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpdate {
    pub update_id: Option<i64>,
    pub payload: UpdatePayload,
}

#[derive(Deserialize)]
struct UpdateWire {
    #[serde(default)]
    update_id: Option<i64>,
    #[serde(default)]
    channel_post: Option<RawMessage>,
    #[serde(default)]
    edited_channel_post: Option<RawMessage>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    edited_message: Option<RawMessage>,
}

impl From<UpdateWire> for RawUpdate {
    fn from(wire: UpdateWire) -> Self {
        // Telegram sets at most one of these; if several arrive, the first wins.
        let payload = if let Some(m) = wire.channel_post {
            UpdatePayload::ChannelPost(m)
        } else if let Some(m) = wire.edited_channel_post {
            UpdatePayload::EditedChannelPost(m)
        } else if let Some(m) = wire.message {
            UpdatePayload::Message(m)
        } else if let Some(m) = wire.edited_message {
            UpdatePayload::EditedMessage(m)
        } else {
            UpdatePayload::Unrecognized
        };

        Self {
            update_id: wire.update_id,
            payload,
        }
    }
}

impl<'de> Deserialize<'de> for RawUpdate {
    /// Only a JSON object is an update; the derived visitor would also accept
    /// a positional array.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let wire: UpdateWire =
            serde_json::from_value(serde_json::Value::Object(object)).map_err(D::Error::custom)?;
        Ok(wire.into())
    }
}

/// Transform a Telegram update into a canonical message.
///
/// Returns `None` when the update carries no recognized message, or when the
/// message lacks `message_id` or `chat.id`. Neither case is an error.
pub fn normalize(update: &RawUpdate) -> Option<CanonicalMessage> {
    let msg = update.payload.message()?;
    let source_id = msg.message_id?;
    let chat = msg.chat.as_ref()?;
    let chat_id = chat.id?;

    // text for regular messages, caption for media; empty strings count as absent
    let text = non_empty(&msg.text).or_else(|| non_empty(&msg.caption));

    let kind = if update.payload.is_edit() {
        MessageKind::Edited
    } else if text.is_some() {
        MessageKind::Text
    } else {
        MessageKind::Unknown
    };

    Some(CanonicalMessage {
        source_id,
        chat_id,
        chat_title: chat.title.clone(),
        timestamp: msg.date.unwrap_or_default(),
        text,
        kind,
        update_id: update.update_id,
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
