use crate::types::constants::{chat_events, envelope_fields};
use crate::types::message::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type-safe chat event names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Server liveness frame, also carries the connection id
    HealthCheck,
    MessageNew,
    MessageUpdated,
    MessageDeleted,
    MessageRead,
    ReactionNew,
    ReactionDeleted,
    TypingStart,
    TypingStop,
    UserPresenceChanged,
    UserUpdated,
    MemberAdded,
    MemberRemoved,
    ChannelUpdated,
    NotificationMessageNew,
    ConnectionChanged,
    ConnectionRecovered,

    /// Any event name this crate does not model
    Custom(String),
}

impl EventType {
    /// Parse a string into an EventType
    pub fn from_str(s: &str) -> Self {
        match s {
            chat_events::HEALTH_CHECK => Self::HealthCheck,
            chat_events::MESSAGE_NEW => Self::MessageNew,
            chat_events::MESSAGE_UPDATED => Self::MessageUpdated,
            chat_events::MESSAGE_DELETED => Self::MessageDeleted,
            chat_events::MESSAGE_READ => Self::MessageRead,
            chat_events::REACTION_NEW => Self::ReactionNew,
            chat_events::REACTION_DELETED => Self::ReactionDeleted,
            chat_events::TYPING_START => Self::TypingStart,
            chat_events::TYPING_STOP => Self::TypingStop,
            chat_events::USER_PRESENCE_CHANGED => Self::UserPresenceChanged,
            chat_events::USER_UPDATED => Self::UserUpdated,
            chat_events::MEMBER_ADDED => Self::MemberAdded,
            chat_events::MEMBER_REMOVED => Self::MemberRemoved,
            chat_events::CHANNEL_UPDATED => Self::ChannelUpdated,
            chat_events::NOTIFICATION_MESSAGE_NEW => Self::NotificationMessageNew,
            chat_events::CONNECTION_CHANGED => Self::ConnectionChanged,
            chat_events::CONNECTION_RECOVERED => Self::ConnectionRecovered,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Convert event to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::HealthCheck => chat_events::HEALTH_CHECK,
            Self::MessageNew => chat_events::MESSAGE_NEW,
            Self::MessageUpdated => chat_events::MESSAGE_UPDATED,
            Self::MessageDeleted => chat_events::MESSAGE_DELETED,
            Self::MessageRead => chat_events::MESSAGE_READ,
            Self::ReactionNew => chat_events::REACTION_NEW,
            Self::ReactionDeleted => chat_events::REACTION_DELETED,
            Self::TypingStart => chat_events::TYPING_START,
            Self::TypingStop => chat_events::TYPING_STOP,
            Self::UserPresenceChanged => chat_events::USER_PRESENCE_CHANGED,
            Self::UserUpdated => chat_events::USER_UPDATED,
            Self::MemberAdded => chat_events::MEMBER_ADDED,
            Self::MemberRemoved => chat_events::MEMBER_REMOVED,
            Self::ChannelUpdated => chat_events::CHANNEL_UPDATED,
            Self::NotificationMessageNew => chat_events::NOTIFICATION_MESSAGE_NEW,
            Self::ConnectionChanged => chat_events::CONNECTION_CHANGED,
            Self::ConnectionRecovered => chat_events::CONNECTION_RECOVERED,
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<EventType> for String {
    fn from(event: EventType) -> Self {
        event.as_str().to_string()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded server event delivered to listeners after the handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    /// Channel id (`type:id`) the event belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    /// The complete frame as received
    #[serde(skip)]
    pub raw: Value,
}

impl ChatEvent {
    pub fn new(event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            connection_id: None,
            cid: None,
            created_at: None,
            me: None,
            user: None,
            message: None,
            raw: Value::Null,
        }
    }
}

/// Maps a parsed JSON frame into a [`ChatEvent`].
///
/// Returning `None` marks the frame as unparseable; the session drops it.
pub trait EventDecoder: Send + Sync {
    fn decode(&self, frame: &Value) -> Option<ChatEvent>;
}

impl<F> EventDecoder for F
where
    F: Fn(&Value) -> Option<ChatEvent> + Send + Sync,
{
    fn decode(&self, frame: &Value) -> Option<ChatEvent> {
        self(frame)
    }
}

/// Default decoder: any JSON object with a string `type` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEventDecoder;

impl EventDecoder for JsonEventDecoder {
    fn decode(&self, frame: &Value) -> Option<ChatEvent> {
        if !frame
            .get(envelope_fields::TYPE)
            .is_some_and(Value::is_string)
        {
            return None;
        }

        match serde_json::from_value::<ChatEvent>(frame.clone()) {
            Ok(mut event) => {
                event.raw = frame.clone();
                Some(event)
            }
            Err(e) => {
                tracing::debug!("Failed to decode event: {}", e);
                None
            }
        }
    }
}
