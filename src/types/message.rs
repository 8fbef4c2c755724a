use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::envelope_fields;

/// Profile of a chat user as carried in server frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub online: bool,
    /// Custom user fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The envelope fields the session itself cares about.
///
/// Everything else in an inbound frame is opaque to the session and handed to
/// the event decoder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventEnvelope {
    pub connection_id: Option<String>,
    pub me: Option<User>,
}

impl EventEnvelope {
    /// Extracts the envelope from a parsed frame.
    ///
    /// A malformed `me` object is ignored rather than invalidating the
    /// connection id next to it.
    pub fn from_value(value: &Value) -> Self {
        let connection_id = value
            .get(envelope_fields::CONNECTION_ID)
            .and_then(Value::as_str)
            .map(str::to_owned);

        let me = value
            .get(envelope_fields::ME)
            .filter(|me| !me.is_null())
            .and_then(|me| match serde_json::from_value::<User>(me.clone()) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Ignoring malformed user profile in envelope: {}", e);
                    None
                }
            });

        Self { connection_id, me }
    }

    /// The connection id if this envelope can complete a handshake.
    pub fn handshake_id(&self) -> Option<&str> {
        self.connection_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_connection_id_and_me() {
        let value = json!({
            "type": "health.check",
            "connection_id": "abc",
            "me": {"id": "luke", "name": "Luke", "online": true, "favorite_color": "green"}
        });

        let envelope = EventEnvelope::from_value(&value);
        assert_eq!(envelope.handshake_id(), Some("abc"));

        let me = envelope.me.unwrap();
        assert_eq!(me.id, "luke");
        assert_eq!(me.name.as_deref(), Some("Luke"));
        assert!(me.online);
        assert_eq!(me.extra.get("favorite_color"), Some(&json!("green")));
    }

    #[test]
    fn test_empty_connection_id_is_not_a_handshake() {
        let envelope = EventEnvelope::from_value(&json!({"connection_id": ""}));
        assert_eq!(envelope.connection_id.as_deref(), Some(""));
        assert_eq!(envelope.handshake_id(), None);
    }

    #[test]
    fn test_malformed_me_keeps_connection_id() {
        let envelope = EventEnvelope::from_value(&json!({"connection_id": "abc", "me": 42}));
        assert_eq!(envelope.handshake_id(), Some("abc"));
        assert!(envelope.me.is_none());
    }

    #[test]
    fn test_envelope_without_known_fields() {
        let envelope = EventEnvelope::from_value(&json!({"type": "message.new"}));
        assert_eq!(envelope, EventEnvelope::default());
    }
}
