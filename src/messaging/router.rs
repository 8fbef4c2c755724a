use super::{ChatEvent, EventDecoder};
use crate::types::message::{EventEnvelope, User};
use serde_json::Value;
use std::sync::Arc;

/// What a text frame means for the session that received it.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// First frame carrying a connection id on this socket
    Handshake {
        connection_id: String,
        me: Option<User>,
    },
    /// A decoded event to fan out
    Event(ChatEvent),
    /// Nothing to deliver
    Dropped,
}

/// Classifies inbound text frames.
///
/// Malformed JSON and undecodable events are dropped here and never reach
/// listeners.
pub struct FrameRouter {
    decoder: Arc<dyn EventDecoder>,
}

impl FrameRouter {
    pub fn new(decoder: Arc<dyn EventDecoder>) -> Self {
        Self { decoder }
    }

    /// Routes a text frame.
    ///
    /// Before the handshake only a frame with a non-empty `connection_id`
    /// matters; after it, every decodable frame is an event, including later
    /// frames that repeat a connection id.
    pub fn route(&self, text: &str, handshake_complete: bool) -> FrameOutcome {
        let frame = match serde_json::from_str::<Value>(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Dropping malformed frame: {} - Raw: {}", e, text);
                return FrameOutcome::Dropped;
            }
        };

        if !handshake_complete {
            let envelope = EventEnvelope::from_value(&frame);
            return match envelope.handshake_id() {
                Some(connection_id) => FrameOutcome::Handshake {
                    connection_id: connection_id.to_owned(),
                    me: envelope.me,
                },
                None => {
                    tracing::debug!("Ignoring frame received before handshake");
                    FrameOutcome::Dropped
                }
            };
        }

        match self.decoder.decode(&frame) {
            Some(event) => FrameOutcome::Event(event),
            None => {
                tracing::debug!("Dropping undecodable event frame: {}", text);
                FrameOutcome::Dropped
            }
        }
    }
}
