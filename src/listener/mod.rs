// Listener module - subscriber capability and fan-out
mod registry;

pub use registry::ListenerRegistry;

use crate::messaging::ChatEvent;

/// Capability set every session subscriber implements.
///
/// Callbacks run on the task that observed the underlying signal (socket
/// dispatcher or connectivity receiver), never while session state is locked,
/// so a listener may call back into the client, including to unsubscribe
/// itself.
pub trait SessionListener: Send + Sync {
    /// Transport or connectivity failure.
    fn on_failed(&self, message: &str, code: i32);

    /// Handshake completed; a client id is now available.
    fn on_connection_established(&self);

    /// A decoded post-handshake event.
    fn on_event(&self, event: &ChatEvent);

    /// A binary frame, passed through undecoded.
    fn on_raw_frame(&self, bytes: &[u8]);
}
