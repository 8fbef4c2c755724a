use crate::types::Result;
use crate::websocket::{SocketHandle, SocketId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    AwaitingHandshake,
    Connected,
}

/// The socket currently owned by the session.
///
/// Replaced, never mutated, on reconnect.
pub struct ActiveSocket {
    id: SocketId,
    handle: Box<dyn SocketHandle>,
}

impl ActiveSocket {
    pub fn new(id: SocketId, handle: Box<dyn SocketHandle>) -> Self {
        Self { id, handle }
    }

    pub fn id(&self) -> SocketId {
        self.id
    }

    /// Sends a raw text frame
    pub fn send_text(&self, text: String) -> Result<()> {
        self.handle.send_text(text)
    }

    /// Sends the zero-length keepalive frame
    pub fn send_keepalive(&self) -> Result<()> {
        self.handle.send_text(String::new())
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }
}
