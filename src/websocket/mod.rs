// WebSocket module - transport boundary
mod factory;

pub use factory::TungsteniteConnector;

use crate::types::Result;
use tokio::sync::mpsc;
use url::Url;

/// Identifies one socket instance. Every `connect()` allocates a new id, so
/// events from a superseded socket can be told apart and ignored.
pub type SocketId = u64;

/// Lifecycle callbacks reported by a socket, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    /// Transport established
    Open,
    /// UTF-8 text frame
    Text(String),
    /// Binary frame
    Binary(Vec<u8>),
    /// Server initiated close
    Closing { code: u16, reason: String },
    /// Transport error; `code` is the transport's diagnostic code if it has one
    Failure {
        message: String,
        code: Option<i32>,
    },
}

pub type SocketEventSender = mpsc::UnboundedSender<(SocketId, SocketEvent)>;
pub type SocketEventReceiver = mpsc::UnboundedReceiver<(SocketId, SocketEvent)>;

/// Exclusive handle to one open (or opening) socket.
///
/// Sends are fire-and-forget: `Ok` means the frame was queued, and a later
/// write failure arrives as [`SocketEvent::Failure`].
pub trait SocketHandle: Send + Sync {
    fn send_text(&self, text: String) -> Result<()>;

    /// Best-effort cancellation of everything in flight on this socket.
    fn cancel(&self);
}

/// Opens sockets. Opening never blocks; progress is reported on `events`
/// tagged with `id`.
pub trait Connector: Send + Sync {
    fn open(&self, url: &Url, id: SocketId, events: SocketEventSender) -> Box<dyn SocketHandle>;
}
