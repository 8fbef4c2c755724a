use super::connection::{ActiveSocket, SessionState};
use crate::messaging::{FrameOutcome, FrameRouter};
use crate::types::message::User;
use crate::types::{ChatError, Result};
use crate::websocket::SocketId;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Consolidated mutable state for a ChatSocketClient.
///
/// One lock guards all of it, so socket callbacks, health checks and
/// connectivity signals observe a consistent session. Methods only mutate
/// state; listener notification is the caller's job once the lock is released.
pub(crate) struct SessionContext {
    endpoint: Option<Url>,
    state: SessionState,
    client_id: Option<String>,
    user: Option<User>,
    /// Last known network state; `true` while the connection is considered lost
    no_connection: bool,
    socket: Option<ActiveSocket>,
    last_socket_id: SocketId,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            state: SessionState::Disconnected,
            client_id: None,
            user: None,
            no_connection: false,
            socket: None,
            last_socket_id: 0,
        }
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    pub fn set_endpoint(&mut self, endpoint: Url) {
        self.endpoint = Some(endpoint);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn no_connection(&self) -> bool {
        self.no_connection
    }

    pub fn socket_id(&self) -> Option<SocketId> {
        self.socket.as_ref().map(ActiveSocket::id)
    }

    fn is_current(&self, id: SocketId) -> bool {
        self.socket_id() == Some(id)
    }

    /// Allocates the id for the next socket.
    pub fn next_socket_id(&mut self) -> SocketId {
        self.last_socket_id += 1;
        self.last_socket_id
    }

    /// Installs a freshly opened socket, discarding the previous one.
    pub fn replace_socket(&mut self, socket: ActiveSocket) {
        if let Some(previous) = self.socket.take() {
            tracing::debug!("Discarding socket {}", previous.id());
            previous.cancel();
        }
        self.client_id = None;
        self.state = SessionState::Connecting;
        self.socket = Some(socket);
    }

    /// Transport established. Returns `false` for a superseded socket.
    pub fn on_open(&mut self, id: SocketId) -> bool {
        if !self.is_current(id) || self.state != SessionState::Connecting {
            return false;
        }
        self.state = SessionState::AwaitingHandshake;
        self.no_connection = false;
        true
    }

    /// Applies a text frame and returns what listeners should be told.
    pub fn on_text(&mut self, id: SocketId, text: &str, router: &FrameRouter) -> FrameOutcome {
        let handshake_complete = match self.state {
            _ if !self.is_current(id) => return FrameOutcome::Dropped,
            SessionState::AwaitingHandshake => false,
            SessionState::Connected => true,
            SessionState::Disconnected | SessionState::Connecting => {
                return FrameOutcome::Dropped;
            }
        };

        let outcome = router.route(text, handshake_complete);
        if let FrameOutcome::Handshake { connection_id, me } = &outcome {
            self.client_id = Some(connection_id.clone());
            if let Some(me) = me {
                self.user = Some(me.clone());
            }
            self.no_connection = false;
            self.state = SessionState::Connected;
        }
        outcome
    }

    /// Whether a binary frame from `id` should be delivered.
    pub fn on_binary(&self, id: SocketId) -> bool {
        self.is_current(id)
            && matches!(
                self.state,
                SessionState::AwaitingHandshake | SessionState::Connected
            )
    }

    /// Transport error or server close. Returns `false` if the socket was
    /// already superseded or torn down, so one failure is reported once.
    pub fn on_failure(&mut self, id: SocketId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.clear();
        true
    }

    /// Marks the connection lost. Returns `false` if it already was.
    pub fn mark_connection_lost(&mut self) -> bool {
        if self.no_connection {
            return false;
        }
        self.no_connection = true;
        true
    }

    /// Discards the socket and forgets the client id.
    pub fn clear(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.cancel();
        }
        self.no_connection = true;
        self.client_id = None;
        self.state = SessionState::Disconnected;
    }

    pub fn send_text(&self, text: String) -> Result<()> {
        self.socket
            .as_ref()
            .ok_or(ChatError::NotConnected)?
            .send_text(text)
    }

    pub fn send_keepalive(&self) -> Result<()> {
        self.socket
            .as_ref()
            .ok_or(ChatError::NotConnected)?
            .send_keepalive()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks the context, recovering it if a previous holder panicked.
pub(crate) fn lock(context: &Mutex<SessionContext>) -> MutexGuard<'_, SessionContext> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}
