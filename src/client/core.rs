use super::connection::{ActiveSocket, SessionState};
use super::state::{self, SessionContext};
use super::{ChatSocketClientBuilder, ChatSocketOptions};
use crate::connectivity::{self, ConnectivityMonitor};
use crate::infrastructure::{HealthChecker, Probe, TaskManager};
use crate::listener::{ListenerRegistry, SessionListener};
use crate::messaging::{EventDecoder, FrameOutcome, FrameRouter};
use crate::types::message::User;
use crate::types::{ChatError, Result, UNKNOWN_FAILURE_MESSAGE};
use crate::websocket::{Connector, SocketEvent, SocketEventSender, SocketId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use url::Url;

/// Persistent connection to a realtime chat server.
///
/// `ChatSocketClient` owns one socket at a time. It completes the implicit
/// handshake (the first frame carrying a `connection_id`), probes liveness
/// with a health check, reconnects after connectivity loss, and fans decoded
/// events out to every subscribed [`SessionListener`] exactly once.
///
/// Cloning is cheap; clones share the session. Dropping the last clone stops
/// every background task.
///
/// # Example
///
/// ```no_run
/// use chat_realtime_rs::{ChatSocketClient, ChatSocketOptions};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ChatSocketClient::new(
///     "wss://chat.example.com/connect?json=%7B%7D",
///     ChatSocketOptions::default(),
/// )?;
///
/// client.connect()?;
/// // Subscribe listeners, wait for events...
/// client.disconnect();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChatSocketClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    options: ChatSocketOptions,

    // Session state: one lock for socket, client id and connectivity flag
    context: Mutex<SessionContext>,

    listeners: ListenerRegistry,
    connector: Arc<dyn Connector>,
    router: FrameRouter,
    monitor: Arc<dyn ConnectivityMonitor>,
    monitor_started: AtomicBool,
    events_tx: SocketEventSender,
    health: HealthChecker,

    // Background task manager
    tasks: Mutex<TaskManager>,
}

impl ClientInner {
    pub(crate) fn new(
        options: ChatSocketOptions,
        connector: Arc<dyn Connector>,
        decoder: Arc<dyn EventDecoder>,
        monitor: Arc<dyn ConnectivityMonitor>,
        events_tx: SocketEventSender,
    ) -> Self {
        let health = HealthChecker::new(options.health_check_interval());
        Self {
            options,
            context: Mutex::new(SessionContext::new()),
            listeners: ListenerRegistry::new(),
            connector,
            router: FrameRouter::new(decoder),
            monitor,
            monitor_started: AtomicBool::new(false),
            events_tx,
            health,
            tasks: Mutex::new(TaskManager::new()),
        }
    }

    pub(crate) fn track_task(&self, handle: JoinHandle<()>) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .track(handle);
    }

    fn configure(&self, endpoint: &str) -> Result<()> {
        let url = Url::parse(endpoint)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ChatError::InvalidEndpoint(format!(
                "expected ws:// or wss://, got {}://",
                url.scheme()
            )));
        }
        state::lock(&self.context).set_endpoint(url);
        Ok(())
    }

    fn connect(&self) -> Result<()> {
        let mut context = state::lock(&self.context);
        let url = context.endpoint().cloned().ok_or(ChatError::NotConfigured)?;

        let id = context.next_socket_id();
        tracing::info!(
            "Connecting socket {} to {}{}",
            id,
            url.host_str().unwrap_or_default(),
            url.path()
        );
        let handle = self.connector.open(&url, id, self.events_tx.clone());
        context.replace_socket(ActiveSocket::new(id, handle));
        Ok(())
    }

    /// Applies one socket callback. Called only from the dispatcher task, so
    /// callbacks are handled one at a time and in arrival order.
    pub(crate) fn handle_socket_event(self: &Arc<Self>, id: SocketId, event: SocketEvent) {
        match event {
            SocketEvent::Open => {
                let opened = state::lock(&self.context).on_open(id);
                if !opened {
                    tracing::debug!("Ignoring open from superseded socket {}", id);
                    return;
                }
                tracing::info!("Socket {} open, awaiting handshake", id);
                self.start_health_check();
            }
            SocketEvent::Text(text) => {
                let outcome = state::lock(&self.context).on_text(id, &text, &self.router);
                match outcome {
                    FrameOutcome::Handshake { connection_id, .. } => {
                        tracing::info!("Connection established with client id {}", connection_id);
                        self.listeners.for_each(|l| l.on_connection_established());
                    }
                    FrameOutcome::Event(event) => {
                        tracing::debug!("Delivering event {}", event.event_type);
                        self.listeners.for_each(|l| l.on_event(&event));
                    }
                    FrameOutcome::Dropped => {}
                }
            }
            SocketEvent::Binary(bytes) => {
                let deliver = state::lock(&self.context).on_binary(id);
                if deliver {
                    self.listeners.for_each(|l| l.on_raw_frame(&bytes));
                } else {
                    tracing::debug!("Ignoring binary frame from socket {}", id);
                }
            }
            SocketEvent::Closing { code, reason } => {
                tracing::warn!("Closing socket {}: {} / {}", id, code, reason);
                self.fail(id, reason, Some(i32::from(code)));
            }
            SocketEvent::Failure { message, code } => {
                self.fail(id, message, code);
            }
        }
    }

    fn fail(&self, id: SocketId, message: String, code: Option<i32>) {
        let failed = state::lock(&self.context).on_failure(id);
        if !failed {
            tracing::debug!("Ignoring failure from superseded socket {}", id);
            return;
        }

        let message = if message.is_empty() {
            UNKNOWN_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        let code = code.unwrap_or(self.options.no_network_code());
        tracing::error!("Socket {} failed: {} (code {})", id, message, code);
        self.listeners.for_each(|l| l.on_failed(&message, code));
    }

    fn start_health_check(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.health.start(move || match weak.upgrade() {
            Some(inner) => inner.check_health(),
            None => Probe::Detached,
        });
    }

    /// One health check run: reconnect while the connection is lost,
    /// otherwise send a keepalive.
    fn check_health(&self) -> Probe {
        {
            let mut context = state::lock(&self.context);
            if !context.no_connection() {
                match context.send_keepalive() {
                    Ok(()) => tracing::debug!("Sent keepalive"),
                    Err(e) => {
                        tracing::warn!("Keepalive failed: {}", e);
                        // Report through the dispatcher like any transport error
                        if let Some(id) = context.socket_id() {
                            let failure = SocketEvent::Failure {
                                message: e.to_string(),
                                code: None,
                            };
                            if self.events_tx.send((id, failure)).is_err() {
                                tracing::debug!("Dispatcher gone, keepalive failure dropped");
                            }
                        }
                    }
                }
                return Probe::Alive;
            }

            tracing::info!("Connection lost, reconnecting...");
            context.clear();
        }

        if let Err(e) = self.connect() {
            tracing::error!("Reconnection attempt failed: {}", e);
        }
        Probe::Reconnecting
    }

    fn start_connectivity_monitor(self: &Arc<Self>) {
        if self.monitor_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let signals = self.monitor.start();
        let weak = Arc::downgrade(self);
        let receiver = connectivity::spawn_receiver(signals, move |signal| {
            let Some(inner) = weak.upgrade() else {
                return false;
            };
            connectivity::handle_signal(
                signal,
                &inner.context,
                &inner.listeners,
                inner.options.no_network_message(),
                inner.options.no_network_code(),
            );
            true
        });
        self.track_task(receiver);
        tracing::debug!("Connectivity monitor started");
    }
}

impl ChatSocketClient {
    /// Creates a client configured for `endpoint`.
    ///
    /// This does not connect; call [`connect()`](Self::connect). Must be
    /// called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UrlParse`] if the endpoint cannot be parsed, or
    /// [`ChatError::InvalidEndpoint`] if it is not a `ws`/`wss` URL.
    pub fn new(endpoint: impl Into<String>, options: ChatSocketOptions) -> Result<Self> {
        ChatSocketClientBuilder::new(options).endpoint(endpoint).build()
    }

    /// Starts a builder for a client with custom collaborators.
    pub fn builder(options: ChatSocketOptions) -> ChatSocketClientBuilder {
        ChatSocketClientBuilder::new(options)
    }

    /// Sets the endpoint used by the next [`connect()`](Self::connect).
    pub fn configure(&self, endpoint: &str) -> Result<()> {
        self.inner.configure(endpoint)
    }

    /// Opens a new socket session.
    ///
    /// Always starts fresh: any existing socket is discarded without waiting
    /// for it to close, and the client id is cleared. Returns as soon as the
    /// socket is opening; the outcome arrives through listener callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NotConfigured`] if no endpoint has been set.
    pub fn connect(&self) -> Result<()> {
        self.inner.connect()
    }

    /// Registers a listener. Adding the same `Arc` twice is a no-op.
    ///
    /// The first subscription also starts the connectivity monitor.
    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        if !self.inner.listeners.subscribe(listener) {
            tracing::debug!("Listener already subscribed");
        }
        self.inner.start_connectivity_monitor();
    }

    /// Removes a listener. Safe to call from inside a listener callback.
    pub fn unsubscribe(&self, listener: &Arc<dyn SessionListener>) {
        if !self.inner.listeners.unsubscribe(listener) {
            tracing::debug!("Listener was not subscribed");
        }
    }

    /// Cancels the socket, marks the connection lost and clears the client id.
    ///
    /// The health checker keeps running and will reconnect on its next run.
    /// Use [`disconnect()`](Self::disconnect) to stay disconnected.
    pub fn disconnect_and_clear(&self) {
        state::lock(&self.inner.context).clear();
        tracing::info!("Socket cleared");
    }

    /// Disconnects for good: stops the health checker, then clears the
    /// session like [`disconnect_and_clear()`](Self::disconnect_and_clear).
    ///
    /// Call [`connect()`](Self::connect) to start again.
    pub fn disconnect(&self) {
        self.inner.health.stop();
        state::lock(&self.inner.context).clear();
        tracing::info!("Disconnected from chat server");
    }

    /// Sends a raw text frame on the live socket.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NotConnected`] if there is no socket.
    pub fn send_text(&self, text: impl Into<String>) -> Result<()> {
        state::lock(&self.inner.context).send_text(text.into())
    }

    pub fn state(&self) -> SessionState {
        state::lock(&self.inner.context).state()
    }

    /// Client id issued by the server; present only while connected.
    pub fn client_id(&self) -> Option<String> {
        state::lock(&self.inner.context)
            .client_id()
            .map(str::to_owned)
    }

    /// Profile from the most recent handshake that carried one.
    pub fn current_user(&self) -> Option<User> {
        state::lock(&self.inner.context).current_user().cloned()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Whether the connection is currently considered lost.
    pub fn no_connection(&self) -> bool {
        state::lock(&self.inner.context).no_connection()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_health_check_running(&self) -> bool {
        self.inner.health.is_running()
    }
}
