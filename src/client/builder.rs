use super::core::{ChatSocketClient, ClientInner};
use crate::connectivity::{BroadcastConnectivityMonitor, ConnectivityMonitor};
use crate::messaging::{EventDecoder, JsonEventDecoder};
use crate::types::{HEALTH_CHECK_INTERVAL, NO_INTERNET_ERROR_CODE, NO_INTERNET_MESSAGE, Result};
use crate::websocket::{Connector, TungsteniteConnector};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Default)]
pub struct ChatSocketOptions {
    /// Health check interval in milliseconds. Default: 30 000.
    pub health_check_interval: Option<u64>,
    /// Code reported to listeners when the network is unavailable. Default: -1.
    pub no_network_code: Option<i32>,
    /// Message reported alongside `no_network_code`.
    pub no_network_message: Option<String>,
}

impl ChatSocketOptions {
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval.unwrap_or(HEALTH_CHECK_INTERVAL))
    }

    pub fn no_network_code(&self) -> i32 {
        self.no_network_code.unwrap_or(NO_INTERNET_ERROR_CODE)
    }

    pub fn no_network_message(&self) -> &str {
        self.no_network_message
            .as_deref()
            .unwrap_or(NO_INTERNET_MESSAGE)
    }
}

/// Builder for ChatSocketClient that handles initialization
pub struct ChatSocketClientBuilder {
    endpoint: Option<String>,
    options: ChatSocketOptions,
    connector: Arc<dyn Connector>,
    decoder: Arc<dyn EventDecoder>,
    monitor: Arc<dyn ConnectivityMonitor>,
}

impl ChatSocketClientBuilder {
    /// Create a new builder
    pub fn new(options: ChatSocketOptions) -> Self {
        Self {
            endpoint: None,
            options,
            connector: Arc::new(TungsteniteConnector),
            decoder: Arc::new(JsonEventDecoder),
            monitor: Arc::new(BroadcastConnectivityMonitor::new()),
        }
    }

    /// Endpoint to configure right away; otherwise call `configure` later.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn decoder(mut self, decoder: Arc<dyn EventDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn connectivity_monitor(mut self, monitor: Arc<dyn ConnectivityMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Build the client and spawn the socket event dispatcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<ChatSocketClient> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(ClientInner::new(
            self.options,
            self.connector,
            self.decoder,
            self.monitor,
            events_tx,
        ));

        // Spawn socket event dispatcher; it serializes all socket callbacks
        let weak = Arc::downgrade(&inner);
        let dispatcher = tokio::spawn(async move {
            while let Some((id, event)) = events_rx.recv().await {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.handle_socket_event(id, event);
            }
            tracing::info!("Socket dispatcher finished");
        });
        inner.track_task(dispatcher);

        let client = ChatSocketClient { inner };
        if let Some(endpoint) = self.endpoint {
            client.configure(&endpoint)?;
        }
        Ok(client)
    }
}
