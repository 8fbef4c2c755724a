//! # Chat Realtime Rust
//!
//! Persistent WebSocket session manager for a realtime chat transport.
//!
//! The client opens one socket at a time, completes the implicit handshake
//! (the first frame carrying a `connection_id`), keeps the connection alive
//! with a health check that doubles as the reconnect loop, and fans every
//! decoded server event out to all subscribed listeners exactly once.
//!
//! ## Example
//!
//! ```no_run
//! use chat_realtime_rs::{ChatEvent, ChatSocketClient, ChatSocketOptions, SessionListener};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl SessionListener for Printer {
//!     fn on_failed(&self, message: &str, code: i32) {
//!         eprintln!("failed: {} ({})", message, code);
//!     }
//!     fn on_connection_established(&self) {
//!         println!("connected");
//!     }
//!     fn on_event(&self, event: &ChatEvent) {
//!         println!("event: {}", event.event_type);
//!     }
//!     fn on_raw_frame(&self, bytes: &[u8]) {
//!         println!("{} raw bytes", bytes.len());
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatSocketClient::new(
//!         "wss://chat.example.com/connect",
//!         ChatSocketOptions::default(),
//!     )?;
//!
//!     client.subscribe(Arc::new(Printer));
//!     client.connect()?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod connectivity;
pub mod infrastructure;
pub mod listener;
pub mod messaging;
pub mod types;
pub mod websocket;

#[cfg(test)]
mod testing;

pub use client::{ChatSocketClient, ChatSocketClientBuilder, ChatSocketOptions, SessionState};
pub use connectivity::{BroadcastConnectivityMonitor, ConnectivityMonitor, ConnectivitySignal};
pub use listener::{ListenerRegistry, SessionListener};
pub use messaging::{ChatEvent, EventDecoder, EventType, JsonEventDecoder};
pub use types::{ChatError, Result, User};
pub use websocket::{Connector, SocketEvent, SocketHandle, SocketId, TungsteniteConnector};
