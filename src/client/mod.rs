// Module declarations
mod builder;
mod connection;
mod core;
pub(crate) mod state;

// Public API exports
pub use builder::{ChatSocketClientBuilder, ChatSocketOptions};
pub use connection::{ActiveSocket, SessionState};
pub use self::core::ChatSocketClient;
