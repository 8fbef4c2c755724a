use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors returned by caller-facing operations of the chat socket client.
///
/// Runtime failures of a live session are never returned here; they are
/// delivered to listeners through `SessionListener::on_failed`.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Transport error from the socket (handshake rejected, I/O, protocol)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// URL parsing error (malformed endpoint URL)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Endpoint parsed but is not a WebSocket URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// `connect()` was called before an endpoint was configured
    #[error("Endpoint not configured")]
    NotConfigured,

    /// Attempted operation while no socket is live
    #[error("Not connected")]
    NotConnected,
}

/// Convenience type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;
