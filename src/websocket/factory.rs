use super::{Connector, SocketEvent, SocketEventSender, SocketHandle, SocketId};
use crate::types::{ChatError, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket factory for creating WebSocket connections
pub(crate) struct WebSocketFactory;

impl WebSocketFactory {
    /// Create a new WebSocket connection
    pub async fn create(url: &str) -> Result<WsStream> {
        tracing::debug!("Creating WebSocket connection to: {}", url);
        let (stream, response) = connect_async(url).await?;
        tracing::debug!("WebSocket upgrade completed with status {}", response.status());
        Ok(stream)
    }
}

/// Connector backed by tokio-tungstenite. Each socket runs as one spawned
/// task that owns both halves of the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
    fn open(&self, url: &Url, id: SocketId, events: SocketEventSender) -> Box<dyn SocketHandle> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(url.to_string(), id, events, outbound_rx));

        Box::new(TungsteniteSocket {
            id,
            outbound: outbound_tx,
            task: task.abort_handle(),
        })
    }
}

struct TungsteniteSocket {
    id: SocketId,
    outbound: mpsc::UnboundedSender<String>,
    task: AbortHandle,
}

impl SocketHandle for TungsteniteSocket {
    fn send_text(&self, text: String) -> Result<()> {
        self.outbound
            .send(text)
            .map_err(|_| ChatError::NotConnected)
    }

    fn cancel(&self) {
        tracing::debug!("Cancelling socket {}", self.id);
        self.task.abort();
    }
}

impl Drop for TungsteniteSocket {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Maps a transport error to the message and diagnostic code listeners see.
pub(crate) fn describe_error(error: &ChatError) -> (String, Option<i32>) {
    let code = match error {
        ChatError::WebSocket(tungstenite::Error::Http(response)) => {
            Some(i32::from(response.status().as_u16()))
        }
        ChatError::WebSocket(tungstenite::Error::Io(io)) => io.raw_os_error(),
        _ => None,
    };
    (error.to_string(), code)
}

fn report(events: &SocketEventSender, id: SocketId, event: SocketEvent) -> bool {
    if events.send((id, event)).is_err() {
        tracing::debug!("Socket {} has no dispatcher left, stopping", id);
        return false;
    }
    true
}

fn report_error(events: &SocketEventSender, id: SocketId, error: ChatError) {
    let (message, code) = describe_error(&error);
    report(events, id, SocketEvent::Failure { message, code });
}

async fn run_socket(
    url: String,
    id: SocketId,
    events: SocketEventSender,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let ws_stream = match WebSocketFactory::create(&url).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("Socket {} failed to connect: {}", id, e);
            report_error(&events, id, e);
            return;
        }
    };

    if !report(&events, id, SocketEvent::Open) {
        return;
    }

    let (mut write_half, mut read_half) = ws_stream.split();

    loop {
        tokio::select! {
            text = outbound.recv() => {
                let Some(text) = text else {
                    // Handle dropped without cancel; close politely.
                    let _ = write_half.close().await;
                    break;
                };
                if let Err(e) = write_half.send(Message::Text(text.into())).await {
                    tracing::error!("Socket {} write failed: {}", id, e);
                    report_error(&events, id, e.into());
                    break;
                }
            }
            frame = read_half.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Socket {} received text frame: {}", id, text.as_str());
                        if !report(&events, id, SocketEvent::Text(text.as_str().to_owned())) {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        tracing::debug!("Socket {} received binary frame ({} bytes)", id, data.len());
                        if !report(&events, id, SocketEvent::Binary(data.to_vec())) {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = match frame {
                            Some(close_frame) => (
                                u16::from(close_frame.code),
                                close_frame.reason.as_str().to_owned(),
                            ),
                            None => (u16::from(CloseCode::Status), String::new()),
                        };
                        tracing::warn!(
                            "Server closed socket {}: code={}, reason='{}'",
                            id,
                            code,
                            reason
                        );
                        // tungstenite has queued the echo of the server's close frame
                        if let Err(e) = write_half.flush().await {
                            tracing::debug!("Socket {} close acknowledgement failed: {}", id, e);
                        }
                        report(&events, id, SocketEvent::Closing { code, reason });
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        tracing::debug!("Socket {} received ping ({} bytes)", id, data.len());
                    }
                    Some(Ok(Message::Pong(data))) => {
                        tracing::debug!("Socket {} received pong ({} bytes)", id, data.len());
                    }
                    Some(Ok(Message::Frame(_))) => {
                        tracing::debug!("Socket {} received raw frame (internal)", id);
                    }
                    Some(Err(e)) => {
                        tracing::error!("Socket {} read error: {}", id, e);
                        report_error(&events, id, e.into());
                        break;
                    }
                    None => {
                        tracing::warn!("Socket {} stream ended without close frame", id);
                        report(
                            &events,
                            id,
                            SocketEvent::Failure {
                                message: "Connection closed".to_string(),
                                code: None,
                            },
                        );
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!("Socket {} task finished", id);
}
