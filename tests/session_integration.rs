use chat_realtime_rs::{
    ChatEvent, ChatSocketClient, ChatSocketOptions, EventType, SessionListener, SessionState,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, PartialEq)]
enum Seen {
    Failed(String, i32),
    Established,
    Event(EventType),
    Raw(Vec<u8>),
}

/// Forwards every callback into a channel the test can await.
struct ChannelListener {
    tx: mpsc::UnboundedSender<Seen>,
}

impl SessionListener for ChannelListener {
    fn on_failed(&self, message: &str, code: i32) {
        let _ = self.tx.send(Seen::Failed(message.to_string(), code));
    }

    fn on_connection_established(&self) {
        let _ = self.tx.send(Seen::Established);
    }

    fn on_event(&self, event: &ChatEvent) {
        let _ = self.tx.send(Seen::Event(event.event_type.clone()));
    }

    fn on_raw_frame(&self, bytes: &[u8]) {
        let _ = self.tx.send(Seen::Raw(bytes.to_vec()));
    }
}

fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("chat_realtime_rs=debug")
        .with_test_writer()
        .try_init();
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Seen>) -> Seen {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for listener callback")
        .expect("listener channel closed")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_handshake_events_close_and_reconnect() {
    init_test_logger();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (keepalive_tx, mut keepalive_rx) = mpsc::unbounded_channel::<String>();
    let (ack_tx, ack_rx) = oneshot::channel::<Option<u16>>();

    let server = tokio::spawn(async move {
        // First session: handshake, one event, one binary frame, then close
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(Message::Text(
            String::from(r#"{"type":"health.check","connection_id":"abc","me":{"id":"luke"}}"#)
                .into(),
        ))
        .await
        .unwrap();
        ws.send(Message::Text(
            String::from(r#"{"type":"message.new","cid":"messaging:general"}"#).into(),
        ))
        .await
        .unwrap();
        ws.send(Message::Text(String::from("{not json").into()))
            .await
            .unwrap();
        ws.send(Message::Binary(vec![1u8, 2, 3].into()))
            .await
            .unwrap();

        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                keepalive_tx.send(text.as_str().to_owned()).unwrap();
                break;
            }
        }

        ws.close(Some(CloseFrame {
            code: CloseCode::Library(4000),
            reason: String::from("bye").into(),
        }))
        .await
        .unwrap();
        let mut acknowledged = None;
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Close(frame) = message {
                acknowledged = frame.map(|frame| u16::from(frame.code));
            }
        }
        ack_tx.send(acknowledged).unwrap();

        // Second session: the health checker reconnects on its own
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(Message::Text(String::from(r#"{"connection_id":"def"}"#).into()))
            .await
            .unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let client = ChatSocketClient::new(
        format!("ws://{}", addr),
        ChatSocketOptions {
            health_check_interval: Some(400),
            ..Default::default()
        },
    )
    .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    client.subscribe(Arc::new(ChannelListener { tx }));
    client.connect().unwrap();

    assert_eq!(next(&mut rx).await, Seen::Established);
    assert_eq!(client.client_id().as_deref(), Some("abc"));
    assert_eq!(client.current_user().unwrap().id, "luke");

    assert_eq!(next(&mut rx).await, Seen::Event(EventType::MessageNew));
    assert_eq!(next(&mut rx).await, Seen::Raw(vec![1, 2, 3]));

    let keepalive = timeout(WAIT, keepalive_rx.recv()).await.unwrap().unwrap();
    assert_eq!(keepalive, "");

    assert_eq!(next(&mut rx).await, Seen::Failed("bye".to_string(), 4000));
    assert_eq!(client.client_id(), None);

    // The client answers the server's close by echoing its code
    let acknowledged = timeout(WAIT, ack_rx).await.unwrap().unwrap();
    assert_eq!(acknowledged, Some(4000));

    assert_eq!(next(&mut rx).await, Seen::Established);
    assert_eq!(client.client_id().as_deref(), Some("def"));
    assert_eq!(client.state(), SessionState::Connected);

    client.disconnect();
    assert!(!client.is_health_check_running());
    server.abort();
}

#[tokio::test]
async fn test_connect_to_closed_port_reports_failure() {
    init_test_logger();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ChatSocketClient::new(format!("ws://{}", addr), ChatSocketOptions::default())
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    client.subscribe(Arc::new(ChannelListener { tx }));
    client.connect().unwrap();

    match next(&mut rx).await {
        Seen::Failed(message, _) => assert!(!message.is_empty()),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(client.no_connection());
    assert_eq!(client.state(), SessionState::Disconnected);
    client.disconnect();
}
