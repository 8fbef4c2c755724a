//! Test doubles shared by the unit tests.

use crate::listener::SessionListener;
use crate::messaging::{ChatEvent, EventType};
use crate::types::{ChatError, Result};
use crate::websocket::{Connector, SocketEvent, SocketEventSender, SocketHandle, SocketId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Lets every spawned task on the current-thread runtime make progress.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Failed(String, i32),
    Established,
    Event(EventType),
    Raw(Vec<u8>),
}

#[derive(Default)]
pub struct RecordingListener {
    calls: Mutex<Vec<Call>>,
}

impl RecordingListener {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SessionListener for RecordingListener {
    fn on_failed(&self, message: &str, code: i32) {
        self.record(Call::Failed(message.to_string(), code));
    }

    fn on_connection_established(&self) {
        self.record(Call::Established);
    }

    fn on_event(&self, event: &ChatEvent) {
        self.record(Call::Event(event.event_type.clone()));
    }

    fn on_raw_frame(&self, bytes: &[u8]) {
        self.record(Call::Raw(bytes.to_vec()));
    }
}

#[derive(Default)]
pub struct ScriptedSocket {
    pub sent: Mutex<Vec<String>>,
    pub cancelled: AtomicBool,
    pub fail_sends: AtomicBool,
}

impl ScriptedSocket {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct ScriptedHandle(Arc<ScriptedSocket>);

impl SocketHandle for ScriptedHandle {
    fn send_text(&self, text: String) -> Result<()> {
        if self.0.fail_sends.load(Ordering::SeqCst) {
            return Err(ChatError::NotConnected);
        }
        self.0.sent.lock().unwrap().push(text);
        Ok(())
    }

    fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::SeqCst);
    }
}

pub struct OpenedSocket {
    pub id: SocketId,
    pub url: Url,
    pub socket: Arc<ScriptedSocket>,
    pub events: SocketEventSender,
}

impl OpenedSocket {
    pub fn emit(&self, event: SocketEvent) {
        self.events.send((self.id, event)).unwrap();
    }
}

/// Connector that opens nothing; tests drive each socket by hand.
#[derive(Default)]
pub struct ScriptedConnector {
    opened: Mutex<Vec<Arc<OpenedSocket>>>,
}

impl ScriptedConnector {
    pub fn opened(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn socket(&self, index: usize) -> Arc<OpenedSocket> {
        Arc::clone(&self.opened.lock().unwrap()[index])
    }

    pub fn last(&self) -> Arc<OpenedSocket> {
        Arc::clone(self.opened.lock().unwrap().last().unwrap())
    }
}

impl Connector for ScriptedConnector {
    fn open(&self, url: &Url, id: SocketId, events: SocketEventSender) -> Box<dyn SocketHandle> {
        let socket = Arc::new(ScriptedSocket::default());
        self.opened.lock().unwrap().push(Arc::new(OpenedSocket {
            id,
            url: url.clone(),
            socket: Arc::clone(&socket),
            events,
        }));
        Box::new(ScriptedHandle(socket))
    }
}
