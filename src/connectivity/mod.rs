// Connectivity module - external network availability signals
mod receiver;

pub(crate) use receiver::{handle_signal, spawn_receiver};

use tokio::sync::broadcast;

const SIGNAL_BUFFER: usize = 16;

/// Network availability change reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivitySignal {
    Lost,
    Restored,
}

/// Source of connectivity signals.
///
/// `start` is called once, when the first listener subscribes to the client.
/// How the implementation learns about the network (OS notifications,
/// polling, push) is its own business.
pub trait ConnectivityMonitor: Send + Sync {
    fn start(&self) -> broadcast::Receiver<ConnectivitySignal>;
}

/// In-process monitor; the embedding application calls [`report`] from
/// whatever platform hook observes the network.
///
/// [`report`]: BroadcastConnectivityMonitor::report
#[derive(Debug, Clone)]
pub struct BroadcastConnectivityMonitor {
    tx: broadcast::Sender<ConnectivitySignal>,
}

impl BroadcastConnectivityMonitor {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_BUFFER);
        Self { tx }
    }

    /// Publishes a signal. Returns how many receivers saw it.
    pub fn report(&self, signal: ConnectivitySignal) -> usize {
        tracing::debug!("Reporting connectivity signal {:?}", signal);
        self.tx.send(signal).unwrap_or(0)
    }
}

impl Default for BroadcastConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityMonitor for BroadcastConnectivityMonitor {
    fn start(&self) -> broadcast::Receiver<ConnectivitySignal> {
        self.tx.subscribe()
    }
}
