use super::ConnectivitySignal;
use crate::client::state::{self, SessionContext};
use crate::listener::ListenerRegistry;
use std::sync::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Reacts to one connectivity signal. Returns `true` if listeners were told.
///
/// A loss is reported once: while the connection is already marked lost, or
/// nobody is listening, the signal is a no-op. Restoration only logs; the
/// health checker drives the actual reconnect.
pub(crate) fn handle_signal(
    signal: ConnectivitySignal,
    context: &Mutex<SessionContext>,
    listeners: &ListenerRegistry,
    message: &str,
    code: i32,
) -> bool {
    match signal {
        ConnectivitySignal::Lost => {
            let notify = {
                let mut context = state::lock(context);
                !listeners.is_empty() && context.mark_connection_lost()
            };
            tracing::info!("Connection off");
            if notify {
                listeners.for_each(|l| l.on_failed(message, code));
            }
            notify
        }
        ConnectivitySignal::Restored => {
            tracing::info!("Connection on");
            false
        }
    }
}

/// Pumps signals into `handler` until the monitor goes away or the handler
/// returns `false`.
pub(crate) fn spawn_receiver<H>(
    mut signals: broadcast::Receiver<ConnectivitySignal>,
    mut handler: H,
) -> JoinHandle<()>
where
    H: FnMut(ConnectivitySignal) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                Ok(signal) => {
                    if !handler(signal) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Connectivity receiver lagged, skipped {} signals", skipped);
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Connectivity monitor closed");
                    break;
                }
            }
        }
        tracing::debug!("Connectivity receiver finished");
    })
}
