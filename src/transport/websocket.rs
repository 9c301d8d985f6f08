//! Production push-channel client over WebSocket.
//!
//! [`WsTransport`] dials the gateway's `/ws` endpoint and keeps the
//! connection alive for the lifetime of the session: on loss it falls back
//! to `Connecting` and re-dials with exponential backoff. Outbound sends
//! never block the caller; they fail fast while the channel is not open.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::{Transport, TransportState};
use crate::error::NotifyError;

const INBOUND_CAPACITY: usize = 256;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Lock-free readiness cell shared between the handle and the driver task.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    const CONNECTING: u8 = 0;
    const OPEN: u8 = 1;
    const CLOSED: u8 = 2;

    fn store(&self, state: TransportState) {
        let raw = match state {
            TransportState::Connecting => Self::CONNECTING,
            TransportState::Open => Self::OPEN,
            TransportState::Closed => Self::CLOSED,
        };
        self.0.store(raw, Ordering::SeqCst);
    }

    fn load(&self) -> TransportState {
        match self.0.load(Ordering::SeqCst) {
            Self::OPEN => TransportState::Open,
            Self::CLOSED => TransportState::Closed,
            _ => TransportState::Connecting,
        }
    }
}

/// WebSocket push-channel client with automatic reconnection.
#[derive(Debug)]
pub struct WsTransport {
    outbound: mpsc::UnboundedSender<String>,
    inbound: broadcast::Sender<String>,
    state: Arc<StateCell>,
    close_tx: watch::Sender<bool>,
}

impl WsTransport {
    /// Starts dialing `url` and returns immediately.
    ///
    /// The returned transport reports [`TransportState::Connecting`] until
    /// the first dial succeeds; there is no blocking wait for readiness.
    #[must_use]
    pub fn connect(url: impl Into<String>) -> Self {
        let url = url.into();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        let (close_tx, close_rx) = watch::channel(false);
        let state = Arc::new(StateCell(AtomicU8::new(StateCell::CONNECTING)));

        tracing::info!(%url, "dialing push channel");
        tokio::spawn(drive(
            url,
            Arc::clone(&state),
            inbound.clone(),
            outbound_rx,
            close_rx,
        ));

        Self {
            outbound: outbound_tx,
            inbound,
            state,
            close_tx,
        }
    }
}

impl Transport for WsTransport {
    fn send(&self, payload: &str) -> Result<(), NotifyError> {
        let state = self.state.load();
        if state != TransportState::Open {
            return Err(NotifyError::TransportNotReady(state));
        }
        self.outbound
            .send(payload.to_string())
            .map_err(|err| NotifyError::TransportSend(err.to_string()))
    }

    fn state(&self) -> TransportState {
        self.state.load()
    }

    fn close(&self) {
        if self.state.load() != TransportState::Closed {
            tracing::debug!("closing push channel");
        }
        self.state.store(TransportState::Closed);
        let _ = self.close_tx.send(true);
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inbound.subscribe()
    }
}

/// Owns the socket: dials, pumps frames both ways, re-dials on loss.
async fn drive(
    url: String,
    state: Arc<StateCell>,
    inbound: broadcast::Sender<String>,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    mut close_rx: watch::Receiver<bool>,
) {
    let mut backoff = INITIAL_BACKOFF;

    'dial: loop {
        if *close_rx.borrow() {
            break;
        }

        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                state.store(TransportState::Open);
                backoff = INITIAL_BACKOFF;
                tracing::info!(%url, "push channel open");

                let (mut ws_tx, mut ws_rx) = stream.split();
                loop {
                    tokio::select! {
                        msg = ws_rx.next() => {
                            match msg {
                                Some(Ok(Message::Text(text))) => {
                                    let _ = inbound.send(text.to_string());
                                }
                                Some(Ok(Message::Close(_))) | None => break,
                                Some(Err(err)) => {
                                    tracing::warn!(%err, "push channel read error");
                                    break;
                                }
                                _ => {}
                            }
                        }
                        out = outbound_rx.recv() => {
                            match out {
                                Some(payload) => {
                                    if ws_tx.send(Message::text(payload)).await.is_err() {
                                        break;
                                    }
                                }
                                // Handle dropped without close(): shut down.
                                None => {
                                    let _ = ws_tx.send(Message::Close(None)).await;
                                    break 'dial;
                                }
                            }
                        }
                        _ = close_rx.changed() => {
                            if *close_rx.borrow() {
                                let _ = ws_tx.send(Message::Close(None)).await;
                                break 'dial;
                            }
                        }
                    }
                }

                if *close_rx.borrow() {
                    break;
                }
                state.store(TransportState::Connecting);
                tracing::warn!(%url, "push channel lost; reconnecting");
            }
            Err(err) => {
                tracing::warn!(%url, %err, "push channel dial failed");
            }
        }

        tokio::select! {
            () = tokio::time::sleep(backoff) => {}
            _ = close_rx.changed() => {
                if *close_rx.borrow() {
                    break;
                }
            }
        }
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }

    state.store(TransportState::Closed);
    tracing::debug!(%url, "push channel driver stopped");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_connecting_and_rejects_sends() {
        // Nothing listens on this port; the driver keeps retrying.
        let transport = WsTransport::connect("ws://127.0.0.1:1/ws");
        assert_ne!(transport.state(), TransportState::Open);

        let result = transport.send("{}");
        assert!(matches!(result, Err(NotifyError::TransportNotReady(_))));
    }

    #[tokio::test]
    async fn close_is_terminal_and_idempotent() {
        let transport = WsTransport::connect("ws://127.0.0.1:1/ws");
        transport.close();
        transport.close();
        assert_eq!(transport.state(), TransportState::Closed);

        let result = transport.send("{}");
        assert!(matches!(
            result,
            Err(NotifyError::TransportNotReady(TransportState::Closed))
        ));
    }
}
