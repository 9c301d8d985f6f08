//! Echo-after-delay transport stand-in.
//!
//! Originally a placeholder for the real push channel, kept as an
//! interchangeable [`Transport`] implementation: every send is echoed back
//! through the inbound subscription after a fixed delay, tagged as
//! simulated. Useful for tests and demos without a running gateway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::broadcast;

use super::{Transport, TransportState};
use crate::error::NotifyError;

/// Delay between a send and its simulated echo.
pub const ECHO_DELAY: Duration = Duration::from_millis(500);

const INBOUND_CAPACITY: usize = 64;

/// Loopback transport that echoes its own sends.
#[derive(Debug)]
pub struct SimulatedTransport {
    inbound: broadcast::Sender<String>,
    closed: AtomicBool,
    echo_delay: Duration,
}

impl SimulatedTransport {
    /// Creates a simulated transport with the standard echo delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_echo_delay(ECHO_DELAY)
    }

    /// Creates a simulated transport with a custom echo delay.
    #[must_use]
    pub fn with_echo_delay(echo_delay: Duration) -> Self {
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        tracing::info!("simulated transport created; deliveries will be echoes of local sends");
        Self {
            inbound,
            closed: AtomicBool::new(false),
            echo_delay,
        }
    }

    /// Injects a raw payload into the inbound subscription, as if it had
    /// arrived from the remote side.
    pub fn inject(&self, payload: &str) {
        let _ = self.inbound.send(payload.to_string());
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SimulatedTransport {
    fn send(&self, payload: &str) -> Result<(), NotifyError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(NotifyError::TransportNotReady(TransportState::Closed));
        }
        tracing::debug!(len = payload.len(), "simulating send over push channel");

        let inbound = self.inbound.clone();
        let delay = self.echo_delay;
        let raw = payload.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(mut value) => {
                    if let Some(obj) = value.as_object_mut() {
                        obj.insert("simulated".to_string(), serde_json::Value::Bool(true));
                    }
                    let echoed = serde_json::to_string(&value).unwrap_or(raw);
                    let _ = inbound.send(echoed);
                }
                Err(err) => {
                    tracing::warn!(%err, "simulated echo dropped: payload is not JSON");
                }
            }
        });
        Ok(())
    }

    fn state(&self) -> TransportState {
        if self.closed.load(Ordering::SeqCst) {
            TransportState::Closed
        } else {
            TransportState::Open
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("simulated transport closed");
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inbound.subscribe()
    }
}
