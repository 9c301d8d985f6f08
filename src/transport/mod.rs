//! Transport capability: the abstracted push channel.
//!
//! [`Transport`] is the port through which the notification manager talks
//! to the outside world. Two adapters are provided: the production
//! WebSocket client ([`websocket::WsTransport`]) and an echo-after-delay
//! stand-in ([`simulated::SimulatedTransport`]) used in tests and demos.

pub mod simulated;
pub mod websocket;

use std::fmt;

use tokio::sync::broadcast;

use crate::error::NotifyError;

pub use simulated::SimulatedTransport;
pub use websocket::WsTransport;

/// Readiness state of a push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Dialing or re-dialing the remote endpoint.
    Connecting,
    /// Connected; sends are accepted.
    Open,
    /// Released by [`Transport::close`]; terminal.
    Closed,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// Abstracted push-messaging channel carrying serialized wire messages.
///
/// Implementations must deliver inbound payloads in arrival order and
/// expose their readiness synchronously so callers can fail fast instead
/// of buffering across outages.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends a serialized wire message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::TransportNotReady`] unless the channel is
    /// [`TransportState::Open`], and [`NotifyError::TransportSend`] when
    /// the payload cannot be handed to the channel.
    fn send(&self, payload: &str) -> Result<(), NotifyError>;

    /// Returns the current readiness state.
    fn state(&self) -> TransportState;

    /// Releases the channel. Idempotent; sends fail afterwards.
    fn close(&self);

    /// Subscribes to inbound raw payloads.
    ///
    /// Each subscriber receives every payload delivered after the call.
    fn subscribe(&self) -> broadcast::Receiver<String>;
}
