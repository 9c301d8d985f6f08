//! Wire protocol: the JSON envelopes exchanged over the push channel.

use serde::{Deserialize, Serialize};

use crate::domain::{Notification, UserId};

/// Top-level wire envelope, discriminated by the `type` field.
///
/// The same envelope flows in both directions: clients send `identify`
/// and `notify_user`; the gateway sends `notify_user`, `ack`, and
/// `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Client → gateway: bind this connection to a recipient identity.
    Identify {
        /// Identity used for server-side recipient filtering.
        user_id: UserId,
    },
    /// A user-to-user notification, flattened into the envelope.
    NotifyUser(Notification),
    /// Gateway → client: a `notify_user` was accepted and fanned out.
    Ack {
        /// Number of connections the notification was delivered to.
        delivered: usize,
    },
    /// Gateway → client: protocol error.
    Error {
        /// Numeric error code (mirrors the REST error codes).
        code: u32,
        /// Human-readable message.
        message: String,
    },
}
