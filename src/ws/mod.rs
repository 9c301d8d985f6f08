//! WebSocket layer: connection handling, wire envelopes, recipient
//! filtering.
//!
//! The WebSocket endpoint at `/ws` is the production push channel:
//! clients identify themselves, originate `notify_user` envelopes, and
//! receive recipient-filtered deliveries.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod recipient;
