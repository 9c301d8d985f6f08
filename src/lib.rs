//! # notify-gateway
//!
//! WebSocket notification gateway and client manager for a
//! social-assistance case-management platform.
//!
//! The crate has two halves sharing one domain model and wire protocol:
//! the gateway binary relays `notify_user` envelopes between connected
//! sessions, and the library's [`client::NotificationManager`] is the
//! client-side core (bounded history, unread counter, and the transient
//! alert lifecycle) behind a swappable [`transport::Transport`].
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, REST injection)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Connections (ws/)
//!     │
//!     ├── NotifyService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── per-connection RecipientFilter
//!
//! Page session
//!     │
//!     ├── NotificationManager (client/)
//!     ├── Transport: WsTransport | SimulatedTransport (transport/)
//!     └── Presenter (badge, alerts, audio)
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod transport;
pub mod ws;
