//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::NotifyService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Notification service for publish/fan-out logic.
    pub notify_service: Arc<NotifyService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
