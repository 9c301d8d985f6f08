//! Notification injection handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{PublishNotificationRequest, PublishNotificationResponse};
use crate::app_state::AppState;
use crate::domain::{Notification, UserId};
use crate::error::{ErrorResponse, NotifyError};

/// `POST /notifications` — Publish a notification to connected sessions.
///
/// # Errors
///
/// Returns [`NotifyError::InvalidRequest`] when the message body is
/// empty.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "Publish a notification",
    description = "Publishes a notification to every connected WebSocket session. Recipient filtering (target user, broadcast flag) is applied per connection.",
    request_body = PublishNotificationRequest,
    responses(
        (status = 202, description = "Notification accepted and fanned out", body = PublishNotificationResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn publish_notification(
    State(state): State<AppState>,
    Json(req): Json<PublishNotificationRequest>,
) -> Result<impl IntoResponse, NotifyError> {
    if req.message.trim().is_empty() {
        return Err(NotifyError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    let kind = req.kind;
    let notification = Notification {
        kind,
        origin: req.origin.unwrap_or_else(|| "System".to_string()),
        target_user_id: req.target_user_id.map(UserId::from_uuid),
        broadcast_to_all: req.broadcast_to_all,
        beneficiary: req.beneficiary,
        message: req.message,
        timestamp: Utc::now(),
        simulated: false,
    };
    let timestamp = notification.timestamp;
    let delivered = state.notify_service.publish(notification);

    let response = PublishNotificationResponse {
        kind: kind.wire_name().to_string(),
        delivered,
        timestamp,
        status: "accepted".to_string(),
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Notification routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/notifications", post(publish_notification))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use crate::api;
    use crate::domain::EventBus;
    use crate::service::NotifyService;

    async fn spawn_server() -> (String, EventBus) {
        let event_bus = EventBus::new(64);
        let notify_service = Arc::new(NotifyService::new(event_bus.clone()));
        let state = crate::app_state::AppState {
            notify_service,
            event_bus: event_bus.clone(),
        };
        let app = api::build_router().with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .ok()
            .unwrap_or_else(|| panic!("bind failed"));
        let addr = listener
            .local_addr()
            .ok()
            .unwrap_or_else(|| panic!("no local addr"));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), event_bus)
    }

    #[tokio::test]
    async fn publish_reaches_bus_subscribers() {
        let (base, bus) = spawn_server().await;
        let mut rx = bus.subscribe();

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/notifications"))
            .json(&serde_json::json!({
                "kind": "attendance_waiting",
                "beneficiary": "J. Silva",
                "message": "Waiting at desk 2"
            }))
            .send()
            .await;
        let Ok(response) = response else {
            panic!("request failed");
        };
        assert_eq!(response.status().as_u16(), 202);

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        assert_eq!(
            body.get("kind").and_then(|v| v.as_str()),
            Some("attendance_waiting")
        );
        assert_eq!(body.get("delivered").and_then(|v| v.as_u64()), Some(1));

        let published = rx.recv().await;
        let Ok(published) = published else {
            panic!("notification should reach the bus");
        };
        assert_eq!(published.message, "Waiting at desk 2");
        assert_eq!(published.beneficiary.as_deref(), Some("J. Silva"));
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let (base, _bus) = spawn_server().await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/notifications"))
            .json(&serde_json::json!({ "message": "   " }))
            .send()
            .await;
        let Ok(response) = response else {
            panic!("request failed");
        };
        assert_eq!(response.status().as_u16(), 400);

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        assert_eq!(
            body.pointer("/error/code").and_then(|v| v.as_u64()),
            Some(1001)
        );
    }

    #[tokio::test]
    async fn missing_kind_defaults_to_info() {
        let (base, bus) = spawn_server().await;
        let mut rx = bus.subscribe();

        let response = reqwest::Client::new()
            .post(format!("{base}/api/v1/notifications"))
            .json(&serde_json::json!({ "message": "hello" }))
            .send()
            .await;
        assert!(response.is_ok());

        let published = rx.recv().await;
        let Ok(published) = published else {
            panic!("notification should reach the bus");
        };
        assert_eq!(
            published.kind,
            crate::domain::NotificationKind::Info
        );
    }
}
