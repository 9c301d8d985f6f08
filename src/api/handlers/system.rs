//! System endpoints: health check and the notification kind catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::NotificationKind;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Presentation metadata for one notification kind.
#[derive(Debug, Serialize, ToSchema)]
struct KindInfo {
    kind: &'static str,
    css_class: &'static str,
    icon: &'static str,
    heading: &'static str,
    auto_dismiss: bool,
}

/// `GET /config/notification-kinds` — List supported notification kinds.
#[utoipa::path(
    get,
    path = "/config/notification-kinds",
    tag = "System",
    summary = "List supported notification kinds",
    description = "Returns the style record for every notification kind, so UI clients can pick classes and icons from data instead of hardcoding them.",
    responses(
        (status = 200, description = "Notification kind catalog", body = Vec<KindInfo>),
    )
)]
pub async fn notification_kinds_handler() -> impl IntoResponse {
    let kinds: Vec<KindInfo> = NotificationKind::ALL
        .iter()
        .map(|kind| {
            let style = kind.style();
            KindInfo {
                kind: kind.wire_name(),
                css_class: style.css_class,
                icon: style.icon,
                heading: style.heading,
                auto_dismiss: style.auto_dismiss,
            }
        })
        .collect();
    (StatusCode::OK, Json(kinds))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/notification-kinds", get(notification_kinds_handler))
}
