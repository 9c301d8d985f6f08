//! DTOs for the notification injection endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::NotificationKind;

/// Request body for `POST /api/v1/notifications`.
///
/// Used by backend workflows (reception desk, case assignment) to push a
/// notification without holding a WebSocket connection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PublishNotificationRequest {
    /// Notification kind. Missing defaults to `info`; unrecognized values
    /// fall back to `default`.
    #[serde(default = "default_kind")]
    #[schema(value_type = Option<String>, example = "attendance_waiting")]
    pub kind: NotificationKind,
    /// Intended recipient. Absent means broadcast.
    #[serde(default)]
    pub target_user_id: Option<uuid::Uuid>,
    /// Deliver to every connected session regardless of target.
    #[serde(default)]
    pub broadcast_to_all: bool,
    /// Case subject display string.
    #[serde(default)]
    pub beneficiary: Option<String>,
    /// Sender display name. Defaults to `"System"`.
    #[serde(default)]
    pub origin: Option<String>,
    /// Free-text body.
    pub message: String,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

/// Response body for `POST /api/v1/notifications`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublishNotificationResponse {
    /// Kind the notification was published with.
    pub kind: String,
    /// Number of connections it was delivered to.
    pub delivered: usize,
    /// Server-stamped publication time.
    pub timestamp: DateTime<Utc>,
    /// Always `"accepted"`.
    pub status: String,
}
