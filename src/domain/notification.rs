//! Notification value type and per-kind presentation table.
//!
//! A [`Notification`] is immutable once created: it is produced either by
//! an inbound transport delivery or by a local send, and is only ever
//! discarded by history eviction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::UserId;

/// Enumerated notification kind driving presentation and dismissal.
///
/// The four variants are the complete set; unrecognized wire values fall
/// back to [`NotificationKind::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A case subject is waiting to be seen at the reception desk.
    AttendanceWaiting,
    /// Requires immediate attention; alerts persist until dismissed.
    Urgent,
    /// Informational message.
    Info,
    /// Generic notification; also the fallback for unknown kinds.
    #[default]
    Default,
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// Presentation record for one notification kind.
///
/// Kept as a data table rather than branching logic so that adding a kind
/// is a data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindStyle {
    /// CSS class applied to the alert container.
    pub css_class: &'static str,
    /// Icon name shown in the alert header.
    pub icon: &'static str,
    /// Header label.
    pub heading: &'static str,
    /// Whether the alert auto-dismisses after the standard delay.
    pub auto_dismiss: bool,
}

impl NotificationKind {
    /// All kinds, in catalog order.
    pub const ALL: [Self; 4] = [
        Self::AttendanceWaiting,
        Self::Urgent,
        Self::Info,
        Self::Default,
    ];

    /// Returns the presentation record for this kind.
    #[must_use]
    pub const fn style(&self) -> KindStyle {
        match self {
            Self::AttendanceWaiting => KindStyle {
                css_class: "toast-default",
                icon: "user-clock",
                heading: "Notification",
                auto_dismiss: true,
            },
            Self::Urgent => KindStyle {
                css_class: "toast-urgent",
                icon: "exclamation-triangle",
                heading: "URGENT",
                auto_dismiss: false,
            },
            Self::Info => KindStyle {
                css_class: "toast-info",
                icon: "info-circle",
                heading: "Notification",
                auto_dismiss: true,
            },
            Self::Default => KindStyle {
                css_class: "toast-default",
                icon: "bell",
                heading: "Notification",
                auto_dismiss: true,
            },
        }
    }

    /// Returns the wire name of this kind as a static string slice.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::AttendanceWaiting => "attendance_waiting",
            Self::Urgent => "urgent",
            Self::Info => "info",
            Self::Default => "default",
        }
    }

    /// Parses a wire name, falling back to [`Self::Default`] for
    /// anything unrecognized.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "attendance_waiting" => Self::AttendanceWaiting,
            "urgent" => Self::Urgent,
            "info" => Self::Info,
            _ => Self::Default,
        }
    }
}

/// A single notification, as carried on the wire and held in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Kind tag selecting style, icon, and dismissal behavior.
    #[serde(default)]
    pub kind: NotificationKind,
    /// Display name of the sender.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Intended recipient; absent means broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<UserId>,
    /// Overrides recipient filtering when set.
    #[serde(default)]
    pub broadcast_to_all: bool,
    /// Display string naming the case subject, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<String>,
    /// Free-text body.
    pub message: String,
    /// Send/receive time. Malformed values fall back to the current time.
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Marks messages produced by a non-real transport.
    #[serde(default)]
    pub simulated: bool,
}

impl Notification {
    /// Returns `true` if this notification should be accepted by the
    /// given local user.
    ///
    /// A delivery is dropped only when all of the following hold: the
    /// local user is known, a target is set, the target differs from the
    /// local user, and [`Self::broadcast_to_all`] is false.
    #[must_use]
    pub fn is_addressed_to(&self, user: Option<&UserId>) -> bool {
        match (user, self.target_user_id.as_ref()) {
            (Some(local), Some(target)) => self.broadcast_to_all || local == target,
            _ => true,
        }
    }
}

fn default_origin() -> String {
    "System".to_string()
}

/// Deserializes a timestamp, falling back to the current time when the
/// value is missing, non-string, or unparseable.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Notification {
        serde_json::from_str(json).ok().unwrap_or_else(|| {
            panic!("notification should deserialize");
        })
    }

    #[test]
    fn unknown_kind_falls_back_to_default() {
        let n = parse(r#"{"kind":"mystery_kind","message":"M"}"#);
        assert_eq!(n.kind, NotificationKind::Default);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let n = parse(r#"{"message":"hello"}"#);
        assert_eq!(n.kind, NotificationKind::Default);
        assert_eq!(n.origin, "System");
        assert!(n.target_user_id.is_none());
        assert!(!n.broadcast_to_all);
        assert!(!n.simulated);
    }

    #[test]
    fn malformed_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let n = parse(r#"{"message":"M","timestamp":"not-a-date"}"#);
        assert!(n.timestamp >= before);
    }

    #[test]
    fn valid_timestamp_is_preserved() {
        let n = parse(r#"{"message":"M","timestamp":"2025-03-01T12:00:00Z"}"#);
        assert_eq!(n.timestamp.to_rfc3339(), "2025-03-01T12:00:00+00:00");
    }

    #[test]
    fn urgent_style_is_persistent() {
        let style = NotificationKind::Urgent.style();
        assert_eq!(style.css_class, "toast-urgent");
        assert_eq!(style.heading, "URGENT");
        assert!(!style.auto_dismiss);
    }

    #[test]
    fn non_urgent_kinds_auto_dismiss() {
        for kind in NotificationKind::ALL {
            if kind != NotificationKind::Urgent {
                assert!(kind.style().auto_dismiss, "{kind:?} should auto-dismiss");
            }
        }
    }

    #[test]
    fn addressed_to_target_matches() {
        let me = UserId::new();
        let mut n = parse(r#"{"message":"M"}"#);
        n.target_user_id = Some(me);
        assert!(n.is_addressed_to(Some(&me)));
        assert!(!n.is_addressed_to(Some(&UserId::new())));
    }

    #[test]
    fn broadcast_flag_overrides_target() {
        let mut n = parse(r#"{"message":"M"}"#);
        n.target_user_id = Some(UserId::new());
        n.broadcast_to_all = true;
        assert!(n.is_addressed_to(Some(&UserId::new())));
    }

    #[test]
    fn unknown_local_user_accepts_everything() {
        let mut n = parse(r#"{"message":"M"}"#);
        n.target_user_id = Some(UserId::new());
        assert!(n.is_addressed_to(None));
    }

    #[test]
    fn untargeted_is_accepted_by_anyone() {
        let n = parse(r#"{"message":"M"}"#);
        assert!(n.is_addressed_to(Some(&UserId::new())));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&NotificationKind::AttendanceWaiting).unwrap_or_default();
        assert_eq!(json, r#""attendance_waiting""#);
    }
}
