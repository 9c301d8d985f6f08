//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! dispatches inbound envelopes and forwards recipient-filtered
//! notifications from the event bus.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::WireMessage;
use super::recipient::RecipientFilter;
use crate::domain::Notification;
use crate::error::NotifyError;
use crate::service::NotifyService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads envelopes from the client and dispatches them.
/// - Forwards matching notifications from the [`broadcast::Receiver`] to
///   the client. The originating connection receives its own send back
///   when it matches the connection's filter.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<Notification>,
    notify_service: std::sync::Arc<NotifyService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut recipient = RecipientFilter::new();

    loop {
        tokio::select! {
            // Incoming envelope from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut recipient, &notify_service);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Notification from the event bus
            event = event_rx.recv() => {
                match event {
                    Ok(notification) => {
                        if recipient.matches(&notification) {
                            let json = serde_json::to_string(&WireMessage::NotifyUser(notification))
                                .unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text envelope from the client, returning an optional JSON
/// response.
fn handle_text_message(
    text: &str,
    recipient: &mut RecipientFilter,
    notify_service: &NotifyService,
) -> Option<String> {
    let msg = match serde_json::from_str::<WireMessage>(text) {
        Ok(msg) => msg,
        Err(parse_err) => {
            // Structurally valid JSON means the type tag was unrecognized;
            // anything else is a malformed payload.
            let err = if serde_json::from_str::<serde_json::Value>(text).is_ok() {
                NotifyError::UnknownMessageType(parse_err.to_string())
            } else {
                NotifyError::MalformedInbound(parse_err.to_string())
            };
            tracing::debug!(%err, "rejecting ws payload");
            let envelope = WireMessage::Error {
                code: err.error_code(),
                message: err.to_string(),
            };
            return serde_json::to_string(&envelope).ok();
        }
    };

    match msg {
        WireMessage::Identify { user_id } => {
            recipient.identify(user_id);
            tracing::debug!(%user_id, "ws connection identified");
            None
        }
        WireMessage::NotifyUser(notification) => {
            let delivered = notify_service.publish(notification);
            serde_json::to_string(&WireMessage::Ack { delivered }).ok()
        }
        // Gateway-originated envelopes are ignored when sent by a client.
        WireMessage::Ack { .. } | WireMessage::Error { .. } => None,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventBus, UserId};

    fn make_service() -> (NotifyService, EventBus) {
        let bus = EventBus::new(16);
        (NotifyService::new(bus.clone()), bus)
    }

    #[tokio::test]
    async fn malformed_payload_gets_error_envelope() {
        let (service, _bus) = make_service();
        let mut recipient = RecipientFilter::new();

        let response = handle_text_message("{not json", &mut recipient, &service);
        let Some(response) = response else {
            panic!("expected an error envelope");
        };
        assert!(response.contains(r#""type":"error""#));
        assert!(response.contains("1002"));
    }

    #[tokio::test]
    async fn unknown_type_gets_not_found_envelope() {
        let (service, _bus) = make_service();
        let mut recipient = RecipientFilter::new();

        let response = handle_text_message(r#"{"type":"mystery"}"#, &mut recipient, &service);
        let Some(response) = response else {
            panic!("expected an error envelope");
        };
        assert!(response.contains(r#""type":"error""#));
        assert!(response.contains("2001"));
    }

    #[tokio::test]
    async fn identify_binds_recipient_silently() {
        let (service, _bus) = make_service();
        let mut recipient = RecipientFilter::new();
        let id = UserId::new();

        let response = handle_text_message(
            &format!(r#"{{"type":"identify","user_id":"{id}"}}"#),
            &mut recipient,
            &service,
        );
        assert!(response.is_none());
        assert_eq!(recipient.identity(), Some(&id));
    }

    #[tokio::test]
    async fn notify_user_publishes_and_acks() {
        let (service, bus) = make_service();
        let mut rx = bus.subscribe();
        let mut recipient = RecipientFilter::new();

        let response = handle_text_message(
            r#"{"type":"notify_user","kind":"urgent","message":"M"}"#,
            &mut recipient,
            &service,
        );
        let Some(response) = response else {
            panic!("expected an ack");
        };
        assert!(response.contains(r#""type":"ack""#));
        assert!(response.contains(r#""delivered":1"#));

        let published = rx.recv().await;
        let Ok(published) = published else {
            panic!("notification should reach the bus");
        };
        assert_eq!(published.message, "M");
    }
}
