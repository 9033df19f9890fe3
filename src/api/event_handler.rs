//! Handler for Slack Events API deliveries.
//!
//! - `url_verification`: echo the challenge
//! - `event_callback`: forward the whole envelope to the channel it concerns

use serde_json::Value;
use tracing::{info, warn};

use super::helpers::{WebhookResponse, ok_challenge, ok_empty};
use super::parsing::v_string;
use crate::core::events::{EmitTarget, EventSink};

/// True for the envelope types this handler understands.
#[must_use]
pub fn is_events_api_body(json_body: &Value) -> bool {
    matches!(
        json_body.get("type").and_then(Value::as_str),
        Some("url_verification" | "event_callback")
    )
}

/// Channel an inner event belongs to.
///
/// Most events carry `channel` as a string; reactions nest it under `item`,
/// and channel lifecycle events carry a channel object.
fn event_channel(event: &Value) -> Option<String> {
    v_string(event, &["channel"])
        .or_else(|| v_string(event, &["item", "channel"]))
        .or_else(|| v_string(event, &["channel", "id"]))
}

/// Handle an Events API body.
pub fn handle_event_callback(sink: &dyn EventSink, json_body: &Value) -> WebhookResponse {
    let body_type = json_body.get("type").and_then(Value::as_str).unwrap_or("");

    match body_type {
        "url_verification" => {
            // Slack compares the echoed value byte for byte.
            let challenge = json_body
                .get("challenge")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            info!("Answering url_verification handshake");
            ok_challenge(challenge)
        }
        "event_callback" => {
            let Some(event) = json_body.get("event") else {
                warn!("event_callback without event");
                return ok_empty();
            };

            let event_type = event.get("type").and_then(Value::as_str).unwrap_or("");
            let Some(channel_id) = event_channel(event) else {
                info!(event_type = %event_type, "Event has no channel; ignoring");
                return ok_empty();
            };

            info!(event_type = %event_type, channel_id = %channel_id, "Processing event callback");
            sink.emit(&EmitTarget::Channel { channel_id }, json_body.clone());
            ok_empty()
        }
        other => {
            info!(body_type = %other, "Ignoring unknown Events API body");
            ok_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::RecordingSink;
    use serde_json::json;

    #[test]
    fn test_event_channel_locations() {
        assert_eq!(
            event_channel(&json!({"type": "message", "channel": "C1"})).as_deref(),
            Some("C1")
        );
        assert_eq!(
            event_channel(&json!({"type": "reaction_added", "item": {"channel": "C2"}})).as_deref(),
            Some("C2")
        );
        assert_eq!(
            event_channel(&json!({"type": "channel_created", "channel": {"id": "C3"}})).as_deref(),
            Some("C3")
        );
        assert_eq!(event_channel(&json!({"type": "team_join"})), None);
    }

    #[test]
    fn test_event_without_channel_is_not_emitted() {
        let sink = RecordingSink::new();
        let body = json!({"type": "event_callback", "event": {"type": "team_join"}});
        assert_eq!(handle_event_callback(&sink, &body), ok_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_is_events_api_body() {
        assert!(is_events_api_body(&json!({"type": "url_verification"})));
        assert!(is_events_api_body(&json!({"type": "event_callback"})));
        assert!(!is_events_api_body(&json!({"type": "view_submission"})));
        assert!(!is_events_api_body(&json!({"command": "/x"})));
    }
}
