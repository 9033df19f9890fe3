//! Handler for the generic webhook endpoint.
//!
//! One URL receives Events API JSON, slash commands and interactive payloads
//! (form field `payload=` or a JSON body with a `payload` string). Bodies that
//! carry no `api_app_id` but do carry `payload` are unwrapped and dispatched by
//! the inner `type`; everything else is treated as a slash command.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::event_handler::{handle_event_callback, is_events_api_body};
use super::helpers::{WebhookResponse, ok_empty};
use super::parsing::{parse_webhook_body, v_path, v_string};
use crate::core::events::{EmitTarget, EventSink};
use crate::core::models::{ChannelRef, TriggerRef};
use crate::errors::SlackError;

/// What a generic webhook body turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookKind {
    Events(Value),
    Command(Value),
    ViewSubmission(Value),
    Other { kind: String },
}

/// Decode and classify a generic webhook body.
///
/// # Errors
///
/// Returns `SlackError::ParseError` if the body, or the wrapped `payload`,
/// is neither JSON nor a form.
pub fn classify(raw_body: &str) -> Result<WebhookKind, SlackError> {
    let outer = parse_webhook_body(raw_body)?;

    if is_events_api_body(&outer) {
        return Ok(WebhookKind::Events(outer));
    }

    let wrapped = if outer.get("api_app_id").is_some() {
        None
    } else {
        outer.get("payload").cloned()
    };

    let (event, kind) = match wrapped {
        Some(payload) => {
            let inner = match payload {
                Value::String(text) => serde_json::from_str::<Value>(&text).map_err(|e| {
                    SlackError::ParseError(format!("Invalid interactive payload: {e}"))
                })?,
                other => other,
            };
            let kind = inner
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            (inner, kind)
        }
        None => (outer, "command".to_string()),
    };

    Ok(match kind.as_str() {
        "command" => WebhookKind::Command(event),
        "view_submission" => WebhookKind::ViewSubmission(event),
        _ => WebhookKind::Other { kind },
    })
}

/// Handle a generic webhook body.
pub fn handle_webhook(sink: &dyn EventSink, raw_body: &str) -> WebhookResponse {
    let kind = match classify(raw_body) {
        Ok(kind) => kind,
        Err(e) => {
            warn!("Unparsable webhook body: {}", e);
            return ok_empty();
        }
    };

    match kind {
        WebhookKind::Events(body) => handle_event_callback(sink, &body),
        WebhookKind::Command(event) => {
            info!("Webhook type command");
            handle_command(sink, event)
        }
        WebhookKind::ViewSubmission(event) => {
            info!("Webhook type view_submission");
            handle_view_submission(sink, &event, raw_body)
        }
        WebhookKind::Other { kind } => {
            info!(kind = %kind, "Unhandled webhook type");
            ok_empty()
        }
    }
}

/// Attach `trigger` and `channel` handles and emit to the app's command listener.
fn handle_command(sink: &dyn EventSink, mut event: Value) -> WebhookResponse {
    let Some(command) = v_string(&event, &["command"]) else {
        warn!("Command webhook without a command field");
        return ok_empty();
    };
    let app_id = v_string(&event, &["api_app_id"]);

    let trigger = TriggerRef {
        app_id: app_id.clone(),
        trigger_id: v_string(&event, &["trigger_id"]),
        response_url: v_string(&event, &["response_url"]),
    };
    let channel = v_string(&event, &["channel_name"]).map(ChannelRef::named);

    if let Some(obj) = event.as_object_mut() {
        obj.insert("trigger".to_string(), json!(trigger));
        obj.insert("channel".to_string(), json!(channel));
    }

    sink.emit(&EmitTarget::AppCommand { app_id, command }, event);
    ok_empty()
}

/// Emit a modal submission to the view that was opened with its `external_id`.
fn handle_view_submission(sink: &dyn EventSink, event: &Value, raw_body: &str) -> WebhookResponse {
    let Some(external_id) = v_string(event, &["view", "external_id"]) else {
        info!("view_submission for a view without external_id; ignoring");
        return ok_empty();
    };
    let app_id = v_string(event, &["api_app_id"]);

    let trigger = TriggerRef {
        app_id: app_id.clone(),
        trigger_id: v_string(event, &["trigger_id"])
            .or_else(|| v_string(event, &["view", "trigger_id"])),
        response_url: None,
    };

    let state = v_path(event, &["view", "state"])
        .map(Value::to_string)
        .unwrap_or_else(|| "{}".to_string());

    let submission = json!({
        "state": state,
        "user_id": v_string(event, &["user", "id"]),
        "user_name": v_string(event, &["user", "name"])
            .or_else(|| v_string(event, &["user", "username"])),
        "team_id": v_string(event, &["team", "id"]),
        "team_domain": v_string(event, &["team", "domain"]),
        "trigger": trigger,
        "event": raw_body,
    });

    sink.emit(
        &EmitTarget::ViewSubmission {
            app_id,
            external_id,
        },
        submission,
    );
    ok_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_form_slash_command() {
        let kind = classify("api_app_id=A1&command=%2Fdeploy&text=now").unwrap();
        match kind {
            WebhookKind::Command(event) => assert_eq!(event["command"], "/deploy"),
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_wrapped_payload_in_json() {
        let inner = json!({"type": "view_submission", "view": {"external_id": "view-1"}});
        let body = json!({"payload": inner.to_string()}).to_string();
        assert!(matches!(classify(&body).unwrap(), WebhookKind::ViewSubmission(_)));
    }

    #[test]
    fn test_classify_payload_ignored_when_app_id_present() {
        let body = json!({"api_app_id": "A1", "payload": "{}", "command": "/x"}).to_string();
        assert!(matches!(classify(&body).unwrap(), WebhookKind::Command(_)));
    }

    #[test]
    fn test_classify_block_actions_is_other() {
        let inner = json!({"type": "block_actions"}).to_string();
        let body = format!("payload={}", percent_encoding::utf8_percent_encode(
            &inner,
            percent_encoding::NON_ALPHANUMERIC
        ));
        assert_eq!(
            classify(&body).unwrap(),
            WebhookKind::Other {
                kind: "block_actions".to_string()
            }
        );
    }

    #[test]
    fn test_classify_events_body() {
        let body = json!({"type": "url_verification", "challenge": "c"}).to_string();
        assert!(matches!(classify(&body).unwrap(), WebhookKind::Events(_)));
    }

    #[test]
    fn test_classify_rejects_garbage_payload() {
        assert!(classify(r#"{"payload":"{nope"}"#).is_err());
    }
}
