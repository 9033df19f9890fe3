use std::sync::Arc;

use lambda_runtime::{Context, LambdaEvent};
use serde_json::{Value, json};
use slack_driver::api::signature::{compute_signature, now_secs};
use slack_driver::api::{ResponseBody, WebhookRequest, WebhookService};
use slack_driver::core::events::{EmitTarget, RecordingSink};

fn service(sink: &Arc<RecordingSink>) -> WebhookService {
    WebhookService::new(sink.clone(), None)
}

fn post(path: &str, body: &str) -> WebhookRequest {
    WebhookRequest {
        method: Some("POST".to_string()),
        path: Some(path.to_string()),
        headers: json!({}),
        body: Some(body.to_string()),
    }
}

fn encode(text: &str) -> String {
    percent_encoding::utf8_percent_encode(text, percent_encoding::NON_ALPHANUMERIC).to_string()
}

#[test]
fn test_url_verification_echoes_challenge() {
    let sink = Arc::new(RecordingSink::new());
    let body = json!({"token": "t", "type": "url_verification", "challenge": "abc123"}).to_string();

    let resp = service(&sink).handle(&post("/slack/events", &body));

    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"status": 200, "body": {"challenge": "abc123"}})
    );
    assert!(sink.events().is_empty());
}

#[test]
fn test_url_verification_echo_is_exact() {
    let sink = Arc::new(RecordingSink::new());
    let challenge = "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P";
    let body = json!({"type": "url_verification", "challenge": challenge}).to_string();

    let lambda = service(&sink).handle(&post("/slack/events", &body)).to_lambda();
    let echoed: Value = serde_json::from_str(lambda["body"].as_str().unwrap()).unwrap();
    assert_eq!(echoed["challenge"], challenge);
}

#[test]
fn test_event_callback_emits_to_channel() {
    let sink = Arc::new(RecordingSink::new());
    let body = json!({
        "type": "event_callback",
        "api_app_id": "A1",
        "event": {"type": "message", "channel": "C1", "user": "U1", "text": "hi", "ts": "1.2"}
    });

    let resp = service(&sink).handle(&post("/slack/events", &body.to_string()));

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, ResponseBody::Empty);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].0,
        EmitTarget::Channel {
            channel_id: "C1".to_string()
        }
    );
    assert_eq!(events[0].1, body);
}

#[test]
fn test_legacy_slash_command_emits_and_acknowledges() {
    let sink = Arc::new(RecordingSink::new());
    let body = "response_url=https://x&text=hello&channel_id=C1";

    let resp = service(&sink).handle(&post("/slack/commands", body));

    assert_eq!(resp.body, ResponseBody::Text("Processing...".to_string()));
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].0,
        EmitTarget::Channel {
            channel_id: "C1".to_string()
        }
    );
    assert_eq!(events[0].1, json!({"text": "hello", "url": "https://x"}));
}

#[test]
fn test_generic_slash_command_goes_to_app_command_listener() {
    let sink = Arc::new(RecordingSink::new());
    let body = "api_app_id=A1&team_id=T1&channel_id=C1&channel_name=general&user_id=U1\
                &command=%2Fdeploy&text=prod&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1\
                &trigger_id=13345224609.738474920.8088930838d88f008e0";

    let resp = service(&sink).handle(&post("/slack", body));

    assert_eq!(resp.status, 200);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].0,
        EmitTarget::AppCommand {
            app_id: Some("A1".to_string()),
            command: "/deploy".to_string()
        }
    );
    let payload = &events[0].1;
    assert_eq!(payload["text"], "prod");
    assert_eq!(payload["channel"], json!({"name": "general"}));
    assert_eq!(
        payload["trigger"],
        json!({
            "app_id": "A1",
            "trigger_id": "13345224609.738474920.8088930838d88f008e0",
            "response_url": "https://hooks.slack.com/commands/1"
        })
    );
}

#[test]
fn test_view_submission_goes_to_view() {
    let sink = Arc::new(RecordingSink::new());
    let payload = json!({
        "type": "view_submission",
        "api_app_id": "A1",
        "trigger_id": "12345.98765.abcd",
        "team": {"id": "T1", "domain": "acme"},
        "user": {"id": "U1", "name": "bob"},
        "view": {
            "id": "V1",
            "external_id": "view-7",
            "state": {"values": {"b": {"a": {"type": "plain_text_input", "value": "x"}}}}
        }
    });
    let body = format!("payload={}", encode(&payload.to_string()));

    service(&sink).handle(&post("/slack", &body));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].0,
        EmitTarget::ViewSubmission {
            app_id: Some("A1".to_string()),
            external_id: "view-7".to_string()
        }
    );
    let submission = &events[0].1;
    assert_eq!(submission["user_id"], "U1");
    assert_eq!(submission["user_name"], "bob");
    assert_eq!(submission["team_id"], "T1");
    assert_eq!(submission["team_domain"], "acme");
    assert_eq!(submission["trigger"]["trigger_id"], "12345.98765.abcd");
    assert_eq!(submission["event"], body);

    let state: Value = serde_json::from_str(submission["state"].as_str().unwrap()).unwrap();
    assert_eq!(state["values"]["b"]["a"]["value"], "x");
}

#[test]
fn test_block_actions_are_ignored() {
    let sink = Arc::new(RecordingSink::new());
    let payload = json!({"type": "block_actions", "api_app_id": "A1", "actions": []});
    let body = format!("payload={}", encode(&payload.to_string()));

    let resp = service(&sink).handle(&post("/slack", &body));

    assert_eq!(resp.status, 200);
    assert!(sink.events().is_empty());
}

#[test]
fn test_generic_path_requires_method() {
    let sink = Arc::new(RecordingSink::new());
    let mut req = post("/slack", "api_app_id=A1&command=%2Fdeploy");
    req.method = None;

    let resp = service(&sink).handle(&req);

    assert_eq!(resp.body, ResponseBody::Empty);
    assert!(sink.events().is_empty());
}

#[test]
fn test_malformed_body_is_acknowledged_silently() {
    let sink = Arc::new(RecordingSink::new());
    let resp = service(&sink).handle(&post("/slack", r#"{"payload": "{broken"#));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, ResponseBody::Empty);
    assert!(sink.events().is_empty());
}

#[test]
fn test_signature_is_enforced_when_secret_configured() {
    let sink = Arc::new(RecordingSink::new());
    let secret = "shhh";
    let svc = WebhookService::new(sink.clone(), Some(secret.to_string()));
    let body = "response_url=https://x&text=hello&channel_id=C1";

    let unsigned = svc.handle(&post("/slack/commands", body));
    assert_eq!(unsigned.status, 401);
    assert!(sink.events().is_empty());

    let ts = now_secs().to_string();
    let mut signed = post("/slack/commands", body);
    signed.headers = json!({
        "x-slack-request-timestamp": ts,
        "x-slack-signature": compute_signature(&ts, body, secret),
    });
    let resp = svc.handle(&signed);
    assert_eq!(resp.status, 200);
    assert_eq!(sink.events().len(), 1);
}

#[tokio::test]
async fn test_lambda_adapter_round_trip() {
    let sink = Arc::new(RecordingSink::new());
    let payload = json!({
        "rawPath": "/slack/commands",
        "requestContext": {"http": {"method": "POST"}},
        "headers": {"content-type": "application/x-www-form-urlencoded"},
        "body": "response_url=https://x&text=hello&channel_id=C1",
        "isBase64Encoded": false
    });

    let out = service(&sink)
        .handle_lambda(LambdaEvent::new(payload, Context::default()))
        .await
        .unwrap();

    assert_eq!(out["statusCode"], 200);
    assert_eq!(out["body"], "Processing...");
    assert_eq!(sink.events().len(), 1);
}
