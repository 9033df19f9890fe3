//! Webhook entry point - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Request extraction from Lambda HTTP events
//! - Signature verification (when a signing secret is configured)
//! - Events API deliveries (delegated to `event_handler`)
//! - Legacy slash commands (delegated to `slash_handler`)
//! - Everything else on the generic path (delegated to `interactive_handler`)

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers::WebhookResponse;
use super::{event_handler, helpers, interactive_handler, parsing, signature, slash_handler};
use crate::core::config::AppConfig;
use crate::core::events::EventSink;
use crate::errors::SlackError;

/// Inbound HTTP delivery, independent of the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookRequest {
    pub method: Option<String>,
    pub path: Option<String>,
    pub headers: Value,
    pub body: Option<String>,
}

impl WebhookRequest {
    /// Extract the request from an API Gateway (v1 or v2) or function URL payload.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ParseError` if a base64 body cannot be decoded.
    pub fn from_lambda_payload(payload: &Value) -> Result<Self, SlackError> {
        let method = parsing::v_str(payload, &["requestContext", "http", "method"])
            .or_else(|| parsing::v_str(payload, &["httpMethod"]))
            .map(ToString::to_string);

        let path = parsing::v_str(payload, &["rawPath"])
            .or_else(|| parsing::v_str(payload, &["path"]))
            .map(ToString::to_string);

        let headers = payload.get("headers").cloned().unwrap_or(Value::Null);

        let is_base64 = payload
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let body = match payload.get("body").and_then(Value::as_str) {
            Some(raw) if is_base64 => {
                let bytes = BASE64
                    .decode(raw)
                    .map_err(|e| SlackError::ParseError(format!("Invalid base64 body: {e}")))?;
                Some(
                    String::from_utf8(bytes)
                        .map_err(|e| SlackError::ParseError(format!("Body is not UTF-8: {e}")))?,
                )
            }
            Some(raw) => Some(raw.to_string()),
            None => None,
        };

        Ok(Self {
            method,
            path,
            headers,
            body,
        })
    }
}

/// Classifies Slack deliveries and hands them to an [`EventSink`].
#[derive(Clone)]
pub struct WebhookService {
    sink: Arc<dyn EventSink>,
    signing_secret: Option<String>,
}

impl WebhookService {
    pub fn new(sink: Arc<dyn EventSink>, signing_secret: Option<String>) -> Self {
        Self {
            sink,
            signing_secret,
        }
    }

    pub fn from_config(config: &AppConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::new(sink, config.slack_signing_secret.clone())
    }

    /// Route one delivery.
    #[tracing::instrument(level = "info", skip(self, request), fields(path = ?request.path))]
    pub fn handle(&self, request: &WebhookRequest) -> WebhookResponse {
        let path = request.path.as_deref().unwrap_or("");

        if let Some(secret) = &self.signing_secret {
            let body = request.body.as_deref().unwrap_or("");
            if let Err(response) = verify_signature(body, &request.headers, secret) {
                return response;
            }
            info!("Slack signature verified successfully");
        }

        if path.ends_with("/events") {
            let Some(body) = request.body.as_deref() else {
                error!("Events request missing body");
                return helpers::err_response(400, "Missing body");
            };
            return match serde_json::from_str::<Value>(body) {
                Ok(json_body) => event_handler::handle_event_callback(self.sink.as_ref(), &json_body),
                Err(e) => {
                    warn!("Events body is not JSON: {}", e);
                    helpers::ok_empty()
                }
            };
        }

        if path.ends_with("/commands") {
            let Some(body) = request.body.as_deref() else {
                error!("Command request missing body");
                return helpers::err_response(400, "Missing body");
            };
            return match slash_handler::handle_slash_command(self.sink.as_ref(), body) {
                Ok(response) => response,
                Err(e) => {
                    warn!("Failed to parse slash command: {}", e);
                    helpers::ok_empty()
                }
            };
        }

        // Generic path: nothing to do unless the delivery is complete.
        let (Some(_), Some(_), Some(body)) = (
            request.method.as_deref(),
            request.path.as_deref(),
            request.body.as_deref(),
        ) else {
            info!("Incomplete webhook delivery; ignoring");
            return helpers::ok_empty();
        };

        interactive_handler::handle_webhook(self.sink.as_ref(), body)
    }

    /// Lambda adapter around [`WebhookService::handle`].
    ///
    /// # Errors
    ///
    /// Never fails for well-formed Lambda events; undecodable bodies produce a
    /// 400 response rather than an error.
    pub async fn handle_lambda(&self, event: LambdaEvent<Value>) -> Result<Value, Error> {
        let request = match WebhookRequest::from_lambda_payload(&event.payload) {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to read request: {}", e);
                return Ok(helpers::err_response(400, &format!("Parse Error: {e}")).to_lambda());
            }
        };
        Ok(self.handle(&request).to_lambda())
    }
}

fn verify_signature(body: &str, headers: &Value, secret: &str) -> Result<(), WebhookResponse> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(401, "Missing X-Slack-Signature header"));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    if !signature::verify_slack_signature(body, timestamp, sig, secret, signature::now_secs()) {
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_http_api_v2_payload() {
        let payload = json!({
            "rawPath": "/slack/events",
            "requestContext": {"http": {"method": "POST"}},
            "headers": {"content-type": "application/json"},
            "body": "{}",
            "isBase64Encoded": false
        });
        let req = WebhookRequest::from_lambda_payload(&payload).unwrap();
        assert_eq!(req.method.as_deref(), Some("POST"));
        assert_eq!(req.path.as_deref(), Some("/slack/events"));
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_request_from_rest_api_v1_base64_payload() {
        let payload = json!({
            "path": "/slack/commands",
            "httpMethod": "POST",
            "body": BASE64.encode("text=hello"),
            "isBase64Encoded": true
        });
        let req = WebhookRequest::from_lambda_payload(&payload).unwrap();
        assert_eq!(req.method.as_deref(), Some("POST"));
        assert_eq!(req.body.as_deref(), Some("text=hello"));
    }

    #[test]
    fn test_request_rejects_bad_base64() {
        let payload = json!({"body": "***", "isBase64Encoded": true});
        assert!(WebhookRequest::from_lambda_payload(&payload).is_err());
    }
}
