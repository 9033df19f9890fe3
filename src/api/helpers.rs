//! Response builders shared by the webhook handlers.

use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

/// Synchronous answer to a Slack delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl WebhookResponse {
    /// Shape expected by API Gateway / Lambda function URLs.
    #[must_use]
    pub fn to_lambda(&self) -> Value {
        let (content_type, body) = match &self.body {
            ResponseBody::Empty => (None, String::new()),
            ResponseBody::Json(value) => (Some("application/json"), value.to_string()),
            ResponseBody::Text(text) => (Some("text/plain; charset=utf-8"), text.clone()),
        };

        let mut out = json!({
            "statusCode": self.status,
            "body": body,
        });
        if let Some(ct) = content_type {
            out["headers"] = json!({ "Content-Type": ct });
        }
        out
    }
}

/// 200 with no body.
#[must_use]
pub fn ok_empty() -> WebhookResponse {
    WebhookResponse {
        status: 200,
        body: ResponseBody::Empty,
    }
}

/// 200 echoing the Events API `challenge` value untouched.
#[must_use]
pub fn ok_challenge(challenge: Value) -> WebhookResponse {
    WebhookResponse {
        status: 200,
        body: ResponseBody::Json(json!({ "challenge": challenge })),
    }
}

/// 200 with a plain-text body Slack shows to the invoking user.
#[must_use]
pub fn ok_text(text: &str) -> WebhookResponse {
    WebhookResponse {
        status: 200,
        body: ResponseBody::Text(text.to_string()),
    }
}

#[must_use]
pub fn err_response(status: u16, message: &str) -> WebhookResponse {
    WebhookResponse {
        status,
        body: ResponseBody::Json(json!({ "error": message })),
    }
}
