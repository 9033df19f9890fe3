use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Slack driver is not configured: no API token")]
    NotConfigured,

    #[error("Failed to parse Slack payload: {0}")]
    ParseError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Slack API {method} returned error: {code}")]
    Api { method: String, code: String },

    #[error("Failed to decode Slack API {method} response: {message}")]
    Decode { method: String, message: String },

    #[error("Slack entity not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl SlackError {
    /// Slack's error code for `ok:false` envelopes, if this is one.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            SlackError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SlackError {
    fn from(error: reqwest::Error) -> Self {
        SlackError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(error: serde_json::Error) -> Self {
        SlackError::ParseError(error.to_string())
    }
}
