//! Decoding of `application/x-www-form-urlencoded` bodies Slack sends for
//! slash commands and interactive payloads.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SlackError;

/// Fields Slack sends when a user invokes a slash command.
///
/// Every field defaults to empty; Slack omits some of them depending on the
/// surface the command was run from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlackCommandEvent {
    pub api_app_id: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

/// Percent-decode one form component, treating `+` as a space.
///
/// # Examples
///
/// ```
/// use slack_driver::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
/// assert_eq!(decode_url_component("a%2Bb").unwrap(), "a+b");
/// ```
///
/// # Errors
///
/// Returns `SlackError::ParseError` if the decoded bytes are not UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, SlackError> {
    // `+` must become a space before decoding so an encoded `%2B` survives.
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| SlackError::ParseError(format!("Failed to decode URL component: {e}")))
}

/// Decode a form body into a JSON object of string values.
///
/// Pairs without `=` are ignored; a repeated key keeps its last value.
///
/// # Errors
///
/// Returns `SlackError::ParseError` if a key or value is not valid UTF-8.
pub fn parse_form(body: &str) -> Result<Map<String, Value>, SlackError> {
    let mut fields = Map::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let Some((raw_key, raw_value)) = pair.split_once('=') else {
            continue;
        };
        let key = decode_url_component(raw_key)?;
        let value = decode_url_component(raw_value)?;
        fields.insert(key, Value::String(value));
    }
    Ok(fields)
}

/// Parse a slash-command form body.
///
/// # Errors
///
/// Returns `SlackError::ParseError` if the body cannot be decoded.
pub fn parse_form_data(body: &str) -> Result<SlackCommandEvent, SlackError> {
    let fields = parse_form(body)?;
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| SlackError::ParseError(format!("Invalid slash command form: {e}")))
}

/// True when the body looks like a URL-encoded form rather than JSON.
#[must_use]
pub fn is_form_body(body: &str) -> bool {
    let trimmed = body.trim_start();
    !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('[') && trimmed.contains('=')
}
