use serde_json::{Map, Value};

use crate::errors::SlackError;
use crate::slack::command_parser::{is_form_body, parse_form};

/// Decode a webhook body that may be JSON or a URL-encoded form.
///
/// # Errors
///
/// Returns `SlackError::ParseError` if the body is neither.
pub fn parse_webhook_body(body: &str) -> Result<Value, SlackError> {
    if is_form_body(body) {
        return parse_form(body).map(Value::Object);
    }
    serde_json::from_str(body).map_err(|e| SlackError::ParseError(format!("Invalid JSON body: {e}")))
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(Value::as_str)
}

/// Non-empty string at `path`, owned.
pub fn v_string(root: &Value, path: &[&str]) -> Option<String> {
    v_str(root, path)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(Value::as_str) {
        return Some(v);
    }
    headers.as_object().and_then(|map: &Map<String, Value>| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}
