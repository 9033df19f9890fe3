//! Handler for the legacy form-encoded slash command endpoint.

use serde_json::json;
use tracing::{info, warn};

use super::helpers::{WebhookResponse, ok_text};
use crate::core::events::{EmitTarget, EventSink};
use crate::errors::SlackError;
use crate::slack::command_parser::parse_form_data;

/// Acknowledgement Slack shows to the user who ran the command.
pub const PROCESSING_ACK: &str = "Processing...";

/// Forward `{text, url}` to the invoking channel and acknowledge at once.
///
/// # Errors
///
/// Returns an error if the form body cannot be decoded.
pub fn handle_slash_command(sink: &dyn EventSink, body: &str) -> Result<WebhookResponse, SlackError> {
    let command = parse_form_data(body)?;

    if command.channel_id.is_empty() {
        warn!("Slash command without channel_id; nothing to emit");
    } else {
        info!(channel_id = %command.channel_id, command = %command.command, "Forwarding slash command");
        sink.emit(
            &EmitTarget::Channel {
                channel_id: command.channel_id.clone(),
            },
            json!({ "text": command.text, "url": command.response_url }),
        );
    }

    Ok(ok_text(PROCESSING_ACK))
}
