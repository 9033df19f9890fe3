//! Emission seam toward the host runtime.
//!
//! The dispatcher never talks to listeners directly; it hands each classified
//! webhook to an [`EventSink`] together with the entity it is addressed to.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Where an inbound event is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum EmitTarget {
    /// Channel event stream (`event_callback` envelopes, legacy slash commands).
    Channel { channel_id: String },
    /// Command listener of an app, keyed by the slash command (e.g. `/deploy`).
    AppCommand {
        app_id: Option<String>,
        command: String,
    },
    /// Submit listener of a view opened with this `external_id`.
    ViewSubmission {
        app_id: Option<String>,
        external_id: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, target: &EmitTarget, payload: Value);
}

/// Sink that only logs; used when no host is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, target: &EmitTarget, payload: Value) {
        #[cfg(feature = "debug-logs")]
        info!(emit_target = ?target, payload = %payload, "Emitting Slack event");
        #[cfg(not(feature = "debug-logs"))]
        info!(
            emit_target = ?target,
            payload_bytes = payload.to_string().len(),
            "Emitting Slack event [payload masked, enable debug-logs feature to view]"
        );
    }
}

/// Sink that keeps every emission in memory, for tests and local runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(EmitTarget, Value)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<(EmitTarget, Value)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, target: &EmitTarget, payload: Value) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((target.clone(), payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        let target = EmitTarget::Channel {
            channel_id: "C1".to_string(),
        };
        sink.emit(&target, json!({"n": 1}));
        sink.emit(&target, json!({"n": 2}));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].1, json!({"n": 2}));
    }

    #[test]
    fn test_recording_sink_survives_poisoned_lock() {
        let sink = Arc::new(RecordingSink::new());
        let holder = Arc::clone(&sink);
        let _ = std::thread::spawn(move || {
            let _guard = holder.events.lock().unwrap();
            panic!("panic while holding the lock");
        })
        .join();

        sink.emit(
            &EmitTarget::Channel {
                channel_id: "C1".to_string(),
            },
            json!({}),
        );

        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_emit_target_is_tagged() {
        let target = EmitTarget::AppCommand {
            app_id: Some("A1".to_string()),
            command: "/deploy".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({"target": "app_command", "app_id": "A1", "command": "/deploy"})
        );
    }
}
