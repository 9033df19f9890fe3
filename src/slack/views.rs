//! Modal views and interaction triggers.

use serde::de::IgnoredAny;
use serde_json::{Value, json};
use tracing::info;

use super::client::{RequestBody, SlackClient};
use crate::core::ids::ViewIdGenerator;
use crate::core::models::{TriggerRef, TriggerResponse, ViewRef};
use crate::errors::SlackError;

/// Make sure `view` carries an `external_id`, drawing one from `ids` if it
/// has none, and return the id in use.
///
/// # Errors
///
/// Returns `SlackError::ParseError` if `view` is not a JSON object.
pub fn assign_external_id(view: &mut Value, ids: &dyn ViewIdGenerator) -> Result<String, SlackError> {
    let obj = view
        .as_object_mut()
        .ok_or_else(|| SlackError::ParseError("view must be a JSON object".to_string()))?;

    let existing = obj
        .get("external_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);

    let external_id = existing.unwrap_or_else(|| ids.next_id());
    obj.insert("external_id".to_string(), Value::String(external_id.clone()));
    Ok(external_id)
}

pub struct Views<'a> {
    client: &'a SlackClient,
    ids: &'a dyn ViewIdGenerator,
}

impl<'a> Views<'a> {
    /// `views.open` using the trigger's `trigger_id`.
    ///
    /// Returns a handle keyed by the view's `external_id` so a later
    /// `view_submission` can be routed back to it.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ParseError` if the trigger has no `trigger_id` or
    /// the view is not an object; otherwise the API or transport error.
    pub async fn open(&self, trigger: &TriggerRef, mut view: Value) -> Result<ViewRef, SlackError> {
        let trigger_id = trigger
            .trigger_id
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SlackError::ParseError("trigger has no trigger_id".to_string()))?;

        let external_id = assign_external_id(&mut view, self.ids)?;

        let _: IgnoredAny = self
            .client
            .post("views.open", json!({ "trigger_id": trigger_id, "view": view }))
            .await?;

        info!(external_id = %external_id, "Opened view");
        Ok(ViewRef {
            app_id: trigger.app_id.clone(),
            external_id,
        })
    }

    /// `views.update` addressed by `external_id`.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ParseError` if the view is not an object; otherwise
    /// the API or transport error.
    pub async fn update(&self, target: &ViewRef, mut view: Value) -> Result<(), SlackError> {
        let obj = view
            .as_object_mut()
            .ok_or_else(|| SlackError::ParseError("view must be a JSON object".to_string()))?;
        obj.insert(
            "external_id".to_string(),
            Value::String(target.external_id.clone()),
        );

        let _: IgnoredAny = self
            .client
            .post(
                "views.update",
                json!({ "external_id": target.external_id, "view": view }),
            )
            .await?;
        Ok(())
    }
}

pub struct Triggers<'a> {
    client: &'a SlackClient,
}

impl Triggers<'_> {
    /// Post to the trigger's `response_url`.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ParseError` if the trigger has no `response_url`,
    /// or the transport error.
    pub async fn respond(
        &self,
        trigger: &TriggerRef,
        response: TriggerResponse,
    ) -> Result<(), SlackError> {
        let url = trigger
            .response_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SlackError::ParseError("trigger has no response_url".to_string()))?;

        let body = match response {
            TriggerResponse::Json(value) => RequestBody::Json(value),
            TriggerResponse::Text(text) => RequestBody::Json(json!({ "text": text })),
        };

        self.client.post_to_url(url, body).await?;
        Ok(())
    }
}

impl SlackClient {
    #[must_use]
    pub fn views<'a>(&'a self, ids: &'a dyn ViewIdGenerator) -> Views<'a> {
        Views { client: self, ids }
    }

    #[must_use]
    pub fn triggers(&self) -> Triggers<'_> {
        Triggers { client: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialViewIds;

    #[test]
    fn test_assign_external_id_generates_when_missing() {
        let ids = SequentialViewIds::new();
        let mut first = json!({"type": "modal"});
        let mut second = json!({"type": "modal", "external_id": ""});

        assert_eq!(assign_external_id(&mut first, &ids).unwrap(), "view-1");
        assert_eq!(assign_external_id(&mut second, &ids).unwrap(), "view-2");
        assert_eq!(first["external_id"], "view-1");
    }

    #[test]
    fn test_assign_external_id_keeps_caller_id() {
        let ids = SequentialViewIds::new();
        let mut view = json!({"type": "modal", "external_id": "settings"});
        assert_eq!(assign_external_id(&mut view, &ids).unwrap(), "settings");
        assert_eq!(ids.next_id(), "view-1");
    }

    #[test]
    fn test_assign_external_id_rejects_non_object() {
        let ids = SequentialViewIds::new();
        let mut view = json!(["not", "a", "view"]);
        assert!(assign_external_id(&mut view, &ids).is_err());
    }
}
