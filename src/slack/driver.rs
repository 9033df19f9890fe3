use reqwest::Method;
use serde::Deserialize;
use tracing::{info, warn};

use super::client::SlackClient;
use super::views::{Triggers, Views};
use crate::core::config::AppConfig;
use crate::core::ids::{ViewIdGenerator, generator_for};
use crate::errors::SlackError;

#[derive(Debug, Deserialize)]
struct AuthTest {
    ok: bool,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Root of the driver: holds the token-bound client and the view-id source.
pub struct SlackDriver {
    config: AppConfig,
    client: Option<SlackClient>,
    view_ids: Box<dyn ViewIdGenerator>,
}

impl SlackDriver {
    /// Build a driver; with no token in `config` it starts out not ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, SlackError> {
        let client = match config.slack_bot_token.as_deref() {
            Some(token) => Some(SlackClient::from_config(&config, token)?),
            None => None,
        };
        let view_ids = generator_for(config.view_ids);

        Ok(Self {
            config,
            client,
            view_ids,
        })
    }

    #[must_use]
    pub fn with_view_ids(mut self, view_ids: Box<dyn ViewIdGenerator>) -> Self {
        self.view_ids = view_ids;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    /// Human-readable readiness.
    #[must_use]
    pub fn status(&self) -> String {
        if self.is_ready() {
            "Ready".to_string()
        } else {
            "Not ready: no Slack API token configured".to_string()
        }
    }

    /// Validate `token` with `auth.test` and report the outcome as prose.
    ///
    /// The token is kept only when Slack accepts it. This never fails; every
    /// outcome is described in the returned string.
    pub async fn configure(&mut self, token: &str) -> String {
        let client = match SlackClient::from_config(&self.config, token) {
            Ok(c) => c,
            Err(e) => return format!("Failed to configure: {e}"),
        };

        let raw = match client.call(Method::GET, "auth.test", &[], None).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("auth.test request failed: {}", e);
                return format!("Failed to parse slack response: {e}");
            }
        };

        let Ok(auth) = serde_json::from_str::<AuthTest>(&raw) else {
            warn!("auth.test returned an unparsable body");
            return format!("Failed to parse slack response: {raw}");
        };

        if !auth.ok {
            return format!(
                "Failed to configure: {}",
                auth.error.as_deref().unwrap_or("unknown")
            );
        }

        let status = format!(
            "Configured for user \"{}\" ({}) on team \"{}\" ({})",
            auth.user.as_deref().unwrap_or_default(),
            auth.user_id.as_deref().unwrap_or_default(),
            auth.team.as_deref().unwrap_or_default(),
            auth.team_id.as_deref().unwrap_or_default(),
        );
        info!("{}", status);

        self.config.slack_bot_token = Some(token.to_string());
        self.client = Some(client);
        status
    }

    /// The configured client.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::NotConfigured` until a token is set.
    pub fn client(&self) -> Result<&SlackClient, SlackError> {
        self.client.as_ref().ok_or(SlackError::NotConfigured)
    }

    /// View operations drawing ids from this driver's generator.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::NotConfigured` until a token is set.
    pub fn views(&self) -> Result<Views<'_>, SlackError> {
        Ok(self.client()?.views(self.view_ids.as_ref()))
    }

    /// # Errors
    ///
    /// Returns `SlackError::NotConfigured` until a token is set.
    pub fn triggers(&self) -> Result<Triggers<'_>, SlackError> {
        Ok(self.client()?.triggers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_without_token_is_not_ready() {
        let driver = SlackDriver::new(AppConfig::default()).unwrap();
        assert!(!driver.is_ready());
        assert!(driver.status().starts_with("Not ready"));
        assert!(matches!(driver.client(), Err(SlackError::NotConfigured)));
        assert!(driver.views().is_err());
    }

    #[test]
    fn test_driver_with_token_is_ready() {
        let config = AppConfig {
            slack_bot_token: Some("xoxb-test".to_string()),
            ..AppConfig::default()
        };
        let driver = SlackDriver::new(config).unwrap();
        assert!(driver.is_ready());
        assert_eq!(driver.status(), "Ready");
    }
}
