use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::SlackError;

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api/";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which generator hands out `external_id`s for views opened without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewIdStrategy {
    #[default]
    Sequential,
    Uuid,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: Option<String>,
    pub slack_signing_secret: Option<String>,
    pub api_base_url: Url,
    pub http_timeout: Duration,
    pub view_ids: ViewIdStrategy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slack_bot_token: None,
            slack_signing_secret: None,
            api_base_url: default_base_url(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            view_ids: ViewIdStrategy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A missing `SLACK_BOT_TOKEN` is not an error: the driver reports itself
    /// as not ready until a token is configured.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ConfigError` when a variable is present but invalid.
    pub fn from_env() -> Result<Self, SlackError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ConfigError` when a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SlackError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = match non_empty("SLACK_API_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => default_base_url(),
        };

        let http_timeout = match non_empty("SLACK_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(SlackError::ConfigError(format!(
                        "SLACK_HTTP_TIMEOUT_SECS: expected a positive integer, got '{raw}'"
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let view_ids = match non_empty("SLACK_VIEW_IDS").as_deref().map(str::trim) {
            None | Some("sequential") => ViewIdStrategy::Sequential,
            Some("uuid") => ViewIdStrategy::Uuid,
            Some(other) => {
                return Err(SlackError::ConfigError(format!(
                    "SLACK_VIEW_IDS: expected 'sequential' or 'uuid', got '{other}'"
                )));
            }
        };

        Ok(Self {
            slack_bot_token: non_empty("SLACK_BOT_TOKEN"),
            slack_signing_secret: non_empty("SLACK_SIGNING_SECRET"),
            api_base_url,
            http_timeout,
            view_ids,
        })
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("static base url")
}

/// Parse a base URL, forcing a trailing slash so method names join under it.
///
/// # Errors
///
/// Returns `SlackError::ConfigError` if `raw` is not an absolute URL.
pub fn parse_base_url(raw: &str) -> Result<Url, SlackError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| SlackError::ConfigError(format!("SLACK_API_BASE_URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_token() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.slack_bot_token.is_none());
        assert!(config.slack_signing_secret.is_none());
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.view_ids, ViewIdStrategy::Sequential);
    }

    #[test]
    fn test_blank_token_is_treated_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[("SLACK_BOT_TOKEN", "  ")])).unwrap();
        assert!(config.slack_bot_token.is_none());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config =
            AppConfig::from_lookup(lookup(&[("SLACK_API_BASE_URL", "http://localhost:9000/api")]))
                .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:9000/api/");
        assert_eq!(
            config.api_base_url.join("auth.test").unwrap().as_str(),
            "http://localhost:9000/api/auth.test"
        );
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("SLACK_HTTP_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, SlackError::ConfigError(_)));
    }

    #[test]
    fn test_view_id_strategy() {
        let config = AppConfig::from_lookup(lookup(&[("SLACK_VIEW_IDS", "uuid")])).unwrap();
        assert_eq!(config.view_ids, ViewIdStrategy::Uuid);

        let err = AppConfig::from_lookup(lookup(&[("SLACK_VIEW_IDS", "random")])).unwrap_err();
        assert!(err.to_string().contains("SLACK_VIEW_IDS"));
    }
}
