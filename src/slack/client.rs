//! Slack Web API client module
//!
//! One authorized request per call, no retries. Failure handling belongs to
//! the caller; the typed layer only turns Slack's `ok:false` envelope and
//! shape mismatches into structured errors.

use reqwest::{Client, Method, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::config::{AppConfig, parse_base_url};
use crate::errors::SlackError;

/// Query parameters; entries with a `None` value are dropped before encoding.
pub type Query<'a> = [(&'a str, Option<String>)];

/// Outbound request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized by reqwest's JSON encoder.
    Json(Value),
    /// Sent unchanged.
    Text(String),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

/// Drop parameters without a value, keeping the order of the rest.
#[must_use]
pub fn defined_params<'a>(query: &'a Query<'a>) -> Vec<(&'a str, &'a str)> {
    query
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
        .collect()
}

/// Authorized client for one Slack workspace token.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: Url,
}

impl SlackClient {
    /// Client against `https://slack.com/api/` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, SlackError> {
        let config = AppConfig::default();
        Self::with_settings(token, &config.api_base_url, config.http_timeout)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, token: impl Into<String>) -> Result<Self, SlackError> {
        Self::with_settings(token, &config.api_base_url, config.http_timeout)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_settings(
        token: impl Into<String>,
        base_url: &Url,
        timeout: Duration,
    ) -> Result<Self, SlackError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SlackError::HttpError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token: token.into(),
            base_url: base_url.clone(),
        })
    }

    /// Point the client at another API root (mock servers, proxies).
    ///
    /// # Errors
    ///
    /// Returns `SlackError::ConfigError` if `base_url` is not an absolute URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, SlackError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SlackError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SlackError::HttpError(format!("Invalid Slack API path '{path}': {e}")))
    }

    /// Issue one request to `<base>/<path>` and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::HttpError` on transport failure. HTTP status codes
    /// are not inspected.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<RequestBody>,
    ) -> Result<String, SlackError> {
        let url = self.endpoint(path)?;
        debug!(method = %method, path = %path, "Calling Slack API");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/json");

        let params = defined_params(query);
        if !params.is_empty() {
            request = request.query(&params);
        }
        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Text(text)) => request.body(text),
            None => request,
        };

        let resp = request
            .send()
            .await
            .map_err(|e| SlackError::HttpError(format!("{path}: {e}")))?;

        resp.text()
            .await
            .map_err(|e| SlackError::HttpError(format!("{path}: failed to read body: {e}")))
    }

    /// Issue one request and decode the success envelope into `T`.
    ///
    /// # Errors
    ///
    /// - `SlackError::HttpError` on transport failure
    /// - `SlackError::Decode` if the response is not JSON or does not match `T`
    /// - `SlackError::Api` if Slack answered `ok:false`
    pub async fn call_api<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<RequestBody>,
    ) -> Result<T, SlackError> {
        let raw = self.call(method, path, query, body).await?;
        decode_envelope(path, &raw)
    }

    /// GET with query parameters (Slack's read methods).
    ///
    /// # Errors
    ///
    /// See [`SlackClient::call_api`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, SlackError> {
        self.call_api(Method::GET, path, query, None).await
    }

    /// POST with a JSON body (Slack's write methods).
    ///
    /// # Errors
    ///
    /// See [`SlackClient::call_api`].
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, SlackError> {
        self.call_api(Method::POST, path, &[], Some(RequestBody::Json(body)))
            .await
    }

    /// POST to an absolute URL such as an interaction `response_url`.
    ///
    /// The bearer token is not sent; Slack authorizes these URLs by themselves.
    ///
    /// # Errors
    ///
    /// Returns `SlackError::HttpError` on transport failure.
    pub async fn post_to_url(&self, url: &str, body: RequestBody) -> Result<String, SlackError> {
        let target = Url::parse(url)
            .map_err(|e| SlackError::ParseError(format!("Invalid response_url '{url}': {e}")))?;

        let request = self
            .http
            .post(target)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Text(text) => request.body(text),
        };

        let resp = request.send().await?;

        Ok(resp.text().await?)
    }
}

/// Split Slack's `{ok, error, ...}` envelope into success or `SlackError::Api`.
///
/// # Errors
///
/// See [`SlackClient::call_api`].
pub fn decode_envelope<T: DeserializeOwned>(method: &str, raw: &str) -> Result<T, SlackError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| SlackError::Decode {
        method: method.to_string(),
        message: format!("response is not JSON ({e})"),
    })?;

    if !value.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Err(SlackError::Api {
            method: method.to_string(),
            code: value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| SlackError::Decode {
        method: method.to_string(),
        message: e.to_string(),
    })
}
