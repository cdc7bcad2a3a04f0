//! Thin JSON request wrapper over reqwest.
//!
//! Every failure is normalized into [`ApiError`]: transport failures become
//! `Network`, non-2xx statuses become `Api` (with the body's `message` field
//! when there is one), and undecodable success bodies become `Parse`.
//! No retries, timeouts or cancellation happen at this layer.

use crate::error::{ApiError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Method, headers and body for a single request.
#[derive(Debug, Clone)]
pub struct RequestConfig {
  pub method: Method,
  pub headers: Vec<(String, String)>,
  pub body: Option<Value>,
}

impl Default for RequestConfig {
  fn default() -> Self {
    Self {
      method: Method::GET,
      headers: Vec::new(),
      body: None,
    }
  }
}

impl RequestConfig {
  pub fn new(method: Method) -> Self {
    Self {
      method,
      ..Self::default()
    }
  }

  /// A request carrying a JSON body and the matching content type.
  pub fn json(method: Method, body: &impl Serialize) -> Result<Self> {
    let body = serde_json::to_value(body)?;
    Ok(Self::new(method).with_json_content_type().with_body(body))
  }

  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  pub fn with_json_content_type(self) -> Self {
    self.with_header(CONTENT_TYPE.as_str(), "application/json")
  }

  pub fn with_body(mut self, body: Value) -> Self {
    self.body = Some(body);
    self
  }
}

/// Generic JSON-over-HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClient {
  http: reqwest::Client,
}

impl HttpClient {
  pub fn new() -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(format!("roster/{}", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| {
        warn!(error = %e, "Failed to build HTTP client");
        ApiError::Network
      })?;
    Ok(Self { http })
  }

  /// Wrap an existing reqwest client.
  pub fn with_client(http: reqwest::Client) -> Self {
    Self { http }
  }

  /// Issue a request and decode the JSON response body as `T`.
  pub async fn fetch<T: DeserializeOwned>(
    &self,
    url: &str,
    config: Option<RequestConfig>,
  ) -> Result<T> {
    let config = config.unwrap_or_default();
    debug!(method = %config.method, url, "Sending request");

    let mut request = self.http.request(config.method.clone(), url);
    for (name, value) in &config.headers {
      request = request.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &config.body {
      request = request.body(serde_json::to_vec(body)?);
    }

    let response = request.send().await.map_err(|e| {
      warn!(method = %config.method, url, error = %e, "Request failed to complete");
      ApiError::Network
    })?;

    let status = response.status();
    if !status.is_success() {
      // Reading the error body is best-effort
      let message = match response.bytes().await {
        Ok(bytes) => error_body_message(&bytes),
        Err(_) => None,
      };
      let err = ApiError::from_status(status.as_u16(), message);
      warn!(method = %config.method, url, status = status.as_u16(), error = %err, "Request rejected");
      return Err(err);
    }

    let bytes = response.bytes().await.map_err(|e| {
      warn!(url, error = %e, "Failed to read response body");
      ApiError::Network
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
      warn!(url, error = %e, "Failed to decode response body");
      ApiError::from(e)
    })
  }
}

/// Extract the `message` string field from a JSON error body.
fn error_body_message(bytes: &[u8]) -> Option<String> {
  let body: Value = serde_json::from_slice(bytes).ok()?;
  body
    .get("message")
    .and_then(Value::as_str)
    .map(String::from)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_body_message() {
    assert_eq!(
      error_body_message(br#"{"message":"Not found"}"#),
      Some("Not found".to_string())
    );
  }

  #[test]
  fn test_error_body_without_message() {
    assert_eq!(error_body_message(br#"{"error":"nope"}"#), None);
    assert_eq!(error_body_message(br#"{"message":42}"#), None);
    assert_eq!(error_body_message(br#"["message"]"#), None);
  }

  #[test]
  fn test_error_body_not_json() {
    assert_eq!(error_body_message(b"<html>Bad gateway</html>"), None);
    assert_eq!(error_body_message(b""), None);
  }

  #[test]
  fn test_json_request_config() {
    let config = RequestConfig::json(Method::PATCH, &serde_json::json!({"jobTitle": "CTO"}))
      .expect("serializable body");
    assert_eq!(config.method, Method::PATCH);
    assert_eq!(
      config.headers,
      vec![("content-type".to_string(), "application/json".to_string())]
    );
    assert_eq!(config.body, Some(serde_json::json!({"jobTitle": "CTO"})));
  }

  #[test]
  fn test_default_is_get() {
    let config = RequestConfig::default();
    assert_eq!(config.method, Method::GET);
    assert!(config.headers.is_empty());
    assert!(config.body.is_none());
  }
}
