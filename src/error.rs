//! Error types shared by the HTTP wrapper, the gateway and the cache layer.

use thiserror::Error;

/// Fixed message for transport failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Check your connection.";

/// Errors that can occur while talking to the employee API.
///
/// Cloneable so that one in-flight fetch can hand the same failure to every
/// caller that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
  /// The request never reached the server, or no response came back
  #[error("{}", NETWORK_ERROR_MESSAGE)]
  Network,

  /// The server answered with a non-2xx status
  #[error("{message}")]
  Api { message: String, status: u16 },

  /// A successful response body could not be decoded
  #[error("Failed to parse response: {message}")]
  Parse { message: String },
}

impl ApiError {
  /// Build an error for a non-2xx response, synthesizing the message when the
  /// body didn't carry one.
  pub fn from_status(status: u16, message: Option<String>) -> Self {
    let message = message
      .filter(|m| !m.trim().is_empty())
      .unwrap_or_else(|| format!("Request failed ({})", status));
    ApiError::Api { message, status }
  }

  /// HTTP status, if the server answered at all.
  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Api { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Human-readable message, or None when the error carries an empty one.
  pub fn message(&self) -> Option<&str> {
    let message = match self {
      ApiError::Network => NETWORK_ERROR_MESSAGE,
      ApiError::Api { message, .. } => message.as_str(),
      ApiError::Parse { message } => message.as_str(),
    };
    if message.trim().is_empty() {
      None
    } else {
      Some(message)
    }
  }

  pub fn is_network(&self) -> bool {
    matches!(self, ApiError::Network)
  }
}

impl From<serde_json::Error> for ApiError {
  fn from(err: serde_json::Error) -> Self {
    ApiError::Parse {
      message: err.to_string(),
    }
  }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_status_uses_body_message() {
    let err = ApiError::from_status(404, Some("Not found".to_string()));
    assert_eq!(err.message(), Some("Not found"));
    assert_eq!(err.status(), Some(404));
  }

  #[test]
  fn test_from_status_synthesizes_message() {
    let err = ApiError::from_status(500, None);
    assert_eq!(err.to_string(), "Request failed (500)");

    let err = ApiError::from_status(502, Some("   ".to_string()));
    assert_eq!(err.to_string(), "Request failed (502)");
  }

  #[test]
  fn test_network_error_has_no_status() {
    let err = ApiError::Network;
    assert_eq!(err.status(), None);
    assert_eq!(err.message(), Some(NETWORK_ERROR_MESSAGE));
    assert!(err.is_network());
  }

  #[test]
  fn test_empty_parse_message_is_none() {
    let err = ApiError::Parse {
      message: String::new(),
    };
    assert_eq!(err.message(), None);
  }
}
