use crate::api::http::{HttpClient, RequestConfig};
use crate::api::types::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use crate::error::Result;
use color_eyre::eyre::{bail, WrapErr};
use reqwest::Method;
use url::Url;

/// Typed CRUD calls for the `employees` collection.
///
/// No business logic lives here: each call only picks the method, path and
/// payload and hands off to [`HttpClient`].
#[derive(Debug, Clone)]
pub struct EmployeeGateway {
  http: HttpClient,
  base: Url,
}

impl EmployeeGateway {
  /// Fails on a base URL that isn't http(s); that's a configuration error,
  /// not an API one.
  pub fn new(http: HttpClient, base_url: &str) -> color_eyre::Result<Self> {
    let base = parse_base_url(base_url)?;
    Ok(Self { http, base })
  }

  pub fn base_url(&self) -> &str {
    self.base.as_str().trim_end_matches('/')
  }

  fn collection_url(&self) -> String {
    self.endpoint(None)
  }

  fn record_url(&self, id: &str) -> String {
    self.endpoint(Some(id))
  }

  /// `{base}/employees[/{id}]`, with the id escaped as one path segment
  fn endpoint(&self, id: Option<&str>) -> String {
    let mut url = self.base.clone();
    // Base URLs are checked to be hierarchical in `parse_base_url`
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push("employees");
      if let Some(id) = id {
        segments.push(id);
      }
    }
    url.to_string()
  }

  /// GET {base}/employees
  pub async fn list(&self) -> Result<Vec<Employee>> {
    self.http.fetch(&self.collection_url(), None).await
  }

  /// GET {base}/employees/{id}
  pub async fn get(&self, id: &str) -> Result<Employee> {
    self.http.fetch(&self.record_url(id), None).await
  }

  /// POST {base}/employees
  pub async fn create(&self, request: &CreateEmployeeRequest) -> Result<Employee> {
    let config = RequestConfig::json(Method::POST, request)?;
    self.http.fetch(&self.collection_url(), Some(config)).await
  }

  /// PATCH {base}/employees/{id} with only the job title
  pub async fn update(&self, id: &str, request: &UpdateEmployeeRequest) -> Result<Employee> {
    let config = RequestConfig::json(Method::PATCH, request)?;
    self.http.fetch(&self.record_url(id), Some(config)).await
  }

  /// DELETE {base}/employees/{id}, returning the deleted record
  pub async fn delete(&self, id: &str) -> Result<Employee> {
    let config = RequestConfig::new(Method::DELETE).with_json_content_type();
    self.http.fetch(&self.record_url(id), Some(config)).await
  }
}

/// Validate an http(s) base URL.
fn parse_base_url(base_url: &str) -> color_eyre::Result<Url> {
  let parsed = Url::parse(base_url.trim())
    .wrap_err_with(|| format!("Invalid API base URL '{}'", base_url))?;
  if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
    bail!("API base URL must use http or https: {}", base_url);
  }
  Ok(parsed)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn gateway(base: &str) -> EmployeeGateway {
    let http = HttpClient::with_client(reqwest::Client::new());
    EmployeeGateway::new(http, base).expect("valid base url")
  }

  #[test]
  fn test_paths() {
    let gw = gateway("https://api.example.com/api/v1/");
    assert_eq!(gw.base_url(), "https://api.example.com/api/v1");
    assert_eq!(
      gw.collection_url(),
      "https://api.example.com/api/v1/employees"
    );
    assert_eq!(
      gw.record_url("42"),
      "https://api.example.com/api/v1/employees/42"
    );

    let root = gateway("http://localhost:8080");
    assert_eq!(root.base_url(), "http://localhost:8080");
    assert_eq!(root.collection_url(), "http://localhost:8080/employees");
  }

  #[test]
  fn test_record_id_is_escaped() {
    let gw = gateway("https://api.example.com/api/v1");
    assert_eq!(
      gw.record_url("a/b?c#d"),
      "https://api.example.com/api/v1/employees/a%2Fb%3Fc%23d"
    );
    assert_eq!(
      gw.record_url("../x"),
      "https://api.example.com/api/v1/employees/..%2Fx"
    );
  }

  #[test]
  fn test_invalid_base_url() {
    assert!(parse_base_url("not a url").is_err());
    assert!(parse_base_url("ftp://example.com").is_err());
    assert!(parse_base_url("mailto:ann@example.com").is_err());
    assert!(parse_base_url("http://localhost:8080").is_ok());
  }
}
