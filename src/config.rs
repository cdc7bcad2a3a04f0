use crate::table::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public mock API the app talks to when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://69944054fade7a9ec0f4c5fe.mockapi.io/api/v1";

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "ROSTER_API_URL";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub table: TableConfig,
  pub cache: CacheConfig,
  pub logging: LoggingConfig,
  /// Custom title for the header
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_URL.to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
  /// Rows per page, one of the page-size options
  pub page_size: usize,
}

impl Default for TableConfig {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
  /// false keeps nothing: every read goes to the API
  pub enabled: bool,
  pub stale_time_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      stale_time_secs: 300,
    }
  }
}

impl CacheConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_time_secs)
  }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log directory (defaults to $XDG_DATA_HOME/roster)
  pub dir: Option<PathBuf>,
  /// Filter used when ROSTER_LOG is unset, e.g. "roster=debug"
  pub filter: Option<String>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./roster.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/roster/config.yaml
  ///
  /// No file at all means defaults. `ROSTER_API_URL` then overrides the
  /// base URL.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
      if !url.trim().is_empty() {
        config.api.base_url = url;
      }
    }

    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("roster.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("roster").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file is a valid, all-defaults config
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Replace the base URL (from the command line), re-validating it
  pub fn with_api_url(mut self, url: String) -> Result<Self> {
    self.api.base_url = url;
    self.validate()?;
    Ok(self)
  }

  pub fn validate(&self) -> Result<()> {
    let url = url::Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid api.base_url {:?}: {}", self.api.base_url, e))?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(eyre!(
        "api.base_url must use http or https, got {:?}",
        url.scheme()
      ));
    }

    if !PAGE_SIZE_OPTIONS.contains(&self.table.page_size) {
      return Err(eyre!(
        "table.page_size must be one of {:?}, got {}",
        PAGE_SIZE_OPTIONS,
        self.table.page_size
      ));
    }
    Ok(())
  }

  /// Header title
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("Employees")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_yaml_is_defaults() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.api.base_url, DEFAULT_API_URL);
    assert_eq!(config.table.page_size, 10);
    assert!(config.cache.enabled);
    assert_eq!(config.title(), "Employees");
  }

  #[test]
  fn test_partial_yaml_keeps_other_defaults() {
    let config = Config::from_yaml(
      "api:\n  base_url: http://localhost:3000/api\ntable:\n  page_size: 30\ntitle: Staff\n",
    )
    .unwrap();
    assert_eq!(config.api.base_url, "http://localhost:3000/api");
    assert_eq!(config.table.page_size, 30);
    assert_eq!(config.cache.stale_time(), Duration::from_secs(300));
    assert_eq!(config.title(), "Staff");
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_rejects_unknown_page_size() {
    let config = Config::from_yaml("table:\n  page_size: 25\n").unwrap();
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_rejects_non_http_url() {
    assert!(Config::default()
      .with_api_url("ftp://example.com".to_string())
      .is_err());
    assert!(Config::default()
      .with_api_url("not a url".to_string())
      .is_err());
    assert!(Config::default()
      .with_api_url("http://127.0.0.1:8080".to_string())
      .is_ok());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    assert!(Config::load(Some(Path::new("/definitely/not/here.yaml"))).is_err());
  }
}
