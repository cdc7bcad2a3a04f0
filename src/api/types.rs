use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One employee record as stored by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  /// Assigned by the remote store, never by the client
  pub id: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(default)]
  pub avatar: Option<String>,
  /// Any positive number; the store doesn't require an integer
  #[serde(serialize_with = "serialize_number")]
  pub registration_number: f64,
  pub email: String,
  pub date_of_birth: String,
  pub gender: Gender,
  pub job_title: String,
  pub department: String,
  pub created_at: String,
}

impl Employee {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// Uppercase initials, shown when there's no avatar to display
  pub fn initials(&self) -> String {
    self
      .first_name
      .chars()
      .take(1)
      .chain(self.last_name.chars().take(1))
      .flat_map(char::to_uppercase)
      .collect()
  }

  /// Avatar URI, if one is set and non-empty
  pub fn avatar_uri(&self) -> Option<&str> {
    self.avatar.as_deref().filter(|a| !a.trim().is_empty())
  }

  /// Date of birth as a calendar date, if it parses
  pub fn birth_date(&self) -> Option<NaiveDate> {
    parse_date(&self.date_of_birth)
  }

  /// Date of birth formatted as DD/MM/YYYY, or the raw string if unparseable
  pub fn date_of_birth_display(&self) -> String {
    self
      .birth_date()
      .map(|d| d.format("%d/%m/%Y").to_string())
      .unwrap_or_else(|| self.date_of_birth.clone())
  }
}

/// Whole numbers go out as JSON integers, anything else as a float.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
  // Largest magnitude where every integer is exactly representable
  const EXACT: f64 = 9_007_199_254_740_992.0;
  if value.fract() == 0.0 && value.abs() < EXACT {
    serializer.serialize_i64(*value as i64)
  } else {
    serializer.serialize_f64(*value)
  }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.date_naive())
    .ok()
    .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

  pub fn as_str(&self) -> &'static str {
    match self {
      Gender::Male => "male",
      Gender::Female => "female",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Gender::Male => "Male",
      Gender::Female => "Female",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|g| g.as_str() == s)
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Departments an employee can be created in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
  #[serde(rename = "IT")]
  It,
  Marketing,
  Product,
  Sales,
}

impl Department {
  pub const ALL: [Department; 4] = [
    Department::It,
    Department::Marketing,
    Department::Product,
    Department::Sales,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Department::It => "IT",
      Department::Marketing => "Marketing",
      Department::Product => "Product",
      Department::Sales => "Sales",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|d| d.as_str() == s)
  }
}

impl fmt::Display for Department {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// POST body: the full record minus `id` and `createdAt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
  #[serde(serialize_with = "serialize_number")]
  pub registration_number: f64,
  pub email: String,
  pub date_of_birth: String,
  pub gender: Gender,
  pub job_title: String,
  pub department: Department,
}

/// PATCH body: only the job title is mutable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
  pub job_title: String,
}
