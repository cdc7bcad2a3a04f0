//! Validation schemas for the create and update forms.
//!
//! Drafts hold the raw text the user typed. Validation runs on submit and
//! yields either the request payload or one message per failing field.

use crate::api::types::{CreateEmployeeRequest, Department, Gender, UpdateEmployeeRequest};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// Field name to the first error message for that field
pub type FieldErrors = BTreeMap<&'static str, String>;

fn error(code: &'static str, message: &'static str) -> ValidationError {
  let mut err = ValidationError::new(code);
  err.message = Some(Cow::from(message));
  err
}

/// Text input coerced to a number; blank counts as zero.
fn parse_registration_number(value: &str) -> Option<f64> {
  let value = value.trim();
  if value.is_empty() {
    return Some(0.0);
  }
  value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
  match parse_registration_number(value) {
    None => Err(error("number", "Must be a valid number")),
    Some(n) if n <= 0.0 => Err(error("positive", "Must be positive")),
    Some(_) => Ok(()),
  }
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
  match Gender::parse(value) {
    Some(_) => Ok(()),
    None => Err(error("gender", "Gender is required")),
  }
}

fn validate_department(value: &str) -> Result<(), ValidationError> {
  match Department::parse(value) {
    Some(_) => Ok(()),
    None => Err(error("department", "Department is required")),
  }
}

/// Flatten validator's errors into one message per field.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
  errors
    .field_errors()
    .into_iter()
    .filter_map(|(field, errs)| {
      let first = errs.first()?;
      let message = first
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| first.code.to_string());
      Some((field, message))
    })
    .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CreateEmployeeDraft {
  #[validate(length(min = 1, message = "First name is required"))]
  pub first_name: String,
  #[validate(length(min = 1, message = "Last name is required"))]
  pub last_name: String,
  #[validate(custom = "validate_registration_number")]
  pub registration_number: String,
  #[validate(email(message = "Invalid email address"))]
  pub email: String,
  #[validate(length(min = 1, message = "Date of birth is required"))]
  pub date_of_birth: String,
  #[validate(custom = "validate_gender")]
  pub gender: String,
  #[validate(length(min = 1, message = "Job title is required"))]
  pub job_title: String,
  #[validate(custom = "validate_department")]
  pub department: String,
}

impl CreateEmployeeDraft {
  /// Validate and build the POST payload.
  pub fn to_request(&self) -> Result<CreateEmployeeRequest, FieldErrors> {
    self.validate().map_err(|e| field_errors(&e))?;

    // Already checked by the custom validators
    let gender = Gender::parse(&self.gender);
    let department = Department::parse(&self.department);
    let registration_number = parse_registration_number(&self.registration_number);
    let (Some(gender), Some(department), Some(registration_number)) =
      (gender, department, registration_number)
    else {
      return Err(FieldErrors::new());
    };

    Ok(CreateEmployeeRequest {
      first_name: self.first_name.clone(),
      last_name: self.last_name.clone(),
      avatar: None,
      registration_number,
      email: self.email.clone(),
      date_of_birth: self.date_of_birth.clone(),
      gender,
      job_title: self.job_title.clone(),
      department,
    })
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UpdateEmployeeDraft {
  #[validate(length(min = 1, message = "Job title is required"))]
  pub job_title: String,
}

impl UpdateEmployeeDraft {
  /// Validate and build the PATCH payload.
  pub fn to_request(&self) -> Result<UpdateEmployeeRequest, FieldErrors> {
    self.validate().map_err(|e| field_errors(&e))?;
    Ok(UpdateEmployeeRequest {
      job_title: self.job_title.clone(),
    })
  }
}
