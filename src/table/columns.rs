use super::column::{ColumnDef, SortValue};
use crate::api::types::Employee;

/// Body row shown when no employee survives filtering
pub const EMPTY_MESSAGE: &str = "No employees found.";

/// Columns of the employee table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeColumn {
  Name,
  RegistrationNumber,
  Email,
  DateOfBirth,
  Gender,
  JobTitle,
  Department,
  Actions,
}

impl EmployeeColumn {
  pub const ALL: [EmployeeColumn; 8] = [
    EmployeeColumn::Name,
    EmployeeColumn::RegistrationNumber,
    EmployeeColumn::Email,
    EmployeeColumn::DateOfBirth,
    EmployeeColumn::Gender,
    EmployeeColumn::JobTitle,
    EmployeeColumn::Department,
    EmployeeColumn::Actions,
  ];

  pub fn from_id(id: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|col| col.id() == id)
  }

  /// Relative column width for layout
  pub fn width(&self) -> u16 {
    match self {
      EmployeeColumn::Name => 24,
      EmployeeColumn::RegistrationNumber => 14,
      EmployeeColumn::Email => 28,
      EmployeeColumn::DateOfBirth => 13,
      EmployeeColumn::Gender => 8,
      EmployeeColumn::JobTitle => 22,
      EmployeeColumn::Department => 12,
      EmployeeColumn::Actions => 3,
    }
  }
}

impl ColumnDef<Employee> for EmployeeColumn {
  fn id(&self) -> &'static str {
    match self {
      EmployeeColumn::Name => "name",
      EmployeeColumn::RegistrationNumber => "registrationNumber",
      EmployeeColumn::Email => "email",
      EmployeeColumn::DateOfBirth => "dateOfBirth",
      EmployeeColumn::Gender => "gender",
      EmployeeColumn::JobTitle => "jobTitle",
      EmployeeColumn::Department => "department",
      EmployeeColumn::Actions => "actions",
    }
  }

  fn header(&self) -> &'static str {
    match self {
      EmployeeColumn::Name => "Name",
      EmployeeColumn::RegistrationNumber => "Regist. number",
      EmployeeColumn::Email => "Email",
      EmployeeColumn::DateOfBirth => "Date of Birth",
      EmployeeColumn::Gender => "Gender",
      EmployeeColumn::JobTitle => "Job Title",
      EmployeeColumn::Department => "Department",
      EmployeeColumn::Actions => "",
    }
  }

  fn display(&self, row: &Employee) -> String {
    match self {
      EmployeeColumn::Name => row.full_name(),
      EmployeeColumn::RegistrationNumber => row.registration_number.to_string(),
      EmployeeColumn::Email => row.email.clone(),
      EmployeeColumn::DateOfBirth => row.date_of_birth_display(),
      EmployeeColumn::Gender => row.gender.label().to_string(),
      EmployeeColumn::JobTitle => row.job_title.clone(),
      EmployeeColumn::Department => row.department.clone(),
      EmployeeColumn::Actions => "⋮".to_string(),
    }
  }

  fn sort_value(&self, row: &Employee) -> Option<SortValue> {
    Some(match self {
      EmployeeColumn::Name => SortValue::Text(row.full_name()),
      EmployeeColumn::RegistrationNumber => SortValue::Number(row.registration_number),
      EmployeeColumn::Email => SortValue::Text(row.email.clone()),
      EmployeeColumn::DateOfBirth => SortValue::Date(row.birth_date()),
      EmployeeColumn::Gender => SortValue::Text(row.gender.as_str().to_string()),
      EmployeeColumn::JobTitle => SortValue::Text(row.job_title.clone()),
      EmployeeColumn::Department => SortValue::Text(row.department.clone()),
      EmployeeColumn::Actions => return None,
    })
  }

  fn can_sort(&self) -> bool {
    *self != EmployeeColumn::Actions
  }

  fn can_hide(&self) -> bool {
    !matches!(self, EmployeeColumn::Name | EmployeeColumn::Actions)
  }

  fn sort_desc_first(&self) -> bool {
    *self == EmployeeColumn::RegistrationNumber
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::Gender;
  use crate::table::engine::TableEngine;
  use crate::table::TableBody;

  fn employee(id: &str, first: &str, last: &str, reg: u64) -> Employee {
    Employee {
      id: id.to_string(),
      first_name: first.to_string(),
      last_name: last.to_string(),
      avatar: None,
      registration_number: reg as f64,
      email: format!("{}@example.com", first.to_lowercase()),
      date_of_birth: "1990-04-12T00:00:00.000Z".to_string(),
      gender: Gender::Female,
      job_title: "Engineer".to_string(),
      department: "IT".to_string(),
      created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
  }

  #[test]
  fn test_headers_and_ids() {
    let headers: Vec<&str> = EmployeeColumn::ALL.iter().map(|c| c.header()).collect();
    assert_eq!(
      headers,
      vec![
        "Name",
        "Regist. number",
        "Email",
        "Date of Birth",
        "Gender",
        "Job Title",
        "Department",
        ""
      ]
    );
    assert_eq!(
      EmployeeColumn::from_id("registrationNumber"),
      Some(EmployeeColumn::RegistrationNumber)
    );
  }

  #[test]
  fn test_display_formats() {
    let ann = employee("42", "Ann", "Lee", 7);
    assert_eq!(EmployeeColumn::DateOfBirth.display(&ann), "12/04/1990");
    assert_eq!(EmployeeColumn::Gender.display(&ann), "Female");
    assert_eq!(EmployeeColumn::Name.display(&ann), "Ann Lee");
  }

  #[test]
  fn test_only_accessor_columns_hide() {
    let hideable: Vec<EmployeeColumn> = EmployeeColumn::ALL
      .into_iter()
      .filter(|c| c.can_hide())
      .collect();
    assert_eq!(hideable.len(), 6);
    assert!(!EmployeeColumn::Name.can_hide());
    assert!(!EmployeeColumn::Actions.can_sort());
  }

  #[test]
  fn test_empty_collection_renders_single_spanning_row() {
    let records: Vec<Employee> = Vec::new();
    let mut engine = TableEngine::new(EmployeeColumn::ALL.to_vec());
    let view = engine.view(&records);
    let columns = engine.visible_columns();

    match view.body(&columns, EMPTY_MESSAGE) {
      TableBody::Empty { message, span } => {
        assert_eq!(message, "No employees found.");
        assert_eq!(span, 8);
      }
      TableBody::Rows(rows) => panic!("expected empty body, got {:?}", rows),
    }
  }

  #[test]
  fn test_registration_number_sorts_descending_first() {
    let records = vec![
      employee("1", "Ann", "Lee", 3),
      employee("2", "Bob", "Ray", 9),
      employee("3", "Cid", "Orr", 5),
    ];
    let mut engine = TableEngine::new(EmployeeColumn::ALL.to_vec());
    engine.toggle_sorting("registrationNumber");
    let ids: Vec<String> = engine
      .view(&records)
      .rows
      .iter()
      .map(|e| e.id.clone())
      .collect();
    assert_eq!(ids, vec!["2", "3", "1"]);
  }
}
