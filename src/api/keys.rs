//! Query keys for the employees collection.

use crate::cache::{CacheKey, QueryKey};

/// Query key types for employee API calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmployeeQueryKey {
  /// Everything cached about employees
  All,
  /// The full employee collection
  List,
  /// A single employee by id
  Detail { id: String },
}

impl QueryKey for EmployeeQueryKey {
  fn cache_key(&self) -> CacheKey {
    match self {
      Self::All => CacheKey::new(["employees"]),
      Self::List => CacheKey::new(["employees", "list"]),
      Self::Detail { id } => CacheKey::new(["employees", "detail", id.as_str()]),
    }
  }

  fn description(&self) -> String {
    match self {
      Self::All => "all employees".to_string(),
      Self::List => "employee list".to_string(),
      Self::Detail { id } => format!("employee {}", id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keys_nest_under_all() {
    let all = EmployeeQueryKey::All.cache_key();
    assert!(EmployeeQueryKey::List.cache_key().starts_with(&all));
    assert!(EmployeeQueryKey::Detail {
      id: "42".to_string()
    }
    .cache_key()
    .starts_with(&all));
  }

  #[test]
  fn test_detail_keys_are_independent_of_list() {
    let list = EmployeeQueryKey::List.cache_key();
    let detail = EmployeeQueryKey::Detail {
      id: "42".to_string(),
    }
    .cache_key();
    assert!(!detail.starts_with(&list));
    assert_eq!(detail.to_string(), "employees:detail:42");
  }
}
