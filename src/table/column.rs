use chrono::NaiveDate;
use std::cmp::Ordering;

/// A cell's value as seen by the sorter
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
  Number(f64),
  Text(String),
  /// Unparseable dates sort before every real date
  Date(Option<NaiveDate>),
}

impl SortValue {
  pub fn compare(&self, other: &Self) -> Ordering {
    match (self, other) {
      (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
      (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
      (Self::Date(a), Self::Date(b)) => a.cmp(b),
      _ => Ordering::Equal,
    }
  }

  pub fn is_numeric(&self) -> bool {
    matches!(self, Self::Number(_))
  }
}

/// Describes one column of a table over records of type `R`.
///
/// The engine only ever asks a column for values; it never knows what a
/// record means.
pub trait ColumnDef<R> {
  fn id(&self) -> &'static str;

  fn header(&self) -> &'static str;

  /// Text shown in the cell, also what column filters match against
  fn display(&self, row: &R) -> String;

  /// None for columns that can't be sorted
  fn sort_value(&self, row: &R) -> Option<SortValue>;

  fn can_sort(&self) -> bool {
    true
  }

  fn can_hide(&self) -> bool {
    true
  }

  /// Whether the first sort toggle sorts descending (numeric columns)
  fn sort_desc_first(&self) -> bool {
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_text_compare_ignores_case() {
    let a = SortValue::Text("alice".to_string());
    let b = SortValue::Text("Bob".to_string());
    assert_eq!(a.compare(&b), Ordering::Less);
    assert_eq!(
      SortValue::Text("ANN".to_string()).compare(&SortValue::Text("ann".to_string())),
      Ordering::Equal
    );
  }

  #[test]
  fn test_missing_dates_sort_first() {
    let date = SortValue::Date(NaiveDate::from_ymd_opt(1990, 1, 1));
    let missing = SortValue::Date(None);
    assert_eq!(missing.compare(&date), Ordering::Less);
  }
}
