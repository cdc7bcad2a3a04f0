use std::collections::BTreeMap;

/// Page sizes offered by the page-size selector
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
  pub id: String,
  pub desc: bool,
}

impl ColumnSort {
  pub fn asc(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      desc: false,
    }
  }

  pub fn desc(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      desc: true,
    }
  }
}

/// Sort keys in priority order; empty means natural order
pub type SortingState = Vec<ColumnSort>;

/// Column id to filter value
pub type ColumnFilters = BTreeMap<String, String>;

/// Column id to visibility; absent ids are visible
pub type VisibilityState = BTreeMap<String, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  pub page_index: usize,
  pub page_size: usize,
}

impl Default for Pagination {
  fn default() -> Self {
    Self {
      page_index: 0,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

impl Pagination {
  pub fn with_page_size(page_size: usize) -> Self {
    Self {
      page_index: 0,
      page_size,
    }
  }

  /// `ceil(row_count / page_size)`
  pub fn page_count(&self, row_count: usize) -> usize {
    row_count.div_ceil(self.page_size.max(1))
  }

  /// The requested page index, pulled back inside `0..page_count`.
  pub fn clamped_index(&self, row_count: usize) -> usize {
    self
      .page_index
      .min(self.page_count(row_count).saturating_sub(1))
  }
}

/// All view state of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
  pub sorting: SortingState,
  pub column_filters: ColumnFilters,
  pub column_visibility: VisibilityState,
  pub pagination: Pagination,
}

impl TableState {
  pub fn is_visible(&self, column_id: &str) -> bool {
    self
      .column_visibility
      .get(column_id)
      .copied()
      .unwrap_or(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_count_is_ceiling() {
    let pagination = Pagination::with_page_size(10);
    assert_eq!(pagination.page_count(0), 0);
    assert_eq!(pagination.page_count(1), 1);
    assert_eq!(pagination.page_count(10), 1);
    assert_eq!(pagination.page_count(11), 2);
    assert_eq!(pagination.page_count(45), 5);
    assert_eq!(Pagination::with_page_size(50).page_count(45), 1);
  }

  #[test]
  fn test_clamped_index() {
    let pagination = Pagination {
      page_index: 7,
      page_size: 10,
    };
    assert_eq!(pagination.clamped_index(45), 4);
    assert_eq!(pagination.clamped_index(0), 0);
  }

  #[test]
  fn test_visibility_defaults_to_visible() {
    let mut state = TableState::default();
    assert!(state.is_visible("email"));
    state.column_visibility.insert("email".to_string(), false);
    assert!(!state.is_visible("email"));
  }
}
