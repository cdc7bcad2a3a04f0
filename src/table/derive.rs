//! Pure derivation of the visible rows from the full record set.
//!
//! The pipeline is strictly ordered: filter, then stable sort, then paginate.
//! Column visibility is not an input; it only affects which cells of the
//! derived rows get rendered.

use super::column::ColumnDef;
use super::state::{ColumnFilters, Pagination, SortingState};
use std::cmp::Ordering;

/// Rows of the current page plus the numbers the pager needs
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a, R> {
  pub rows: Vec<&'a R>,
  /// Rows left after filtering, across all pages
  pub filtered_count: usize,
  pub page_count: usize,
  /// Page actually shown, always inside `0..max(page_count, 1)`
  pub page_index: usize,
}

impl<R> DerivedView<'_, R> {
  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn can_previous_page(&self) -> bool {
    self.page_index > 0
  }

  pub fn can_next_page(&self) -> bool {
    self.page_index + 1 < self.page_count
  }

  /// Index of the first row of this page within the filtered set
  pub fn first_row_index(&self, page_size: usize) -> usize {
    self.page_index * page_size
  }

  /// Cell text for each visible column, or a single informational row
  /// spanning them all when nothing is left to show.
  pub fn body<C: ColumnDef<R>>(&self, columns: &[&C], empty_message: &str) -> TableBody {
    if self.rows.is_empty() {
      return TableBody::Empty {
        message: empty_message.to_string(),
        span: columns.len(),
      };
    }
    TableBody::Rows(
      self
        .rows
        .iter()
        .map(|row| columns.iter().map(|col| col.display(row)).collect())
        .collect(),
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
  Rows(Vec<Vec<String>>),
  Empty { message: String, span: usize },
}

/// Derive the rows of the requested page.
///
/// Filters and sort keys naming unknown or non-sortable columns are ignored.
/// A page index past the end is pulled back to the last page.
pub fn derive_view<'a, R, C: ColumnDef<R>>(
  records: &'a [R],
  columns: &[C],
  sorting: &SortingState,
  filters: &ColumnFilters,
  pagination: &Pagination,
) -> DerivedView<'a, R> {
  let mut rows: Vec<&R> = records
    .iter()
    .filter(|row| matches_filters(*row, columns, filters))
    .collect();

  if !sorting.is_empty() {
    // sort_by is stable: equal keys keep their natural order
    rows.sort_by(|a, b| compare_rows(*a, *b, columns, sorting));
  }

  let filtered_count = rows.len();
  let page_size = pagination.page_size.max(1);
  let page_count = pagination.page_count(filtered_count);
  let page_index = pagination.clamped_index(filtered_count);

  let rows = rows
    .into_iter()
    .skip(page_index * page_size)
    .take(page_size)
    .collect();

  DerivedView {
    rows,
    filtered_count,
    page_count,
    page_index,
  }
}

fn matches_filters<R, C: ColumnDef<R>>(row: &R, columns: &[C], filters: &ColumnFilters) -> bool {
  filters.iter().all(|(id, value)| {
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
      return true;
    }
    match columns.iter().find(|col| col.id() == id) {
      Some(col) => col.display(row).to_lowercase().contains(&needle),
      None => true,
    }
  })
}

fn compare_rows<R, C: ColumnDef<R>>(
  a: &R,
  b: &R,
  columns: &[C],
  sorting: &SortingState,
) -> Ordering {
  for sort in sorting {
    let Some(col) = columns.iter().find(|col| col.id() == sort.id) else {
      continue;
    };
    if !col.can_sort() {
      continue;
    }
    let ordering = match (col.sort_value(a), col.sort_value(b)) {
      (Some(x), Some(y)) => x.compare(&y),
      _ => Ordering::Equal,
    };
    let ordering = if sort.desc {
      ordering.reverse()
    } else {
      ordering
    };
    if ordering != Ordering::Equal {
      return ordering;
    }
  }
  Ordering::Equal
}
