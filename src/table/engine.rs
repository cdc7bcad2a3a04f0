use super::column::ColumnDef;
use super::derive::{derive_view, DerivedView};
use super::state::{ColumnSort, Pagination, TableState, PAGE_SIZE_OPTIONS};
use std::marker::PhantomData;
use tracing::debug;

/// What the user asked to do with a row. The engine only reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
  Edit,
  Delete,
}

impl RowAction {
  pub const ALL: [RowAction; 2] = [RowAction::Edit, RowAction::Delete];

  pub fn label(&self) -> &'static str {
    match self {
      RowAction::Edit => "Edit",
      RowAction::Delete => "Delete",
    }
  }
}

/// Sorting, filtering, visibility and pagination state over a fixed set of
/// columns.
///
/// Operations that depend on how many rows survive filtering take that count
/// as an argument; [`TableEngine::view`] derives it and also stores back the
/// clamped page index.
#[derive(Debug, Clone)]
pub struct TableEngine<R, C> {
  columns: Vec<C>,
  state: TableState,
  _record: PhantomData<fn(&R)>,
}

impl<R, C: ColumnDef<R>> TableEngine<R, C> {
  pub fn new(columns: Vec<C>) -> Self {
    Self::with_state(columns, TableState::default())
  }

  pub fn with_state(columns: Vec<C>, state: TableState) -> Self {
    Self {
      columns,
      state,
      _record: PhantomData,
    }
  }

  pub fn state(&self) -> &TableState {
    &self.state
  }

  pub fn columns(&self) -> &[C] {
    &self.columns
  }

  pub fn column(&self, id: &str) -> Option<&C> {
    self.columns.iter().find(|col| col.id() == id)
  }

  pub fn visible_columns(&self) -> Vec<&C> {
    self
      .columns
      .iter()
      .filter(|col| self.state.is_visible(col.id()))
      .collect()
  }

  /// Columns the user may show or hide
  pub fn hideable_columns(&self) -> Vec<&C> {
    self.columns.iter().filter(|col| col.can_hide()).collect()
  }

  /// Derive the current page and keep the stored page index in range.
  pub fn view<'a>(&mut self, records: &'a [R]) -> DerivedView<'a, R> {
    let view = derive_view(
      records,
      &self.columns,
      &self.state.sorting,
      &self.state.column_filters,
      &self.state.pagination,
    );
    self.state.pagination.page_index = view.page_index;
    view
  }

  // Sorting

  /// Direction the column is currently sorted in, if any
  pub fn sort_direction(&self, column_id: &str) -> Option<bool> {
    self
      .state
      .sorting
      .iter()
      .find(|sort| sort.id == column_id)
      .map(|sort| sort.desc)
  }

  /// Cycle a column through first direction, opposite direction, unsorted.
  /// Replaces any other sort key.
  pub fn toggle_sorting(&mut self, column_id: &str) {
    let Some(col) = self.column(column_id) else {
      return;
    };
    if !col.can_sort() {
      return;
    }
    let first_desc = col.sort_desc_first();

    let next = match self.sort_direction(column_id) {
      None => Some(first_desc),
      Some(desc) if desc == first_desc => Some(!first_desc),
      Some(_) => None,
    };
    debug!(column = column_id, ?next, "Toggled sorting");

    self.state.sorting = next
      .map(|desc| {
        vec![ColumnSort {
          id: column_id.to_string(),
          desc,
        }]
      })
      .unwrap_or_default();
    self.state.pagination.page_index = 0;
  }

  pub fn set_sorting(&mut self, sorting: Vec<ColumnSort>) {
    self.state.sorting = sorting;
    self.state.pagination.page_index = 0;
  }

  pub fn clear_sorting(&mut self) {
    self.set_sorting(Vec::new());
  }

  // Filtering

  pub fn filter_value(&self, column_id: &str) -> Option<&str> {
    self
      .state
      .column_filters
      .get(column_id)
      .map(String::as_str)
  }

  /// Set a column filter; an empty value removes it.
  pub fn set_filter(&mut self, column_id: &str, value: &str) {
    if self.column(column_id).is_none() {
      return;
    }
    if value.trim().is_empty() {
      self.state.column_filters.remove(column_id);
    } else {
      self
        .state
        .column_filters
        .insert(column_id.to_string(), value.to_string());
    }
    self.state.pagination.page_index = 0;
  }

  pub fn clear_filters(&mut self) {
    self.state.column_filters.clear();
    self.state.pagination.page_index = 0;
  }

  // Visibility

  pub fn is_visible(&self, column_id: &str) -> bool {
    self.state.is_visible(column_id)
  }

  /// Flip a hideable column's visibility. Rows are unaffected.
  pub fn toggle_visibility(&mut self, column_id: &str) {
    let Some(col) = self.column(column_id) else {
      return;
    };
    if !col.can_hide() {
      return;
    }
    let visible = self.is_visible(column_id);
    self
      .state
      .column_visibility
      .insert(column_id.to_string(), !visible);
  }

  // Pagination

  pub fn pagination(&self) -> Pagination {
    self.state.pagination
  }

  pub fn page_count(&self, row_count: usize) -> usize {
    self.state.pagination.page_count(row_count)
  }

  pub fn can_previous_page(&self) -> bool {
    self.state.pagination.page_index > 0
  }

  pub fn can_next_page(&self, row_count: usize) -> bool {
    self.state.pagination.page_index + 1 < self.page_count(row_count)
  }

  pub fn first_page(&mut self) {
    self.state.pagination.page_index = 0;
  }

  pub fn previous_page(&mut self) {
    if self.can_previous_page() {
      self.state.pagination.page_index -= 1;
    }
  }

  pub fn next_page(&mut self, row_count: usize) {
    if self.can_next_page(row_count) {
      self.state.pagination.page_index += 1;
    }
  }

  pub fn last_page(&mut self, row_count: usize) {
    self.state.pagination.page_index = self.page_count(row_count).saturating_sub(1);
  }

  /// Change the page size, keeping the current top row on screen.
  /// Sizes outside the offered options are ignored.
  pub fn set_page_size(&mut self, page_size: usize, row_count: usize) {
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
      return;
    }
    let pagination = &mut self.state.pagination;
    let first_row = pagination.clamped_index(row_count) * pagination.page_size;
    pagination.page_size = page_size;
    pagination.page_index = first_row / page_size;
    pagination.page_index = pagination.clamped_index(row_count);
  }

  /// Step through the page-size options, wrapping around.
  pub fn cycle_page_size(&mut self, row_count: usize) {
    let current = self.state.pagination.page_size;
    let next = PAGE_SIZE_OPTIONS
      .iter()
      .position(|size| *size == current)
      .map(|i| PAGE_SIZE_OPTIONS[(i + 1) % PAGE_SIZE_OPTIONS.len()])
      .unwrap_or(PAGE_SIZE_OPTIONS[0]);
    self.set_page_size(next, row_count);
  }
}
