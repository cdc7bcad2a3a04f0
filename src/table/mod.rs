//! Client-side record table: sorting, column filters, column visibility and
//! pagination over an in-memory record set.

mod column;
mod columns;
mod derive;
mod engine;
mod state;

pub use column::{ColumnDef, SortValue};
pub use columns::{EmployeeColumn, EMPTY_MESSAGE};
pub use derive::{derive_view, DerivedView, TableBody};
pub use engine::{RowAction, TableEngine};
pub use state::{
  ColumnFilters, ColumnSort, Pagination, SortingState, TableState, VisibilityState,
  DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS,
};

/// Table engine over the employee columns
pub type EmployeeTable = TableEngine<crate::api::types::Employee, EmployeeColumn>;
