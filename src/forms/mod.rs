//! Create/update forms, their validation, and the delete confirmation.

mod create;
mod delete;
mod field;
mod schema;
mod update;

pub use create::CreateEmployeeForm;
pub use delete::{DeleteDialog, DeleteEvent};
pub use field::{render_form, FormField, FormView};
pub use schema::{field_errors, CreateEmployeeDraft, FieldErrors, UpdateEmployeeDraft};
pub use update::UpdateEmployeeForm;

/// Outcome of a key press in a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent<T> {
  /// Input validated; here is the payload to send
  Submitted(T),
  Cancelled,
}
