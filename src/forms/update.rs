use super::field::{render_form, FormField, FormView};
use super::schema::{FieldErrors, UpdateEmployeeDraft};
use super::FormEvent;
use crate::api::types::Employee;
use crate::api::UpdateEmployee;
use crate::query::Query;
use crate::ui::components::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

const JOB_TITLE: usize = 5;

/// "Edit Employee" form. Only the job title is editable; the rest of the
/// record is shown read-only.
pub struct UpdateEmployeeForm {
  employee: Option<Employee>,
  /// Fresh copy of the record, replacing the row's copy once it arrives
  detail: Option<Query<Employee>>,
  fields: Vec<FormField>,
  errors: FieldErrors,
  submitted: bool,
  /// Job title edited by the user since opening
  dirty: bool,
  pending: bool,
}

impl Default for UpdateEmployeeForm {
  fn default() -> Self {
    Self::new()
  }
}

impl UpdateEmployeeForm {
  pub fn new() -> Self {
    Self {
      employee: None,
      detail: None,
      fields: vec![
        FormField::read_only("first_name", "First name", ""),
        FormField::read_only("last_name", "Last name", ""),
        FormField::read_only("email", "Email", ""),
        FormField::read_only("department", "Department", ""),
        FormField::read_only("gender", "Gender", ""),
        FormField::text("job_title", "Job title", "Software Engineer"),
      ],
      errors: FieldErrors::new(),
      submitted: false,
      dirty: false,
      pending: false,
    }
  }

  pub fn is_active(&self) -> bool {
    self.employee.is_some()
  }

  pub fn is_pending(&self) -> bool {
    self.pending
  }

  pub fn employee(&self) -> Option<&Employee> {
    self.employee.as_ref()
  }

  pub fn errors(&self) -> &FieldErrors {
    &self.errors
  }

  /// Open prefilled from `employee`. `detail` refreshes the record once it
  /// has been fetched.
  pub fn open(&mut self, employee: Employee, detail: Option<Query<Employee>>) {
    self.close();
    self.fill(&employee, true);
    self.employee = Some(employee);
    self.detail = detail.map(|mut query| {
      query.fetch();
      query
    });
  }

  pub fn close(&mut self) {
    self.employee = None;
    self.detail = None;
    self.fields.iter_mut().for_each(FormField::reset);
    self.errors.clear();
    self.submitted = false;
    self.dirty = false;
    self.pending = false;
  }

  pub fn set_pending(&mut self, pending: bool) {
    self.pending = pending;
  }

  pub fn submit_label(&self) -> &'static str {
    if self.pending {
      "Saving..."
    } else {
      "Save Changes"
    }
  }

  fn fill(&mut self, employee: &Employee, with_job_title: bool) {
    self.fields[0].set_value(&employee.first_name);
    self.fields[1].set_value(&employee.last_name);
    self.fields[2].set_value(&employee.email);
    self.fields[3].set_value(&employee.department);
    self.fields[4].set_value(employee.gender.label());
    if with_job_title {
      self.fields[JOB_TITLE].set_value(&employee.job_title);
    }
  }

  /// Poll the detail query; returns true if the form changed.
  pub fn tick(&mut self) -> bool {
    let Some(detail) = self.detail.as_mut() else {
      return false;
    };
    if !detail.poll() {
      return false;
    }
    let Some(fresh) = detail.data().cloned() else {
      return false;
    };
    // Don't clobber what the user is typing
    let with_job_title = !self.dirty;
    self.fill(&fresh, with_job_title);
    self.employee = Some(fresh);
    true
  }

  pub fn draft(&self) -> UpdateEmployeeDraft {
    UpdateEmployeeDraft {
      job_title: self.fields[JOB_TITLE].value(),
    }
  }

  fn submit(&mut self) -> KeyResult<FormEvent<UpdateEmployee>> {
    self.submitted = true;
    let Some(id) = self.employee.as_ref().map(|e| e.id.clone()) else {
      return KeyResult::Handled;
    };
    match self.draft().to_request() {
      Ok(request) => {
        self.errors.clear();
        KeyResult::Event(FormEvent::Submitted(UpdateEmployee { id, request }))
      }
      Err(errors) => {
        self.errors = errors;
        KeyResult::Handled
      }
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent<UpdateEmployee>> {
    if !self.is_active() {
      return KeyResult::NotHandled;
    }
    if self.pending {
      return KeyResult::Handled;
    }

    match key.code {
      KeyCode::Esc => {
        self.close();
        KeyResult::Event(FormEvent::Cancelled)
      }
      KeyCode::Enter => self.submit(),
      _ => {
        if self.fields[JOB_TITLE].handle_key(key) {
          self.dirty = true;
          if self.submitted {
            self.errors = self.draft().to_request().err().unwrap_or_default();
          }
        }
        KeyResult::Handled
      }
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.is_active() {
      return;
    }
    let title = match &self.detail {
      Some(detail) if detail.is_loading() => "Edit Employee (loading...)",
      _ => "Edit Employee",
    };
    render_form(
      frame,
      area,
      FormView {
        title,
        fields: &self.fields,
        focus: JOB_TITLE,
        errors: &self.errors,
        submit_label: self.submit_label(),
        pending: self.pending,
      },
    );
  }
}

impl std::fmt::Debug for UpdateEmployeeForm {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("UpdateEmployeeForm")
      .field("employee", &self.employee)
      .field("errors", &self.errors)
      .field("pending", &self.pending)
      .finish_non_exhaustive()
  }
}
