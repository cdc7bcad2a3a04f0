use super::field::{next_editable, render_form, FormField, FormView};
use super::schema::{CreateEmployeeDraft, FieldErrors};
use super::FormEvent;
use crate::api::types::CreateEmployeeRequest;
use crate::ui::components::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

const GENDERS: &[&str] = &["male", "female"];
const DEPARTMENTS: &[&str] = &["IT", "Marketing", "Product", "Sales"];

/// "Add Employee" form
#[derive(Debug, Clone)]
pub struct CreateEmployeeForm {
  active: bool,
  fields: Vec<FormField>,
  focus: usize,
  errors: FieldErrors,
  /// Set after the first submit; from then on errors follow every edit
  submitted: bool,
  pending: bool,
}

impl Default for CreateEmployeeForm {
  fn default() -> Self {
    Self::new()
  }
}

impl CreateEmployeeForm {
  pub fn new() -> Self {
    Self {
      active: false,
      fields: vec![
        FormField::text("first_name", "First name", "John"),
        FormField::text("last_name", "Last name", "Doe"),
        FormField::text("registration_number", "Registration number", "12345"),
        FormField::text("email", "Email", "john.doe@company.com"),
        FormField::text("date_of_birth", "Date of birth", "YYYY-MM-DD"),
        FormField::select("gender", "Gender", GENDERS, "Select gender"),
        FormField::text("job_title", "Job title", "Software Engineer"),
        FormField::select("department", "Department", DEPARTMENTS, "Select department"),
      ],
      focus: 0,
      errors: FieldErrors::new(),
      submitted: false,
      pending: false,
    }
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn is_pending(&self) -> bool {
    self.pending
  }

  pub fn errors(&self) -> &FieldErrors {
    &self.errors
  }

  pub fn open(&mut self) {
    self.reset();
    self.active = true;
  }

  /// Close and discard everything typed so far
  pub fn close(&mut self) {
    self.reset();
    self.active = false;
  }

  pub fn set_pending(&mut self, pending: bool) {
    self.pending = pending;
  }

  pub fn submit_label(&self) -> &'static str {
    if self.pending {
      "Creating..."
    } else {
      "Create Employee"
    }
  }

  fn reset(&mut self) {
    self.fields.iter_mut().for_each(FormField::reset);
    self.focus = 0;
    self.errors.clear();
    self.submitted = false;
    self.pending = false;
  }

  fn field_value(&self, name: &str) -> String {
    self
      .fields
      .iter()
      .find(|f| f.name == name)
      .map(FormField::value)
      .unwrap_or_default()
  }

  /// Fill a field by schema name
  pub fn set_field(&mut self, name: &str, value: &str) {
    if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
      field.set_value(value);
    }
  }

  pub fn draft(&self) -> CreateEmployeeDraft {
    CreateEmployeeDraft {
      first_name: self.field_value("first_name"),
      last_name: self.field_value("last_name"),
      registration_number: self.field_value("registration_number"),
      email: self.field_value("email"),
      date_of_birth: self.field_value("date_of_birth"),
      gender: self.field_value("gender"),
      job_title: self.field_value("job_title"),
      department: self.field_value("department"),
    }
  }

  fn submit(&mut self) -> KeyResult<FormEvent<CreateEmployeeRequest>> {
    self.submitted = true;
    match self.draft().to_request() {
      Ok(request) => {
        self.errors.clear();
        KeyResult::Event(FormEvent::Submitted(request))
      }
      Err(errors) => {
        if let Some(i) = self
          .fields
          .iter()
          .position(|f| errors.contains_key(f.name))
        {
          self.focus = i;
        }
        self.errors = errors;
        KeyResult::Handled
      }
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent<CreateEmployeeRequest>> {
    if !self.active {
      return KeyResult::NotHandled;
    }
    // Nothing, not even cancel, while the request is in flight
    if self.pending {
      return KeyResult::Handled;
    }

    match key.code {
      KeyCode::Esc => {
        self.close();
        KeyResult::Event(FormEvent::Cancelled)
      }
      KeyCode::Enter => self.submit(),
      KeyCode::Tab | KeyCode::Down => {
        self.focus = next_editable(&self.fields, self.focus, false);
        KeyResult::Handled
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = next_editable(&self.fields, self.focus, true);
        KeyResult::Handled
      }
      _ => {
        let changed = self
          .fields
          .get_mut(self.focus)
          .map(|f| f.handle_key(key))
          .unwrap_or(false);
        if changed && self.submitted {
          self.errors = self.draft().to_request().err().unwrap_or_default();
        }
        KeyResult::Handled
      }
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }
    render_form(
      frame,
      area,
      FormView {
        title: "Add Employee",
        fields: &self.fields,
        focus: self.focus,
        errors: &self.errors,
        submit_label: self.submit_label(),
        pending: self.pending,
      },
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn fill_valid(form: &mut CreateEmployeeForm) {
    form.set_field("first_name", "Ann");
    form.set_field("last_name", "Lee");
    form.set_field("registration_number", "1024");
    form.set_field("email", "ann.lee@example.com");
    form.set_field("date_of_birth", "1990-04-12");
    form.set_field("gender", "female");
    form.set_field("job_title", "Engineer");
    form.set_field("department", "Product");
  }

  #[test]
  fn test_inactive_form_ignores_keys() {
    let mut form = CreateEmployeeForm::new();
    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }

  #[test]
  fn test_typing_goes_to_focused_field() {
    let mut form = CreateEmployeeForm::new();
    form.open();
    form.handle_key(key(KeyCode::Char('A')));
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Char('L')));
    let draft = form.draft();
    assert_eq!(draft.first_name, "A");
    assert_eq!(draft.last_name, "L");
  }

  #[test]
  fn test_invalid_submit_shows_errors_and_emits_nothing() {
    let mut form = CreateEmployeeForm::new();
    form.open();
    fill_valid(&mut form);
    form.set_field("registration_number", "-5");

    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(
      form.errors().get("registration_number").map(String::as_str),
      Some("Must be positive")
    );
    assert!(form.is_active());
  }

  #[test]
  fn test_errors_follow_edits_after_first_submit() {
    let mut form = CreateEmployeeForm::new();
    form.open();
    fill_valid(&mut form);
    form.set_field("first_name", "");
    form.handle_key(key(KeyCode::Enter));
    assert!(form.errors().contains_key("first_name"));

    // Focus moved to the failing field; typing fixes it
    form.handle_key(key(KeyCode::Char('Z')));
    assert!(form.errors().is_empty());
  }

  #[test]
  fn test_valid_submit_emits_request() {
    let mut form = CreateEmployeeForm::new();
    form.open();
    fill_valid(&mut form);
    match form.handle_key(key(KeyCode::Enter)) {
      KeyResult::Event(FormEvent::Submitted(request)) => {
        assert_eq!(request.first_name, "Ann");
        assert_eq!(request.registration_number, 1024.0);
      }
      other => panic!("expected submission, got {:?}", other),
    }
  }

  #[test]
  fn test_pending_blocks_submit_and_cancel() {
    let mut form = CreateEmployeeForm::new();
    form.open();
    fill_valid(&mut form);
    form.set_pending(true);
    assert_eq!(form.submit_label(), "Creating...");

    assert_eq!(form.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert_eq!(form.handle_key(key(KeyCode::Esc)), KeyResult::Handled);
    assert!(form.is_active());
  }

  #[test]
  fn test_cancel_discards_input() {
    let mut form = CreateEmployeeForm::new();
    form.open();
    fill_valid(&mut form);
    assert_eq!(
      form.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FormEvent::Cancelled)
    );
    assert!(!form.is_active());

    form.open();
    assert_eq!(form.draft(), CreateEmployeeDraft::default());
  }
}
