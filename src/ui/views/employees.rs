use crate::api::types::{CreateEmployeeRequest, Employee};
use crate::api::{CachedEmployeeClient, EmployeeQueryKey, UpdateEmployee};
use crate::forms::{CreateEmployeeForm, DeleteDialog, DeleteEvent, FormEvent, UpdateEmployeeForm};
use crate::mutation::{Mutation, MutationEvent, Notification};
use crate::query::{Query, QueryState};
use crate::table::{
  ColumnDef, EmployeeColumn, EmployeeTable, Pagination, RowAction, TableState,
};
use crate::ui::components::{
  render_error, ColumnEntry, ColumnPicker, ColumnPickerEvent, EmployeeGrid, KeyResult, RowMenu,
  SearchEvent, SearchInput,
};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use tracing::debug;

/// The employee page: table plus the add/edit/delete flows
pub struct EmployeesView {
  client: CachedEmployeeClient,
  query: Query<Vec<Employee>>,
  table: EmployeeTable,
  grid: EmployeeGrid,
  search: SearchInput,
  /// Column the open filter input writes to
  filter_column: Option<&'static str>,
  column_picker: ColumnPicker,
  row_menu: RowMenu<Employee>,
  create_form: CreateEmployeeForm,
  update_form: UpdateEmployeeForm,
  delete_dialog: DeleteDialog,
  create: Mutation<CreateEmployeeRequest, Employee>,
  update: Mutation<UpdateEmployee, Employee>,
  delete: Mutation<String, Employee>,
  notification: Option<Notification>,
}

impl EmployeesView {
  pub fn new(client: CachedEmployeeClient, page_size: usize) -> Self {
    let mut query = client.list_query();
    query.fetch();

    let table = EmployeeTable::with_state(
      EmployeeColumn::ALL.to_vec(),
      TableState {
        pagination: Pagination::with_page_size(page_size),
        ..TableState::default()
      },
    );

    Self {
      create: client.create_mutation(),
      update: client.update_mutation(),
      delete: client.delete_mutation(),
      client,
      query,
      table,
      grid: EmployeeGrid::new(),
      search: SearchInput::new(),
      filter_column: None,
      column_picker: ColumnPicker::new(),
      row_menu: RowMenu::new(),
      create_form: CreateEmployeeForm::new(),
      update_form: UpdateEmployeeForm::new(),
      delete_dialog: DeleteDialog::new(),
      notification: None,
    }
  }

  pub fn table(&self) -> &EmployeeTable {
    &self.table
  }

  pub fn has_data(&self) -> bool {
    self.query.data().is_some()
  }

  /// Rows left after filtering, across all pages
  fn filtered_count(&mut self) -> usize {
    let records = self.query.data().map(Vec::as_slice).unwrap_or(&[]);
    self.table.view(records).filtered_count
  }

  /// Rows on the current page
  fn page_row_count(&mut self) -> usize {
    let records = self.query.data().map(Vec::as_slice).unwrap_or(&[]);
    self.table.view(records).rows.len()
  }

  fn selected_employee(&mut self) -> Option<Employee> {
    let records = self.query.data().map(Vec::as_slice).unwrap_or(&[]);
    let view = self.table.view(records);
    view.rows.get(self.grid.selected()).map(|e| (*e).clone())
  }

  fn focused_column(&self) -> Option<EmployeeColumn> {
    self
      .table
      .visible_columns()
      .get(self.grid.focused_column())
      .map(|col| **col)
  }

  fn open_create(&mut self) {
    self.create_form.open();
  }

  fn open_edit(&mut self, employee: Employee) {
    let detail = self.client.detail_query(Some(&employee.id));
    self.update_form.open(employee, detail);
  }

  fn open_column_picker(&mut self) {
    let entries = self
      .table
      .hideable_columns()
      .into_iter()
      .map(|col| ColumnEntry {
        id: col.id(),
        header: col.header(),
        visible: self.table.is_visible(col.id()),
      })
      .collect();
    self.column_picker.show(entries);
  }

  fn open_filter(&mut self) {
    let Some(col) = self.focused_column() else {
      return;
    };
    if col == EmployeeColumn::Actions {
      return;
    }
    let current = self.table.filter_value(col.id()).unwrap_or("").to_string();
    self.filter_column = Some(col.id());
    self.search.activate(col.header(), &current);
  }

  /// Go to the network even when the cached list is still fresh.
  fn reload(&mut self) {
    debug!("Reloading employees");
    self.client.cache().invalidate_queries(&EmployeeQueryKey::List);
    self.query.refetch();
  }

  fn page_key(&mut self, key: KeyEvent) -> bool {
    let count = self.filtered_count();
    match key.code {
      KeyCode::Char('n') | KeyCode::PageDown => self.table.next_page(count),
      KeyCode::Char('p') | KeyCode::PageUp => self.table.previous_page(),
      KeyCode::Char('g') | KeyCode::Home => self.table.first_page(),
      KeyCode::Char('G') | KeyCode::End => self.table.last_page(count),
      KeyCode::Char('z') => self.table.cycle_page_size(count),
      _ => return false,
    }
    self.grid.select_first();
    true
  }

  /// Route a key to whichever overlay is open. Returns false if none is.
  fn handle_overlay_key(&mut self, key: KeyEvent) -> bool {
    match self.delete_dialog.handle_key(key) {
      KeyResult::Event(DeleteEvent::Confirmed(id)) => {
        if self.delete.mutate(id) {
          self.delete_dialog.set_pending(true);
        }
        return true;
      }
      KeyResult::NotHandled => {}
      _ => return true,
    }

    match self.create_form.handle_key(key) {
      KeyResult::Event(FormEvent::Submitted(request)) => {
        if self.create.mutate(request) {
          self.create_form.set_pending(true);
        }
        return true;
      }
      KeyResult::NotHandled => {}
      _ => return true,
    }

    match self.update_form.handle_key(key) {
      KeyResult::Event(FormEvent::Submitted(vars)) => {
        if self.update.mutate(vars) {
          self.update_form.set_pending(true);
        }
        return true;
      }
      KeyResult::NotHandled => {}
      _ => return true,
    }

    match self.row_menu.handle_key(key) {
      KeyResult::Event((RowAction::Edit, employee)) => {
        self.open_edit(employee);
        return true;
      }
      KeyResult::Event((RowAction::Delete, employee)) => {
        self.delete_dialog.open(employee);
        return true;
      }
      KeyResult::NotHandled => {}
      KeyResult::Handled => return true,
    }

    match self.column_picker.handle_key(key) {
      KeyResult::Event(ColumnPickerEvent::Toggled(id)) => {
        self.table.toggle_visibility(id);
        self.grid.clamp_focus(self.table.visible_columns().len());
        return true;
      }
      KeyResult::NotHandled => {}
      _ => return true,
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(value)) => {
        if let Some(id) = self.filter_column {
          self.table.set_filter(id, &value);
          self.grid.select_first();
        }
        true
      }
      KeyResult::Event(SearchEvent::Submitted) => {
        self.filter_column = None;
        true
      }
      KeyResult::Handled => true,
      KeyResult::NotHandled => false,
    }
  }

  /// Apply the outcome of finished mutations to the dialogs
  fn poll_mutations(&mut self) {
    if let Some(event) = self.create.poll() {
      self.notification = Some(self.create.notification(&event));
      match event {
        MutationEvent::Succeeded(_) => self.create_form.close(),
        MutationEvent::Failed(_) => self.create_form.set_pending(false),
      }
    }

    if let Some(event) = self.update.poll() {
      self.notification = Some(self.update.notification(&event));
      match event {
        MutationEvent::Succeeded(_) => self.update_form.close(),
        MutationEvent::Failed(_) => self.update_form.set_pending(false),
      }
    }

    if let Some(event) = self.delete.poll() {
      self.notification = Some(self.delete.notification(&event));
      match event {
        MutationEvent::Succeeded(_) => self.delete_dialog.close(),
        MutationEvent::Failed(_) => self.delete_dialog.set_pending(false),
      }
    }
  }
}

impl View for EmployeesView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.handle_overlay_key(key) {
      return ViewAction::None;
    }
    if self.page_key(key) {
      return ViewAction::None;
    }

    let column_count = self.table.visible_columns().len();
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        let rows = self.page_row_count();
        self.grid.select_next(rows);
      }
      KeyCode::Char('k') | KeyCode::Up => self.grid.select_previous(),
      KeyCode::Char('l') | KeyCode::Right => self.grid.focus_next_column(column_count),
      KeyCode::Char('h') | KeyCode::Left => self.grid.focus_previous_column(column_count),
      KeyCode::Char('s') => {
        if let Some(col) = self.focused_column() {
          self.table.toggle_sorting(col.id());
          self.grid.select_first();
        }
      }
      KeyCode::Char('/') => self.open_filter(),
      KeyCode::Char('x') => {
        self.table.clear_filters();
        self.table.clear_sorting();
      }
      KeyCode::Char('c') => self.open_column_picker(),
      KeyCode::Char('a') => self.open_create(),
      KeyCode::Char('e') => {
        if let Some(employee) = self.selected_employee() {
          self.open_edit(employee);
        }
      }
      KeyCode::Char('d') => {
        if let Some(employee) = self.selected_employee() {
          self.delete_dialog.open(employee);
        }
      }
      KeyCode::Enter => {
        if let Some(employee) = self.selected_employee() {
          self.row_menu.open(employee);
        }
      }
      KeyCode::Char('r') => self.reload(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    match (self.query.data(), self.query.state()) {
      (Some(records), _) => {
        let view = self.table.view(records);
        self.grid.clamp_selection(view.rows.len());
        self.grid.clamp_focus(self.table.visible_columns().len());
        self.grid.render(frame, area, &self.table, &view);
      }
      (None, QueryState::Error(error)) => {
        render_error(frame, area, error.message().unwrap_or("Unknown error"));
      }
      (None, _) => self.grid.render_skeleton(frame, area, &self.table),
    }

    self.search.render_overlay(frame, area);
    self.column_picker.render_overlay(frame, area);
    self.row_menu.render_overlay(frame, area);
    self.create_form.render_overlay(frame, area);
    self.update_form.render_overlay(frame, area);
    self.delete_dialog.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Employees".to_string()
  }

  fn tick(&mut self) {
    self.query.poll();
    self.update_form.tick();
    self.poll_mutations();
  }

  fn handle_command(&mut self, command: &str) -> bool {
    match command {
      "add" => self.open_create(),
      "columns" => self.open_column_picker(),
      "employees" => self.reload(),
      _ => return false,
    }
    true
  }

  fn is_capturing_input(&self) -> bool {
    self.search.is_active()
      || self.column_picker.is_active()
      || self.row_menu.is_active()
      || self.create_form.is_active()
      || self.update_form.is_active()
      || self.delete_dialog.is_active()
  }

  fn take_notification(&mut self) -> Option<Notification> {
    self.notification.take()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("a", "add").with_priority(20),
      ShortcutInfo::new("e", "edit").with_priority(21),
      ShortcutInfo::new("d", "delete").with_priority(22),
      ShortcutInfo::new("s", "sort").with_priority(30),
      ShortcutInfo::new("/", "filter").with_priority(31),
      ShortcutInfo::new("c", "columns").with_priority(32),
      ShortcutInfo::new("n/p", "page").with_priority(40),
      ShortcutInfo::new("z", "page size").with_priority(41),
      ShortcutInfo::new("r", "reload").with_priority(50),
      ShortcutInfo::new("q", "quit").with_priority(60),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::http::HttpClient;
  use crate::api::types::Gender;
  use crate::api::{EmployeeGateway, EmployeeQueryKey};
  use crate::cache::QueryClient;
  use crossterm::event::KeyModifiers;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn employee(id: &str, first: &str) -> Employee {
    Employee {
      id: id.to_string(),
      first_name: first.to_string(),
      last_name: "Lee".to_string(),
      avatar: None,
      registration_number: id.parse().unwrap_or(1.0),
      email: format!("{}@example.com", first.to_lowercase()),
      date_of_birth: "1990-04-12".to_string(),
      gender: Gender::Female,
      job_title: "Engineer".to_string(),
      department: "IT".to_string(),
      created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
  }

  /// View over a cache seeded with `records`; the gateway points nowhere
  async fn loaded_view(records: Vec<Employee>) -> EmployeesView {
    let gateway = EmployeeGateway::new(
      HttpClient::with_client(reqwest::Client::new()),
      "http://127.0.0.1:9",
    )
    .unwrap();
    let cache = QueryClient::in_memory();
    cache
      .set_query_data(&EmployeeQueryKey::List, &records, None)
      .unwrap();
    let mut view = EmployeesView::new(CachedEmployeeClient::new(gateway, cache), 10);
    for _ in 0..100 {
      view.tick();
      if view.has_data() {
        break;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(view.has_data());
    view
  }

  #[tokio::test]
  async fn test_add_key_opens_create_form() {
    let mut view = loaded_view(vec![employee("1", "Ann")]).await;
    assert!(!view.is_capturing_input());
    view.handle_key(key(KeyCode::Char('a')));
    assert!(view.is_capturing_input());
    // Escape cancels the form, not the view
    assert_eq!(view.handle_key(key(KeyCode::Esc)), ViewAction::None);
    assert!(!view.is_capturing_input());
  }

  #[tokio::test]
  async fn test_sort_key_sorts_focused_column() {
    let mut view = loaded_view(vec![employee("2", "Bob"), employee("1", "Ann")]).await;
    view.handle_key(key(KeyCode::Char('s')));
    assert_eq!(view.table().sort_direction("name"), Some(false));
    assert_eq!(view.selected_employee().map(|e| e.id), Some("1".to_string()));
  }

  #[tokio::test]
  async fn test_filter_input_narrows_rows() {
    let mut view = loaded_view(vec![employee("1", "Ann"), employee("2", "Bob")]).await;
    view.handle_key(key(KeyCode::Char('/')));
    view.handle_key(key(KeyCode::Char('b')));
    assert_eq!(view.table().filter_value("name"), Some("b"));
    assert_eq!(view.filtered_count(), 1);
    view.handle_key(key(KeyCode::Enter));
    assert!(!view.is_capturing_input());
  }

  #[tokio::test]
  async fn test_delete_key_opens_confirmation() {
    let mut view = loaded_view(vec![employee("1", "Ann")]).await;
    view.handle_key(key(KeyCode::Char('d')));
    assert!(view.delete_dialog.is_active());
    view.handle_key(key(KeyCode::Char('n')));
    assert!(!view.delete_dialog.is_active());
  }

  #[tokio::test]
  async fn test_palette_commands() {
    let mut view = loaded_view(Vec::new()).await;
    assert!(view.handle_command("columns"));
    assert!(view.column_picker.is_active());
    assert!(!view.handle_command("bogus"));
  }

  #[tokio::test]
  async fn test_quit_key_pops() {
    let mut view = loaded_view(Vec::new()).await;
    assert_eq!(view.handle_key(key(KeyCode::Char('q'))), ViewAction::Pop);
  }
}
