use super::KeyResult;
use crate::ui::renderfns::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the column picker that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPickerEvent {
  /// Flip the visibility of this column id
  Toggled(&'static str),
  Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
  pub id: &'static str,
  pub header: &'static str,
  pub visible: bool,
}

/// "Customize Columns" menu: a checklist of the hideable columns
#[derive(Debug, Clone, Default)]
pub struct ColumnPicker {
  active: bool,
  entries: Vec<ColumnEntry>,
  selected: usize,
}

impl ColumnPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn entries(&self) -> &[ColumnEntry] {
    &self.entries
  }

  pub fn show(&mut self, entries: Vec<ColumnEntry>) {
    self.active = true;
    self.entries = entries;
    self.selected = 0;
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.entries.clear();
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ColumnPickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c') => {
        self.hide();
        KeyResult::Event(ColumnPickerEvent::Closed)
      }
      KeyCode::Enter | KeyCode::Char(' ') => match self.entries.get_mut(self.selected) {
        Some(entry) => {
          entry.visible = !entry.visible;
          KeyResult::Event(ColumnPickerEvent::Toggled(entry.id))
        }
        None => KeyResult::Handled,
      },
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.entries.is_empty() {
          self.selected = (self.selected + 1) % self.entries.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.entries.is_empty() {
          let len = self.entries.len();
          self.selected = (self.selected + len - 1) % len;
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || self.entries.is_empty() {
      return;
    }

    let max_header_len = self
      .entries
      .iter()
      .map(|e| e.header.len())
      .max()
      .unwrap_or(10);
    let width = (max_header_len as u16 + 10).max(24);
    let height = self.entries.len() as u16 + 2;
    let overlay_area = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Customize Columns ");

    let items: Vec<ListItem> = self
      .entries
      .iter()
      .map(|entry| {
        let check = if entry.visible { "[x] " } else { "[ ] " };
        ListItem::new(Line::from(vec![
          Span::styled(check, Style::default().fg(Color::Yellow)),
          Span::styled(entry.header, Style::default().fg(Color::Cyan)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default().with_selected(Some(self.selected));
    frame.render_stateful_widget(list, overlay_area, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn entries() -> Vec<ColumnEntry> {
    vec![
      ColumnEntry {
        id: "email",
        header: "Email",
        visible: true,
      },
      ColumnEntry {
        id: "gender",
        header: "Gender",
        visible: true,
      },
    ]
  }

  #[test]
  fn test_toggle_selected_entry() {
    let mut picker = ColumnPicker::new();
    picker.show(entries());
    picker.handle_key(key(KeyCode::Down));
    assert_eq!(
      picker.handle_key(key(KeyCode::Char(' '))),
      KeyResult::Event(ColumnPickerEvent::Toggled("gender"))
    );
    assert!(!picker.entries()[1].visible);
    // Stays open for more toggles
    assert!(picker.is_active());
  }

  #[test]
  fn test_close() {
    let mut picker = ColumnPicker::new();
    picker.show(entries());
    assert_eq!(
      picker.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(ColumnPickerEvent::Closed)
    );
    assert!(!picker.is_active());
  }
}
