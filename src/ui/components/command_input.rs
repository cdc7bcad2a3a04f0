use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Most suggestions shown at once
const MAX_SUGGESTIONS: usize = 8;

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command submitted: a command name, or the raw input if nothing matched
  Submitted(String),
  /// Command cancelled
  Cancelled,
}

/// Command palette opened with `:`, with autocomplete
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn value(&self) -> &str {
    self.input.value()
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  fn deactivate(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(self.input.value())
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  fn step_selection(&mut self, forward: bool) {
    let count = self.suggestions().len();
    if count == 0 {
      return;
    }
    self.selected_suggestion = if forward {
      (self.selected_suggestion + 1) % count
    } else {
      (self.selected_suggestion + count - 1) % count
    };
  }

  /// Handle a key event. Handles activation too, so call it regardless of
  /// active state.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.deactivate();
        KeyResult::Event(CommandEvent::Cancelled)
      }
      KeyCode::Enter => {
        let command = match commands::resolve(self.input.value(), self.selected_suggestion) {
          Some(cmd) => cmd.name.to_string(),
          None => self.input.value().trim().to_lowercase(),
        };
        self.deactivate();
        KeyResult::Event(CommandEvent::Submitted(command))
      }
      KeyCode::Tab | KeyCode::Down => {
        self.step_selection(true);
        KeyResult::Handled
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.step_selection(false);
        KeyResult::Handled
      }
      _ => {
        if self.input.handle_key(key) == InputResult::Consumed {
          self.selected_suggestion = 0;
        }
        KeyResult::Handled
      }
    }
  }

  /// Render the palette overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();
    let shown = suggestions.len().clamp(1, MAX_SUGGESTIONS) as u16;

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let height = (3 + shown).min(area.height);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Command ");
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let [input_area, list_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)])
      .areas(inner);

    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(input_line), input_area);

    if list_area.height == 0 {
      return;
    }

    if suggestions.is_empty() {
      let hint = Paragraph::new("no matching command").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(hint, list_area);
      return;
    }

    let items: Vec<ListItem> = suggestions
      .iter()
      .take(MAX_SUGGESTIONS)
      .map(|cmd| {
        ListItem::new(Line::from(vec![
          Span::styled(
            format!("{:<12}", cmd.name),
            Style::default().fg(Color::Cyan),
          ),
          Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let mut state = ListState::default().with_selected(Some(self.selected_suggestion));
    frame.render_stateful_widget(list, list_area, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_colon_activates() {
    let mut input = CommandInput::new();
    assert_eq!(input.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(input.is_active());
  }

  #[test]
  fn test_submit_resolves_first_suggestion() {
    let mut input = CommandInput::new();
    input.activate();
    input.handle_key(key(KeyCode::Char('c')));
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("columns".to_string()))
    );
    assert!(!input.is_active());
  }

  #[test]
  fn test_tab_moves_through_suggestions() {
    let mut input = CommandInput::new();
    input.activate();
    input.handle_key(key(KeyCode::Tab));
    assert_eq!(input.selected_suggestion(), 1);
    input.handle_key(key(KeyCode::BackTab));
    input.handle_key(key(KeyCode::BackTab));
    assert_eq!(input.selected_suggestion(), 3);
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("quit".to_string()))
    );
  }

  #[test]
  fn test_unknown_input_is_passed_verbatim() {
    let mut input = CommandInput::new();
    input.activate();
    for c in "ZZZ".chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("zzz".to_string()))
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut input = CommandInput::new();
    input.activate();
    assert_eq!(
      input.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert!(!input.is_active());
  }
}
