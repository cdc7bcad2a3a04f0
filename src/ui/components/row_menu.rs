use super::KeyResult;
use crate::table::RowAction;
use crate::ui::renderfns::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Per-row action menu (Edit / Delete). Reports the chosen action together
/// with the row it was opened for.
#[derive(Debug, Clone)]
pub struct RowMenu<T> {
  target: Option<T>,
  selected: usize,
}

impl<T> Default for RowMenu<T> {
  fn default() -> Self {
    Self {
      target: None,
      selected: 0,
    }
  }
}

impl<T> RowMenu<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.target.is_some()
  }

  pub fn open(&mut self, target: T) {
    self.target = Some(target);
    self.selected = 0;
  }

  pub fn close(&mut self) {
    self.target = None;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<(RowAction, T)> {
    if self.target.is_none() {
      return KeyResult::NotHandled;
    }
    let len = RowAction::ALL.len();

    let action = match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.close();
        return KeyResult::Handled;
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.selected = (self.selected + 1) % len;
        return KeyResult::Handled;
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.selected = (self.selected + len - 1) % len;
        return KeyResult::Handled;
      }
      KeyCode::Enter => RowAction::ALL[self.selected],
      KeyCode::Char('e') => RowAction::Edit,
      KeyCode::Char('d') => RowAction::Delete,
      _ => return KeyResult::Handled,
    };

    match self.target.take() {
      Some(target) => KeyResult::Event((action, target)),
      None => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if self.target.is_none() {
      return;
    }

    let overlay_area = centered_rect(20, RowAction::ALL.len() as u16 + 2, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Actions ");

    let items: Vec<ListItem> = RowAction::ALL
      .iter()
      .map(|action| {
        let color = match action {
          RowAction::Edit => Color::Cyan,
          RowAction::Delete => Color::Red,
        };
        ListItem::new(Span::styled(action.label(), Style::default().fg(color)))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
      .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(self.selected));
    frame.render_stateful_widget(list, overlay_area, &mut state);
  }
}
