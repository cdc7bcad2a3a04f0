use crate::api::types::Employee;
use crate::ui::components::KeyResult;
use crate::ui::renderfns::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteEvent {
  /// Delete the employee with this id
  Confirmed(String),
  Cancelled,
}

/// Confirmation step before a delete
#[derive(Debug, Clone, Default)]
pub struct DeleteDialog {
  employee: Option<Employee>,
  pending: bool,
}

impl DeleteDialog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.employee.is_some()
  }

  pub fn is_pending(&self) -> bool {
    self.pending
  }

  pub fn open(&mut self, employee: Employee) {
    self.employee = Some(employee);
    self.pending = false;
  }

  pub fn close(&mut self) {
    self.employee = None;
    self.pending = false;
  }

  pub fn set_pending(&mut self, pending: bool) {
    self.pending = pending;
  }

  pub fn message(&self) -> Option<String> {
    self.employee.as_ref().map(|e| {
      format!(
        "Are you sure you want to delete {}? This action cannot be undone.",
        e.full_name()
      )
    })
  }

  pub fn confirm_label(&self) -> &'static str {
    if self.pending {
      "Deleting..."
    } else {
      "Delete"
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<DeleteEvent> {
    let Some(employee) = &self.employee else {
      return KeyResult::NotHandled;
    };
    if self.pending {
      return KeyResult::Handled;
    }

    match key.code {
      KeyCode::Enter | KeyCode::Char('y') => {
        KeyResult::Event(DeleteEvent::Confirmed(employee.id.clone()))
      }
      KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => {
        self.close();
        KeyResult::Event(DeleteEvent::Cancelled)
      }
      _ => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(message) = self.message() else {
      return;
    };

    let cancel_style = if self.pending {
      Style::default().fg(Color::DarkGray)
    } else {
      Style::default().fg(Color::White)
    };
    let lines = vec![
      Line::raw(message),
      Line::raw(""),
      Line::from(vec![
        Span::styled("[n] Cancel", cancel_style),
        Span::raw("   "),
        Span::styled(
          format!("[y] {}", self.confirm_label()),
          Style::default().fg(Color::White).bg(Color::Red),
        ),
      ]),
    ];

    let overlay_area = centered_rect(50, 7, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red))
      .title(" Delete Employee ");
    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, overlay_area);
  }
}
