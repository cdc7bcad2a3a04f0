use super::schema::FieldErrors;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::renderfns::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

#[derive(Debug, Clone)]
enum FieldInput {
  Text {
    input: TextInput,
    placeholder: &'static str,
  },
  Select {
    options: &'static [&'static str],
    selected: Option<usize>,
    placeholder: &'static str,
  },
  ReadOnly(String),
}

/// One labelled control of a form
#[derive(Debug, Clone)]
pub struct FormField {
  /// Field name as the schema reports it in errors
  pub name: &'static str,
  pub label: &'static str,
  input: FieldInput,
}

impl FormField {
  pub fn text(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
    Self {
      name,
      label,
      input: FieldInput::Text {
        input: TextInput::new(),
        placeholder,
      },
    }
  }

  pub fn select(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    placeholder: &'static str,
  ) -> Self {
    Self {
      name,
      label,
      input: FieldInput::Select {
        options,
        selected: None,
        placeholder,
      },
    }
  }

  pub fn read_only(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
    Self {
      name,
      label,
      input: FieldInput::ReadOnly(value.into()),
    }
  }

  pub fn is_editable(&self) -> bool {
    !matches!(self.input, FieldInput::ReadOnly(_))
  }

  /// Current value; an unselected select is empty
  pub fn value(&self) -> String {
    match &self.input {
      FieldInput::Text { input, .. } => input.value().to_string(),
      FieldInput::Select {
        options, selected, ..
      } => selected
        .and_then(|i| options.get(i))
        .map(|s| s.to_string())
        .unwrap_or_default(),
      FieldInput::ReadOnly(value) => value.clone(),
    }
  }

  /// Set the value. Selects ignore values that aren't one of their options.
  pub fn set_value(&mut self, value: &str) {
    match &mut self.input {
      FieldInput::Text { input, .. } => input.set_value(value),
      FieldInput::Select {
        options, selected, ..
      } => *selected = options.iter().position(|o| *o == value),
      FieldInput::ReadOnly(current) => *current = value.to_string(),
    }
  }

  pub fn reset(&mut self) {
    match &mut self.input {
      FieldInput::Text { input, .. } => input.clear(),
      FieldInput::Select { selected, .. } => *selected = None,
      FieldInput::ReadOnly(_) => {}
    }
  }

  /// Edit the field. Returns true if the value changed or the key was used.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match &mut self.input {
      FieldInput::Text { input, .. } => input.handle_key(key) == InputResult::Consumed,
      FieldInput::Select {
        options, selected, ..
      } => {
        let len = options.len();
        if len == 0 {
          return false;
        }
        match key.code {
          KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => {
            *selected = Some(selected.map(|i| (i + 1) % len).unwrap_or(0));
            true
          }
          KeyCode::Left | KeyCode::Char('h') => {
            *selected = Some(selected.map(|i| (i + len - 1) % len).unwrap_or(len - 1));
            true
          }
          _ => false,
        }
      }
      FieldInput::ReadOnly(_) => false,
    }
  }

  fn value_line(&self, focused: bool) -> Line<'static> {
    let marker = if focused {
      Span::styled("> ", Style::default().fg(Color::Yellow))
    } else {
      Span::raw("  ")
    };
    let cursor = Span::styled("_", Style::default().fg(Color::Yellow));

    match &self.input {
      FieldInput::Text { input, placeholder } => {
        if input.is_empty() && !focused {
          Line::from(vec![
            marker,
            Span::styled(*placeholder, Style::default().fg(Color::DarkGray)),
          ])
        } else if focused {
          let (before, after) = input.value().split_at(byte_offset(input));
          Line::from(vec![
            marker,
            Span::raw(before.to_string()),
            cursor,
            Span::raw(after.to_string()),
          ])
        } else {
          Line::from(vec![marker, Span::raw(input.value().to_string())])
        }
      }
      FieldInput::Select { placeholder, .. } => {
        let value = self.value();
        let shown = if value.is_empty() {
          Span::styled(*placeholder, Style::default().fg(Color::DarkGray))
        } else {
          Span::raw(value)
        };
        let arrows = Style::default().fg(if focused {
          Color::Cyan
        } else {
          Color::DarkGray
        });
        Line::from(vec![
          marker,
          Span::styled("< ", arrows),
          shown,
          Span::styled(" >", arrows),
        ])
      }
      FieldInput::ReadOnly(value) => Line::from(vec![
        marker,
        Span::styled(value.clone(), Style::default().fg(Color::Gray)),
      ]),
    }
  }
}

fn byte_offset(input: &TextInput) -> usize {
  input
    .value()
    .char_indices()
    .nth(input.cursor_position())
    .map(|(i, _)| i)
    .unwrap_or(input.value().len())
}

/// Index of the next editable field after `from`, wrapping around
pub fn next_editable(fields: &[FormField], from: usize, backwards: bool) -> usize {
  let len = fields.len();
  if len == 0 {
    return 0;
  }
  for step in 1..=len {
    let i = if backwards {
      (from + len * step - step) % len
    } else {
      (from + step) % len
    };
    if fields[i].is_editable() {
      return i;
    }
  }
  from
}

/// What a form overlay shows
pub struct FormView<'a> {
  pub title: &'a str,
  pub fields: &'a [FormField],
  pub focus: usize,
  pub errors: &'a FieldErrors,
  pub submit_label: &'a str,
  pub pending: bool,
}

/// Draw a centered form: each field's label, its value and any error beneath.
pub fn render_form(frame: &mut Frame, area: Rect, view: FormView<'_>) {
  let mut lines: Vec<Line> = Vec::new();
  for (i, field) in view.fields.iter().enumerate() {
    let focused = i == view.focus && field.is_editable() && !view.pending;
    let label_style = if focused {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };
    lines.push(Line::from(Span::styled(field.label, label_style)));
    lines.push(field.value_line(focused));
    if let Some(error) = view.errors.get(field.name) {
      lines.push(Line::from(Span::styled(
        format!("  {}", error),
        Style::default().fg(Color::Red),
      )));
    }
  }

  lines.push(Line::raw(""));
  let cancel_style = if view.pending {
    Style::default().fg(Color::DarkGray)
  } else {
    Style::default().fg(Color::White)
  };
  lines.push(Line::from(vec![
    Span::styled("[Esc] Cancel", cancel_style),
    Span::raw("   "),
    Span::styled(
      format!("[Enter] {}", view.submit_label),
      Style::default().fg(Color::Black).bg(Color::Cyan),
    ),
  ]));

  let height = lines.len() as u16 + 2;
  let overlay_area = centered_rect(56, height, area);
  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .title(format!(" {} ", view.title));

  frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  const OPTIONS: &[&str] = &["male", "female"];

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_select_cycles_options() {
    let mut field = FormField::select("gender", "Gender", OPTIONS, "Select gender");
    assert_eq!(field.value(), "");
    field.handle_key(key(KeyCode::Right));
    assert_eq!(field.value(), "male");
    field.handle_key(key(KeyCode::Right));
    assert_eq!(field.value(), "female");
    field.handle_key(key(KeyCode::Right));
    assert_eq!(field.value(), "male");
    field.handle_key(key(KeyCode::Left));
    assert_eq!(field.value(), "female");

    field.reset();
    assert_eq!(field.value(), "");
  }

  #[test]
  fn test_read_only_ignores_keys() {
    let mut field = FormField::read_only("email", "Email", "ann@example.com");
    assert!(!field.handle_key(key(KeyCode::Char('x'))));
    assert_eq!(field.value(), "ann@example.com");
  }

  #[test]
  fn test_next_editable_skips_read_only() {
    let fields = vec![
      FormField::read_only("a", "A", ""),
      FormField::text("b", "B", ""),
      FormField::read_only("c", "C", ""),
      FormField::text("d", "D", ""),
    ];
    assert_eq!(next_editable(&fields, 1, false), 3);
    assert_eq!(next_editable(&fields, 3, false), 1);
    assert_eq!(next_editable(&fields, 1, true), 3);
  }
}
