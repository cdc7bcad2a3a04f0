use crate::mutation::{Notification, NotificationLevel};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar: view breadcrumb on the left, the latest
/// notification on the right
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  notification: Option<&Notification>,
) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == breadcrumb.len() - 1 {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  let left = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(left, area);

  if let Some(notification) = notification {
    let (icon, color) = match notification.level {
      NotificationLevel::Success => ("✓", Color::Green),
      NotificationLevel::Error => ("✗", Color::Red),
    };
    let right = Paragraph::new(Line::from(vec![
      Span::styled(format!("{} ", icon), Style::default().fg(color).bold()),
      Span::styled(notification.message.clone(), Style::default().fg(color)),
      Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, area);
  }
}
