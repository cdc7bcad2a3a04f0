use crate::api::types::Employee;
use crate::table::{
  ColumnDef, DerivedView, EmployeeColumn, EmployeeTable, TableBody, EMPTY_MESSAGE,
};
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{
  Block, Borders, Cell, Paragraph, Row, Table, TableState as GridState,
};

/// Placeholder rows drawn while the first fetch is in flight
pub const SKELETON_ROWS: usize = 10;

/// Cursor state of the employee grid: selected row on the current page and
/// the column that `s` and `/` act on.
#[derive(Debug, Clone, Default)]
pub struct EmployeeGrid {
  selected: usize,
  focused_column: usize,
}

impl EmployeeGrid {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn focused_column(&self) -> usize {
    self.focused_column
  }

  pub fn select_next(&mut self, row_count: usize) {
    if row_count > 0 {
      self.selected = (self.selected + 1).min(row_count - 1);
    }
  }

  pub fn select_previous(&mut self) {
    self.selected = self.selected.saturating_sub(1);
  }

  pub fn select_first(&mut self) {
    self.selected = 0;
  }

  /// Keep the selection inside the rows of the current page
  pub fn clamp_selection(&mut self, row_count: usize) {
    self.selected = self.selected.min(row_count.saturating_sub(1));
  }

  pub fn focus_next_column(&mut self, column_count: usize) {
    if column_count > 0 {
      self.focused_column = (self.focused_column + 1) % column_count;
    }
  }

  pub fn focus_previous_column(&mut self, column_count: usize) {
    if column_count > 0 {
      self.focused_column = (self.focused_column + column_count - 1) % column_count;
    }
  }

  pub fn clamp_focus(&mut self, column_count: usize) {
    self.focused_column = self.focused_column.min(column_count.saturating_sub(1));
  }

  /// Draw the table with its pager line underneath
  pub fn render(
    &self,
    frame: &mut Frame,
    area: Rect,
    table: &EmployeeTable,
    view: &DerivedView<'_, Employee>,
  ) {
    let [table_area, pager_area] =
      Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let columns = table.visible_columns();
    let block = table_block(view.filtered_count);
    let header = header_row(table, &columns, self.focused_column);
    let widths = column_widths(&columns);

    match view.body(&columns, EMPTY_MESSAGE) {
      TableBody::Empty { message, .. } => {
        let grid = Table::new(Vec::<Row>::new(), widths)
          .header(header)
          .block(block);
        frame.render_widget(grid, table_area);
        render_empty_message(frame, table_area, &message);
      }
      TableBody::Rows(cells) => {
        let rows: Vec<Row> = view
          .rows
          .iter()
          .zip(cells)
          .map(|(employee, cells)| body_row(employee, &columns, cells))
          .collect();

        let grid = Table::new(rows, widths)
          .header(header)
          .block(block)
          .row_highlight_style(
            Style::default()
              .bg(Color::DarkGray)
              .add_modifier(Modifier::BOLD),
          )
          .highlight_symbol("> ");

        let mut state = GridState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(grid, table_area, &mut state);
      }
    }

    render_pager(frame, pager_area, table, view);
  }

  /// Placeholder grid shown while the list has no data yet
  pub fn render_skeleton(&self, frame: &mut Frame, area: Rect, table: &EmployeeTable) {
    let columns = table.visible_columns();
    let header = header_row(table, &columns, self.focused_column);
    let rows: Vec<Row> = (0..SKELETON_ROWS)
      .map(|_| {
        Row::new(
          columns
            .iter()
            .map(|col| Cell::from("░".repeat(col.width().min(12) as usize))),
        )
        .style(Style::default().fg(Color::DarkGray))
      })
      .collect();

    let grid = Table::new(rows, column_widths(&columns))
      .header(header)
      .block(
        Block::default()
          .title(" Employees (loading...) ")
          .title_alignment(Alignment::Center)
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Blue)),
      );
    frame.render_widget(grid, area);
  }
}

/// Inline error shown when the list query failed
pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
  let block = Block::default()
    .title(" Employees ")
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let text = vec![
    Line::from(vec![
      Span::styled(
        "Error ",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
      ),
      Span::raw(message.to_string()),
    ]),
    Line::from(Span::styled(
      "Press 'r' to retry.",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  frame.render_widget(Paragraph::new(text).block(block), area);
}

fn table_block(count: usize) -> Block<'static> {
  Block::default()
    .title(format!(" Employees ({}) ", count))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue))
}

fn column_widths(columns: &[&EmployeeColumn]) -> Vec<Constraint> {
  columns.iter().map(|col| Constraint::Fill(col.width())).collect()
}

fn header_row(table: &EmployeeTable, columns: &[&EmployeeColumn], focused: usize) -> Row<'static> {
  let cells = columns.iter().enumerate().map(|(idx, col)| {
    let mut label = col.header().to_string();
    match table.sort_direction(col.id()) {
      Some(false) => label.push_str(" ▲"),
      Some(true) => label.push_str(" ▼"),
      None => {}
    }
    if table.filter_value(col.id()).is_some() {
      label.push_str(" *");
    }

    let mut style = Style::default()
      .fg(Color::Yellow)
      .add_modifier(Modifier::BOLD);
    if idx == focused {
      style = style.add_modifier(Modifier::REVERSED);
    }
    Cell::from(label).style(style)
  });
  Row::new(cells).bottom_margin(1)
}

fn body_row(employee: &Employee, columns: &[&EmployeeColumn], cells: Vec<String>) -> Row<'static> {
  let cells = columns.iter().zip(cells).map(|(col, text)| match col {
    EmployeeColumn::Name => {
      let badge = match employee.avatar_uri() {
        Some(_) => Span::styled("◉ ", Style::default().fg(Color::Green)),
        None => Span::styled(
          format!("{:<3}", employee.initials()),
          Style::default().fg(Color::Magenta),
        ),
      };
      Cell::from(Line::from(vec![
        badge,
        Span::styled(truncate(&text, 28), Style::default().fg(Color::Cyan)),
      ]))
    }
    EmployeeColumn::Actions => Cell::from(text).style(Style::default().fg(Color::DarkGray)),
    _ => Cell::from(truncate(&text, col.width() as usize + 8)),
  });
  Row::new(cells)
}

/// Message row drawn under the header, spanning every visible column
fn render_empty_message(frame: &mut Frame, table_area: Rect, message: &str) {
  // Border, header line and header margin
  let offset = 3;
  if table_area.height <= offset + 1 || table_area.width < 3 {
    return;
  }
  let line_area = Rect::new(
    table_area.x + 1,
    table_area.y + offset,
    table_area.width - 2,
    1,
  );
  let paragraph = Paragraph::new(message.to_string())
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
  frame.render_widget(paragraph, line_area);
}

fn render_pager(frame: &mut Frame, area: Rect, table: &EmployeeTable, view: &DerivedView<'_, Employee>) {
  let enabled = Style::default().fg(Color::Cyan);
  let disabled = Style::default().fg(Color::DarkGray);
  let nav = |label: &'static str, on: bool| Span::styled(label, if on { enabled } else { disabled });

  let line = Line::from(vec![
    Span::styled(
      format!(" {} row(s)", view.filtered_count),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw("   Rows per page "),
    Span::styled(
      table.pagination().page_size.to_string(),
      Style::default().fg(Color::Yellow),
    ),
    Span::raw("   "),
    Span::raw(format!(
      "Page {} of {}",
      view.page_index + 1,
      view.page_count.max(1)
    )),
    Span::raw("   "),
    nav("«", view.can_previous_page()),
    Span::raw(" "),
    nav("‹", view.can_previous_page()),
    Span::raw(" "),
    nav("›", view.can_next_page()),
    Span::raw(" "),
    nav("»", view.can_next_page()),
  ]);
  frame.render_widget(Paragraph::new(line), area);
}
