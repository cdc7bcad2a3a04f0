pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use renderfns::{draw_footer, draw_header};

/// Main draw function: header, current view, footer, then the command
/// palette on top of everything.
pub fn draw(frame: &mut Frame, app: &mut App) {
  let [header_area, content_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  let shortcuts = app
    .current_view_mut()
    .map(|view| view.shortcuts())
    .unwrap_or_default();
  let config = app.config();
  draw_header(
    frame,
    header_area,
    config.title(),
    &config.api.base_url,
    &shortcuts,
  );

  if let Some(view) = app.current_view_mut() {
    view.render(frame, content_area);
  }

  draw_footer(
    frame,
    footer_area,
    &app.view_breadcrumb(),
    app.notification(),
  );

  app.command_input().render_overlay(frame, content_area);
}
