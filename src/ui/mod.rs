pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let shortcuts = app.view().shortcuts();
  renderfns::draw_header(frame, chunks[0], app.title(), &shortcuts);

  app.view_mut().render(frame, chunks[1]);

  let label = app.view().breadcrumb_label();
  let status = app.view().status();
  renderfns::draw_footer(frame, chunks[2], &label, status.as_deref());
}
