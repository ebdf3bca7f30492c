use crate::catalog::types::Product;
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Rows taken by one card, borders included
pub const CARD_HEIGHT: u16 = 8;

/// Card columns for a given width: 1 on narrow terminals, up to 3 on wide ones.
pub fn columns_for_width(width: u16) -> usize {
  match width {
    0..=79 => 1,
    80..=119 => 2,
    _ => 3,
  }
}

/// Selection and scroll position of the card grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridState {
  selected: usize,
  /// First visible row
  offset: usize,
}

impl GridState {
  pub fn selected(&self) -> usize {
    self.selected
  }

  /// Keep the selection inside a list of `len` cards
  pub fn clamp(&mut self, len: usize) {
    self.selected = self.selected.min(len.saturating_sub(1));
  }

  /// Move by `dx` cards within a row and `dy` rows.
  ///
  /// Moves that would leave the grid are ignored, except moving down from
  /// the row above a short last row, which lands on the last card.
  pub fn move_by(&mut self, dx: isize, dy: isize, len: usize, columns: usize) {
    if len == 0 || columns == 0 {
      return;
    }
    let columns = columns as isize;
    let current = self.selected as isize;
    let target = current + dx + dy * columns;

    if dx != 0 && target / columns != current / columns {
      return;
    }
    if (0..len as isize).contains(&target) {
      self.selected = target as usize;
    } else if dy > 0 && current / columns < (len as isize - 1) / columns {
      self.selected = len - 1;
    }
  }

  /// Adjust the scroll offset so the selected card's row is visible
  pub fn scroll_into_view(&mut self, columns: usize, visible_rows: usize) {
    let row = self.selected / columns.max(1);
    let visible_rows = visible_rows.max(1);
    if row < self.offset {
      self.offset = row;
    } else if row >= self.offset + visible_rows {
      self.offset = row + 1 - visible_rows;
    }
  }

  pub fn offset(&self) -> usize {
    self.offset
  }
}

/// Render `products` as a grid of cards into `area`
pub fn render_grid(frame: &mut Frame, area: Rect, products: &[Product], state: &mut GridState) {
  let columns = columns_for_width(area.width);
  let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

  state.clamp(products.len());
  state.scroll_into_view(columns, visible_rows);

  let row_areas = Layout::default()
    .direction(Direction::Vertical)
    .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
    .split(area);

  for (row_idx, row_area) in row_areas.iter().enumerate() {
    let first = (state.offset() + row_idx) * columns;
    if first >= products.len() {
      break;
    }

    let cells = Layout::default()
      .direction(Direction::Horizontal)
      .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
      .split(*row_area);

    for (col, cell) in cells.iter().enumerate() {
      let idx = first + col;
      if let Some(product) = products.get(idx) {
        render_card(frame, *cell, product, idx == state.selected());
      }
    }
  }
}

fn render_card(frame: &mut Frame, area: Rect, product: &Product, selected: bool) {
  let border = if selected {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::Blue)
  };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(border)
    .title(format!(" #{} ", product.id));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // thumbnail
      Constraint::Length(1), // title
      Constraint::Length(2), // description
      Constraint::Length(1), // price
      Constraint::Length(1), // actions
    ])
    .split(inner);

  let width = inner.width as usize;

  let thumbnail = Paragraph::new(truncate(&product.thumbnail, width))
    .style(Style::default().fg(Color::DarkGray));
  frame.render_widget(thumbnail, rows[0]);

  let title = Paragraph::new(truncate(&product.title, width))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
  frame.render_widget(title, rows[1]);

  let description = Paragraph::new(product.description.as_str()).wrap(Wrap { trim: true });
  frame.render_widget(description, rows[2]);

  let price = Paragraph::new(format!("Price: ${}", product.price))
    .style(Style::default().fg(Color::Green));
  frame.render_widget(price, rows[3]);

  let action_style = if selected {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let actions = Line::from(vec![
    Span::styled("[u]", action_style),
    Span::styled(" Update  ", Style::default().fg(Color::Yellow)),
    Span::styled("[d]", action_style),
    Span::styled(" Delete", Style::default().fg(Color::Red)),
  ]);
  frame.render_widget(Paragraph::new(actions), rows[4]);
}
