use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::catalog::types::DraftProduct;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const LABELS: [&str; 4] = ["Title", "Description", "Price", "Thumbnail URL"];
const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const PRICE: usize = 2;
const THUMBNAIL: usize = 3;

/// What the form is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Update { id: u64 },
}

/// Events emitted by the product form that the parent needs to handle
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
  /// Enter pressed; the form stays open until the parent closes it
  Submitted(DraftProduct),
  /// Escape pressed; the form has closed itself
  Cancelled,
}

/// Modal form over the four editable product fields
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
  mode: Option<FormMode>,
  fields: [TextInput; 4],
  focus: usize,
  error: Option<String>,
}

impl ProductForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.mode.is_some()
  }

  pub fn mode(&self) -> Option<FormMode> {
    self.mode
  }

  /// Show the form pre-filled with `values`, focus on the first field
  pub fn open(&mut self, mode: FormMode, values: &DraftProduct) {
    self.mode = Some(mode);
    self.fields[TITLE] = TextInput::with_value(&values.title);
    self.fields[DESCRIPTION] = TextInput::with_value(&values.description);
    self.fields[PRICE] = TextInput::with_value(&values.price);
    self.fields[THUMBNAIL] = TextInput::with_value(&values.thumbnail);
    self.focus = TITLE;
    self.error = None;
  }

  pub fn close(&mut self) {
    self.mode = None;
    self.fields.iter_mut().for_each(TextInput::clear);
    self.focus = TITLE;
    self.error = None;
  }

  /// Current field values
  pub fn values(&self) -> DraftProduct {
    DraftProduct {
      title: self.fields[TITLE].value().to_string(),
      description: self.fields[DESCRIPTION].value().to_string(),
      price: self.fields[PRICE].value().to_string(),
      thumbnail: self.fields[THUMBNAIL].value().to_string(),
    }
  }

  /// Show a validation message under the fields
  pub fn set_error(&mut self, message: String) {
    self.error = Some(message);
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Handle a key event. While open, the form swallows every key.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FormEvent> {
    if !self.is_active() {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus = (self.focus + 1) % LABELS.len();
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = (self.focus + LABELS.len() - 1) % LABELS.len();
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.fields[self.focus].handle_key(key) {
      InputResult::Submitted(_) => {
        self.error = None;
        KeyResult::Event(FormEvent::Submitted(self.values()))
      }
      InputResult::Cancelled => {
        self.close();
        KeyResult::Event(FormEvent::Cancelled)
      }
      InputResult::Consumed => {
        self.error = None;
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the form overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(mode) = self.mode else {
      return;
    };

    // Four 3-line fields, an error line, a hint line, borders
    let width = (area.width.saturating_sub(4)).clamp(30, 70);
    let height = (LABELS.len() as u16 * 3 + 4).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width.min(area.width), height);

    frame.render_widget(Clear, overlay_area);

    let title = match mode {
      FormMode::Create => " Create Product ".to_string(),
      FormMode::Update { id } => format!(" Update Product #{} ", id),
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(title);

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut constraints = vec![Constraint::Length(3); LABELS.len()];
    constraints.push(Constraint::Length(1)); // error
    constraints.push(Constraint::Length(1)); // hint
    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints(constraints)
      .split(inner);

    for (i, label) in LABELS.iter().enumerate() {
      self.render_field(frame, rows[i], label, i);
    }

    if let Some(error) = self.error() {
      let para = Paragraph::new(error).style(Style::default().fg(Color::Red));
      frame.render_widget(para, rows[LABELS.len()]);
    }

    let hint = Line::from(vec![
      Span::styled("<Tab>", Style::default().fg(Color::Cyan)),
      Span::styled(" next field  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<Enter>", Style::default().fg(Color::Cyan)),
      Span::styled(" submit  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<Esc>", Style::default().fg(Color::Cyan)),
      Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(hint), rows[LABELS.len() + 1]);
  }

  fn render_field(&self, frame: &mut Frame, area: Rect, label: &str, index: usize) {
    let focused = index == self.focus;
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(format!(" {} ", label));

    let input = &self.fields[index];
    let line = if focused {
      let (before, after) = input.split_at_cursor();
      let mut rest = after.chars();
      let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
      Line::from(vec![
        Span::raw(before),
        Span::styled(under_cursor, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(rest.as_str()),
      ])
    } else {
      Line::from(input.value())
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }
}
