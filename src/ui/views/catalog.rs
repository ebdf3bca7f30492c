use crate::cache::QueryCache;
use crate::catalog::cache::CatalogQueryKey;
use crate::catalog::service::ProductService;
use crate::catalog::types::{DraftProduct, NewProduct, Product, ProductUpdate};
use crate::mutation::Mutation;
use crate::query::{Query, QueryState};
use crate::ui::components::{
  columns_for_width, render_grid, FormEvent, FormMode, GridState, KeyResult, ProductForm,
};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use tracing::{debug, info, warn};

const PRODUCTS: CatalogQueryKey = CatalogQueryKey::Products;

/// The product catalog: card grid, creation form and update form.
///
/// The product list lives in a `QueryCache` entry that the initial query
/// fills and that every successful mutation edits directly; nothing is
/// re-fetched after a write.
pub struct CatalogView {
  query: Query<Vec<Product>>,
  cache: QueryCache<Product>,

  create: Mutation<NewProduct, Product>,
  update: Mutation<ProductUpdate, Product>,
  delete: Mutation<u64, ()>,

  // UI state
  draft: DraftProduct,
  form: ProductForm,
  grid: GridState,
  columns: usize, // Grid columns at the last render
  status: Option<String>,
}

impl CatalogView {
  pub fn new<S: ProductService>(service: S) -> Self {
    let list_service = service.clone();
    let mut query = Query::new(move || {
      let service = list_service.clone();
      async move {
        service
          .list_products()
          .await
          .map_err(|e| format!("Failed to fetch products: {}", e))
      }
    });

    let create_service = service.clone();
    let create = Mutation::new(move |product: NewProduct| {
      let service = create_service.clone();
      async move {
        service
          .create_product(&product)
          .await
          .map_err(|e| e.to_string())
      }
    });

    let update_service = service.clone();
    let update = Mutation::new(move |update: ProductUpdate| {
      let service = update_service.clone();
      async move {
        service
          .update_product(&update)
          .await
          .map_err(|e| e.to_string())
      }
    });

    let delete = Mutation::new(move |id: u64| {
      let service = service.clone();
      async move { service.delete_product(id).await.map_err(|e| e.to_string()) }
    });

    // Start fetching immediately
    query.fetch();

    Self {
      query,
      cache: QueryCache::new(),
      create,
      update,
      delete,
      draft: DraftProduct::default(),
      form: ProductForm::new(),
      grid: GridState::default(),
      columns: 1,
      status: None,
    }
  }

  /// Cached products, once the initial load has succeeded
  pub fn products(&self) -> Option<&[Product]> {
    self.cache.get(&PRODUCTS)
  }

  pub fn draft(&self) -> &DraftProduct {
    &self.draft
  }

  pub fn form(&self) -> &ProductForm {
    &self.form
  }

  fn selected_product(&self) -> Option<&Product> {
    self.products()?.get(self.grid.selected())
  }

  fn open_create_form(&mut self) {
    self.form.open(FormMode::Create, &self.draft);
  }

  fn open_update_form(&mut self) {
    if let Some(product) = self.selected_product() {
      let mode = FormMode::Update { id: product.id };
      let values = DraftProduct::from(product);
      self.form.open(mode, &values);
    }
  }

  fn delete_selected(&mut self) {
    if let Some(id) = self.selected_product().map(|p| p.id) {
      debug!(id, "deleting product");
      self.delete.mutate(id);
    }
  }

  fn submit_form(&mut self, mode: FormMode, values: DraftProduct) {
    match mode {
      FormMode::Create => {
        self.draft = values;
        match self.draft.to_new_product() {
          Ok(product) => self.create.mutate(product),
          Err(e) => self.form.set_error(e.to_string()),
        }
      }
      FormMode::Update { id } => {
        self.form.close();
        match values.into_update(id) {
          Some(update) => self.update.mutate(update),
          None => debug!(id, "update abandoned, a field was left empty"),
        }
      }
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) -> bool {
    let Some(mode) = self.form.mode() else {
      return false;
    };

    match self.form.handle_key(key) {
      KeyResult::Event(FormEvent::Submitted(values)) => self.submit_form(mode, values),
      KeyResult::Event(FormEvent::Cancelled) => {
        if mode == FormMode::Create {
          self.draft.reset();
        }
      }
      KeyResult::Handled => {
        if mode == FormMode::Create {
          self.draft = self.form.values();
        }
      }
      KeyResult::NotHandled => return false,
    }
    true
  }

  fn on_created(&mut self, result: Result<Product, String>) {
    match result {
      Ok(product) => {
        info!(id = product.id, title = %product.title, "product created");
        self.cache.prepend(&PRODUCTS, product);
        self.grid = GridState::default();
        if self.form.mode() == Some(FormMode::Create) {
          self.form.close();
        }
        self.draft.reset();
      }
      Err(e) => {
        warn!(error = %e, "create failed");
        self.status = Some(format!("Create failed: {}", e));
      }
    }
  }

  fn on_updated(&mut self, result: Result<Product, String>) {
    match result {
      Ok(product) => {
        let id = product.id;
        let replaced = self.cache.replace(&PRODUCTS, product);
        info!(id, replaced, "product updated");
      }
      Err(e) => {
        warn!(error = %e, "update failed");
        self.status = Some(format!("Update failed: {}", e));
      }
    }
  }

  fn on_deleted(&mut self, id: u64, result: Result<(), String>) {
    match result {
      Ok(()) => {
        let removed = self.cache.remove(&PRODUCTS, &id);
        info!(id, removed, "product deleted");
        let len = self.products().map_or(0, |p| p.len());
        self.grid.clamp(len);
      }
      Err(e) => {
        warn!(id, error = %e, "delete failed");
        self.status = Some(format!("Delete failed: {}", e));
      }
    }
  }

  fn render_catalog(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(area);

    let entry = self.cache.entry(&PRODUCTS);
    let products = entry.map(|e| e.items.as_slice()).unwrap_or(&[]);
    let updated = entry
      .map(|e| e.updated_at.with_timezone(&Local).format("%H:%M:%S").to_string())
      .unwrap_or_default();

    let actions = Line::from(vec![
      Span::styled(
        " [c] Create Product ",
        Style::default().fg(Color::Black).bg(Color::Green),
      ),
      Span::styled(
        format!("  {} products, updated {}", products.len(), updated),
        Style::default().fg(Color::DarkGray),
      ),
    ]);
    frame.render_widget(Paragraph::new(actions), chunks[0]);

    self.columns = columns_for_width(chunks[1].width);
    if products.is_empty() {
      let paragraph = Paragraph::new("No products.").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, chunks[1]);
    } else {
      render_grid(frame, chunks[1], products, &mut self.grid);
    }

    self.form.render_overlay(frame, area);
  }
}

impl View for CatalogView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // An open form takes every key
    if self.handle_form_key(key) {
      return ViewAction::None;
    }

    self.status = None;

    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
      return ViewAction::Quit;
    }

    // Mutation controls only exist once the list has loaded
    let Some(len) = self.products().map(|p| p.len()) else {
      return ViewAction::None;
    };

    let columns = self.columns;
    match key.code {
      KeyCode::Char('h') | KeyCode::Left => self.grid.move_by(-1, 0, len, columns),
      KeyCode::Char('l') | KeyCode::Right => self.grid.move_by(1, 0, len, columns),
      KeyCode::Char('k') | KeyCode::Up => self.grid.move_by(0, -1, len, columns),
      KeyCode::Char('j') | KeyCode::Down => self.grid.move_by(0, 1, len, columns),
      KeyCode::Char('c') => self.open_create_form(),
      KeyCode::Char('u') => self.open_update_form(),
      KeyCode::Char('d') => self.delete_selected(),
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    match self.query.state() {
      QueryState::Idle | QueryState::Loading => {
        let paragraph = Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
      }
      QueryState::Error(error) => {
        let paragraph = Paragraph::new(format!("Error: {}", error))
          .wrap(Wrap { trim: true })
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
      }
      QueryState::Success(_) => self.render_catalog(frame, area),
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Products".to_string()
  }

  fn status(&self) -> Option<String> {
    if self.status.is_some() {
      return self.status.clone();
    }
    let pending = self.create.pending() + self.update.pending() + self.delete.pending();
    (pending > 0).then(|| format!("Saving ({} pending)...", pending))
  }

  fn tick(&mut self) {
    if self.query.poll() {
      if let Some(products) = self.query.data() {
        info!(count = products.len(), "products loaded");
        self.cache.set(&PRODUCTS, products.clone());
      } else if let Some(error) = self.query.error() {
        warn!(error, "failed to load products");
      }
    }

    for outcome in self.create.poll() {
      self.on_created(outcome.result);
    }
    for outcome in self.update.poll() {
      self.on_updated(outcome.result);
    }
    for outcome in self.delete.poll() {
      self.on_deleted(outcome.variables, outcome.result);
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.form.is_active() {
      return vec![
        ShortcutInfo::new("Tab", "next field").with_priority(10),
        ShortcutInfo::new("Enter", "submit").with_priority(20),
        ShortcutInfo::new("Esc", "cancel").with_priority(30),
      ];
    }

    let mut shortcuts = vec![ShortcutInfo::new("q", "quit").with_priority(90)];
    if self.products().is_some() {
      shortcuts.extend([
        ShortcutInfo::new("c", "create").with_priority(10),
        ShortcutInfo::new("u", "update").with_priority(20),
        ShortcutInfo::new("d", "delete").with_priority(30),
        ShortcutInfo::new("hjkl", "move").with_priority(40),
      ]);
    }
    shortcuts
  }
}
