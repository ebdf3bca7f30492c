//! In-memory `ProductService` for view tests.

use color_eyre::{eyre::eyre, Result};
use std::sync::{Arc, Mutex};

use super::service::ProductService;
use super::types::{NewProduct, Price, Product, ProductUpdate};

/// A request the fake received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  List,
  Create(NewProduct),
  Update(ProductUpdate),
  Delete(u64),
}

#[derive(Default)]
struct FakeState {
  products: Vec<Product>,
  list_error: Option<String>,
  mutation_error: Option<String>,
  next_id: u64,
  calls: Vec<Call>,
}

/// Serves a fixed product list and echoes mutations back, like the demo service.
#[derive(Clone, Default)]
pub struct FakeService {
  state: Arc<Mutex<FakeState>>,
}

impl FakeService {
  pub fn with_products(products: Vec<Product>) -> Self {
    let fake = Self::default();
    {
      let mut state = fake.state.lock().unwrap();
      state.next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
      state.products = products;
    }
    fake
  }

  pub fn failing_list(message: &str) -> Self {
    let fake = Self::default();
    fake.state.lock().unwrap().list_error = Some(message.to_string());
    fake
  }

  pub fn fail_mutations(&self, message: &str) {
    self.state.lock().unwrap().mutation_error = Some(message.to_string());
  }

  pub fn calls(&self) -> Vec<Call> {
    self.state.lock().unwrap().calls.clone()
  }

  fn record(&self, call: Call) -> Result<()> {
    let mut state = self.state.lock().unwrap();
    state.calls.push(call);
    match &state.mutation_error {
      Some(message) => Err(eyre!("{}", message)),
      None => Ok(()),
    }
  }
}

pub fn product(id: u64, title: &str) -> Product {
  Product {
    id,
    title: title.to_string(),
    description: format!("{} description", title),
    price: Price::Number(id as f64 * 10.0),
    thumbnail: format!("https://cdn.example.com/{}.png", id),
  }
}

impl ProductService for FakeService {
  async fn list_products(&self) -> Result<Vec<Product>> {
    let mut state = self.state.lock().unwrap();
    state.calls.push(Call::List);
    match &state.list_error {
      Some(message) => Err(eyre!("{}", message)),
      None => Ok(state.products.clone()),
    }
  }

  async fn create_product(&self, product: &NewProduct) -> Result<Product> {
    self.record(Call::Create(product.clone()))?;
    let id = self.state.lock().unwrap().next_id;
    Ok(Product {
      id,
      title: product.title.clone(),
      description: product.description.clone(),
      price: Price::Number(product.price),
      thumbnail: product.thumbnail.clone(),
    })
  }

  async fn update_product(&self, update: &ProductUpdate) -> Result<Product> {
    self.record(Call::Update(update.clone()))?;
    Ok(Product {
      id: update.id,
      title: update.title.clone(),
      description: update.description.clone(),
      price: Price::Text(update.price.clone()),
      thumbnail: update.thumbnail.clone(),
    })
  }

  async fn delete_product(&self, id: u64) -> Result<()> {
    self.record(Call::Delete(id))
  }
}
