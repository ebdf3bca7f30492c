use color_eyre::Result;
use std::future::Future;

use super::types::{NewProduct, Product, ProductUpdate};

/// Operations offered by the remote product service.
///
/// Futures are `Send` so they can run on spawned tasks.
pub trait ProductService: Clone + Send + Sync + 'static {
  /// Fetch the full product collection
  fn list_products(&self) -> impl Future<Output = Result<Vec<Product>>> + Send;

  /// Create a product, returning the service's representation of it
  fn create_product(&self, product: &NewProduct) -> impl Future<Output = Result<Product>> + Send;

  /// Replace a product's fields, returning the updated representation
  fn update_product(&self, update: &ProductUpdate) -> impl Future<Output = Result<Product>> + Send;

  /// Delete a product. The acknowledgement body is not interpreted.
  fn delete_product(&self, id: u64) -> impl Future<Output = Result<()>> + Send;
}
