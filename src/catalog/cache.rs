//! Caching implementations for catalog types.

use crate::cache::{Cacheable, QueryKey};

use super::types::Product;

impl Cacheable for Product {
  type Key = u64;

  fn cache_key(&self) -> u64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "product"
  }
}

/// Query keys for catalog data.
#[derive(Clone, Debug)]
pub enum CatalogQueryKey {
  /// The full product collection
  Products,
}

impl QueryKey for CatalogQueryKey {
  fn cache_hash(&self) -> String {
    match self {
      Self::Products => "products".to_string(),
    }
  }

  fn description(&self) -> String {
    match self {
      Self::Products => "all products".to_string(),
    }
  }
}
