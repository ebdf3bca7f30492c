//! Serde types for product service responses that are not domain types.

use serde::Deserialize;

use super::types::Product;

/// `GET /products` response. Paging fields (`total`, `skip`, `limit`) are ignored.
#[derive(Debug, Deserialize)]
pub struct ApiProductsResponse {
  pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_products_envelope() {
    let json = r#"{"products": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}],
      "total": 194, "skip": 0, "limit": 30}"#;
    let response: ApiProductsResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.products.len(), 2);
    assert_eq!(response.products[1].title, "B");
  }

  #[test]
  fn test_missing_products_is_error() {
    assert!(serde_json::from_str::<ApiProductsResponse>(r#"{"message": "nope"}"#).is_err());
  }
}
