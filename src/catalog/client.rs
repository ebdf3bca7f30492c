use crate::catalog::api_types::ApiProductsResponse;
use crate::catalog::service::ProductService;
use crate::catalog::types::{NewProduct, Product, ProductUpdate};
use crate::config::ApiConfig;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;
use url::Url;

const JSON: &str = "application/json";

/// HTTP client for the product service
#[derive(Clone)]
pub struct ProductClient {
  http: reqwest::Client,
  base: Url,
}

impl ProductClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let base =
      Url::parse(&config.url).map_err(|e| eyre!("Invalid API URL {}: {}", config.url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("API URL cannot be used as a base: {}", config.url));
    }

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("prodcat/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base })
  }

  /// Append path segments to the base URL, keeping any base path.
  fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|_| eyre!("API URL cannot be used as a base: {}", self.base))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  fn product_endpoint(&self, id: u64) -> Result<Url> {
    let id = id.to_string();
    self.endpoint(&["products", &id])
  }
}

impl ProductService for ProductClient {
  /// `GET /products`. Non-success statuses are errors.
  async fn list_products(&self) -> Result<Vec<Product>> {
    let url = self.endpoint(&["products"])?;
    debug!(%url, "listing products");

    let response = self
      .http
      .get(url)
      .header(ACCEPT, JSON)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("Unexpected response: {}", e))?;

    let body: ApiProductsResponse = response
      .json()
      .await
      .map_err(|e| eyre!("Invalid product list: {}", e))?;

    debug!(count = body.products.len(), "products listed");
    Ok(body.products)
  }

  /// `POST /products/add`. The body is decoded whatever the status.
  async fn create_product(&self, product: &NewProduct) -> Result<Product> {
    let url = self.endpoint(&["products", "add"])?;
    debug!(%url, title = %product.title, "creating product");

    let response = self
      .http
      .post(url)
      .header(ACCEPT, JSON)
      .json(product)
      .send()
      .await
      .map_err(|e| eyre!("Failed to create product: {}", e))?;
    debug!(status = %response.status(), "create response");

    response
      .json()
      .await
      .map_err(|e| eyre!("Invalid create response: {}", e))
  }

  /// `PUT /products/{id}`. The body is decoded whatever the status.
  async fn update_product(&self, update: &ProductUpdate) -> Result<Product> {
    let url = self.product_endpoint(update.id)?;
    debug!(%url, "updating product");

    let response = self
      .http
      .put(url)
      .header(ACCEPT, JSON)
      .json(update)
      .send()
      .await
      .map_err(|e| eyre!("Failed to update product {}: {}", update.id, e))?;
    debug!(status = %response.status(), "update response");

    response
      .json()
      .await
      .map_err(|e| eyre!("Invalid update response: {}", e))
  }

  /// `DELETE /products/{id}`. Any JSON acknowledgement counts as success.
  async fn delete_product(&self, id: u64) -> Result<()> {
    let url = self.product_endpoint(id)?;
    debug!(%url, "deleting product");

    let response = self
      .http
      .delete(url)
      .header(ACCEPT, JSON)
      .send()
      .await
      .map_err(|e| eyre!("Failed to delete product {}: {}", id, e))?;
    debug!(status = %response.status(), "delete response");

    response
      .json::<serde_json::Value>()
      .await
      .map_err(|e| eyre!("Invalid delete response: {}", e))?;

    Ok(())
  }
}
