use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog item as the product service returns it.
///
/// Every field defaults when missing: mutation responses are decoded without
/// looking at the HTTP status, so an error body still becomes a `Product`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Product {
  #[serde(default)]
  pub id: u64,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub price: Price,
  #[serde(default)]
  pub thumbnail: String,
}

/// Price as echoed by the service.
///
/// Creation sends a number, updates send whatever text was entered, and the
/// service echoes back what it received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Price {
  Number(f64),
  Text(String),
}

impl Default for Price {
  fn default() -> Self {
    Price::Number(0.0)
  }
}

impl fmt::Display for Price {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Price::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
      Price::Number(n) => write!(f, "{}", n),
      Price::Text(s) => f.write_str(s),
    }
  }
}

/// Unsaved product held while the creation form is open.
///
/// Price stays as typed until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftProduct {
  pub title: String,
  pub description: String,
  pub price: String,
  pub thumbnail: String,
}

impl Default for DraftProduct {
  fn default() -> Self {
    Self {
      title: String::new(),
      description: String::new(),
      price: "0".to_string(),
      thumbnail: String::new(),
    }
  }
}

impl DraftProduct {
  /// Back to the empty state the creation form opens with.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// Validate as a creation request: every field filled in, price numeric.
  pub fn to_new_product(&self) -> Result<NewProduct> {
    let missing = [
      ("Title", &self.title),
      ("Description", &self.description),
      ("Price", &self.price),
      ("Thumbnail URL", &self.thumbnail),
    ]
    .into_iter()
    .find(|(_, value)| value.is_empty());
    if let Some((label, _)) = missing {
      return Err(eyre!("{} is required", label));
    }

    let price: f64 = self
      .price
      .trim()
      .parse()
      .ok()
      .filter(|p: &f64| p.is_finite())
      .ok_or_else(|| eyre!("Price must be a number"))?;

    Ok(NewProduct {
      title: self.title.clone(),
      description: self.description.clone(),
      price,
      thumbnail: self.thumbnail.clone(),
    })
  }

  /// Turn edited values into an update for product `id`.
  ///
  /// Returns `None` when any field is empty: the update is abandoned.
  pub fn into_update(self, id: u64) -> Option<ProductUpdate> {
    let filled = [&self.title, &self.description, &self.price, &self.thumbnail]
      .iter()
      .all(|v| !v.is_empty());
    if !filled {
      return None;
    }

    Some(ProductUpdate {
      id,
      title: self.title,
      description: self.description,
      price: self.price,
      thumbnail: self.thumbnail,
    })
  }
}

impl From<&Product> for DraftProduct {
  fn from(product: &Product) -> Self {
    Self {
      title: product.title.clone(),
      description: product.description.clone(),
      price: product.price.to_string(),
      thumbnail: product.thumbnail.clone(),
    }
  }
}

/// Body of a creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
  pub title: String,
  pub description: String,
  pub price: f64,
  pub thumbnail: String,
}

/// Full-replacement update of one product. All values are sent as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUpdate {
  #[serde(skip)]
  pub id: u64,
  pub title: String,
  pub description: String,
  pub price: String,
  pub thumbnail: String,
}
