//! Catalogue products and the admin create/update form payload.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::ProductId;

/// Placeholder value the category selector holds before a choice is made.
pub const CATEGORY_PLACEHOLDER: &str = "-";

/// Product category as the backend enum spells it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductCategory {
    Bread,
    Beverage,
    Cake,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [Self::Bread, Self::Beverage, Self::Cake];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Bread => "BREAD",
            ProductCategory::Beverage => "BEVERAGE",
            ProductCategory::Cake => "CAKE",
        }
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BREAD" => Ok(Self::Bread),
            "BEVERAGE" => Ok(Self::Beverage),
            "CAKE" => Ok(Self::Cake),
            "" | CATEGORY_PLACEHOLDER => Err(DomainError::field(
                "category",
                "Please select a category.",
            )),
            other => Err(DomainError::field(
                "category",
                format!("unknown category '{other}'"),
            )),
        }
    }
}

/// Product read model (matches the API response shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
    pub category: ProductCategory,
    pub stock: i64,
    /// Stored image file name on the server.
    pub image: String,
    pub description: String,
    pub inputdate: NaiveDate,
}

impl Product {
    /// Server-relative path of the product image.
    pub fn image_path(&self) -> String {
        format!("/images/{}", self.image)
    }
}

/// Admin product form as submitted to the insert/update endpoints.
///
/// Fields stay as the raw form strings; numeric checks are the server's
/// job and come back through the validation error body. `image` holds a
/// base64 data URL for a freshly selected file, or the stored file name
/// when an update keeps the existing image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    pub image: String,
    pub description: String,
}

impl ProductDraft {
    /// Prefill an update form from an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            category: product.category.as_str().to_string(),
            stock: product.stock.to_string(),
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }

    /// Checks that must pass before the form is sent at all.
    pub fn validate(&self) -> DomainResult<ProductCategory> {
        self.category.parse()
    }
}
