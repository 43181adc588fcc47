//! Sellable products.

use crate::ids::ProductId;
use crate::serde_util;
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// What a product (or inventory item) was made into.
    ProductCategory {
        Compost => "compost",
        Fertilizer => "fertilizer",
        PreservedFood => "preserved_food",
        ProcessedFood => "processed_food",
        Other => "other",
    }
}

labeled_enum! {
    /// Unit a product (or inventory item) is sold in.
    ProductUnit {
        Kg => "kg",
        Bags => "bags",
        Bottles => "bottles",
        Pieces => "pieces",
        Jars => "jars",
        Boxes => "boxes",
    }
}

/// A product listed in the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub image_url: String,
    pub stock_quantity: i64,
    pub unit: ProductUnit,
    #[serde(deserialize_with = "serde_util::flag")]
    pub is_available: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Product {
    /// Price of `quantity` units.
    pub fn price_for(&self, quantity: i64) -> f64 {
        self.price * quantity as f64
    }

    /// Check if the product can currently be ordered.
    pub fn is_in_stock(&self) -> bool {
        self.is_available && self.stock_quantity > 0
    }
}

/// Availability of a new product: it needs stock, and an explicit `false`
/// from the caller wins.
pub fn initial_availability(stock_quantity: i64, requested: Option<bool>) -> bool {
    stock_quantity > 0 && requested != Some(false)
}

/// Fields for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock_quantity: i64,
    pub unit: ProductUnit,
    #[serde(default)]
    pub is_available: Option<bool>,
}

impl NewProduct {
    /// Validate prices and quantities.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MarketError::Validation("name is required".into()));
        }
        if self.price < 0.0 {
            return Err(MarketError::Validation("price must not be negative".into()));
        }
        if self.stock_quantity < 0 {
            return Err(MarketError::Validation(
                "stock_quantity must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Resolved availability for the new row.
    pub fn availability(&self) -> bool {
        initial_availability(self.stock_quantity, self.is_available)
    }
}

/// Partial update of a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ProductCategory>,
    pub image_url: Option<String>,
    pub stock_quantity: Option<i64>,
    pub unit: Option<ProductUnit>,
    pub is_available: Option<bool>,
}

impl ProductPatch {
    /// Apply the stock rule: setting stock to zero takes the product off sale.
    pub fn normalize(mut self) -> Self {
        if self.stock_quantity == Some(0) {
            self.is_available = Some(false);
        }
        self
    }

    /// Validate the supplied prices and quantities.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.price, Some(p) if p < 0.0) {
            return Err(MarketError::Validation("price must not be negative".into()));
        }
        if matches!(self.stock_quantity, Some(q) if q < 0) {
            return Err(MarketError::Validation(
                "stock_quantity must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Listing filter for products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<ProductCategory>,
    pub is_available: Option<bool>,
}
