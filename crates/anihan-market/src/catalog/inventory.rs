//! Vendor inventory produced from processed waste.

use crate::catalog::{ProductCategory, ProductUnit};
use crate::ids::{InventoryItemId, SourceSubmissionId, UserId};
use crate::serde_util;
use crate::user::UserSummary;
use crate::waste::SourceWasteSubmission;
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

/// Reason recorded on the entry written when an item is created.
pub const INITIAL_ADJUSTMENT_REASON: &str = "Initial inventory creation";

labeled_enum! {
    /// How a quantity adjustment combines with the current quantity.
    AdjustmentType {
        /// Add the change to the current quantity.
        Add => "add",
        /// Subtract the change, never going below zero.
        Subtract => "subtract",
        /// Replace the quantity with the change.
        Set => "set",
    }
}

impl AdjustmentType {
    /// Quantity after applying `change` to `previous`.
    pub fn apply(&self, previous: f64, change: f64) -> f64 {
        match self {
            AdjustmentType::Add => previous + change,
            AdjustmentType::Subtract => (previous - change).max(0.0),
            AdjustmentType::Set => change,
        }
    }
}

/// Total stock value of `quantity` units at `price_per_unit`.
pub fn total_value(quantity: f64, price_per_unit: f64) -> f64 {
    quantity * price_per_unit
}

/// One entry of an item's quantity audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityAdjustment {
    pub id: String,
    pub inventory_item_id: InventoryItemId,
    pub adjustment_type: AdjustmentType,
    /// Requested change; for `set` this is the new quantity.
    pub quantity_change: f64,
    pub previous_quantity: f64,
    pub new_quantity: f64,
    pub reason: String,
    pub adjusted_by: String,
    pub adjusted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A request to change an item's quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustQuantity {
    pub adjustment_type: AdjustmentType,
    pub quantity_change: f64,
    pub reason: String,
    #[serde(default)]
    pub adjusted_by: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AdjustQuantity {
    /// Validate the requested change.
    pub fn validate(&self) -> Result<()> {
        if !self.quantity_change.is_finite() || self.quantity_change < 0.0 {
            return Err(MarketError::Validation(
                "quantity_change must be a non-negative number".into(),
            ));
        }
        if self.reason.trim().is_empty() {
            return Err(MarketError::Validation("reason is required".into()));
        }
        Ok(())
    }
}

/// A stocked item in a vendor's inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub vendor_id: UserId,
    pub product_name: String,
    pub description: String,
    pub category: ProductCategory,
    pub quantity: f64,
    pub unit: ProductUnit,
    pub price_per_unit: f64,
    pub total_value: f64,
    #[serde(default)]
    pub source_waste_submission_id: Option<SourceSubmissionId>,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub image_url: String,
    #[serde(deserialize_with = "serde_util::flag")]
    pub is_available: bool,
    #[serde(default, deserialize_with = "serde_util::json_list")]
    pub quantity_history: Vec<QuantityAdjustment>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Populated on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<UserSummary>,
    /// Populated on reads when the item came from a source submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_waste_submission: Option<Box<SourceWasteSubmission>>,
}

impl InventoryItem {
    /// Apply a quantity adjustment: update quantity and total value, and
    /// append the audit entry. Returns the new entry.
    pub fn adjust(
        &mut self,
        request: &AdjustQuantity,
        adjusted_at: impl Into<String>,
    ) -> Result<&QuantityAdjustment> {
        request.validate()?;

        let previous = self.quantity;
        let new_quantity = request.adjustment_type.apply(previous, request.quantity_change);
        let quantity_change = match request.adjustment_type {
            AdjustmentType::Set => new_quantity,
            _ => request.quantity_change,
        };

        self.quantity = new_quantity;
        self.total_value = total_value(new_quantity, self.price_per_unit);
        self.quantity_history.push(QuantityAdjustment {
            id: self.next_history_id(),
            inventory_item_id: self.id,
            adjustment_type: request.adjustment_type,
            quantity_change,
            previous_quantity: previous,
            new_quantity,
            reason: request.reason.clone(),
            adjusted_by: request.adjusted_by.clone(),
            adjusted_at: adjusted_at.into(),
            notes: request.notes.clone(),
        });

        self.quantity_history
            .last()
            .ok_or_else(|| MarketError::Validation("quantity history is empty".into()))
    }

    /// Record the creation entry, `set` from zero to the current quantity.
    pub fn record_initial(&mut self, adjusted_by: &str, adjusted_at: impl Into<String>) {
        self.quantity_history.push(QuantityAdjustment {
            id: self.next_history_id(),
            inventory_item_id: self.id,
            adjustment_type: AdjustmentType::Set,
            quantity_change: self.quantity,
            previous_quantity: 0.0,
            new_quantity: self.quantity,
            reason: INITIAL_ADJUSTMENT_REASON.to_string(),
            adjusted_by: adjusted_by.to_string(),
            adjusted_at: adjusted_at.into(),
            notes: None,
        });
    }

    fn next_history_id(&self) -> String {
        format!("{}-{}", self.id, self.quantity_history.len() + 1)
    }
}

/// Fields for creating an inventory item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInventoryItem {
    pub vendor_id: UserId,
    pub product_name: String,
    pub description: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub quantity: f64,
    pub unit: ProductUnit,
    pub price_per_unit: f64,
    #[serde(default)]
    pub source_waste_submission_id: Option<SourceSubmissionId>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_available: Option<bool>,
    /// Existing audit trail to carry over; a creation entry is written when absent.
    #[serde(default)]
    pub quantity_history: Option<Vec<QuantityAdjustment>>,
}

impl NewInventoryItem {
    /// Validate quantity and price.
    pub fn validate(&self) -> Result<()> {
        if self.product_name.trim().is_empty() {
            return Err(MarketError::Validation("product_name is required".into()));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(MarketError::Validation("quantity must not be negative".into()));
        }
        if !self.price_per_unit.is_finite() || self.price_per_unit < 0.0 {
            return Err(MarketError::Validation(
                "price_per_unit must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Total value of the new item.
    pub fn total_value(&self) -> f64 {
        total_value(self.quantity, self.price_per_unit)
    }
}

/// Partial update of an inventory item. Absent fields are left unchanged.
///
/// The audit trail only changes through quantity adjustments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryPatch {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    pub quantity: Option<f64>,
    pub unit: Option<ProductUnit>,
    pub price_per_unit: Option<f64>,
    /// `Some(None)` unlinks the source submission.
    #[serde(default, deserialize_with = "serde_util::nullable")]
    pub source_waste_submission_id: Option<Option<SourceSubmissionId>>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

impl InventoryPatch {
    /// Validate the supplied quantity and price.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.quantity, Some(q) if !q.is_finite() || q < 0.0) {
            return Err(MarketError::Validation("quantity must not be negative".into()));
        }
        if matches!(self.price_per_unit, Some(p) if !p.is_finite() || p < 0.0) {
            return Err(MarketError::Validation(
                "price_per_unit must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// New total value when quantity or price changes, given the stored item.
    pub fn total_value(&self, current: &InventoryItem) -> Option<f64> {
        if self.quantity.is_none() && self.price_per_unit.is_none() {
            return None;
        }
        Some(total_value(
            self.quantity.unwrap_or(current.quantity),
            self.price_per_unit.unwrap_or(current.price_per_unit),
        ))
    }
}

/// Listing filter for inventory items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryFilter {
    pub vendor_id: Option<UserId>,
    pub is_available: Option<bool>,
}
