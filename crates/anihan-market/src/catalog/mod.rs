//! Products and the vendor inventory they are stocked from.

mod inventory;
mod product;

pub use inventory::{
    total_value, AdjustQuantity, AdjustmentType, InventoryFilter, InventoryItem, InventoryPatch,
    NewInventoryItem, QuantityAdjustment, INITIAL_ADJUSTMENT_REASON,
};
pub use product::{
    initial_availability, NewProduct, Product, ProductCategory, ProductFilter, ProductPatch,
    ProductUnit,
};
