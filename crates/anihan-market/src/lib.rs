//! Marketplace domain types and logic for Anihan.
//!
//! Anihan moves food waste from farms and households into compost,
//! fertilizer and preserved food:
//!
//! - **Users**: consumers, vendors awaiting approval, administrators
//! - **Waste**: waste types, categories, consumer submissions and vendor
//!   source submissions with their review workflow
//! - **Catalog**: products for sale and vendor inventory with a quantity
//!   audit trail
//! - **Checkout**: orders and deliveries
//!
//! With the default `storage` feature, [`store`] persists everything in
//! SQLite through `anihan-db`.
//!
//! # Example
//!
//! ```rust,ignore
//! use anihan_market::prelude::*;
//!
//! let market = Market::new(Db::open_in_memory().await?);
//! let item = market.inventory.create(new_item).await?;
//!
//! // Sell 20 kg and record it
//! let item = market
//!     .inventory
//!     .adjust_quantity(item.id, AdjustQuantity {
//!         adjustment_type: AdjustmentType::Subtract,
//!         quantity_change: 20.0,
//!         reason: "Sold at market".into(),
//!         adjusted_by: "Maria Santos".into(),
//!         notes: None,
//!     })
//!     .await?;
//! ```

#[macro_use]
mod labels;

pub mod error;
pub mod ids;
pub mod serde_util;

pub mod catalog;
pub mod checkout;
pub mod user;
pub mod waste;

#[cfg(feature = "storage")]
pub mod store;

pub use error::{MarketError, Result};
pub use ids::*;
#[cfg(feature = "storage")]
pub use store::Market;

/// Current time as an RFC 3339 timestamp with millisecond precision.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{MarketError, Result};
    pub use crate::ids::*;

    // Users
    pub use crate::user::{NewUser, Role, User, UserFilter, UserPatch, UserSummary, VendorStatus};

    // Catalog
    pub use crate::catalog::{
        AdjustQuantity, AdjustmentType, InventoryFilter, InventoryItem, InventoryPatch,
        NewInventoryItem, NewProduct, Product, ProductCategory, ProductFilter, ProductPatch,
        ProductUnit, QuantityAdjustment,
    };

    // Waste
    pub use crate::waste::{
        DamageLevel, NewSourceSubmission, NewWasteCategory, NewWasteSubmission, NewWasteType,
        ReviewDecision, SourceFilter, SourcePatch, SourceStatus, SourceWasteSubmission,
        SubmissionStatus, WasteCategory, WasteCategoryFilter, WasteCategoryPatch, WasteCondition,
        WasteKind, WasteStats, WasteSubmission, WasteSubmissionFilter, WasteSubmissionPatch,
        WasteType, WasteTypeFilter, WasteTypePatch, WasteUnit,
    };

    // Checkout
    pub use crate::checkout::{
        Delivery, DeliveryFilter, DeliveryPatch, DeliveryStatus, NewDelivery, NewOrder, Order,
        OrderFilter, OrderPatch, OrderStatus, PaymentMethod, PaymentStatus,
    };

    #[cfg(feature = "storage")]
    pub use crate::store::Market;
    #[cfg(feature = "storage")]
    pub use anihan_db::Db;
}
