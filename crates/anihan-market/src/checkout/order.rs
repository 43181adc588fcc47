//! Order types.

use crate::catalog::Product;
use crate::checkout::DeliveryStatus;
use crate::ids::{OrderId, ProductId, UserId};
use crate::serde_util;
use crate::user::UserSummary;
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Order status.
    #[derive(Default)]
    OrderStatus {
        /// Order placed, awaiting confirmation.
        #[default]
        Pending => "pending",
        /// Order confirmed by the seller.
        Confirmed => "confirmed",
        /// Order being prepared.
        Processing => "processing",
        /// Order handed to delivery.
        Shipped => "shipped",
        /// Order delivered.
        Delivered => "delivered",
        /// Order cancelled.
        Cancelled => "cancelled",
    }
}

impl OrderStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }
}

labeled_enum! {
    /// Payment status.
    #[derive(Default)]
    PaymentStatus {
        #[default]
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
    }
}

labeled_enum! {
    /// How the customer pays.
    PaymentMethod {
        Cash => "cash",
        Gcash => "gcash",
    }
}

/// A customer's order of a single product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub payment_reference: String,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    pub delivery_address: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub delivery_notes: String,
    #[serde(default)]
    pub order_date: String,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub notes: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Populated on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<UserSummary>,
    /// Populated on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl Order {
    /// Check if order is paid.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Fail unless the order can still be cancelled.
    pub fn ensure_cancellable(&self) -> Result<()> {
        if self.status.can_cancel() {
            Ok(())
        } else {
            Err(MarketError::NotCancellable(self.status.to_string()))
        }
    }
}

/// Fields for placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Computed from the product price when absent.
    #[serde(default)]
    pub total_price: Option<f64>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_reference: String,
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_notes: String,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl NewOrder {
    /// Validate quantity, price and address.
    pub fn validate(&self) -> Result<()> {
        if self.quantity < 1 {
            return Err(MarketError::Validation("quantity must be at least 1".into()));
        }
        if matches!(self.total_price, Some(p) if !p.is_finite() || p < 0.0) {
            return Err(MarketError::Validation(
                "total_price must not be negative".into(),
            ));
        }
        if self.delivery_address.trim().is_empty() {
            return Err(MarketError::Validation("delivery_address is required".into()));
        }
        Ok(())
    }

    /// The order total: the supplied price, or quantity times the product price.
    pub fn total_for(&self, product: &Product) -> f64 {
        self.total_price
            .unwrap_or_else(|| product.price_for(self.quantity))
    }
}

/// Partial update of an order. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
    pub delivery_status: Option<DeliveryStatus>,
    pub delivery_address: Option<String>,
    pub delivery_notes: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
}

impl OrderPatch {
    /// The update that cancels an order.
    pub fn cancel() -> Self {
        Self {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        }
    }

    /// Check the status change against the order's current status.
    ///
    /// Terminal orders keep their status.
    pub fn check_status(&self, current: OrderStatus) -> Result<()> {
        match self.status {
            Some(next) if current.is_terminal() && next != current => {
                Err(MarketError::InvalidTransition {
                    from: current.to_string(),
                    to: next.to_string(),
                })
            }
            Some(OrderStatus::Cancelled) if !current.can_cancel() && !current.is_terminal() => {
                Err(MarketError::NotCancellable(current.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Listing filter for orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
}
