//! Delivery tracking for orders.

use crate::ids::{DeliveryId, OrderId};
use crate::serde_util;
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Delivery progress, shared by orders and their deliveries.
    #[derive(Default)]
    DeliveryStatus {
        #[default]
        Pending => "pending",
        Assigned => "assigned",
        PickedUp => "picked_up",
        InTransit => "in_transit",
        Delivered => "delivered",
        Failed => "failed",
    }
}

impl DeliveryStatus {
    /// Check if the delivery has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Failed)
    }
}

/// A delivery run for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub delivery_person: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub delivery_vehicle: String,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub status: DeliveryStatus,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub notes: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Fields for scheduling a delivery; the order comes from the route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDelivery {
    #[serde(default)]
    pub delivery_person: String,
    #[serde(default)]
    pub delivery_vehicle: String,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub status: DeliveryStatus,
    #[serde(default)]
    pub notes: String,
}

/// Partial update of a delivery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryPatch {
    pub delivery_person: Option<String>,
    pub delivery_vehicle: Option<String>,
    pub pickup_time: Option<String>,
    pub delivery_time: Option<String>,
    pub status: Option<DeliveryStatus>,
    pub notes: Option<String>,
}

/// Listing filter for deliveries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryFilter {
    pub order_id: Option<OrderId>,
    pub status: Option<DeliveryStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_labels() {
        assert_eq!(DeliveryStatus::PickedUp.as_str(), "picked_up");
        assert_eq!("in_transit".parse::<DeliveryStatus>().unwrap(), DeliveryStatus::InTransit);
        assert!(DeliveryStatus::Failed.is_finished());
        assert!(!DeliveryStatus::Assigned.is_finished());
    }

    #[test]
    fn test_new_delivery_defaults() {
        let delivery: NewDelivery = serde_json::from_str("{}").unwrap();
        assert_eq!(delivery.status, DeliveryStatus::Pending);
        assert!(delivery.pickup_time.is_none());
    }
}
