//! Orders and their deliveries.

mod delivery;
mod order;

pub use delivery::{Delivery, DeliveryFilter, DeliveryPatch, DeliveryStatus, NewDelivery};
pub use order::{
    NewOrder, Order, OrderFilter, OrderPatch, OrderStatus, PaymentMethod, PaymentStatus,
};
