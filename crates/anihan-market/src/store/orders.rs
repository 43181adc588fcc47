use super::{apply_update, delete_row, delete_rows, user_summary, ProductStore, NEWEST_FIRST};
use crate::checkout::{
    Delivery, DeliveryFilter, DeliveryPatch, NewDelivery, NewOrder, Order, OrderFilter, OrderPatch,
    OrderStatus,
};
use crate::ids::{DeliveryId, OrderId};
use crate::{timestamp, MarketError, Result};
use anihan_db::{params, Db, Row, Select, Update};
use tracing::info;

const ORDER_SELECT: &str = "SELECT o.*,
        u.full_name AS user_full_name, u.email AS user_email,
        u.phone AS user_phone, u.address AS user_address
    FROM orders o
    LEFT JOIN users u ON o.user_id = u.id";

/// Customer orders, with customer and product populated.
#[derive(Clone, Debug)]
pub struct OrderStore {
    db: Db,
    products: ProductStore,
}

impl OrderStore {
    const ENTITY: &'static str = "Order";

    pub fn new(db: Db, products: ProductStore) -> Self {
        Self { db, products }
    }

    pub async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let (sql, params) = Select::from(ORDER_SELECT)
            .filter("o.user_id", filter.user_id)
            .filter("o.status", filter.status)
            .order_by("o.created_at DESC, o.id DESC")
            .build();
        let result = self.db.query(&sql, &params).await?;

        let mut orders = Vec::with_capacity(result.len());
        for row in result.iter() {
            orders.push(self.populate(row).await?);
        }
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let result = self
            .db
            .query(&format!("{ORDER_SELECT} WHERE o.id = ?"), params![id])
            .await?;
        match result.first() {
            Some(row) => Ok(Some(self.populate(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: OrderId) -> Result<Order> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(Self::ENTITY))
    }

    /// Place an order. The total defaults to quantity times the product price.
    pub async fn create(&self, input: NewOrder) -> Result<Order> {
        input.validate()?;
        let product = self.products.get(input.product_id).await?;
        let total_price = input.total_for(&product);

        let result = self
            .db
            .execute(
                "INSERT INTO orders (
                    user_id, product_id, quantity, total_price, payment_method,
                    payment_reference, delivery_address, delivery_notes, order_date, notes
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.user_id,
                    input.product_id,
                    input.quantity,
                    total_price,
                    input.payment_method,
                    input.payment_reference,
                    input.delivery_address,
                    input.delivery_notes,
                    input.order_date.unwrap_or_else(timestamp),
                    input.notes,
                ],
            )
            .await?;

        let id = OrderId::new(result.last_insert_id);
        info!(order_id = %id, user_id = %input.user_id, total_price, "order placed");
        self.get(id).await
    }

    /// Update an order. Terminal orders keep their status.
    pub async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        if patch.status.is_some() {
            let current = self.get(id).await?;
            patch.check_status(current.status)?;
        }

        let update = Update::table("orders")
            .set_opt("status", patch.status)
            .set_opt("payment_status", patch.payment_status)
            .set_opt("payment_method", patch.payment_method)
            .set_opt("payment_reference", patch.payment_reference)
            .set_opt("delivery_status", patch.delivery_status)
            .set_opt("delivery_address", patch.delivery_address)
            .set_opt("delivery_notes", patch.delivery_notes)
            .set_opt("delivery_date", patch.delivery_date)
            .set_opt("notes", patch.notes);
        apply_update(&self.db, update, id, Self::ENTITY).await?;
        self.get(id).await
    }

    /// Cancel an order that hasn't shipped yet.
    pub async fn cancel(&self, id: OrderId) -> Result<Order> {
        let current = self.get(id).await?;
        current.ensure_cancellable()?;
        let update = Update::table("orders").set("status", OrderStatus::Cancelled);
        apply_update(&self.db, update, id, Self::ENTITY).await?;
        info!(order_id = %id, from = %current.status, "order cancelled");
        self.get(id).await
    }

    pub async fn delete(&self, id: OrderId) -> Result<()> {
        delete_row(&self.db, "orders", id, Self::ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "orders").await
    }

    async fn populate(&self, row: &Row) -> Result<Order> {
        let mut order: Order = row.deserialize()?;
        order.customer = user_summary(row, "user", order.user_id);
        order.product = self.products.find_by_id(order.product_id).await?;
        Ok(order)
    }
}

/// Delivery runs for orders.
#[derive(Clone, Debug)]
pub struct DeliveryStore {
    db: Db,
}

impl DeliveryStore {
    const ENTITY: &'static str = "Delivery";

    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &DeliveryFilter) -> Result<Vec<Delivery>> {
        let (sql, params) = Select::from("SELECT * FROM deliveries")
            .filter("order_id", filter.order_id)
            .filter("status", filter.status)
            .order_by(NEWEST_FIRST)
            .build();
        Ok(self.db.query_as(&sql, &params).await?)
    }

    pub async fn find_by_id(&self, id: DeliveryId) -> Result<Option<Delivery>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM deliveries WHERE id = ?", params![id])
            .await?)
    }

    pub async fn get(&self, id: DeliveryId) -> Result<Delivery> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(Self::ENTITY))
    }

    /// Schedule a delivery for an existing order.
    pub async fn create(&self, order_id: OrderId, input: NewDelivery) -> Result<Delivery> {
        let exists = self
            .db
            .query("SELECT id FROM orders WHERE id = ?", params![order_id])
            .await?;
        if exists.is_empty() {
            return Err(MarketError::NotFound(OrderStore::ENTITY));
        }

        let result = self
            .db
            .execute(
                "INSERT INTO deliveries (
                    order_id, delivery_person, delivery_vehicle, pickup_time,
                    delivery_time, status, notes
                ) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    order_id,
                    input.delivery_person,
                    input.delivery_vehicle,
                    input.pickup_time,
                    input.delivery_time,
                    input.status,
                    input.notes,
                ],
            )
            .await?;

        let id = DeliveryId::new(result.last_insert_id);
        info!(delivery_id = %id, order_id = %order_id, "delivery scheduled");
        self.get(id).await
    }

    pub async fn update(&self, id: DeliveryId, patch: DeliveryPatch) -> Result<Delivery> {
        let update = Update::table("deliveries")
            .set_opt("delivery_person", patch.delivery_person)
            .set_opt("delivery_vehicle", patch.delivery_vehicle)
            .set_opt("pickup_time", patch.pickup_time)
            .set_opt("delivery_time", patch.delivery_time)
            .set_opt("status", patch.status)
            .set_opt("notes", patch.notes);
        apply_update(&self.db, update, id, Self::ENTITY).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: DeliveryId) -> Result<()> {
        delete_row(&self.db, "deliveries", id, Self::ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "deliveries").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewProduct, ProductCategory, ProductUnit};
    use crate::checkout::{DeliveryStatus, PaymentMethod, PaymentStatus};
    use crate::ids::{ProductId, UserId};
    use crate::store::UserStore;
    use crate::user::{NewUser, Role};

    struct Fixture {
        customer: UserId,
        product: ProductId,
        orders: OrderStore,
        deliveries: DeliveryStore,
    }

    async fn fixture() -> Fixture {
        let db = Db::open_in_memory().await.unwrap();
        let customer = UserStore::new(db.clone())
            .create(NewUser {
                email: "user@anihan.com".into(),
                password_hash: "hash".into(),
                full_name: "Pedro Garcia".into(),
                role: Role::User,
                address: "Quezon City".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let products = ProductStore::new(db.clone());
        let product = products
            .create(NewProduct {
                name: "Mango Jam".into(),
                description: "Jam from overripe mangoes".into(),
                price: 120.0,
                category: ProductCategory::PreservedFood,
                image_url: String::new(),
                stock_quantity: 20,
                unit: ProductUnit::Jars,
                is_available: None,
            })
            .await
            .unwrap();

        Fixture {
            customer: customer.id,
            product: product.id,
            orders: OrderStore::new(db.clone(), products),
            deliveries: DeliveryStore::new(db),
        }
    }

    fn new_order(f: &Fixture, quantity: i64, total_price: Option<f64>) -> NewOrder {
        NewOrder {
            user_id: f.customer,
            product_id: f.product,
            quantity,
            total_price,
            payment_method: PaymentMethod::Gcash,
            payment_reference: "GC-1234".into(),
            delivery_address: "Quezon City".into(),
            delivery_notes: String::new(),
            order_date: None,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_computes_total_and_populates() {
        let f = fixture().await;
        let order = f.orders.create(new_order(&f, 3, None)).await.unwrap();
        assert_eq!(order.total_price, 360.0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.delivery_status, DeliveryStatus::Pending);
        assert!(!order.order_date.is_empty());
        assert_eq!(order.customer.as_ref().unwrap().full_name, "Pedro Garcia");
        assert_eq!(order.product.as_ref().unwrap().name, "Mango Jam");

        let explicit = f.orders.create(new_order(&f, 3, Some(300.0))).await.unwrap();
        assert_eq!(explicit.total_price, 300.0);

        let listed = f
            .orders
            .find(&OrderFilter {
                user_id: Some(f.customer),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(
            listed.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![explicit.id, order.id]
        );
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let f = fixture().await;
        let mut input = new_order(&f, 1, None);
        input.product_id = ProductId::new(404);
        assert!(matches!(
            f.orders.create(input).await,
            Err(MarketError::NotFound("Product"))
        ));
    }

    #[tokio::test]
    async fn test_cancel_rules() {
        let f = fixture().await;
        let order = f.orders.create(new_order(&f, 1, None)).await.unwrap();

        let cancelled = f.orders.cancel(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(matches!(
            f.orders.cancel(order.id).await,
            Err(MarketError::NotCancellable(_))
        ));

        let shipped = f.orders.create(new_order(&f, 1, None)).await.unwrap();
        f.orders
            .update(
                shipped.id,
                OrderPatch {
                    status: Some(OrderStatus::Shipped),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            f.orders.cancel(shipped.id).await,
            Err(MarketError::NotCancellable(_))
        ));
    }

    #[tokio::test]
    async fn test_terminal_orders_keep_status() {
        let f = fixture().await;
        let order = f.orders.create(new_order(&f, 1, None)).await.unwrap();
        f.orders
            .update(
                order.id,
                OrderPatch {
                    status: Some(OrderStatus::Delivered),
                    payment_status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .orders
            .update(
                order.id,
                OrderPatch {
                    status: Some(OrderStatus::Processing),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));

        let noted = f
            .orders
            .update(
                order.id,
                OrderPatch {
                    notes: Some("left at gate".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(noted.is_paid());
        assert_eq!(noted.notes, "left at gate");
    }

    #[tokio::test]
    async fn test_deliveries_for_order() {
        let f = fixture().await;
        let order = f.orders.create(new_order(&f, 1, None)).await.unwrap();

        let delivery = f
            .deliveries
            .create(
                order.id,
                NewDelivery {
                    delivery_person: "Jose Rizal".into(),
                    delivery_vehicle: "Motorcycle".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(delivery.order_id, order.id);
        assert_eq!(delivery.status, DeliveryStatus::Pending);

        let updated = f
            .deliveries
            .update(
                delivery.id,
                DeliveryPatch {
                    status: Some(DeliveryStatus::InTransit),
                    pickup_time: Some("2024-12-14T08:00:00Z".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, DeliveryStatus::InTransit);
        assert_eq!(updated.pickup_time.as_deref(), Some("2024-12-14T08:00:00Z"));

        let listed = f
            .deliveries
            .find(&DeliveryFilter {
                order_id: Some(order.id),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        assert!(matches!(
            f.deliveries
                .create(OrderId::new(404), NewDelivery::default())
                .await,
            Err(MarketError::NotFound("Order"))
        ));

        f.orders.delete(order.id).await.unwrap();
        assert!(f.deliveries.find_by_id(delivery.id).await.unwrap().is_none());
    }
}
