//! SQLite-backed stores, one per table.
//!
//! Every store exposes the same shape: `find(filter)`, `find_by_id`, `get`
//! (which fails with [`MarketError::NotFound`]), `create`, `update`
//! (allow-listed partial update), `delete` and `delete_all`. Listings are
//! newest first.

mod inventory;
mod orders;
mod products;
mod users;
mod waste;

pub use inventory::InventoryStore;
pub use orders::{DeliveryStore, OrderStore};
pub use products::ProductStore;
pub use users::UserStore;
pub use waste::{SourceSubmissionStore, WasteCategoryStore, WasteSubmissionStore, WasteTypeStore};

use crate::ids::UserId;
use crate::user::UserSummary;
use crate::{MarketError, Result};
use anihan_db::{Db, Row, Update, Value};
use tracing::info;

/// All stores over one database.
#[derive(Clone, Debug)]
pub struct Market {
    db: Db,
    pub users: UserStore,
    pub products: ProductStore,
    pub waste_types: WasteTypeStore,
    pub waste_categories: WasteCategoryStore,
    pub waste_submissions: WasteSubmissionStore,
    pub source_submissions: SourceSubmissionStore,
    pub inventory: InventoryStore,
    pub orders: OrderStore,
    pub deliveries: DeliveryStore,
}

impl Market {
    /// Build every store over `db`.
    pub fn new(db: Db) -> Self {
        let users = UserStore::new(db.clone());
        let products = ProductStore::new(db.clone());
        let source_submissions = SourceSubmissionStore::new(db.clone());
        Self {
            waste_types: WasteTypeStore::new(db.clone()),
            waste_categories: WasteCategoryStore::new(db.clone()),
            waste_submissions: WasteSubmissionStore::new(db.clone()),
            inventory: InventoryStore::new(db.clone(), source_submissions.clone()),
            orders: OrderStore::new(db.clone(), products.clone()),
            deliveries: DeliveryStore::new(db.clone()),
            users,
            products,
            source_submissions,
            db,
        }
    }

    /// The underlying database.
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Delete every record in every table.
    pub async fn clear_all(&self) -> Result<()> {
        let deliveries = self.deliveries.delete_all().await?;
        let orders = self.orders.delete_all().await?;
        let inventory = self.inventory.delete_all().await?;
        let sources = self.source_submissions.delete_all().await?;
        let submissions = self.waste_submissions.delete_all().await?;
        let types = self.waste_types.delete_all().await?;
        let categories = self.waste_categories.delete_all().await?;
        let products = self.products.delete_all().await?;
        let users = self.users.delete_all().await?;
        info!(
            deliveries,
            orders,
            inventory,
            sources,
            submissions,
            types,
            categories,
            products,
            users,
            "cleared all tables"
        );
        Ok(())
    }
}

/// Newest-first ordering for unaliased listings.
pub(crate) const NEWEST_FIRST: &str = "created_at DESC, id DESC";

/// Run an update, failing with `NotFound` when the row doesn't exist.
/// An update with no fields is a no-op.
pub(crate) async fn apply_update(
    db: &Db,
    update: Update,
    id: impl Into<Value>,
    entity: &'static str,
) -> Result<()> {
    if let Some((sql, params)) = update.build(id) {
        let result = db.execute(&sql, &params).await?;
        if result.rows_affected == 0 {
            return Err(MarketError::NotFound(entity));
        }
    }
    Ok(())
}

/// Delete one row, failing with `NotFound` when it doesn't exist.
pub(crate) async fn delete_row(
    db: &Db,
    table: &str,
    id: impl Into<Value>,
    entity: &'static str,
) -> Result<()> {
    let result = db
        .execute(&format!("DELETE FROM {table} WHERE id = ?"), &[id.into()])
        .await?;
    if result.rows_affected == 0 {
        return Err(MarketError::NotFound(entity));
    }
    info!(table, "row deleted");
    Ok(())
}

/// Delete every row of a table, returning how many were removed.
pub(crate) async fn delete_rows(db: &Db, table: &str) -> Result<u64> {
    let result = db.execute(&format!("DELETE FROM {table}"), &[]).await?;
    Ok(result.rows_affected)
}

/// Read a joined user summary from columns named `<prefix>_full_name` etc.
pub(crate) fn user_summary(row: &Row, prefix: &str, id: UserId) -> Option<UserSummary> {
    let full_name = row.text(&format!("{prefix}_full_name"))?;
    Some(UserSummary {
        id,
        full_name,
        email: row.text(&format!("{prefix}_email")).unwrap_or_default(),
        phone: row.text(&format!("{prefix}_phone")).unwrap_or_default(),
        address: row.text(&format!("{prefix}_address")).unwrap_or_default(),
    })
}
