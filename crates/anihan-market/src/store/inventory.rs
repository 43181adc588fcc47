use super::{apply_update, delete_row, delete_rows, user_summary, SourceSubmissionStore};
use crate::catalog::{
    AdjustQuantity, InventoryFilter, InventoryItem, InventoryPatch, NewInventoryItem,
};
use crate::ids::InventoryItemId;
use crate::{timestamp, MarketError, Result};
use anihan_db::{params, Db, Row, Select, Update};
use tracing::{debug, info};

const ENTITY: &str = "Inventory item";

const INVENTORY_SELECT: &str = "SELECT ii.*,
        u.full_name AS vendor_full_name, u.email AS vendor_email,
        u.phone AS vendor_phone, u.address AS vendor_address
    FROM inventory_items ii
    LEFT JOIN users u ON ii.vendor_id = u.id";

/// Vendor inventory with its quantity audit trail.
#[derive(Clone, Debug)]
pub struct InventoryStore {
    db: Db,
    sources: SourceSubmissionStore,
}

impl InventoryStore {
    pub fn new(db: Db, sources: SourceSubmissionStore) -> Self {
        Self { db, sources }
    }

    pub async fn find(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>> {
        let (sql, params) = Select::from(INVENTORY_SELECT)
            .filter("ii.vendor_id", filter.vendor_id)
            .filter("ii.is_available", filter.is_available)
            .order_by("ii.created_at DESC, ii.id DESC")
            .build();
        let result = self.db.query(&sql, &params).await?;

        let mut items = Vec::with_capacity(result.len());
        for row in result.iter() {
            items.push(self.populate(row).await?);
        }
        Ok(items)
    }

    pub async fn find_by_id(&self, id: InventoryItemId) -> Result<Option<InventoryItem>> {
        let result = self
            .db
            .query(&format!("{INVENTORY_SELECT} WHERE ii.id = ?"), params![id])
            .await?;
        match result.first() {
            Some(row) => Ok(Some(self.populate(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: InventoryItemId) -> Result<InventoryItem> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(ENTITY))
    }

    /// Create an item. Without a supplied history, a `set` entry from zero
    /// is recorded, attributed to the vendor.
    pub async fn create(&self, input: NewInventoryItem) -> Result<InventoryItem> {
        input.validate()?;
        let history = serde_json::to_string(input.quantity_history.as_deref().unwrap_or(&[]))?;
        let total_value = input.total_value();

        let result = self
            .db
            .execute(
                "INSERT INTO inventory_items (
                    vendor_id, product_name, description, category, quantity, unit,
                    price_per_unit, total_value, source_waste_submission_id,
                    image_url, is_available, quantity_history
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.vendor_id,
                    input.product_name,
                    input.description,
                    input.category,
                    input.quantity,
                    input.unit,
                    input.price_per_unit,
                    total_value,
                    input.source_waste_submission_id,
                    input.image_url,
                    input.is_available.unwrap_or(true),
                    history,
                ],
            )
            .await?;
        let id = InventoryItemId::new(result.last_insert_id);

        if input.quantity_history.is_none() {
            let mut item = self.get(id).await?;
            let adjusted_by = item
                .vendor
                .as_ref()
                .map(|vendor| vendor.full_name.clone())
                .unwrap_or_else(|| "system".to_string());
            item.record_initial(&adjusted_by, timestamp());
            self.db
                .execute(
                    "UPDATE inventory_items SET quantity_history = ? WHERE id = ?",
                    params![serde_json::to_string(&item.quantity_history)?, id],
                )
                .await?;
        }

        info!(inventory_item_id = %id, vendor_id = %input.vendor_id, "inventory item created");
        self.get(id).await
    }

    /// Update an item, recomputing `total_value` when quantity or price change.
    pub async fn update(&self, id: InventoryItemId, patch: InventoryPatch) -> Result<InventoryItem> {
        patch.validate()?;
        let current = self.get(id).await?;
        let total_value = patch.total_value(&current);

        let update = Update::table("inventory_items")
            .set_opt("product_name", patch.product_name)
            .set_opt("description", patch.description)
            .set_opt("category", patch.category)
            .set_opt("quantity", patch.quantity)
            .set_opt("unit", patch.unit)
            .set_opt("price_per_unit", patch.price_per_unit)
            .set_opt("total_value", total_value)
            .set_opt("source_waste_submission_id", patch.source_waste_submission_id)
            .set_opt("image_url", patch.image_url)
            .set_opt("is_available", patch.is_available);
        apply_update(&self.db, update, id, ENTITY).await?;
        self.get(id).await
    }

    /// Apply a quantity adjustment and append it to the item's history.
    pub async fn adjust_quantity(
        &self,
        id: InventoryItemId,
        request: AdjustQuantity,
    ) -> Result<InventoryItem> {
        let mut item = self.get(id).await?;
        let entry = item.adjust(&request, timestamp())?;
        debug!(
            inventory_item_id = %id,
            previous = entry.previous_quantity,
            new = entry.new_quantity,
            "quantity adjusted"
        );

        let update = Update::table("inventory_items")
            .set("quantity", item.quantity)
            .set("total_value", item.total_value)
            .set("quantity_history", serde_json::to_string(&item.quantity_history)?);
        apply_update(&self.db, update, id, ENTITY).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: InventoryItemId) -> Result<()> {
        delete_row(&self.db, "inventory_items", id, ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "inventory_items").await
    }

    async fn populate(&self, row: &Row) -> Result<InventoryItem> {
        let mut item: InventoryItem = row.deserialize()?;
        item.vendor = user_summary(row, "vendor", item.vendor_id);
        if let Some(source_id) = item.source_waste_submission_id {
            item.source_waste_submission = self.sources.find_by_id(source_id).await?.map(Box::new);
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AdjustmentType, ProductCategory, ProductUnit, INITIAL_ADJUSTMENT_REASON};
    use crate::ids::UserId;
    use crate::store::{UserStore, WasteCategoryStore};
    use crate::user::{NewUser, Role};
    use crate::waste::{NewSourceSubmission, NewWasteCategory, WasteCondition, WasteUnit};

    struct Fixture {
        vendor: UserId,
        sources: SourceSubmissionStore,
        categories: WasteCategoryStore,
        inventory: InventoryStore,
    }

    async fn fixture() -> Fixture {
        let db = Db::open_in_memory().await.unwrap();
        let vendor = UserStore::new(db.clone())
            .create(NewUser {
                email: "vendor@anihan.com".into(),
                password_hash: "hash".into(),
                full_name: "Maria Santos".into(),
                role: Role::Vendor,
                ..Default::default()
            })
            .await
            .unwrap();
        let sources = SourceSubmissionStore::new(db.clone());
        Fixture {
            vendor: vendor.id,
            categories: WasteCategoryStore::new(db.clone()),
            inventory: InventoryStore::new(db, sources.clone()),
            sources,
        }
    }

    fn new_item(vendor: UserId, quantity: f64, price: f64) -> NewInventoryItem {
        NewInventoryItem {
            vendor_id: vendor,
            product_name: "Banana Chips".into(),
            description: "Dried banana chips".into(),
            category: ProductCategory::ProcessedFood,
            quantity,
            unit: ProductUnit::Kg,
            price_per_unit: price,
            source_waste_submission_id: None,
            image_url: String::new(),
            is_available: None,
            quantity_history: None,
        }
    }

    fn adjust(kind: AdjustmentType, change: f64) -> AdjustQuantity {
        AdjustQuantity {
            adjustment_type: kind,
            quantity_change: change,
            reason: "Sold at market".into(),
            adjusted_by: "Maria Santos".into(),
            notes: Some("weekend stall".into()),
        }
    }

    #[tokio::test]
    async fn test_create_records_initial_history() {
        let f = fixture().await;
        let item = f.inventory.create(new_item(f.vendor, 50.0, 25.0)).await.unwrap();

        assert_eq!(item.total_value, 1250.0);
        assert!(item.is_available);
        assert_eq!(item.vendor.as_ref().unwrap().full_name, "Maria Santos");
        assert_eq!(item.quantity_history.len(), 1);

        let entry = &item.quantity_history[0];
        assert_eq!(entry.adjustment_type, AdjustmentType::Set);
        assert_eq!(entry.previous_quantity, 0.0);
        assert_eq!(entry.new_quantity, 50.0);
        assert_eq!(entry.reason, INITIAL_ADJUSTMENT_REASON);
        assert_eq!(entry.adjusted_by, "Maria Santos");
        assert_eq!(entry.inventory_item_id, item.id);
    }

    #[tokio::test]
    async fn test_supplied_history_is_kept() {
        let f = fixture().await;
        let mut input = new_item(f.vendor, 10.0, 2.0);
        input.quantity_history = Some(Vec::new());
        let item = f.inventory.create(input).await.unwrap();
        assert!(item.quantity_history.is_empty());
    }

    #[tokio::test]
    async fn test_adjust_quantity_appends_history() {
        let f = fixture().await;
        let item = f.inventory.create(new_item(f.vendor, 50.0, 25.0)).await.unwrap();

        let item = f
            .inventory
            .adjust_quantity(item.id, adjust(AdjustmentType::Subtract, 20.0))
            .await
            .unwrap();
        assert_eq!(item.quantity, 30.0);
        assert_eq!(item.total_value, 750.0);
        assert_eq!(item.quantity_history.len(), 2);

        let entry = &item.quantity_history[1];
        assert_eq!(entry.previous_quantity, 50.0);
        assert_eq!(entry.new_quantity, 30.0);
        assert_eq!(entry.notes.as_deref(), Some("weekend stall"));

        let item = f
            .inventory
            .adjust_quantity(item.id, adjust(AdjustmentType::Subtract, 100.0))
            .await
            .unwrap();
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.total_value, 0.0);
    }

    #[tokio::test]
    async fn test_update_recomputes_total_value() {
        let f = fixture().await;
        let item = f.inventory.create(new_item(f.vendor, 10.0, 2.0)).await.unwrap();

        let updated = f
            .inventory
            .update(
                item.id,
                InventoryPatch {
                    price_per_unit: Some(3.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_value, 35.0);
        assert_eq!(updated.quantity_history.len(), 1);

        let renamed = f
            .inventory
            .update(
                item.id,
                InventoryPatch {
                    product_name: Some("Banana Crisps".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.total_value, 35.0);
        assert_eq!(renamed.product_name, "Banana Crisps");
    }

    #[tokio::test]
    async fn test_source_submission_is_populated_and_detached_on_delete() {
        let f = fixture().await;
        let category = f
            .categories
            .create(NewWasteCategory {
                name: "Fruits".into(),
                description: "Fresh and processed fruits".into(),
                color: "#f59e0b".into(),
                icon: "SunIcon".into(),
                is_active: None,
            })
            .await
            .unwrap();
        let source = f
            .sources
            .create(NewSourceSubmission {
                vendor_id: f.vendor,
                category_id: category.id,
                title: "Overripe bananas".into(),
                description: "Two crates".into(),
                quantity: 25.0,
                unit: WasteUnit::Kg,
                condition: WasteCondition::Overripe,
                location: "Santos Farm".into(),
                pickup_date: "2024-12-15".into(),
                estimated_value: 500.0,
                image_url: String::new(),
            })
            .await
            .unwrap();

        let mut input = new_item(f.vendor, 5.0, 100.0);
        input.source_waste_submission_id = Some(source.id);
        let item = f.inventory.create(input).await.unwrap();
        assert_eq!(
            item.source_waste_submission.as_ref().map(|s| s.title.as_str()),
            Some("Overripe bananas")
        );

        f.sources.delete(source.id).await.unwrap();
        let item = f.inventory.get(item.id).await.unwrap();
        assert!(item.source_waste_submission_id.is_none());
        assert!(item.source_waste_submission.is_none());
    }

    #[tokio::test]
    async fn test_filters_and_missing_item() {
        let f = fixture().await;
        let mut hidden = new_item(f.vendor, 1.0, 1.0);
        hidden.is_available = Some(false);
        f.inventory.create(hidden).await.unwrap();
        f.inventory.create(new_item(f.vendor, 1.0, 1.0)).await.unwrap();

        let available = f
            .inventory
            .find(&InventoryFilter {
                vendor_id: Some(f.vendor),
                is_available: Some(true),
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 1);

        let missing = InventoryItemId::new(404);
        assert!(matches!(
            f.inventory
                .adjust_quantity(missing, adjust(AdjustmentType::Add, 1.0))
                .await,
            Err(MarketError::NotFound("Inventory item"))
        ));
    }

    #[tokio::test]
    async fn test_null_source_in_patch_unlinks_item() {
        let f = fixture().await;
        let category = f
            .categories
            .create(NewWasteCategory {
                name: "Vegetables".into(),
                description: "Leafy greens".into(),
                color: "#16a34a".into(),
                icon: "LeafIcon".into(),
                is_active: None,
            })
            .await
            .unwrap();
        let source = f
            .sources
            .create(NewSourceSubmission {
                vendor_id: f.vendor,
                category_id: category.id,
                title: "Wilted cabbage".into(),
                description: "One sack".into(),
                quantity: 10.0,
                unit: WasteUnit::Kg,
                condition: WasteCondition::SlightlyDamaged,
                location: "Santos Farm".into(),
                pickup_date: "2024-12-16".into(),
                estimated_value: 120.0,
                image_url: String::new(),
            })
            .await
            .unwrap();

        let mut input = new_item(f.vendor, 4.0, 30.0);
        input.source_waste_submission_id = Some(source.id);
        let item = f.inventory.create(input).await.unwrap();

        let renamed: InventoryPatch =
            serde_json::from_value(serde_json::json!({ "product_name": "Kimchi" })).unwrap();
        let item = f.inventory.update(item.id, renamed).await.unwrap();
        assert_eq!(item.source_waste_submission_id, Some(source.id));

        let unlink: InventoryPatch =
            serde_json::from_value(serde_json::json!({ "source_waste_submission_id": null }))
                .unwrap();
        let item = f.inventory.update(item.id, unlink).await.unwrap();
        assert!(item.source_waste_submission_id.is_none());
        assert!(item.source_waste_submission.is_none());
        assert_eq!(item.product_name, "Kimchi");
    }
}
