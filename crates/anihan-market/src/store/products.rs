use super::{apply_update, delete_row, delete_rows, NEWEST_FIRST};
use crate::catalog::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::ids::ProductId;
use crate::{MarketError, Result};
use anihan_db::{params, Db, Select, Update};
use tracing::info;

const ENTITY: &str = "Product";

/// Products for sale.
#[derive(Clone, Debug)]
pub struct ProductStore {
    db: Db,
}

impl ProductStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let (sql, params) = Select::from("SELECT * FROM products")
            .filter("category", filter.category)
            .filter("is_available", filter.is_available)
            .order_by(NEWEST_FIRST)
            .build();
        Ok(self.db.query_as(&sql, &params).await?)
    }

    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM products WHERE id = ?", params![id])
            .await?)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(ENTITY))
    }

    /// Create a product. It is only available when it has stock.
    pub async fn create(&self, input: NewProduct) -> Result<Product> {
        input.validate()?;
        let is_available = input.availability();

        let result = self
            .db
            .execute(
                "INSERT INTO products (
                    name, description, price, category, image_url,
                    stock_quantity, unit, is_available
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.name,
                    input.description,
                    input.price,
                    input.category,
                    input.image_url,
                    input.stock_quantity,
                    input.unit,
                    is_available,
                ],
            )
            .await?;

        let id = ProductId::new(result.last_insert_id);
        info!(product_id = %id, is_available, "product created");
        self.get(id).await
    }

    /// Update a product. Setting stock to zero also takes it off sale.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        patch.validate()?;
        let patch = patch.normalize();
        let update = Update::table("products")
            .set_opt("name", patch.name)
            .set_opt("description", patch.description)
            .set_opt("price", patch.price)
            .set_opt("category", patch.category)
            .set_opt("image_url", patch.image_url)
            .set_opt("stock_quantity", patch.stock_quantity)
            .set_opt("unit", patch.unit)
            .set_opt("is_available", patch.is_available);
        apply_update(&self.db, update, id, ENTITY).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<()> {
        delete_row(&self.db, "products", id, ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "products").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductCategory, ProductUnit};

    fn new_product(name: &str, stock: i64, category: ProductCategory) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: "Made from food waste".into(),
            price: 85.5,
            category,
            image_url: String::new(),
            stock_quantity: stock,
            unit: ProductUnit::Bags,
            is_available: None,
        }
    }

    async fn store() -> ProductStore {
        ProductStore::new(Db::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_create_sets_availability_from_stock() {
        let products = store().await;
        let stocked = products
            .create(new_product("Compost", 10, ProductCategory::Compost))
            .await
            .unwrap();
        assert!(stocked.is_available);
        assert_eq!(stocked.price, 85.5);

        let empty = products
            .create(new_product("Fertilizer", 0, ProductCategory::Fertilizer))
            .await
            .unwrap();
        assert!(!empty.is_available);
    }

    #[tokio::test]
    async fn test_zero_stock_update_marks_unavailable() {
        let products = store().await;
        let product = products
            .create(new_product("Compost", 10, ProductCategory::Compost))
            .await
            .unwrap();

        let updated = products
            .update(
                product.id,
                ProductPatch {
                    stock_quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock_quantity, 0);
        assert!(!updated.is_available);
    }

    #[tokio::test]
    async fn test_find_filters_newest_first() {
        let products = store().await;
        let first = products
            .create(new_product("Compost", 10, ProductCategory::Compost))
            .await
            .unwrap();
        let second = products
            .create(new_product("More Compost", 5, ProductCategory::Compost))
            .await
            .unwrap();
        products
            .create(new_product("Jam", 0, ProductCategory::PreservedFood))
            .await
            .unwrap();

        let compost = products
            .find(&ProductFilter {
                category: Some(ProductCategory::Compost),
                is_available: None,
            })
            .await
            .unwrap();
        assert_eq!(
            compost.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        let unavailable = products
            .find(&ProductFilter {
                category: None,
                is_available: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].name, "Jam");
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let products = store().await;
        let mut input = new_product("Compost", 1, ProductCategory::Compost);
        input.price = -3.0;
        assert!(matches!(
            products.create(input).await,
            Err(MarketError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let products = store().await;
        let product = products
            .create(new_product("Compost", 1, ProductCategory::Compost))
            .await
            .unwrap();
        products.delete(product.id).await.unwrap();
        assert!(products.find_by_id(product.id).await.unwrap().is_none());
        assert!(matches!(
            products.delete(product.id).await,
            Err(MarketError::NotFound("Product"))
        ));
    }

    #[tokio::test]
    async fn test_update_without_fields_returns_row_unchanged() {
        let products = store().await;
        let product = products
            .create(new_product("Compost", 10, ProductCategory::Compost))
            .await
            .unwrap();
        products
            .db
            .execute(
                "UPDATE products SET updated_at = '2024-01-01 00:00:00' WHERE id = ?",
                params![product.id],
            )
            .await
            .unwrap();
        let before = products.get(product.id).await.unwrap();

        let after = products
            .update(product.id, ProductPatch::default())
            .await
            .unwrap();
        assert_eq!(after, before);
        assert_eq!(after.updated_at, "2024-01-01 00:00:00");
        assert!(after.is_available);
    }
}
