//! Demo data.
//!
//! Clears every table and loads accounts, categories, waste types, products,
//! submissions and inventory for a small Butuan City marketplace.

use anihan_auth::PasswordHasher;
use anihan_market::catalog::{NewInventoryItem, NewProduct, ProductCategory, ProductUnit};
use anihan_market::user::{NewUser, Role, VendorStatus};
use anihan_market::waste::{
    DamageLevel, NewSourceSubmission, NewWasteCategory, NewWasteSubmission, NewWasteType,
    SourcePatch, SourceStatus, SubmissionStatus, WasteCondition, WasteKind, WasteSubmissionPatch,
    WasteUnit,
};
use anihan_market::Market;
use anyhow::Result;
use serde::Serialize;
use tracing::info;

const PROCESSED_AT: &str = "2024-12-13T19:30:00.000Z";

/// Rows written per table.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct SeedSummary {
    pub users: usize,
    pub waste_categories: usize,
    pub waste_types: usize,
    pub products: usize,
    pub waste_submissions: usize,
    pub source_submissions: usize,
    pub inventory_items: usize,
}

/// Replace the contents of the database with the demo data set.
pub async fn seed(market: &Market) -> Result<SeedSummary> {
    market.clear_all().await?;
    let hasher = PasswordHasher::default();
    let mut summary = SeedSummary::default();

    // Users
    let admin_password = hasher.hash("admin123")?;
    let vendor_password = hasher.hash("vendor123")?;
    let user_password = hasher.hash("user123")?;

    let vendor = |email: &str, name: &str, phone: &str, address: &str, business: &str, kind: &str, years: &str| NewUser {
        email: email.into(),
        password_hash: vendor_password.clone(),
        full_name: name.into(),
        role: Role::Vendor,
        phone: phone.into(),
        address: address.into(),
        is_active: Some(true),
        vendor_status: Some(VendorStatus::Approved),
        business_name: business.into(),
        business_type: kind.into(),
        years_in_business: years.into(),
        ..Default::default()
    };

    let mut users = Vec::new();
    for new_user in [
        NewUser {
            email: "admin@anihan.com".into(),
            password_hash: admin_password,
            full_name: "Admin User".into(),
            role: Role::Admin,
            phone: "+63 912 345 6789".into(),
            address: "Butuan City, Agusan del Norte".into(),
            is_active: Some(true),
            ..Default::default()
        },
        vendor(
            "vendor@anihan.com",
            "Maria Santos",
            "+63 912 345 6787",
            "Public Market, Butuan City",
            "Santos Farm Produce",
            "Farm",
            "5",
        ),
        NewUser {
            email: "user@anihan.com".into(),
            password_hash: user_password,
            full_name: "Pedro Garcia".into(),
            role: Role::User,
            phone: "+63 912 345 6786".into(),
            address: "Residential Area, Butuan City".into(),
            is_active: Some(true),
            ..Default::default()
        },
        vendor(
            "vendor2@anihan.com",
            "Juan Dela Cruz",
            "+63 912 345 6785",
            "Farmers Market, Butuan City",
            "Dela Cruz Market",
            "Market",
            "3",
        ),
        vendor(
            "vendor3@anihan.com",
            "Ana Rodriguez",
            "+63 912 345 6784",
            "Central Market, Butuan City",
            "Rodriguez Organic Farm",
            "Farm",
            "7",
        ),
    ] {
        users.push(market.users.create(new_user).await?);
    }
    summary.users = users.len();
    let (maria, juan, ana) = (users[1].id, users[3].id, users[4].id);

    // Waste categories
    let mut categories = Vec::new();
    for (name, description, color, icon) in [
        ("Fruits", "Fresh and processed fruits", "#f59e0b", "SunIcon"),
        ("Vegetables", "Fresh and processed vegetables", "#10b981", "SunIcon"),
        ("Grains", "Rice, wheat, and other grains", "#8b5cf6", "CubeIcon"),
        ("Dairy", "Milk, cheese, and dairy products", "#06b6d4", "HeartIcon"),
        ("Meat", "Fresh and processed meat products", "#ef4444", "FireIcon"),
    ] {
        let category = market
            .waste_categories
            .create(NewWasteCategory {
                name: name.into(),
                description: description.into(),
                color: color.into(),
                icon: icon.into(),
                is_active: Some(true),
            })
            .await?;
        categories.push(category);
    }
    summary.waste_categories = categories.len();

    // Waste types
    let mut waste_types = Vec::new();
    for (name, description, slug, category, damage_level) in [
        ("Overripe Bananas", "Bananas that are too ripe for sale", "overripe-bananas", WasteKind::Fruit, DamageLevel::Moderate),
        ("Bruised Tomatoes", "Tomatoes with minor bruises", "bruised-tomatoes", WasteKind::Vegetable, DamageLevel::Slight),
        ("Damaged Mangoes", "Mangoes with severe damage", "damaged-mangoes", WasteKind::Fruit, DamageLevel::Severe),
        ("Wilted Lettuce", "Lettuce that has started to wilt", "wilted-lettuce", WasteKind::Vegetable, DamageLevel::Moderate),
        ("Damaged Apples", "Apples with bruises and cuts", "damaged-apples", WasteKind::Fruit, DamageLevel::Moderate),
        ("Overripe Papayas", "Papayas that are too soft for sale", "overripe-papayas", WasteKind::Fruit, DamageLevel::Moderate),
    ] {
        let waste_type = market
            .waste_types
            .create(NewWasteType {
                name: name.into(),
                description: description.into(),
                image_url: format!("/images/{slug}.jpg"),
                category,
                damage_level,
            })
            .await?;
        waste_types.push(waste_type);
    }
    summary.waste_types = waste_types.len();

    // Products
    for (name, description, price, category, image, stock, unit) in [
        ("Organic Banana Compost", "Rich compost made from overripe bananas, perfect for organic gardening", 150.0, ProductCategory::Compost, "/photos/banana compost.jpg", 25, ProductUnit::Kg),
        ("Tomato Fertilizer", "Natural fertilizer derived from bruised tomatoes, rich in nutrients", 200.0, ProductCategory::Fertilizer, "/photos/tomato fertilizer.jpg", 15, ProductUnit::Bags),
        ("Mango Jam", "Delicious jam made from damaged mangoes, sweet and natural", 80.0, ProductCategory::PreservedFood, "/photos/mango jam.webp", 30, ProductUnit::Bottles),
        ("Vegetable Compost", "Mixed vegetable compost from various damaged produce", 120.0, ProductCategory::Compost, "/photos/vegetable compost.webp", 20, ProductUnit::Kg),
        ("Fruit Fertilizer", "Nutrient-rich fertilizer made from fruit waste", 180.0, ProductCategory::Fertilizer, "/photos/overripe banana.jpg", 12, ProductUnit::Bags),
        ("Apple Preserves", "Sweet preserves made from bruised apples", 90.0, ProductCategory::PreservedFood, "/photos/damage apples.webp", 0, ProductUnit::Jars),
    ] {
        market
            .products
            .create(NewProduct {
                name: name.into(),
                description: description.into(),
                price,
                category,
                image_url: image.into(),
                stock_quantity: stock,
                unit,
                is_available: None,
            })
            .await?;
        summary.products += 1;
    }

    // Consumer-side submissions
    for (type_index, quantity, unit, description, status, category, condition) in [
        (0, 25.0, WasteUnit::Kg, "Bananas from yesterday's harvest", SubmissionStatus::Pending, "fruit", "overripe"),
        (1, 15.0, WasteUnit::Pieces, "Tomatoes with minor bruises", SubmissionStatus::Approved, "vegetable", "slightly_damaged"),
        (2, 8.0, WasteUnit::Pieces, "Mangoes damaged during transport", SubmissionStatus::Processed, "fruit", "bruised"),
    ] {
        let waste_type = &waste_types[type_index];
        let submission = market
            .waste_submissions
            .create(NewWasteSubmission {
                user_id: maria,
                waste_type_id: waste_type.id,
                quantity,
                unit,
                description: description.into(),
                title: waste_type.name.clone(),
                category: category.into(),
                condition: condition.into(),
            })
            .await?;
        if status != SubmissionStatus::Pending {
            market
                .waste_submissions
                .update(
                    submission.id,
                    WasteSubmissionPatch {
                        status: Some(status),
                        processed_at: (status == SubmissionStatus::Processed)
                            .then(|| PROCESSED_AT.to_string()),
                        ..Default::default()
                    },
                )
                .await?;
        }
        summary.waste_submissions += 1;
    }

    // Vendor source submissions
    let mut sources = Vec::new();
    for (vendor_id, category_index, title, description, quantity, unit, condition, location, pickup, value, slug, status) in [
        (maria, 0, "Overripe Bananas", "Bananas from yesterday's harvest that are too ripe for sale", 25.0, WasteUnit::Kg, WasteCondition::Overripe, "Public Market, Butuan City", "2024-12-20T10:00:00.000Z", 500.0, "overripe-bananas", SourceStatus::Pending),
        (juan, 1, "Bruised Tomatoes", "Tomatoes with minor bruises from transport", 15.0, WasteUnit::Pieces, WasteCondition::SlightlyDamaged, "Farmers Market, Butuan City", "2024-12-21T14:00:00.000Z", 300.0, "bruised-tomatoes", SourceStatus::Approved),
        (ana, 0, "Damaged Mangoes", "Mangoes damaged during transport", 8.0, WasteUnit::Pieces, WasteCondition::Bruised, "Central Market, Butuan City", "2024-12-19T09:00:00.000Z", 200.0, "damaged-mangoes", SourceStatus::Processed),
    ] {
        let category = &categories[category_index];
        let mut source = market
            .source_submissions
            .create(NewSourceSubmission {
                vendor_id,
                category_id: category.id,
                title: title.into(),
                description: description.into(),
                quantity,
                unit,
                condition,
                location: location.into(),
                pickup_date: pickup.into(),
                estimated_value: value,
                image_url: format!("/images/{slug}.jpg"),
            })
            .await?;
        if status != SourceStatus::Pending {
            source = market
                .source_submissions
                .update(
                    source.id,
                    SourcePatch {
                        status: Some(status),
                        processed_at: (status == SourceStatus::Processed)
                            .then(|| PROCESSED_AT.to_string()),
                        ..Default::default()
                    },
                )
                .await?;
        }
        sources.push(source);
    }
    summary.source_submissions = sources.len();

    // Inventory, each with its initial history entry
    for (source_index, name, description, category, quantity, unit, price) in [
        (0, "Banana Compost", "High-quality compost made from overripe bananas", ProductCategory::Compost, 50.0, ProductUnit::Kg, 25.0),
        (1, "Tomato Fertilizer", "Organic fertilizer made from bruised tomatoes", ProductCategory::Fertilizer, 20.0, ProductUnit::Bags, 150.0),
        (2, "Mango Jam", "Sweet jam made from damaged mangoes", ProductCategory::PreservedFood, 15.0, ProductUnit::Jars, 80.0),
    ] {
        market
            .inventory
            .create(NewInventoryItem {
                vendor_id: maria,
                product_name: name.into(),
                description: description.into(),
                category,
                quantity,
                unit,
                price_per_unit: price,
                source_waste_submission_id: Some(sources[source_index].id),
                image_url: "/placeholder-image.svg".into(),
                is_available: Some(true),
                quantity_history: None,
            })
            .await?;
        summary.inventory_items += 1;
    }

    info!(?summary, "database seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anihan_db::Db;
    use anihan_market::catalog::{InventoryFilter, ProductFilter};
    use anihan_market::user::UserFilter;
    use anihan_market::waste::{SourceFilter, WasteSubmissionFilter};

    #[tokio::test]
    async fn test_seed_loads_demo_data() {
        let market = Market::new(Db::open_in_memory().await.unwrap());
        let summary = seed(&market).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                users: 5,
                waste_categories: 5,
                waste_types: 6,
                products: 6,
                waste_submissions: 3,
                source_submissions: 3,
                inventory_items: 3,
            }
        );

        let vendors = market
            .users
            .find(&UserFilter {
                role: Some(Role::Vendor),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(vendors.len(), 3);
        assert!(vendors.iter().all(|v| v.is_approved_vendor()));

        let products = market.products.find(&ProductFilter::default()).await.unwrap();
        let preserves = products.iter().find(|p| p.name == "Apple Preserves").unwrap();
        assert!(!preserves.is_available);

        let stats = market
            .waste_submissions
            .stats(&WasteSubmissionFilter::default())
            .await
            .unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.total_quantity, 48.0);

        let processed = market
            .source_submissions
            .find(&SourceFilter {
                status: Some(SourceStatus::Processed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].processed_at.as_deref(), Some(PROCESSED_AT));

        let inventory = market.inventory.find(&InventoryFilter::default()).await.unwrap();
        assert_eq!(inventory.len(), 3);
        for item in &inventory {
            assert_eq!(item.quantity_history.len(), 1);
            assert_eq!(item.quantity_history[0].adjusted_by, "Maria Santos");
            assert_eq!(item.total_value, item.quantity * item.price_per_unit);
        }
    }

    #[tokio::test]
    async fn test_seed_replaces_existing_rows() {
        let market = Market::new(Db::open_in_memory().await.unwrap());
        seed(&market).await.unwrap();
        seed(&market).await.unwrap();
        let users = market.users.find(&UserFilter::default()).await.unwrap();
        assert_eq!(users.len(), 5);
    }
}
