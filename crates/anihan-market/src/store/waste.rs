use super::{apply_update, delete_row, delete_rows, user_summary, NEWEST_FIRST};
use crate::ids::{SourceSubmissionId, WasteCategoryId, WasteSubmissionId, WasteTypeId};
use crate::waste::{
    NewSourceSubmission, NewWasteCategory, NewWasteSubmission, NewWasteType, ReviewDecision,
    SourceFilter, SourcePatch, SourceWasteSubmission, WasteCategory, WasteCategoryFilter,
    WasteCategoryPatch, WasteCategorySummary, WasteStats, WasteSubmission,
    WasteSubmissionFilter, WasteSubmissionPatch, WasteType, WasteTypeFilter, WasteTypePatch,
};
use crate::{timestamp, MarketError, Result};
use anihan_db::{params, Db, Row, Select, Update};
use tracing::info;

/// Waste types consumers choose from.
#[derive(Clone, Debug)]
pub struct WasteTypeStore {
    db: Db,
}

impl WasteTypeStore {
    const ENTITY: &'static str = "Waste type";

    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &WasteTypeFilter) -> Result<Vec<WasteType>> {
        let (sql, params) = Select::from("SELECT * FROM waste_types")
            .filter("category", filter.category)
            .order_by(NEWEST_FIRST)
            .build();
        Ok(self.db.query_as(&sql, &params).await?)
    }

    pub async fn find_by_id(&self, id: WasteTypeId) -> Result<Option<WasteType>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM waste_types WHERE id = ?", params![id])
            .await?)
    }

    pub async fn get(&self, id: WasteTypeId) -> Result<WasteType> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(Self::ENTITY))
    }

    pub async fn create(&self, input: NewWasteType) -> Result<WasteType> {
        input.validate()?;
        let result = self
            .db
            .execute(
                "INSERT INTO waste_types (name, description, image_url, category, damage_level)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    input.name,
                    input.description,
                    input.image_url,
                    input.category,
                    input.damage_level,
                ],
            )
            .await?;
        let id = WasteTypeId::new(result.last_insert_id);
        info!(waste_type_id = %id, "waste type created");
        self.get(id).await
    }

    pub async fn update(&self, id: WasteTypeId, patch: WasteTypePatch) -> Result<WasteType> {
        let update = Update::table("waste_types")
            .set_opt("name", patch.name)
            .set_opt("description", patch.description)
            .set_opt("image_url", patch.image_url)
            .set_opt("category", patch.category)
            .set_opt("damage_level", patch.damage_level);
        apply_update(&self.db, update, id, Self::ENTITY).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: WasteTypeId) -> Result<()> {
        delete_row(&self.db, "waste_types", id, Self::ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "waste_types").await
    }
}

/// Categories vendors file source submissions under.
#[derive(Clone, Debug)]
pub struct WasteCategoryStore {
    db: Db,
}

impl WasteCategoryStore {
    const ENTITY: &'static str = "Category";

    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &WasteCategoryFilter) -> Result<Vec<WasteCategory>> {
        let (sql, params) = Select::from("SELECT * FROM waste_categories")
            .filter("is_active", filter.is_active)
            .order_by(NEWEST_FIRST)
            .build();
        Ok(self.db.query_as(&sql, &params).await?)
    }

    pub async fn find_by_id(&self, id: WasteCategoryId) -> Result<Option<WasteCategory>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM waste_categories WHERE id = ?", params![id])
            .await?)
    }

    pub async fn get(&self, id: WasteCategoryId) -> Result<WasteCategory> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(Self::ENTITY))
    }

    pub async fn create(&self, input: NewWasteCategory) -> Result<WasteCategory> {
        input.validate()?;
        let result = self
            .db
            .execute(
                "INSERT INTO waste_categories (name, description, color, icon, is_active)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    input.name,
                    input.description,
                    input.color,
                    input.icon,
                    input.is_active.unwrap_or(true),
                ],
            )
            .await?;
        let id = WasteCategoryId::new(result.last_insert_id);
        info!(category_id = %id, "waste category created");
        self.get(id).await
    }

    pub async fn update(
        &self,
        id: WasteCategoryId,
        patch: WasteCategoryPatch,
    ) -> Result<WasteCategory> {
        let update = Update::table("waste_categories")
            .set_opt("name", patch.name)
            .set_opt("description", patch.description)
            .set_opt("color", patch.color)
            .set_opt("icon", patch.icon)
            .set_opt("is_active", patch.is_active);
        apply_update(&self.db, update, id, Self::ENTITY).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: WasteCategoryId) -> Result<()> {
        delete_row(&self.db, "waste_categories", id, Self::ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "waste_categories").await
    }
}

/// Waste submitted by consumers.
#[derive(Clone, Debug)]
pub struct WasteSubmissionStore {
    db: Db,
}

impl WasteSubmissionStore {
    const ENTITY: &'static str = "Submission";

    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &WasteSubmissionFilter) -> Result<Vec<WasteSubmission>> {
        let (sql, params) = Select::from("SELECT * FROM waste_submissions")
            .filter("user_id", filter.user_id)
            .filter("status", filter.status)
            .order_by(NEWEST_FIRST)
            .build();
        Ok(self.db.query_as(&sql, &params).await?)
    }

    pub async fn find_by_id(&self, id: WasteSubmissionId) -> Result<Option<WasteSubmission>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM waste_submissions WHERE id = ?", params![id])
            .await?)
    }

    pub async fn get(&self, id: WasteSubmissionId) -> Result<WasteSubmission> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(Self::ENTITY))
    }

    pub async fn create(&self, input: NewWasteSubmission) -> Result<WasteSubmission> {
        input.validate()?;
        let result = self
            .db
            .execute(
                "INSERT INTO waste_submissions (
                    user_id, waste_type_id, quantity, unit, description,
                    submitted_at, title, category, condition
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.user_id,
                    input.waste_type_id,
                    input.quantity,
                    input.unit,
                    input.description,
                    timestamp(),
                    input.title,
                    input.category,
                    input.condition,
                ],
            )
            .await?;
        let id = WasteSubmissionId::new(result.last_insert_id);
        info!(submission_id = %id, user_id = %input.user_id, "waste submitted");
        self.get(id).await
    }

    /// Update a submission. Moving to `processed` stamps `processed_at`.
    pub async fn update(
        &self,
        id: WasteSubmissionId,
        patch: WasteSubmissionPatch,
    ) -> Result<WasteSubmission> {
        patch.validate()?;
        let patch = patch.normalize(timestamp());
        let update = Update::table("waste_submissions")
            .set_opt("waste_type_id", patch.waste_type_id)
            .set_opt("quantity", patch.quantity)
            .set_opt("unit", patch.unit)
            .set_opt("description", patch.description)
            .set_opt("status", patch.status)
            .set_opt("processed_at", patch.processed_at)
            .set_opt("title", patch.title)
            .set_opt("category", patch.category)
            .set_opt("condition", patch.condition);
        apply_update(&self.db, update, id, Self::ENTITY).await?;
        self.get(id).await
    }

    /// Counts per status and total quantity over the filtered submissions.
    pub async fn stats(&self, filter: &WasteSubmissionFilter) -> Result<WasteStats> {
        let submissions = self.find(filter).await?;
        Ok(WasteStats::tally(&submissions))
    }

    pub async fn delete(&self, id: WasteSubmissionId) -> Result<()> {
        delete_row(&self.db, "waste_submissions", id, Self::ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "waste_submissions").await
    }
}

const SOURCE_SELECT: &str = "SELECT sws.*,
        u.full_name AS vendor_full_name, u.email AS vendor_email,
        u.phone AS vendor_phone, u.address AS vendor_address,
        wc.name AS category_name, wc.description AS category_description,
        wc.color AS category_color, wc.icon AS category_icon
    FROM source_waste_submissions sws
    LEFT JOIN users u ON sws.vendor_id = u.id
    LEFT JOIN waste_categories wc ON sws.category_id = wc.id";

/// Waste offered by vendors, with vendor and category populated.
#[derive(Clone, Debug)]
pub struct SourceSubmissionStore {
    db: Db,
}

impl SourceSubmissionStore {
    const ENTITY: &'static str = "Submission";

    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &SourceFilter) -> Result<Vec<SourceWasteSubmission>> {
        let (sql, params) = Select::from(SOURCE_SELECT)
            .filter("sws.vendor_id", filter.vendor_id)
            .filter("sws.status", filter.status)
            .order_by("sws.created_at DESC, sws.id DESC")
            .build();
        let result = self.db.query(&sql, &params).await?;
        result.iter().map(populate_source).collect()
    }

    pub async fn find_by_id(&self, id: SourceSubmissionId) -> Result<Option<SourceWasteSubmission>> {
        let result = self
            .db
            .query(&format!("{SOURCE_SELECT} WHERE sws.id = ?"), params![id])
            .await?;
        result.first().map(populate_source).transpose()
    }

    pub async fn get(&self, id: SourceSubmissionId) -> Result<SourceWasteSubmission> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(Self::ENTITY))
    }

    pub async fn create(&self, input: NewSourceSubmission) -> Result<SourceWasteSubmission> {
        input.validate()?;
        let result = self
            .db
            .execute(
                "INSERT INTO source_waste_submissions (
                    vendor_id, category_id, title, description, quantity, unit,
                    condition, location, pickup_date, estimated_value, image_url, submitted_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.vendor_id,
                    input.category_id,
                    input.title,
                    input.description,
                    input.quantity,
                    input.unit,
                    input.condition,
                    input.location,
                    input.pickup_date,
                    input.estimated_value,
                    input.image_url,
                    timestamp(),
                ],
            )
            .await?;
        let id = SourceSubmissionId::new(result.last_insert_id);
        info!(source_submission_id = %id, vendor_id = %input.vendor_id, "source waste submitted");
        self.get(id).await
    }

    pub async fn update(
        &self,
        id: SourceSubmissionId,
        patch: SourcePatch,
    ) -> Result<SourceWasteSubmission> {
        patch.validate()?;
        apply_update(&self.db, source_update(patch), id, Self::ENTITY).await?;
        self.get(id).await
    }

    /// Move a submission through the review workflow.
    pub async fn review(
        &self,
        id: SourceSubmissionId,
        decision: ReviewDecision,
    ) -> Result<SourceWasteSubmission> {
        let current = self.get(id).await?;
        let next = decision.status;
        let patch = decision.into_patch(current.status, timestamp())?;
        apply_update(&self.db, source_update(patch), id, Self::ENTITY).await?;
        info!(source_submission_id = %id, from = %current.status, to = %next, "source submission reviewed");
        self.get(id).await
    }

    pub async fn delete(&self, id: SourceSubmissionId) -> Result<()> {
        delete_row(&self.db, "source_waste_submissions", id, Self::ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "source_waste_submissions").await
    }
}

fn source_update(patch: SourcePatch) -> Update {
    Update::table("source_waste_submissions")
        .set_opt("title", patch.title)
        .set_opt("description", patch.description)
        .set_opt("quantity", patch.quantity)
        .set_opt("unit", patch.unit)
        .set_opt("condition", patch.condition)
        .set_opt("location", patch.location)
        .set_opt("pickup_date", patch.pickup_date)
        .set_opt("estimated_value", patch.estimated_value)
        .set_opt("image_url", patch.image_url)
        .set_opt("status", patch.status)
        .set_opt("admin_notes", patch.admin_notes)
        .set_opt("rejection_reason", patch.rejection_reason)
        .set_opt("actual_value", patch.actual_value)
        .set_opt("processed_at", patch.processed_at)
}

fn populate_source(row: &Row) -> Result<SourceWasteSubmission> {
    let mut submission: SourceWasteSubmission = row.deserialize()?;
    submission.vendor = user_summary(row, "vendor", submission.vendor_id);
    submission.category = row.text("category_name").map(|name| WasteCategorySummary {
        id: submission.category_id,
        name,
        description: row.text("category_description").unwrap_or_default(),
        color: row.text("category_color").unwrap_or_default(),
        icon: row.text("category_icon").unwrap_or_default(),
    });
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use crate::store::UserStore;
    use crate::user::{NewUser, Role};
    use crate::waste::{
        DamageLevel, SourceStatus, SubmissionStatus, WasteCondition, WasteKind, WasteUnit,
    };

    struct Fixture {
        db: Db,
        vendor: UserId,
        category: WasteCategoryId,
        waste_type: WasteTypeId,
        types: WasteTypeStore,
        categories: WasteCategoryStore,
        submissions: WasteSubmissionStore,
        sources: SourceSubmissionStore,
    }

    async fn fixture() -> Fixture {
        let db = Db::open_in_memory().await.unwrap();
        let vendor = UserStore::new(db.clone())
            .create(NewUser {
                email: "vendor@anihan.com".into(),
                password_hash: "hash".into(),
                full_name: "Maria Santos".into(),
                role: Role::Vendor,
                phone: "09171234567".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let categories = WasteCategoryStore::new(db.clone());
        let category = categories
            .create(NewWasteCategory {
                name: "Fruits".into(),
                description: "Fresh and processed fruits".into(),
                color: "#f59e0b".into(),
                icon: "SunIcon".into(),
                is_active: None,
            })
            .await
            .unwrap();
        let types = WasteTypeStore::new(db.clone());
        let waste_type = types
            .create(NewWasteType {
                name: "Banana".into(),
                description: "Overripe bananas".into(),
                image_url: String::new(),
                category: WasteKind::Fruit,
                damage_level: DamageLevel::Moderate,
            })
            .await
            .unwrap();

        Fixture {
            vendor: vendor.id,
            category: category.id,
            waste_type: waste_type.id,
            types,
            categories,
            submissions: WasteSubmissionStore::new(db.clone()),
            sources: SourceSubmissionStore::new(db.clone()),
            db,
        }
    }

    fn new_source(f: &Fixture) -> NewSourceSubmission {
        NewSourceSubmission {
            vendor_id: f.vendor,
            category_id: f.category,
            title: "Overripe bananas".into(),
            description: "Two crates".into(),
            quantity: 25.0,
            unit: WasteUnit::Kg,
            condition: WasteCondition::Overripe,
            location: "Santos Farm".into(),
            pickup_date: "2024-12-15".into(),
            estimated_value: 500.0,
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_source_reads_populate_vendor_and_category() {
        let f = fixture().await;
        let created = f.sources.create(new_source(&f)).await.unwrap();
        assert_eq!(created.status, SourceStatus::Pending);

        let vendor = created.vendor.as_ref().unwrap();
        assert_eq!(vendor.full_name, "Maria Santos");
        assert_eq!(vendor.phone, "09171234567");
        let category = created.category.as_ref().unwrap();
        assert_eq!(category.name, "Fruits");
        assert_eq!(category.icon, "SunIcon");

        let listed = f
            .sources
            .find(&SourceFilter {
                vendor_id: Some(f.vendor),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].vendor.is_some());
    }

    #[tokio::test]
    async fn test_review_workflow() {
        let f = fixture().await;
        let created = f.sources.create(new_source(&f)).await.unwrap();

        let approved = f
            .sources
            .review(
                created.id,
                ReviewDecision {
                    status: SourceStatus::Approved,
                    admin_notes: Some("Pickup scheduled".into()),
                    rejection_reason: None,
                    actual_value: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(approved.status, SourceStatus::Approved);
        assert_eq!(approved.admin_notes, "Pickup scheduled");

        let processed = f
            .sources
            .review(
                created.id,
                ReviewDecision {
                    status: SourceStatus::Processed,
                    admin_notes: None,
                    rejection_reason: None,
                    actual_value: Some(450.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(processed.status, SourceStatus::Processed);
        assert!(processed.processed_at.is_some());
        assert_eq!(processed.actual_value, Some(450.0));

        let err = f
            .sources
            .review(
                created.id,
                ReviewDecision {
                    status: SourceStatus::Approved,
                    admin_notes: None,
                    rejection_reason: None,
                    actual_value: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_deleting_category_cascades_to_sources() {
        let f = fixture().await;
        let created = f.sources.create(new_source(&f)).await.unwrap();
        f.categories.delete(f.category).await.unwrap();
        assert!(f.sources.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submission_stats_and_processing() {
        let f = fixture().await;
        let submit = |quantity: f64| NewWasteSubmission {
            user_id: f.vendor,
            waste_type_id: f.waste_type,
            quantity,
            unit: WasteUnit::Kg,
            description: String::new(),
            title: String::new(),
            category: String::new(),
            condition: String::new(),
        };

        let first = f.submissions.create(submit(10.0)).await.unwrap();
        f.submissions.create(submit(2.5)).await.unwrap();
        assert!(first.processed_at.is_none());
        assert!(!first.submitted_at.is_empty());

        let processed = f
            .submissions
            .update(
                first.id,
                WasteSubmissionPatch {
                    status: Some(SubmissionStatus::Processed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(processed.processed_at.is_some());

        let stats = f
            .submissions
            .stats(&WasteSubmissionFilter::default())
            .await
            .unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.total_quantity, 12.5);

        assert!(matches!(
            f.submissions.create(submit(0.0)).await,
            Err(MarketError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_waste_type_update_filter_and_delete() {
        let f = fixture().await;
        let rice = f
            .types
            .create(NewWasteType {
                name: "Rice".into(),
                description: "Leftover cooked rice".into(),
                image_url: String::new(),
                category: WasteKind::Grain,
                damage_level: DamageLevel::Slight,
            })
            .await
            .unwrap();

        let updated = f
            .types
            .update(
                rice.id,
                WasteTypePatch {
                    name: Some("Day-old rice".into()),
                    damage_level: Some(DamageLevel::Severe),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Day-old rice");
        assert_eq!(updated.damage_level, DamageLevel::Severe);
        assert_eq!(updated.description, "Leftover cooked rice");
        assert_eq!(f.types.get(rice.id).await.unwrap(), updated);

        let grains = f
            .types
            .find(&WasteTypeFilter {
                category: Some(WasteKind::Grain),
            })
            .await
            .unwrap();
        assert_eq!(grains.len(), 1);
        assert_eq!(grains[0].id, rice.id);
        assert_eq!(f.types.find(&WasteTypeFilter::default()).await.unwrap().len(), 2);

        f.types.delete(rice.id).await.unwrap();
        assert!(matches!(
            f.types.get(rice.id).await,
            Err(MarketError::NotFound("Waste type"))
        ));
        assert!(matches!(
            f.types.delete(rice.id).await,
            Err(MarketError::NotFound("Waste type"))
        ));
        assert!(f.types.get(f.waste_type).await.is_ok());
    }

    #[tokio::test]
    async fn test_category_active_filter_and_update() {
        let f = fixture().await;
        let grains = f
            .categories
            .create(NewWasteCategory {
                name: "Grains".into(),
                description: "Rice and bread".into(),
                color: "#a16207".into(),
                icon: "CakeIcon".into(),
                is_active: Some(false),
            })
            .await
            .unwrap();
        assert!(!grains.is_active);

        let active = WasteCategoryFilter {
            is_active: Some(true),
        };
        let listed = f.categories.find(&active).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, f.category);

        let inactive = WasteCategoryFilter {
            is_active: Some(false),
        };
        assert_eq!(f.categories.find(&inactive).await.unwrap()[0].id, grains.id);

        let updated = f
            .categories
            .update(
                grains.id,
                WasteCategoryPatch {
                    is_active: Some(true),
                    color: Some("#ca8a04".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_active);
        assert_eq!(updated.color, "#ca8a04");
        assert_eq!(updated.name, "Grains");
        assert_eq!(f.categories.find(&active).await.unwrap().len(), 2);
        assert!(f.categories.find(&inactive).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_row_untouched() {
        let f = fixture().await;
        f.db.execute(
            "UPDATE waste_categories SET updated_at = '2024-01-01 00:00:00' WHERE id = ?",
            params![f.category],
        )
        .await
        .unwrap();
        let before = f.categories.get(f.category).await.unwrap();

        let after = f
            .categories
            .update(f.category, WasteCategoryPatch::default())
            .await
            .unwrap();
        assert_eq!(after, before);
        assert_eq!(after.updated_at, "2024-01-01 00:00:00");

        let renamed = f
            .categories
            .update(
                f.category,
                WasteCategoryPatch {
                    name: Some("Fruit".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_ne!(renamed.updated_at, "2024-01-01 00:00:00");

        let missing = WasteCategoryId::new(404);
        assert!(matches!(
            f.categories.update(missing, WasteCategoryPatch::default()).await,
            Err(MarketError::NotFound("Category"))
        ));
    }
}
