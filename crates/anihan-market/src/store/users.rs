use super::{apply_update, delete_row, delete_rows, NEWEST_FIRST};
use crate::ids::UserId;
use crate::user::{NewUser, User, UserFilter, UserPatch};
use crate::{MarketError, Result};
use anihan_db::{params, Db, Select, Update};
use tracing::info;

const ENTITY: &str = "User";

/// Accounts.
#[derive(Clone, Debug)]
pub struct UserStore {
    db: Db,
}

impl UserStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn find(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let (sql, params) = Select::from("SELECT * FROM users")
            .filter("role", filter.role)
            .filter("is_active", filter.is_active)
            .order_by(NEWEST_FIRST)
            .build();
        Ok(self.db.query_as(&sql, &params).await?)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM users WHERE id = ?", params![id])
            .await?)
    }

    /// Look an account up by its login email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .db
            .query_optional("SELECT * FROM users WHERE email = ?", params![email])
            .await?)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or(MarketError::NotFound(ENTITY))
    }

    /// Create an account. Emails are unique.
    pub async fn create(&self, input: NewUser) -> Result<User> {
        input.validate()?;
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(MarketError::DuplicateEmail(input.email));
        }

        let result = self
            .db
            .execute(
                "INSERT INTO users (
                    email, password, full_name, role, phone, address, profile_photo,
                    is_active, vendor_status, business_name, business_type,
                    business_license, years_in_business, approval_notes, approved_by, approved_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.email,
                    input.password_hash,
                    input.full_name,
                    input.role,
                    input.phone,
                    input.address,
                    input.profile_photo,
                    input.is_active.unwrap_or(true),
                    input.vendor_status,
                    input.business_name,
                    input.business_type,
                    input.business_license,
                    input.years_in_business,
                    input.approval_notes,
                    input.approved_by,
                    input.approved_at,
                ],
            )
            .await?;

        let id = UserId::new(result.last_insert_id);
        info!(user_id = %id, role = %input.role, "user created");
        self.get(id).await
    }

    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User> {
        let update = Update::table("users")
            .set_opt("email", patch.email)
            .set_opt("password", patch.password_hash)
            .set_opt("full_name", patch.full_name)
            .set_opt("role", patch.role)
            .set_opt("phone", patch.phone)
            .set_opt("address", patch.address)
            .set_opt("profile_photo", patch.profile_photo)
            .set_opt("is_active", patch.is_active)
            .set_opt("vendor_status", patch.vendor_status)
            .set_opt("business_name", patch.business_name)
            .set_opt("business_type", patch.business_type)
            .set_opt("business_license", patch.business_license)
            .set_opt("years_in_business", patch.years_in_business)
            .set_opt("approval_notes", patch.approval_notes)
            .set_opt("approved_by", patch.approved_by)
            .set_opt("approved_at", patch.approved_at);
        apply_update(&self.db, update, id, ENTITY).await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: UserId) -> Result<()> {
        delete_row(&self.db, "users", id, ENTITY).await
    }

    pub async fn delete_all(&self) -> Result<u64> {
        delete_rows(&self.db, "users").await
    }
}
