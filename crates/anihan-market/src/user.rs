//! Marketplace accounts.

use crate::ids::UserId;
use crate::serde_util;
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// What an account may do on the platform.
    #[derive(Default, PartialOrd, Ord)]
    Role {
        /// Consumer placing orders.
        #[default]
        User => "user",
        /// Producer submitting waste and selling inventory.
        Vendor => "vendor",
        /// Platform administrator.
        Admin => "admin",
    }
}

impl Role {
    /// Privilege level; higher levels include the lower ones.
    pub fn level(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::Vendor => 1,
            Role::Admin => 2,
        }
    }

    /// Check if this role has at least the privileges of `other`.
    pub fn includes(&self, other: Role) -> bool {
        self.level() >= other.level()
    }

    /// Whether a freshly registered account with this role can sign in
    /// before an administrator reviews it.
    pub fn active_on_registration(&self) -> bool {
        matches!(self, Role::User)
    }
}

labeled_enum! {
    /// Review state of a vendor application.
    VendorStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// A platform account.
///
/// The password hash is read from storage but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "password", skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub address: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub profile_photo: String,
    #[serde(deserialize_with = "serde_util::flag")]
    pub is_active: bool,
    #[serde(default)]
    pub vendor_status: Option<VendorStatus>,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub business_name: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub business_type: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub business_license: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub years_in_business: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub approval_notes: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub approved_by: String,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// Check if the account is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if the account is a vendor whose application was approved.
    pub fn is_approved_vendor(&self) -> bool {
        self.role == Role::Vendor && self.vendor_status == Some(VendorStatus::Approved)
    }

    /// The public fields embedded in related records.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

/// Contact details of a user embedded in submissions, inventory and orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Fields for creating an account. The password must already be hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub phone: String,
    pub address: String,
    pub profile_photo: String,
    pub is_active: Option<bool>,
    pub vendor_status: Option<VendorStatus>,
    pub business_name: String,
    pub business_type: String,
    pub business_license: String,
    pub years_in_business: String,
    pub approval_notes: String,
    pub approved_by: String,
    pub approved_at: Option<String>,
}

impl NewUser {
    /// Validate required fields.
    pub fn validate(&self) -> Result<()> {
        if !self.email.contains('@') {
            return Err(MarketError::Validation(format!(
                "invalid email '{}'",
                self.email
            )));
        }
        if self.full_name.trim().is_empty() {
            return Err(MarketError::Validation("full_name is required".into()));
        }
        if self.password_hash.is_empty() {
            return Err(MarketError::Validation("password is required".into()));
        }
        Ok(())
    }
}

/// Partial update of an account. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    /// Already-hashed replacement password.
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_photo: Option<String>,
    pub is_active: Option<bool>,
    pub vendor_status: Option<VendorStatus>,
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub business_license: Option<String>,
    pub years_in_business: Option<String>,
    pub approval_notes: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
}

impl UserPatch {
    /// Drop the fields an account may not change on itself.
    pub fn self_service(mut self) -> Self {
        self.role = None;
        self.is_active = None;
        self.vendor_status = None;
        self.approval_notes = None;
        self.approved_by = None;
        self.approved_at = None;
        self
    }
}

/// Listing filter for accounts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}
