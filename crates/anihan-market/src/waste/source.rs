//! Vendor source waste submissions and their review workflow.

use crate::ids::{SourceSubmissionId, UserId, WasteCategoryId};
use crate::serde_util;
use crate::user::UserSummary;
use crate::waste::{WasteCategorySummary, WasteUnit};
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Condition of the offered produce.
    WasteCondition {
        Fresh => "fresh",
        SlightlyDamaged => "slightly_damaged",
        Overripe => "overripe",
        Bruised => "bruised",
        Expired => "expired",
        Other => "other",
    }
}

labeled_enum! {
    /// Where a source submission is in the collection workflow.
    #[derive(Default)]
    SourceStatus {
        #[default]
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Collected => "collected",
        Processed => "processed",
    }
}

impl SourceStatus {
    /// Check if a review may move a submission from this status to `next`.
    ///
    /// ```text
    /// pending  -> approved | rejected
    /// approved -> collected | processed | rejected
    /// collected -> processed
    /// ```
    pub fn can_transition_to(&self, next: SourceStatus) -> bool {
        use SourceStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Approved, Collected)
                | (Approved, Processed)
                | (Approved, Rejected)
                | (Collected, Processed)
        )
    }

    /// Check if no further review is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SourceStatus::Rejected | SourceStatus::Processed)
    }
}

/// Waste a vendor offered for collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceWasteSubmission {
    pub id: SourceSubmissionId,
    pub vendor_id: UserId,
    pub category_id: WasteCategoryId,
    pub title: String,
    pub description: String,
    pub quantity: f64,
    pub unit: WasteUnit,
    pub condition: WasteCondition,
    pub location: String,
    pub pickup_date: String,
    #[serde(default)]
    pub estimated_value: f64,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub image_url: String,
    #[serde(default)]
    pub status: SourceStatus,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub admin_notes: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub rejection_reason: String,
    #[serde(default)]
    pub actual_value: Option<f64>,
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Populated on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<UserSummary>,
    /// Populated on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<WasteCategorySummary>,
}

/// Fields for creating a source submission.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSourceSubmission {
    pub vendor_id: UserId,
    pub category_id: WasteCategoryId,
    pub title: String,
    pub description: String,
    pub quantity: f64,
    pub unit: WasteUnit,
    pub condition: WasteCondition,
    pub location: String,
    pub pickup_date: String,
    #[serde(default)]
    pub estimated_value: f64,
    #[serde(default)]
    pub image_url: String,
}

impl NewSourceSubmission {
    /// Validate quantity, value and required text.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(MarketError::Validation("title is required".into()));
        }
        if !self.quantity.is_finite() || self.quantity < 1.0 {
            return Err(MarketError::Validation("quantity must be at least 1".into()));
        }
        if self.estimated_value < 0.0 {
            return Err(MarketError::Validation(
                "estimated_value must not be negative".into(),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(MarketError::Validation("location is required".into()));
        }
        Ok(())
    }
}

/// Partial update of a source submission. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<WasteUnit>,
    pub condition: Option<WasteCondition>,
    pub location: Option<String>,
    pub pickup_date: Option<String>,
    pub estimated_value: Option<f64>,
    pub image_url: Option<String>,
    pub status: Option<SourceStatus>,
    pub admin_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub actual_value: Option<f64>,
    pub processed_at: Option<String>,
}

impl SourcePatch {
    /// Validate the supplied quantity.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.quantity, Some(q) if !q.is_finite() || q < 1.0) {
            return Err(MarketError::Validation("quantity must be at least 1".into()));
        }
        Ok(())
    }
}

/// An administrator's decision on a source submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDecision {
    pub status: SourceStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub actual_value: Option<f64>,
}

impl ReviewDecision {
    /// Turn the decision into an update of a submission currently in `current`.
    ///
    /// Rejections need a reason; moving to `processed` stamps `processed_at`.
    pub fn into_patch(self, current: SourceStatus, now: impl Into<String>) -> Result<SourcePatch> {
        if !current.can_transition_to(self.status) {
            return Err(MarketError::InvalidTransition {
                from: current.to_string(),
                to: self.status.to_string(),
            });
        }

        let rejection_reason = match self.status {
            SourceStatus::Rejected => match self.rejection_reason {
                Some(reason) if !reason.trim().is_empty() => Some(reason),
                _ => {
                    return Err(MarketError::Validation(
                        "rejection_reason is required when rejecting".into(),
                    ))
                }
            },
            _ => None,
        };

        if matches!(self.actual_value, Some(v) if v < 0.0) {
            return Err(MarketError::Validation(
                "actual_value must not be negative".into(),
            ));
        }

        Ok(SourcePatch {
            status: Some(self.status),
            admin_notes: self.admin_notes,
            rejection_reason,
            actual_value: self.actual_value,
            processed_at: (self.status == SourceStatus::Processed).then(|| now.into()),
            ..Default::default()
        })
    }
}

/// Listing filter for source submissions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFilter {
    pub vendor_id: Option<UserId>,
    pub status: Option<SourceStatus>,
}
