//! Consumer waste submissions.

use crate::ids::{UserId, WasteSubmissionId, WasteTypeId};
use crate::serde_util;
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Unit waste quantities are measured in.
    WasteUnit {
        Kg => "kg",
        Pieces => "pieces",
        Baskets => "baskets",
        Bags => "bags",
        Boxes => "boxes",
        Liters => "liters",
    }
}

labeled_enum! {
    /// Review state of a consumer waste submission.
    #[derive(Default)]
    SubmissionStatus {
        #[default]
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Processed => "processed",
    }
}

/// Waste a consumer offered to the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteSubmission {
    pub id: WasteSubmissionId,
    pub user_id: UserId,
    pub waste_type_id: WasteTypeId,
    pub quantity: f64,
    pub unit: WasteUnit,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub description: String,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub title: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub category: String,
    #[serde(default, deserialize_with = "serde_util::text")]
    pub condition: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Fields for creating a waste submission.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWasteSubmission {
    pub user_id: UserId,
    pub waste_type_id: WasteTypeId,
    pub quantity: f64,
    pub unit: WasteUnit,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub condition: String,
}

impl NewWasteSubmission {
    /// Validate the quantity.
    pub fn validate(&self) -> Result<()> {
        if !self.quantity.is_finite() || self.quantity < 1.0 {
            return Err(MarketError::Validation("quantity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Partial update of a waste submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteSubmissionPatch {
    pub waste_type_id: Option<WasteTypeId>,
    pub quantity: Option<f64>,
    pub unit: Option<WasteUnit>,
    pub description: Option<String>,
    pub status: Option<SubmissionStatus>,
    pub processed_at: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
}

impl WasteSubmissionPatch {
    /// Stamp `processed_at` with `now` when moving to `processed` without one.
    pub fn normalize(mut self, now: impl Into<String>) -> Self {
        if self.status == Some(SubmissionStatus::Processed) && self.processed_at.is_none() {
            self.processed_at = Some(now.into());
        }
        self
    }

    /// Validate the quantity.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.quantity, Some(q) if !q.is_finite() || q < 1.0) {
            return Err(MarketError::Validation("quantity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Listing filter for waste submissions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteSubmissionFilter {
    pub user_id: Option<UserId>,
    pub status: Option<SubmissionStatus>,
}

/// Submission counts per status and the total quantity submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WasteStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub processed: u64,
    pub rejected: u64,
    pub total_quantity: f64,
}

impl WasteStats {
    /// Tally a set of submissions.
    pub fn tally<'a>(submissions: impl IntoIterator<Item = &'a WasteSubmission>) -> Self {
        submissions
            .into_iter()
            .fold(WasteStats::default(), |mut stats, submission| {
                stats.total += 1;
                stats.total_quantity += submission.quantity;
                match submission.status {
                    SubmissionStatus::Pending => stats.pending += 1,
                    SubmissionStatus::Approved => stats.approved += 1,
                    SubmissionStatus::Processed => stats.processed += 1,
                    SubmissionStatus::Rejected => stats.rejected += 1,
                }
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(status: SubmissionStatus, quantity: f64) -> WasteSubmission {
        WasteSubmission {
            id: WasteSubmissionId::new(1),
            user_id: UserId::new(3),
            waste_type_id: WasteTypeId::new(1),
            quantity,
            unit: WasteUnit::Kg,
            description: String::new(),
            status,
            submitted_at: String::new(),
            processed_at: None,
            title: String::new(),
            category: String::new(),
            condition: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_tally() {
        let submissions = vec![
            submission(SubmissionStatus::Pending, 10.0),
            submission(SubmissionStatus::Pending, 2.5),
            submission(SubmissionStatus::Processed, 5.0),
            submission(SubmissionStatus::Rejected, 1.0),
        ];
        let stats = WasteStats::tally(&submissions);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 0);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.total_quantity, 18.5);
    }

    #[test]
    fn test_processed_stamps_timestamp() {
        let patch = WasteSubmissionPatch {
            status: Some(SubmissionStatus::Processed),
            ..Default::default()
        }
        .normalize("2024-12-13T19:30:00Z");
        assert_eq!(patch.processed_at.as_deref(), Some("2024-12-13T19:30:00Z"));

        let patch = WasteSubmissionPatch {
            status: Some(SubmissionStatus::Approved),
            ..Default::default()
        }
        .normalize("2024-12-13T19:30:00Z");
        assert!(patch.processed_at.is_none());
    }

    #[test]
    fn test_quantity_must_be_at_least_one() {
        let patch = WasteSubmissionPatch {
            quantity: Some(0.5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
