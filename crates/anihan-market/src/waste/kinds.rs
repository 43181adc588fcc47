//! Reference data: waste types and waste categories.

use crate::ids::{WasteCategoryId, WasteTypeId};
use crate::serde_util;
use crate::{MarketError, Result};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Broad kind of produce a waste type belongs to.
    WasteKind {
        Fruit => "fruit",
        Vegetable => "vegetable",
        Grain => "grain",
        Other => "other",
    }
}

labeled_enum! {
    /// How damaged the produce is.
    DamageLevel {
        Slight => "slight",
        Moderate => "moderate",
        Severe => "severe",
    }
}

/// A kind of waste consumers can submit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteType {
    pub id: WasteTypeId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub category: WasteKind,
    pub damage_level: DamageLevel,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Fields for creating a waste type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWasteType {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub category: WasteKind,
    pub damage_level: DamageLevel,
}

impl NewWasteType {
    /// Validate required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MarketError::Validation("name is required".into()));
        }
        Ok(())
    }
}

/// Partial update of a waste type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<WasteKind>,
    pub damage_level: Option<DamageLevel>,
}

/// Listing filter for waste types.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteTypeFilter {
    pub category: Option<WasteKind>,
}

/// A category vendors file source submissions under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteCategory {
    pub id: WasteCategoryId,
    pub name: String,
    pub description: String,
    /// Display color, e.g. `#10b981`.
    pub color: String,
    /// Display icon name.
    pub icon: String,
    #[serde(deserialize_with = "serde_util::flag")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl WasteCategory {
    /// The display fields embedded in source submissions.
    pub fn summary(&self) -> WasteCategorySummary {
        WasteCategorySummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Display fields of a category embedded in source submissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WasteCategorySummary {
    pub id: WasteCategoryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

/// Fields for creating a waste category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWasteCategory {
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewWasteCategory {
    /// Validate required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MarketError::Validation("name is required".into()));
        }
        Ok(())
    }
}

/// Partial update of a waste category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteCategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

/// Listing filter for waste categories.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteCategoryFilter {
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_row() {
        let row = serde_json::json!({
            "id": 1,
            "name": "Fruits",
            "description": "Fresh and processed fruits",
            "color": "#f59e0b",
            "icon": "SunIcon",
            "is_active": 1,
            "created_at": "2024-01-01 00:00:00",
            "updated_at": "2024-01-01 00:00:00",
        });
        let category: WasteCategory = serde_json::from_value(row).unwrap();
        assert!(category.is_active);
        assert_eq!(category.summary().color, "#f59e0b");
    }

    #[test]
    fn test_labels() {
        assert_eq!("severe".parse::<DamageLevel>().unwrap(), DamageLevel::Severe);
        assert!("rotten".parse::<DamageLevel>().is_err());
        assert_eq!(WasteKind::Grain.as_str(), "grain");
    }
}
