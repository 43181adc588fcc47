//! Waste reference data, consumer submissions and vendor source submissions.

mod kinds;
mod source;
mod submission;

pub use kinds::{
    DamageLevel, NewWasteCategory, NewWasteType, WasteCategory, WasteCategoryFilter,
    WasteCategoryPatch, WasteCategorySummary, WasteKind, WasteType, WasteTypeFilter,
    WasteTypePatch,
};
pub use source::{
    NewSourceSubmission, ReviewDecision, SourceFilter, SourcePatch, SourceStatus,
    SourceWasteSubmission, WasteCondition,
};
pub use submission::{
    NewWasteSubmission, SubmissionStatus, WasteStats, WasteSubmission, WasteSubmissionFilter,
    WasteSubmissionPatch, WasteUnit,
};
