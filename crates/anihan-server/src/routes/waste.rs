//! `/waste`: types, categories, submissions, source submissions and inventory.

use super::{created, message, ok, Admin, ApiResult, Body, Filter, Id};
use crate::events::Action;
use crate::state::AppState;
use anihan_market::catalog::{AdjustQuantity, InventoryFilter, InventoryPatch, NewInventoryItem};
use anihan_market::waste::{
    NewSourceSubmission, NewWasteCategory, NewWasteSubmission, NewWasteType, ReviewDecision,
    SourceFilter, SourcePatch, WasteCategoryFilter, WasteCategoryPatch, WasteSubmissionFilter,
    WasteSubmissionPatch, WasteTypeFilter,
};
use anihan_market::{InventoryItemId, SourceSubmissionId, WasteCategoryId, WasteSubmissionId};
use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Router;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/types", get(list_types).post(create_type))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/submissions", get(list_submissions).post(create_submission))
        .route("/submissions/stats", get(submission_stats))
        .route(
            "/submissions/:id",
            put(update_submission).delete(delete_submission),
        )
        .route(
            "/source-submissions",
            get(list_sources).post(create_source),
        )
        .route(
            "/source-submissions/:id",
            put(update_source).delete(delete_source),
        )
        .route("/source-submissions/:id/review", post(review_source))
        .route("/inventory", get(list_inventory).post(create_inventory))
        .route(
            "/inventory/:id",
            put(update_inventory).delete(delete_inventory),
        )
        .route("/inventory/:id/adjust", post(adjust_inventory))
}

// Types

async fn list_types(
    State(state): State<AppState>,
    Filter(filter): Filter<WasteTypeFilter>,
) -> ApiResult {
    Ok(ok(state.market.waste_types.find(&filter).await?))
}

async fn create_type(State(state): State<AppState>, Body(body): Body<NewWasteType>) -> ApiResult {
    let waste_type = state.market.waste_types.create(body).await?;
    state.events.publish("waste:type", Action::Created, &waste_type);
    Ok(created(waste_type))
}

// Categories

async fn list_categories(
    State(state): State<AppState>,
    Filter(filter): Filter<WasteCategoryFilter>,
) -> ApiResult {
    Ok(ok(state.market.waste_categories.find(&filter).await?))
}

async fn create_category(
    State(state): State<AppState>,
    Body(body): Body<NewWasteCategory>,
) -> ApiResult {
    let category = state.market.waste_categories.create(body).await?;
    state.events.publish("waste:category", Action::Created, &category);
    Ok(created(category))
}

async fn update_category(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<WasteCategoryPatch>,
) -> ApiResult {
    let category = state
        .market
        .waste_categories
        .update(WasteCategoryId::new(id), body)
        .await?;
    state.events.publish("waste:category", Action::Updated, &category);
    Ok(ok(category))
}

async fn delete_category(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state
        .market
        .waste_categories
        .delete(WasteCategoryId::new(id))
        .await?;
    state.events.deleted("waste:category", id);
    Ok(message("Category deleted successfully"))
}

// Submissions

async fn list_submissions(
    State(state): State<AppState>,
    Filter(filter): Filter<WasteSubmissionFilter>,
) -> ApiResult {
    Ok(ok(state.market.waste_submissions.find(&filter).await?))
}

async fn submission_stats(
    State(state): State<AppState>,
    Filter(filter): Filter<WasteSubmissionFilter>,
) -> ApiResult {
    Ok(ok(state.market.waste_submissions.stats(&filter).await?))
}

async fn create_submission(
    State(state): State<AppState>,
    Body(body): Body<NewWasteSubmission>,
) -> ApiResult {
    let submission = state.market.waste_submissions.create(body).await?;
    state.events.publish("waste:submission", Action::Created, &submission);
    Ok(created(submission))
}

async fn update_submission(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<WasteSubmissionPatch>,
) -> ApiResult {
    let submission = state
        .market
        .waste_submissions
        .update(WasteSubmissionId::new(id), body)
        .await?;
    state.events.publish("waste:submission", Action::Updated, &submission);
    Ok(ok(submission))
}

async fn delete_submission(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state
        .market
        .waste_submissions
        .delete(WasteSubmissionId::new(id))
        .await?;
    state.events.deleted("waste:submission", id);
    Ok(message("Submission deleted successfully"))
}

// Source submissions

async fn list_sources(
    State(state): State<AppState>,
    Filter(filter): Filter<SourceFilter>,
) -> ApiResult {
    Ok(ok(state.market.source_submissions.find(&filter).await?))
}

async fn create_source(
    State(state): State<AppState>,
    Body(body): Body<NewSourceSubmission>,
) -> ApiResult {
    let submission = state.market.source_submissions.create(body).await?;
    state
        .events
        .publish("waste:source-submission", Action::Created, &submission);
    Ok(created(submission))
}

async fn update_source(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<SourcePatch>,
) -> ApiResult {
    let submission = state
        .market
        .source_submissions
        .update(SourceSubmissionId::new(id), body)
        .await?;
    state
        .events
        .publish("waste:source-submission", Action::Updated, &submission);
    Ok(ok(submission))
}

async fn review_source(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Id(id): Id,
    Body(body): Body<ReviewDecision>,
) -> ApiResult {
    let status = body.status;
    let submission = state
        .market
        .source_submissions
        .review(SourceSubmissionId::new(id), body)
        .await?;
    info!(submission_id = id, admin_id = %admin.id, status = %status, "source submission reviewed");
    state
        .events
        .publish("waste:source-submission", Action::Updated, &submission);
    Ok(ok(submission))
}

async fn delete_source(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state
        .market
        .source_submissions
        .delete(SourceSubmissionId::new(id))
        .await?;
    state.events.deleted("waste:source-submission", id);
    Ok(message("Submission deleted successfully"))
}

// Inventory

async fn list_inventory(
    State(state): State<AppState>,
    Filter(filter): Filter<InventoryFilter>,
) -> ApiResult {
    Ok(ok(state.market.inventory.find(&filter).await?))
}

async fn create_inventory(
    State(state): State<AppState>,
    Body(body): Body<NewInventoryItem>,
) -> ApiResult {
    let item = state.market.inventory.create(body).await?;
    state.events.publish("waste:inventory", Action::Created, &item);
    Ok(created(item))
}

async fn update_inventory(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<InventoryPatch>,
) -> ApiResult {
    let item = state
        .market
        .inventory
        .update(InventoryItemId::new(id), body)
        .await?;
    state.events.publish("waste:inventory", Action::Updated, &item);
    Ok(ok(item))
}

async fn adjust_inventory(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<AdjustQuantity>,
) -> ApiResult {
    let item = state
        .market
        .inventory
        .adjust_quantity(InventoryItemId::new(id), body)
        .await?;
    state.events.publish("waste:inventory", Action::Updated, &item);
    Ok(ok(item))
}

async fn delete_inventory(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state
        .market
        .inventory
        .delete(InventoryItemId::new(id))
        .await?;
    state.events.deleted("waste:inventory", id);
    Ok(message("Inventory item deleted successfully"))
}
