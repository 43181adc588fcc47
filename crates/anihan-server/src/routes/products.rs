//! `/products`

use super::{created, message, ok, ApiResult, Body, Filter, Id};
use crate::events::Action;
use crate::state::AppState;
use anihan_market::catalog::{NewProduct, ProductFilter, ProductPatch};
use anihan_market::ProductId;
use axum::extract::State;
use axum::routing::get;
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show).put(update).delete(remove))
}

async fn list(State(state): State<AppState>, Filter(filter): Filter<ProductFilter>) -> ApiResult {
    Ok(ok(state.market.products.find(&filter).await?))
}

async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    Ok(ok(state.market.products.get(ProductId::new(id)).await?))
}

async fn create(State(state): State<AppState>, Body(body): Body<NewProduct>) -> ApiResult {
    let product = state.market.products.create(body).await?;
    state.events.publish("product", Action::Created, &product);
    Ok(created(product))
}

async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<ProductPatch>,
) -> ApiResult {
    let product = state.market.products.update(ProductId::new(id), body).await?;
    state.events.publish("product", Action::Updated, &product);
    Ok(ok(product))
}

async fn remove(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state.market.products.delete(ProductId::new(id)).await?;
    state.events.deleted("product", id);
    Ok(message("Product deleted successfully"))
}
