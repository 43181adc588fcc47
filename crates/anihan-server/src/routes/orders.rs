//! `/orders` and `/deliveries`

use super::{created, message, ok, ApiResult, Body, Filter, Id};
use crate::events::Action;
use crate::state::AppState;
use anihan_market::checkout::{DeliveryFilter, DeliveryPatch, NewDelivery, NewOrder, OrderFilter, OrderPatch};
use anihan_market::{DeliveryId, OrderId};
use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/:id", get(show).put(update).delete(remove))
        .route("/orders/:id/cancel", post(cancel))
        .route(
            "/orders/:id/deliveries",
            get(list_deliveries).post(create_delivery),
        )
        .route("/deliveries/:id", put(update_delivery).delete(remove_delivery))
}

async fn list(State(state): State<AppState>, Filter(filter): Filter<OrderFilter>) -> ApiResult {
    Ok(ok(state.market.orders.find(&filter).await?))
}

async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    Ok(ok(state.market.orders.get(OrderId::new(id)).await?))
}

async fn create(State(state): State<AppState>, Body(body): Body<NewOrder>) -> ApiResult {
    let order = state.market.orders.create(body).await?;
    state.events.publish("order", Action::Created, &order);
    Ok(created(order))
}

async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<OrderPatch>,
) -> ApiResult {
    let order = state.market.orders.update(OrderId::new(id), body).await?;
    state.events.publish("order", Action::Updated, &order);
    Ok(ok(order))
}

async fn cancel(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    let order = state.market.orders.cancel(OrderId::new(id)).await?;
    state.events.publish("order", Action::Updated, &order);
    Ok(ok(order))
}

async fn remove(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state.market.orders.delete(OrderId::new(id)).await?;
    state.events.deleted("order", id);
    Ok(message("Order deleted successfully"))
}

async fn list_deliveries(
    State(state): State<AppState>,
    Id(id): Id,
    Filter(filter): Filter<DeliveryFilter>,
) -> ApiResult {
    let order_id = OrderId::new(id);
    state.market.orders.get(order_id).await?;
    let filter = DeliveryFilter {
        order_id: Some(order_id),
        ..filter
    };
    Ok(ok(state.market.deliveries.find(&filter).await?))
}

async fn create_delivery(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<NewDelivery>,
) -> ApiResult {
    let delivery = state.market.deliveries.create(OrderId::new(id), body).await?;
    state.events.publish("delivery", Action::Created, &delivery);
    Ok(created(delivery))
}

async fn update_delivery(
    State(state): State<AppState>,
    Id(id): Id,
    Body(body): Body<DeliveryPatch>,
) -> ApiResult {
    let delivery = state.market.deliveries.update(DeliveryId::new(id), body).await?;
    state.events.publish("delivery", Action::Updated, &delivery);
    Ok(ok(delivery))
}

async fn remove_delivery(State(state): State<AppState>, Id(id): Id) -> ApiResult {
    state.market.deliveries.delete(DeliveryId::new(id)).await?;
    state.events.deleted("delivery", id);
    Ok(message("Delivery deleted successfully"))
}
