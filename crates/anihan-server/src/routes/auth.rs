//! `/auth`: sessions, profiles and account administration.

use super::{created, message, ok, Admin, ApiResult, BearerToken, Body, CurrentUser, Filter, Id};
use crate::events::Action;
use crate::state::AppState;
use anihan_auth::{ProfileUpdate, Registration};
use anihan_market::user::{User, UserFilter, UserPatch};
use anihan_market::UserId;
use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/users", get(list_users))
        .route("/users/:id/status", put(update_status))
        .route("/users/:id", put(update_user).delete(delete_user))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct UserBody {
    user: User,
}

async fn login(State(state): State<AppState>, Body(body): Body<Credentials>) -> ApiResult {
    let result = state.auth.login(&body.email, &body.password).await?;
    Ok(ok(result))
}

async fn register(State(state): State<AppState>, Body(body): Body<Registration>) -> ApiResult {
    let result = state.auth.register(body).await?;
    state.events.publish("user", Action::Created, &result.user);
    Ok(created(result))
}

async fn logout(State(state): State<AppState>, BearerToken(token): BearerToken) -> ApiResult {
    if let Some(token) = token {
        state.auth.logout(&token)?;
    }
    Ok(message("Logged out successfully"))
}

async fn me(CurrentUser(user): CurrentUser) -> ApiResult {
    Ok(ok(UserBody { user }))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Body(body): Body<ProfileUpdate>,
) -> ApiResult {
    let user = state.auth.update_profile(user.id, body).await?;
    state.events.publish("user", Action::Updated, &user);
    Ok(ok(UserBody { user }))
}

async fn list_users(
    State(state): State<AppState>,
    _admin: Admin,
    Filter(filter): Filter<UserFilter>,
) -> ApiResult {
    Ok(ok(state.market.users.find(&filter).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Id(id): Id,
    Body(mut body): Body<UserPatch>,
) -> ApiResult {
    if body.vendor_status.is_some() && body.approved_by.is_none() {
        body.approved_by = Some(admin.email.clone());
    }
    let user = state.auth.update_status(UserId::new(id), body).await?;
    info!(user_id = id, admin_id = %admin.id, "account status updated");
    state.events.publish("user", Action::Updated, &user);
    Ok(ok(user))
}

async fn update_user(
    State(state): State<AppState>,
    _admin: Admin,
    Id(id): Id,
    Body(body): Body<ProfileUpdate>,
) -> ApiResult {
    let user = state.auth.update_user(UserId::new(id), body).await?;
    state.events.publish("user", Action::Updated, &user);
    Ok(ok(user))
}

async fn delete_user(
    State(state): State<AppState>,
    _admin: Admin,
    Id(id): Id,
) -> ApiResult {
    state.auth.delete_user(UserId::new(id)).await?;
    state.events.deleted("user", id);
    Ok(message("User deleted successfully"))
}
