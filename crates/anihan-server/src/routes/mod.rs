//! HTTP routes under `/api/v1`.

mod auth;
mod orders;
mod products;
mod waste;

use crate::error::ApiError;
use crate::state::AppState;
use anihan_market::user::{Role, User};
use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type ApiResult = Result<Response, ApiError>;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth::routes())
        .nest("/products", products::routes())
        .merge(orders::routes())
        .nest("/waste", waste::routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Response {
    message("Server is running")
}

async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

// Envelope

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// `200 {"success": true, "data": data}`
pub fn ok<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::OK, data)
}

/// `201 {"success": true, "data": data}`
pub fn created<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::CREATED, data)
}

/// `200 {"success": true, "message": text}`
pub fn message(text: impl Into<String>) -> Response {
    Json(Envelope::<()> {
        success: true,
        data: None,
        message: Some(text.into()),
    })
    .into_response()
}

fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    let envelope = Envelope {
        success: true,
        data: Some(data),
        message: None,
    };
    (status, Json(envelope)).into_response()
}

// Extractors

/// A JSON body whose rejection is reported in the error envelope.
pub struct Body<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Body<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::BadRequest(e.body_text()))?;
        Ok(Body(value))
    }
}

/// Query-string filters whose rejection is reported in the error envelope.
pub struct Filter<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Filter<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| ApiError::BadRequest(e.body_text()))?;
        Ok(Filter(value))
    }
}

/// The numeric `:id` segment, with a malformed id reported in the error envelope.
pub struct Id(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Id {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| ApiError::BadRequest(e.body_text()))?;
        Ok(Id(id))
    }
}

/// The bearer token of the request, if any.
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts)))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

/// The signed-in account.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts);
        let user = state.auth.authenticate(token.as_deref()).await?;
        Ok(CurrentUser(user))
    }
}

/// The signed-in account, required to be an administrator.
pub struct Admin(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        state.auth.require_role(&user, Role::Admin)?;
        Ok(Admin(user))
    }
}
