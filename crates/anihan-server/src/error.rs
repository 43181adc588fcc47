//! API errors and their JSON envelope.

use anihan_auth::AuthError;
use anihan_market::MarketError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed body, query string or path.
    #[error("{0}")]
    BadRequest(String),

    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Market(e) => market_status(e),
            ApiError::Auth(AuthError::Market(e)) => market_status(e),
            ApiError::Auth(e) if e.is_auth_failure() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(e) if e.is_permission_error() => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::WeakPassword(_)) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

fn market_status(e: &MarketError) -> StatusCode {
    match e {
        MarketError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(MarketError::NotFound("Product")), 404),
            (MarketError::Validation("bad".into()).into(), 400),
            (MarketError::DuplicateEmail("a@b.c".into()).into(), 400),
            (MarketError::NotCancellable("delivered".into()).into(), 400),
            (MarketError::DatabaseError("disk".into()).into(), 500),
            (AuthError::InvalidCredentials.into(), 401),
            (AuthError::NotAuthenticated.into(), 401),
            (AuthError::InvalidToken.into(), 401),
            (AuthError::AccountInactive.into(), 403),
            (AuthError::InsufficientPermissions.into(), 403),
            (AuthError::WeakPassword("short".into()).into(), 400),
            (AuthError::Hash("broken".into()).into(), 500),
            (AuthError::Market(MarketError::NotFound("User")).into(), 404),
            (ApiError::BadRequest("bad json".into()), 400),
            (ApiError::RouteNotFound, 404),
        ];
        for (error, status) in cases {
            assert_eq!(error.status().as_u16(), status, "{error:?}");
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::from(MarketError::NotFound("Product")).to_string(),
            "Product not found"
        );
        assert_eq!(
            ApiError::from(AuthError::AccountInactive).to_string(),
            "Account is inactive"
        );
        assert_eq!(ApiError::RouteNotFound.to_string(), "Route not found");
    }
}
