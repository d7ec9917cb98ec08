use axum::{
    RequestPartsExt,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use poker_server_domain::ServiceError;

use crate::{app::ApiError, http::AppState};

/// Compares the bearer token against the configured secret before any
/// route runs; the request body is never examined on a mismatch.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let bearer = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await;
    match bearer {
        Ok(TypedHeader(Authorization(bearer))) if bearer.token() == state.api_token => {
            next.run(Request::from_parts(parts, body)).await
        }
        _ => ApiError::from(ServiceError::Unauthorized("Unauthorized".to_string()))
            .into_response(),
    }
}
