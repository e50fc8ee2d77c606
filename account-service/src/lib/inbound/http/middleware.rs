use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::account::errors::GateError;
use crate::inbound::http::router::AppState;

/// Legacy header carrying the bare token.
pub const LEGACY_TOKEN_HEADER: &str = "authtoken";

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that runs the token gate and adds the resolved identity to
/// request extensions
///
/// Rejections short-circuit with 401 before the handler runs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = extract_token(req.headers())
        .and_then(|token| state.token_gate.authorize(token))
        .map_err(|e| {
            tracing::warn!(error = ?e, uri = %req.uri(), "Token rejected");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Token from `Authorization: Bearer <token>`, falling back to `authtoken`.
///
/// An `Authorization` header with another scheme is skipped in favour of
/// `authtoken`; it only rejects the request when no token is found at all.
fn extract_token(headers: &HeaderMap) -> Result<Option<&str>, GateError> {
    let authorization = headers.get(header::AUTHORIZATION);

    let bearer = authorization
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX));
    if bearer.is_some() {
        return Ok(bearer);
    }

    if let Some(value) = headers.get(LEGACY_TOKEN_HEADER) {
        return value
            .to_str()
            .map(Some)
            .map_err(|_| GateError::InvalidToken("Non-ASCII authtoken header".to_string()));
    }

    match authorization {
        Some(_) => Err(GateError::InvalidToken(
            "Authorization header is not a Bearer token".to_string(),
        )),
        None => Ok(None),
    }
}
