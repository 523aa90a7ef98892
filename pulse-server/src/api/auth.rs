//! Authentication boundary
//!
//! Admin endpoints are guarded by a shared token in the `X-Admin-Token`
//! header; an empty configured token disables the check entirely.
//! Respondent identity arrives as an `X-User-Id` UUID header; the full
//! user/session layer lives outside this service.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use pulse_common::Error;
use uuid::Uuid;

use crate::api::ApiError;
use crate::AppState;

/// Header carrying the admin shared token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Header carrying the authenticated respondent id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Admin authentication middleware.
///
/// An empty configured token disables all checking; otherwise the request
/// must carry the exact token. Applied to admin routes only; health and
/// the respondent surface never pass through here.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.admin_token.is_empty() {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == state.admin_token => Ok(next.run(request).await),
        _ => Err(ApiError(Error::Unauthorized(
            "missing or invalid admin token".to_string(),
        ))),
    }
}

/// Extract the authenticated respondent id from request headers.
///
/// Submission requires an authenticated identity; absence is the
/// `Unauthorized` failure mode.
pub fn require_user_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError(Error::Unauthorized(
                "user authentication required to submit responses".to_string(),
            ))
        })?;

    Uuid::parse_str(raw).map_err(|_| {
        ApiError(Error::Unauthorized(format!(
            "invalid user id '{}'",
            raw
        )))
    })
}
