//! Response submission and retrieval endpoints

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use pulse_common::model::Response;
use uuid::Uuid;

use crate::api::auth::require_user_id;
use crate::api::ApiError;
use crate::db;
use crate::submission::{self, SubmitRequest};
use crate::AppState;

/// POST /api/responses/submit - public, but requires a respondent identity
/// header so the one-response-per-user rule can hold
pub async fn submit_response(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Response>), ApiError> {
    let user_id = require_user_id(&headers)?;
    let response = submission::submit(&state.db, Some(user_id), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/responses/:id
pub async fn get_response(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Response>, ApiError> {
    Ok(Json(db::responses::get_response(&state.db, id).await?))
}

/// GET /api/campaigns/:id/responses
pub async fn list_campaign_responses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Response>>, ApiError> {
    db::campaigns::get_campaign(&state.db, id).await?;
    Ok(Json(db::responses::list_by_campaign(&state.db, id).await?))
}
