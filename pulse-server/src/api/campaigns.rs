//! Campaign lifecycle endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use pulse_common::error::Error;
use pulse_common::model::{Campaign, CampaignStatus};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub survey_version_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// POST /api/campaigns - bind a survey version to a submission window
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    if request.end_date <= request.start_date {
        return Err(Error::InvalidInput(
            "Campaign end date must be after its start date".to_string(),
        )
        .into());
    }
    // The version must exist before a campaign can point at it
    db::surveys::get_version_by_id(&state.db, request.survey_version_id).await?;

    let now = Utc::now();
    let campaign = Campaign {
        id: Uuid::new_v4(),
        name: request.name,
        description: request.description,
        start_date: request.start_date,
        end_date: request.end_date,
        status: CampaignStatus::Created,
        survey_version_id: request.survey_version_id,
        created_at: now,
        updated_at: now,
    };
    db::campaigns::insert_campaign(&state.db, &campaign).await?;

    info!("Created campaign {} '{}'", campaign.id, campaign.name);
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// GET /api/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<Campaign>>, ApiError> {
    Ok(Json(db::campaigns::list_campaigns(&state.db).await?))
}

/// GET /api/campaigns/:id - public; used by respondents to render the survey
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let campaign = db::campaigns::get_campaign(&state.db, id).await?;
    let mut version =
        db::surveys::get_version_by_id(&state.db, campaign.survey_version_id).await?;
    version.questions = db::surveys::version_questions(&state.db, version.id).await?;

    let mut body = serde_json::to_value(&campaign).map_err(Error::from)?;
    body["surveyVersion"] = serde_json::to_value(&version).map_err(Error::from)?;
    Ok(Json(body))
}

/// PATCH /api/campaigns/:id
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<Campaign>, ApiError> {
    let mut campaign = db::campaigns::get_campaign(&state.db, id).await?;
    if let Some(name) = request.name {
        campaign.name = name;
    }
    if let Some(description) = request.description {
        campaign.description = Some(description);
    }
    if let Some(start) = request.start_date {
        campaign.start_date = start;
    }
    if let Some(end) = request.end_date {
        campaign.end_date = end;
    }
    if campaign.end_date <= campaign.start_date {
        return Err(Error::InvalidInput(
            "Campaign end date must be after its start date".to_string(),
        )
        .into());
    }
    campaign.updated_at = Utc::now();
    db::campaigns::update_campaign(&state.db, &campaign).await?;
    Ok(Json(campaign))
}

/// DELETE /api/campaigns/:id
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db::campaigns::delete_campaign(&state.db, id).await?;
    info!("Deleted campaign {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/campaigns/:id/publish - CREATED -> PUBLISHED only
pub async fn publish_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    let mut campaign = db::campaigns::get_campaign(&state.db, id).await?;
    if campaign.status != CampaignStatus::Created {
        return Err(Error::InvalidInput(format!(
            "Campaign {} cannot be published from status {}",
            campaign.id,
            campaign.status.as_str()
        ))
        .into());
    }
    campaign.status = CampaignStatus::Published;
    campaign.updated_at = Utc::now();
    db::campaigns::update_campaign(&state.db, &campaign).await?;
    info!("Published campaign {}", campaign.id);
    Ok(Json(campaign))
}

/// POST /api/campaigns/:id/close - PUBLISHED -> CLOSED only
pub async fn close_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    let mut campaign = db::campaigns::get_campaign(&state.db, id).await?;
    if campaign.status != CampaignStatus::Published {
        return Err(Error::InvalidInput(format!(
            "Campaign {} cannot be closed from status {}",
            campaign.id,
            campaign.status.as_str()
        ))
        .into());
    }
    campaign.status = CampaignStatus::Closed;
    campaign.updated_at = Utc::now();
    db::campaigns::update_campaign(&state.db, &campaign).await?;
    info!("Closed campaign {}", campaign.id);
    Ok(Json(campaign))
}
