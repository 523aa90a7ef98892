//! Response recorder
//!
//! Runs the full submission pipeline for one respondent: campaign gate,
//! duplicate check, answer validation against the campaign's survey version,
//! then atomic persistence.

use chrono::Utc;
use pulse_common::error::{Error, Result};
use pulse_common::model::{CampaignStatus, Response, ResponseItem};
use pulse_common::submission::{validate_submission, SubmissionItem};
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub campaign_id: Uuid,
    #[serde(default)]
    pub anonymous_id: Option<String>,
    pub items: Vec<SubmitItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitItem {
    pub question_id: Uuid,
    #[serde(default)]
    pub value: Value,
}

/// Validate and persist one submission. Returns the stored response.
pub async fn submit(
    db: &SqlitePool,
    user_id: Option<Uuid>,
    request: SubmitRequest,
) -> Result<Response> {
    let started_at = Utc::now();

    let campaign = db::campaigns::get_campaign(db, request.campaign_id).await?;

    if campaign.status != CampaignStatus::Published {
        return Err(Error::CampaignNotActive(format!(
            "Campaign {} is not published",
            campaign.id
        )));
    }
    let now = Utc::now();
    if now < campaign.start_date || now > campaign.end_date {
        return Err(Error::CampaignNotActive(format!(
            "Campaign {} is outside its submission window",
            campaign.id
        )));
    }

    // Friendly pre-check; the unique index still catches races.
    if let Some(uid) = user_id {
        if db::responses::response_exists(db, campaign.id, uid).await? {
            return Err(Error::DuplicateSubmission);
        }
    }

    let questions = db::surveys::version_questions(db, campaign.survey_version_id).await?;

    let items: Vec<SubmissionItem> = request
        .items
        .iter()
        .map(|i| SubmissionItem {
            question_id: i.question_id,
            value: i.value.clone(),
        })
        .collect();
    validate_submission(&questions, &items)?;

    let completed_at = Utc::now();
    let response = Response {
        id: Uuid::new_v4(),
        campaign_id: campaign.id,
        user_id,
        anonymous_id: request.anonymous_id,
        started_at,
        completed_at: Some(completed_at),
        completion_time_seconds: Some((completed_at - started_at).num_seconds()),
        created_at: completed_at,
        items: request
            .items
            .into_iter()
            .map(|i| ResponseItem {
                id: Uuid::new_v4(),
                question_id: i.question_id,
                value: i.value,
            })
            .collect(),
    };

    db::responses::insert_response(db, &response).await?;

    info!(
        "Recorded response {} for campaign {} ({} items)",
        response.id,
        campaign.id,
        response.items.len()
    );
    Ok(response)
}
