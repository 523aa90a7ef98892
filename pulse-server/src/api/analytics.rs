//! Analytics endpoints: campaign metrics, per-question aggregation,
//! raw responses, and CSV export

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use pulse_common::analytics::{aggregate_question, campaign_metrics, CampaignMetrics, QuestionAnalytics};
use pulse_common::error::Error;
use pulse_common::model::{Campaign, Question, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::export;
use crate::AppState;

/// Per-question analytics envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub question_id: Uuid,
    pub question_text: String,
    pub total_answers: u64,
    #[serde(flatten)]
    pub analytics: QuestionAnalytics,
}

async fn load_campaign_questions(
    state: &AppState,
    campaign_id: Uuid,
) -> Result<(Campaign, Vec<Question>), ApiError> {
    let campaign = db::campaigns::get_campaign(&state.db, campaign_id).await?;
    let questions =
        db::surveys::version_questions(&state.db, campaign.survey_version_id).await?;
    Ok((campaign, questions))
}

async fn question_report(
    state: &AppState,
    campaign_id: Uuid,
    question: &Question,
) -> Result<QuestionReport, ApiError> {
    let values = db::responses::question_values(&state.db, campaign_id, question.id).await?;
    Ok(QuestionReport {
        question_id: question.id,
        question_text: question.text.clone(),
        total_answers: values.len() as u64,
        analytics: aggregate_question(question.question_type, &values),
    })
}

/// GET /api/analytics/campaigns/:id
pub async fn get_campaign_metrics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignMetrics>, ApiError> {
    let campaign = db::campaigns::get_campaign(&state.db, id).await?;
    let responses = db::responses::list_by_campaign(&state.db, id).await?;
    Ok(Json(campaign_metrics(&campaign, &responses)))
}

/// GET /api/analytics/campaigns/:id/questions - every question of the
/// campaign's version, in survey order
pub async fn get_questions_analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<QuestionReport>>, ApiError> {
    let (campaign, questions) = load_campaign_questions(&state, id).await?;
    let mut reports = Vec::with_capacity(questions.len());
    for question in &questions {
        reports.push(question_report(&state, campaign.id, question).await?);
    }
    Ok(Json(reports))
}

/// GET /api/analytics/campaigns/:id/questions/:question_id
pub async fn get_question_analytics(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<QuestionReport>, ApiError> {
    let (campaign, questions) = load_campaign_questions(&state, id).await?;
    let question = questions
        .iter()
        .find(|q| q.id == question_id)
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Question {} in campaign {}",
                question_id, id
            ))
        })?;
    Ok(Json(question_report(&state, campaign.id, question).await?))
}

/// GET /api/analytics/campaigns/:id/raw
pub async fn get_raw_responses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Response>>, ApiError> {
    db::campaigns::get_campaign(&state.db, id).await?;
    Ok(Json(db::responses::list_by_campaign(&state.db, id).await?))
}

/// GET /api/analytics/campaigns/:id/export - CSV download
pub async fn export_campaign_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    db::campaigns::get_campaign(&state.db, id).await?;
    let rows = db::responses::export_rows(&state.db, id).await?;
    let csv = export::to_csv(&rows);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"campaign-{}.csv\"", id),
            ),
        ],
        csv,
    ))
}
