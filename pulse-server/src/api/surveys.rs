//! Survey, version, and template authoring endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pulse_common::model::{Question, Survey, SurveyTemplate, SurveyVersion, TemplateQuestion};
use pulse_common::skiplogic::validate_skip_logic;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::ApiError;
use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSurveyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    #[serde(default)]
    pub change_log: Option<String>,
    #[serde(default)]
    pub questions: Vec<TemplateQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<TemplateQuestion>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Assign fresh ids to incoming question definitions
fn materialize_questions(inputs: &[TemplateQuestion]) -> Vec<Question> {
    inputs
        .iter()
        .map(|q| Question {
            id: Uuid::new_v4(),
            text: q.text.clone(),
            code: q.code.clone(),
            question_type: q.question_type,
            required: q.required,
            order_index: q.order_index,
            validation_rules: q.validation_rules.clone(),
            options: q.options.clone(),
            visibility_conditions: q.visibility_conditions.clone(),
        })
        .collect()
}

/// POST /api/surveys - create a survey with an empty active version 1
pub async fn create_survey(
    State(state): State<AppState>,
    Json(request): Json<CreateSurveyRequest>,
) -> Result<(StatusCode, Json<Survey>), ApiError> {
    let now = Utc::now();
    let survey = Survey {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        created_at: now,
        updated_at: now,
        versions_count: Some(1),
    };
    db::surveys::insert_survey(&state.db, &survey).await?;

    let version = SurveyVersion {
        id: Uuid::new_v4(),
        survey_id: survey.id,
        version_number: 1,
        change_log: None,
        is_active: true,
        created_at: now,
        questions: vec![],
    };
    db::surveys::insert_version(&state.db, &version).await?;

    info!("Created survey {} '{}'", survey.id, survey.title);
    Ok((StatusCode::CREATED, Json(survey)))
}

/// GET /api/surveys
pub async fn list_surveys(
    State(state): State<AppState>,
) -> Result<Json<Vec<Survey>>, ApiError> {
    Ok(Json(db::surveys::list_surveys(&state.db).await?))
}

/// GET /api/surveys/:id - survey with its versions and their questions
pub async fn get_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let survey = db::surveys::get_survey(&state.db, id).await?;
    let versions = db::surveys::list_versions(&state.db, id).await?;

    let mut body = serde_json::to_value(&survey).map_err(pulse_common::Error::from)?;
    body["versions"] = serde_json::to_value(&versions).map_err(pulse_common::Error::from)?;
    Ok(Json(body))
}

/// PATCH /api/surveys/:id - update title and/or description
pub async fn update_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSurveyRequest>,
) -> Result<Json<Survey>, ApiError> {
    let mut survey = db::surveys::get_survey(&state.db, id).await?;
    if let Some(title) = request.title {
        survey.title = title;
    }
    if let Some(description) = request.description {
        survey.description = Some(description);
    }
    survey.updated_at = Utc::now();
    db::surveys::update_survey(&state.db, &survey).await?;
    Ok(Json(survey))
}

/// DELETE /api/surveys/:id
pub async fn delete_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db::surveys::delete_survey(&state.db, id).await?;
    info!("Deleted survey {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/surveys/:id/versions - snapshot a new question set.
///
/// Skip logic is validated before anything touches the database; an
/// invalid version is never persisted. The new version becomes active.
pub async fn create_version(
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
    Json(request): Json<CreateVersionRequest>,
) -> Result<(StatusCode, Json<SurveyVersion>), ApiError> {
    db::surveys::get_survey(&state.db, survey_id).await?;

    let questions = materialize_questions(&request.questions);
    validate_skip_logic(&questions)?;

    let version_number = db::surveys::next_version_number(&state.db, survey_id).await?;
    db::surveys::deactivate_versions(&state.db, survey_id).await?;

    let version = SurveyVersion {
        id: Uuid::new_v4(),
        survey_id,
        version_number,
        change_log: request.change_log,
        is_active: true,
        created_at: Utc::now(),
        questions,
    };
    db::surveys::insert_version(&state.db, &version).await?;

    info!(
        "Created version {} of survey {} ({} questions)",
        version.version_number,
        survey_id,
        version.questions.len()
    );
    Ok((StatusCode::CREATED, Json(version)))
}

/// GET /api/surveys/:id/versions - newest first
pub async fn list_versions(
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
) -> Result<Json<Vec<SurveyVersion>>, ApiError> {
    db::surveys::get_survey(&state.db, survey_id).await?;
    Ok(Json(db::surveys::list_versions(&state.db, survey_id).await?))
}

/// GET /api/surveys/:id/versions/:version_id
pub async fn get_version(
    State(state): State<AppState>,
    Path((survey_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SurveyVersion>, ApiError> {
    Ok(Json(
        db::surveys::get_version(&state.db, survey_id, version_id).await?,
    ))
}

/// POST /api/templates - template questions get the same skip-logic
/// validation as version questions
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<SurveyTemplate>), ApiError> {
    validate_skip_logic(&materialize_questions(&request.questions))?;

    let now = Utc::now();
    let template = SurveyTemplate {
        id: Uuid::new_v4(),
        name: request.name,
        description: request.description,
        questions: request.questions,
        created_at: now,
        updated_at: now,
    };
    db::surveys::insert_template(&state.db, &template).await?;
    info!("Created template {} '{}'", template.id, template.name);
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<SurveyTemplate>>, ApiError> {
    Ok(Json(db::surveys::list_templates(&state.db).await?))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SurveyTemplate>, ApiError> {
    Ok(Json(db::surveys::get_template(&state.db, id).await?))
}

/// POST /api/templates/:id/apply - create a survey whose first version
/// carries the template's questions
pub async fn apply_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyTemplateRequest>,
) -> Result<(StatusCode, Json<Survey>), ApiError> {
    let template = db::surveys::get_template(&state.db, id).await?;

    let questions = materialize_questions(&template.questions);
    validate_skip_logic(&questions)?;

    let now = Utc::now();
    let survey = Survey {
        id: Uuid::new_v4(),
        title: request.title.unwrap_or_else(|| template.name.clone()),
        description: request.description.or_else(|| template.description.clone()),
        created_at: now,
        updated_at: now,
        versions_count: Some(1),
    };
    db::surveys::insert_survey(&state.db, &survey).await?;

    let version = SurveyVersion {
        id: Uuid::new_v4(),
        survey_id: survey.id,
        version_number: 1,
        change_log: Some(format!("Created from template '{}'", template.name)),
        is_active: true,
        created_at: now,
        questions,
    };
    db::surveys::insert_version(&state.db, &version).await?;

    info!(
        "Applied template {} to new survey {}",
        template.id, survey.id
    );
    Ok((StatusCode::CREATED, Json(survey)))
}
