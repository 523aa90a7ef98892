//! Survey, survey-version, question, and template queries

use pulse_common::error::{Error, Result};
use pulse_common::model::{Question, QuestionType, Survey, SurveyTemplate, SurveyVersion};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_datetime, parse_json_column, parse_uuid};

pub async fn insert_survey(db: &SqlitePool, survey: &Survey) -> Result<()> {
    sqlx::query(
        "INSERT INTO surveys (guid, title, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(survey.id.to_string())
    .bind(&survey.title)
    .bind(&survey.description)
    .bind(survey.created_at.to_rfc3339())
    .bind(survey.updated_at.to_rfc3339())
    .execute(db)
    .await?;
    Ok(())
}

fn survey_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Survey> {
    Ok(Survey {
        id: parse_uuid(&row.get::<String, _>("guid"))?,
        title: row.get("title"),
        description: row.get("description"),
        created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
        updated_at: parse_datetime(&row.get::<String, _>("updated_at"))?,
        versions_count: row.try_get("versions_count").ok(),
    })
}

pub async fn list_surveys(db: &SqlitePool) -> Result<Vec<Survey>> {
    let rows = sqlx::query(
        "SELECT s.guid, s.title, s.description, s.created_at, s.updated_at,
                (SELECT COUNT(*) FROM survey_versions v WHERE v.survey_id = s.guid)
                    AS versions_count
         FROM surveys s
         ORDER BY s.created_at DESC",
    )
    .fetch_all(db)
    .await?;

    rows.iter().map(survey_from_row).collect()
}

pub async fn get_survey(db: &SqlitePool, id: Uuid) -> Result<Survey> {
    let row = sqlx::query(
        "SELECT s.guid, s.title, s.description, s.created_at, s.updated_at,
                (SELECT COUNT(*) FROM survey_versions v WHERE v.survey_id = s.guid)
                    AS versions_count
         FROM surveys s
         WHERE s.guid = ?",
    )
    .bind(id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Survey with ID {}", id)))?;

    survey_from_row(&row)
}

pub async fn update_survey(db: &SqlitePool, survey: &Survey) -> Result<()> {
    sqlx::query("UPDATE surveys SET title = ?, description = ?, updated_at = ? WHERE guid = ?")
        .bind(&survey.title)
        .bind(&survey.description)
        .bind(survey.updated_at.to_rfc3339())
        .bind(survey.id.to_string())
        .execute(db)
        .await?;
    Ok(())
}

pub async fn delete_survey(db: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM surveys WHERE guid = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Survey with ID {}", id)));
    }
    Ok(())
}

pub async fn next_version_number(db: &SqlitePool, survey_id: Uuid) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM survey_versions WHERE survey_id = ?")
            .bind(survey_id.to_string())
            .fetch_one(db)
            .await?;
    Ok(count + 1)
}

/// Clear the active flag on every existing version of a survey. Called
/// before inserting a new active version.
pub async fn deactivate_versions(db: &SqlitePool, survey_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE survey_versions SET is_active = 0 WHERE survey_id = ?")
        .bind(survey_id.to_string())
        .execute(db)
        .await?;
    Ok(())
}

/// Insert a version together with its questions in one transaction.
/// Skip-logic validation must already have passed; a rejected version is
/// never persisted.
pub async fn insert_version(db: &SqlitePool, version: &SurveyVersion) -> Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query(
        "INSERT INTO survey_versions
             (guid, survey_id, version_number, change_log, is_active, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(version.id.to_string())
    .bind(version.survey_id.to_string())
    .bind(version.version_number)
    .bind(&version.change_log)
    .bind(version.is_active)
    .bind(version.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    for question in &version.questions {
        sqlx::query(
            "INSERT INTO questions
                 (guid, survey_version_id, text, code, type, required, order_index,
                  validation_rules, options, visibility_conditions)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(question.id.to_string())
        .bind(version.id.to_string())
        .bind(&question.text)
        .bind(&question.code)
        .bind(question.question_type.as_str())
        .bind(question.required)
        .bind(question.order_index)
        .bind(match &question.validation_rules {
            Some(rules) => Some(serde_json::to_string(rules)?),
            None => None,
        })
        .bind(serde_json::to_string(&question.options)?)
        .bind(serde_json::to_string(&question.visibility_conditions)?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

fn question_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question> {
    let type_raw: String = row.get("type");
    let question_type = QuestionType::from_str(&type_raw)
        .ok_or_else(|| Error::Internal(format!("unknown question type '{}'", type_raw)))?;

    Ok(Question {
        id: parse_uuid(&row.get::<String, _>("guid"))?,
        text: row.get("text"),
        code: row.get("code"),
        question_type,
        required: row.get("required"),
        order_index: row.get("order_index"),
        validation_rules: parse_json_column(row.get("validation_rules"))?,
        options: parse_json_column(row.get("options"))?,
        visibility_conditions: parse_json_column(row.get("visibility_conditions"))?,
    })
}

/// Questions of one version, in ascending order-index order
pub async fn version_questions(db: &SqlitePool, version_id: Uuid) -> Result<Vec<Question>> {
    let rows = sqlx::query(
        "SELECT guid, text, code, type, required, order_index,
                validation_rules, options, visibility_conditions
         FROM questions
         WHERE survey_version_id = ?
         ORDER BY order_index ASC",
    )
    .bind(version_id.to_string())
    .fetch_all(db)
    .await?;

    rows.iter().map(question_from_row).collect()
}

fn version_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SurveyVersion> {
    Ok(SurveyVersion {
        id: parse_uuid(&row.get::<String, _>("guid"))?,
        survey_id: parse_uuid(&row.get::<String, _>("survey_id"))?,
        version_number: row.get("version_number"),
        change_log: row.get("change_log"),
        is_active: row.get("is_active"),
        created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
        questions: vec![],
    })
}

/// Versions of one survey, newest first, each with its questions
pub async fn list_versions(db: &SqlitePool, survey_id: Uuid) -> Result<Vec<SurveyVersion>> {
    let rows = sqlx::query(
        "SELECT guid, survey_id, version_number, change_log, is_active, created_at
         FROM survey_versions
         WHERE survey_id = ?
         ORDER BY version_number DESC",
    )
    .bind(survey_id.to_string())
    .fetch_all(db)
    .await?;

    let mut versions = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut version = version_from_row(row)?;
        version.questions = version_questions(db, version.id).await?;
        versions.push(version);
    }
    Ok(versions)
}

pub async fn get_version(db: &SqlitePool, survey_id: Uuid, version_id: Uuid) -> Result<SurveyVersion> {
    let row = sqlx::query(
        "SELECT guid, survey_id, version_number, change_log, is_active, created_at
         FROM survey_versions
         WHERE guid = ? AND survey_id = ?",
    )
    .bind(version_id.to_string())
    .bind(survey_id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| {
        Error::NotFound(format!(
            "Version with ID {} for survey {}",
            version_id, survey_id
        ))
    })?;

    let mut version = version_from_row(&row)?;
    version.questions = version_questions(db, version.id).await?;
    Ok(version)
}

/// Version lookup by id alone (used when resolving a campaign's version)
pub async fn get_version_by_id(db: &SqlitePool, version_id: Uuid) -> Result<SurveyVersion> {
    let row = sqlx::query(
        "SELECT guid, survey_id, version_number, change_log, is_active, created_at
         FROM survey_versions
         WHERE guid = ?",
    )
    .bind(version_id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Survey version with ID {}", version_id)))?;

    let mut version = version_from_row(&row)?;
    version.questions = version_questions(db, version.id).await?;
    Ok(version)
}

pub async fn insert_template(db: &SqlitePool, template: &SurveyTemplate) -> Result<()> {
    sqlx::query(
        "INSERT INTO survey_templates (guid, name, description, questions, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(template.id.to_string())
    .bind(&template.name)
    .bind(&template.description)
    .bind(serde_json::to_string(&template.questions)?)
    .bind(template.created_at.to_rfc3339())
    .bind(template.updated_at.to_rfc3339())
    .execute(db)
    .await?;
    Ok(())
}

fn template_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SurveyTemplate> {
    Ok(SurveyTemplate {
        id: parse_uuid(&row.get::<String, _>("guid"))?,
        name: row.get("name"),
        description: row.get("description"),
        questions: parse_json_column(row.get("questions"))?,
        created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
        updated_at: parse_datetime(&row.get::<String, _>("updated_at"))?,
    })
}

pub async fn list_templates(db: &SqlitePool) -> Result<Vec<SurveyTemplate>> {
    let rows = sqlx::query(
        "SELECT guid, name, description, questions, created_at, updated_at
         FROM survey_templates
         ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await?;

    rows.iter().map(template_from_row).collect()
}

pub async fn get_template(db: &SqlitePool, id: Uuid) -> Result<SurveyTemplate> {
    let row = sqlx::query(
        "SELECT guid, name, description, questions, created_at, updated_at
         FROM survey_templates
         WHERE guid = ?",
    )
    .bind(id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Template with ID {}", id)))?;

    template_from_row(&row)
}
