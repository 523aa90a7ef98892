//! Response and response-item queries

use pulse_common::error::{Error, Result};
use pulse_common::model::{Response, ResponseItem};
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};

/// Pre-insert duplicate check. Racy on its own; the partial unique index on
/// (campaign_id, user_id) is the authoritative guard.
pub async fn response_exists(db: &SqlitePool, campaign_id: Uuid, user_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM responses WHERE campaign_id = ? AND user_id = ?)",
    )
    .bind(campaign_id.to_string())
    .bind(user_id.to_string())
    .fetch_one(db)
    .await?;
    Ok(exists)
}

/// Persist a response and its items atomically.
///
/// A unique-constraint violation on (campaign_id, user_id) is translated
/// into `DuplicateSubmission`, so a concurrent duplicate loses cleanly.
pub async fn insert_response(db: &SqlitePool, response: &Response) -> Result<()> {
    let mut tx = db.begin().await?;

    let insert = sqlx::query(
        "INSERT INTO responses
             (guid, campaign_id, user_id, anonymous_id, started_at,
              completed_at, completion_time_seconds, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(response.id.to_string())
    .bind(response.campaign_id.to_string())
    .bind(response.user_id.map(|id| id.to_string()))
    .bind(&response.anonymous_id)
    .bind(response.started_at.to_rfc3339())
    .bind(response.completed_at.map(|t| t.to_rfc3339()))
    .bind(response.completion_time_seconds)
    .bind(response.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await;

    if let Err(e) = insert {
        if matches!(&e, sqlx::Error::Database(dbe) if dbe.is_unique_violation()) {
            return Err(Error::DuplicateSubmission);
        }
        return Err(e.into());
    }

    for item in &response.items {
        sqlx::query(
            "INSERT INTO response_items (guid, response_id, question_id, value)
             VALUES (?, ?, ?, ?)",
        )
        .bind(item.id.to_string())
        .bind(response.id.to_string())
        .bind(item.question_id.to_string())
        .bind(serde_json::to_string(&item.value)?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

fn response_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Response> {
    let user_id = match row.get::<Option<String>, _>("user_id") {
        Some(raw) => Some(parse_uuid(&raw)?),
        None => None,
    };
    let completed_at = match row.get::<Option<String>, _>("completed_at") {
        Some(raw) => Some(parse_datetime(&raw)?),
        None => None,
    };

    Ok(Response {
        id: parse_uuid(&row.get::<String, _>("guid"))?,
        campaign_id: parse_uuid(&row.get::<String, _>("campaign_id"))?,
        user_id,
        anonymous_id: row.get("anonymous_id"),
        started_at: parse_datetime(&row.get::<String, _>("started_at"))?,
        completed_at,
        completion_time_seconds: row.get("completion_time_seconds"),
        created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
        items: vec![],
    })
}

async fn items_for_response(db: &SqlitePool, response_id: Uuid) -> Result<Vec<ResponseItem>> {
    let rows = sqlx::query(
        "SELECT guid, question_id, value FROM response_items WHERE response_id = ?",
    )
    .bind(response_id.to_string())
    .fetch_all(db)
    .await?;

    rows.iter()
        .map(|row| {
            let value: Value = match row.get::<Option<String>, _>("value") {
                Some(text) => serde_json::from_str(&text)?,
                None => Value::Null,
            };
            Ok(ResponseItem {
                id: parse_uuid(&row.get::<String, _>("guid"))?,
                question_id: parse_uuid(&row.get::<String, _>("question_id"))?,
                value,
            })
        })
        .collect()
}

pub async fn get_response(db: &SqlitePool, id: Uuid) -> Result<Response> {
    let row = sqlx::query(
        "SELECT guid, campaign_id, user_id, anonymous_id, started_at,
                completed_at, completion_time_seconds, created_at
         FROM responses
         WHERE guid = ?",
    )
    .bind(id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Response with ID {}", id)))?;

    let mut response = response_from_row(&row)?;
    response.items = items_for_response(db, response.id).await?;
    Ok(response)
}

/// All responses for one campaign, newest first, with their items
pub async fn list_by_campaign(db: &SqlitePool, campaign_id: Uuid) -> Result<Vec<Response>> {
    let rows = sqlx::query(
        "SELECT guid, campaign_id, user_id, anonymous_id, started_at,
                completed_at, completion_time_seconds, created_at
         FROM responses
         WHERE campaign_id = ?
         ORDER BY created_at DESC",
    )
    .bind(campaign_id.to_string())
    .fetch_all(db)
    .await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut response = response_from_row(row)?;
        response.items = items_for_response(db, response.id).await?;
        responses.push(response);
    }
    Ok(responses)
}

/// Raw answer values stored for one question across a campaign's responses
pub async fn question_values(
    db: &SqlitePool,
    campaign_id: Uuid,
    question_id: Uuid,
) -> Result<Vec<Value>> {
    let rows = sqlx::query(
        "SELECT i.value
         FROM response_items i
         JOIN responses r ON i.response_id = r.guid
         WHERE r.campaign_id = ? AND i.question_id = ?
         ORDER BY r.created_at ASC",
    )
    .bind(campaign_id.to_string())
    .bind(question_id.to_string())
    .fetch_all(db)
    .await?;

    rows.iter()
        .map(|row| match row.get::<Option<String>, _>("value") {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Value::Null),
        })
        .collect()
}

/// One CSV export row: (response, answered item) with the question text
#[derive(Debug)]
pub struct ExportRow {
    pub response_id: Uuid,
    pub question_id: Uuid,
    pub question_text: String,
    pub value: Value,
    pub created_at: String,
}

pub async fn export_rows(db: &SqlitePool, campaign_id: Uuid) -> Result<Vec<ExportRow>> {
    let rows = sqlx::query(
        "SELECT r.guid AS response_id, i.question_id, q.text AS question_text,
                i.value, r.created_at
         FROM responses r
         JOIN response_items i ON i.response_id = r.guid
         JOIN questions q ON q.guid = i.question_id
         WHERE r.campaign_id = ?
         ORDER BY r.created_at ASC, q.order_index ASC",
    )
    .bind(campaign_id.to_string())
    .fetch_all(db)
    .await?;

    rows.iter()
        .map(|row| {
            let value: Value = match row.get::<Option<String>, _>("value") {
                Some(text) => serde_json::from_str(&text)?,
                None => Value::Null,
            };
            Ok(ExportRow {
                response_id: parse_uuid(&row.get::<String, _>("response_id"))?,
                question_id: parse_uuid(&row.get::<String, _>("question_id"))?,
                question_text: row.get("question_text"),
                value,
                created_at: row.get("created_at"),
            })
        })
        .collect()
}
