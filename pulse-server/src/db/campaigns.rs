//! Campaign queries

use pulse_common::error::{Error, Result};
use pulse_common::model::{Campaign, CampaignStatus};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};

fn campaign_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Campaign> {
    let status_raw: String = row.get("status");
    let status = CampaignStatus::from_str(&status_raw)
        .ok_or_else(|| Error::Internal(format!("unknown campaign status '{}'", status_raw)))?;

    Ok(Campaign {
        id: parse_uuid(&row.get::<String, _>("guid"))?,
        name: row.get("name"),
        description: row.get("description"),
        start_date: parse_datetime(&row.get::<String, _>("start_date"))?,
        end_date: parse_datetime(&row.get::<String, _>("end_date"))?,
        status,
        survey_version_id: parse_uuid(&row.get::<String, _>("survey_version_id"))?,
        created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
        updated_at: parse_datetime(&row.get::<String, _>("updated_at"))?,
    })
}

pub async fn insert_campaign(db: &SqlitePool, campaign: &Campaign) -> Result<()> {
    sqlx::query(
        "INSERT INTO campaigns
             (guid, name, description, start_date, end_date, status,
              survey_version_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(campaign.id.to_string())
    .bind(&campaign.name)
    .bind(&campaign.description)
    .bind(campaign.start_date.to_rfc3339())
    .bind(campaign.end_date.to_rfc3339())
    .bind(campaign.status.as_str())
    .bind(campaign.survey_version_id.to_string())
    .bind(campaign.created_at.to_rfc3339())
    .bind(campaign.updated_at.to_rfc3339())
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_campaigns(db: &SqlitePool) -> Result<Vec<Campaign>> {
    let rows = sqlx::query(
        "SELECT guid, name, description, start_date, end_date, status,
                survey_version_id, created_at, updated_at
         FROM campaigns
         ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await?;

    rows.iter().map(campaign_from_row).collect()
}

pub async fn get_campaign(db: &SqlitePool, id: Uuid) -> Result<Campaign> {
    let row = sqlx::query(
        "SELECT guid, name, description, start_date, end_date, status,
                survey_version_id, created_at, updated_at
         FROM campaigns
         WHERE guid = ?",
    )
    .bind(id.to_string())
    .fetch_optional(db)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Campaign with ID {}", id)))?;

    campaign_from_row(&row)
}

pub async fn update_campaign(db: &SqlitePool, campaign: &Campaign) -> Result<()> {
    sqlx::query(
        "UPDATE campaigns
         SET name = ?, description = ?, start_date = ?, end_date = ?,
             status = ?, survey_version_id = ?, updated_at = ?
         WHERE guid = ?",
    )
    .bind(&campaign.name)
    .bind(&campaign.description)
    .bind(campaign.start_date.to_rfc3339())
    .bind(campaign.end_date.to_rfc3339())
    .bind(campaign.status.as_str())
    .bind(campaign.survey_version_id.to_string())
    .bind(campaign.updated_at.to_rfc3339())
    .bind(campaign.id.to_string())
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_campaign(db: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM campaigns WHERE guid = ?")
        .bind(id.to_string())
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Campaign with ID {}", id)));
    }
    Ok(())
}
