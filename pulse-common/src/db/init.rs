//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently. Every table function is `CREATE TABLE IF NOT EXISTS`,
//! safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_surveys_table(&pool).await?;
    create_survey_versions_table(&pool).await?;
    create_questions_table(&pool).await?;
    create_survey_templates_table(&pool).await?;
    create_campaigns_table(&pool).await?;
    create_responses_table(&pool).await?;
    create_response_items_table(&pool).await?;

    Ok(pool)
}

async fn create_surveys_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS surveys (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_survey_versions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS survey_versions (
            guid TEXT PRIMARY KEY,
            survey_id TEXT NOT NULL REFERENCES surveys(guid) ON DELETE CASCADE,
            version_number INTEGER NOT NULL,
            change_log TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_questions_table(pool: &SqlitePool) -> Result<()> {
    // validation_rules, options, and visibility_conditions are JSON columns
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            guid TEXT PRIMARY KEY,
            survey_version_id TEXT NOT NULL REFERENCES survey_versions(guid) ON DELETE CASCADE,
            text TEXT NOT NULL,
            code TEXT,
            type TEXT NOT NULL,
            required INTEGER NOT NULL DEFAULT 0,
            order_index INTEGER NOT NULL DEFAULT 1,
            validation_rules TEXT,
            options TEXT,
            visibility_conditions TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_survey_templates_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS survey_templates (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            questions TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_campaigns_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS campaigns (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'CREATED',
            survey_version_id TEXT NOT NULL REFERENCES survey_versions(guid),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_responses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            guid TEXT PRIMARY KEY,
            campaign_id TEXT NOT NULL REFERENCES campaigns(guid) ON DELETE CASCADE,
            user_id TEXT,
            anonymous_id TEXT,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            completion_time_seconds INTEGER,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Storage-layer duplicate-submission guard: concurrent submissions from
    // the same authenticated respondent race past the pre-check; this index
    // turns the race into a well-defined conflict.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_responses_campaign_user
        ON responses(campaign_id, user_id)
        WHERE user_id IS NOT NULL
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_response_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS response_items (
            guid TEXT PRIMARY KEY,
            response_id TEXT NOT NULL REFERENCES responses(guid) ON DELETE CASCADE,
            question_id TEXT NOT NULL REFERENCES questions(guid),
            value TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_response_items_question ON response_items(question_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}
