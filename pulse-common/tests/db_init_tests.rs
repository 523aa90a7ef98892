//! Integration tests for database initialization
//!
//! Covers automatic database creation, idempotent re-initialization, and
//! the schema guarantees the rest of the platform leans on (tables plus
//! the one-response-per-user partial unique index).

use pulse_common::db::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    // Parent directories are created on demand
    let db_path = dir.path().join("nested").join("pulse.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_reinit_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("pulse.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Re-opening an existing database must not fail or clobber schema
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("pulse.db")).await.unwrap();

    for table in [
        "surveys",
        "survey_versions",
        "questions",
        "survey_templates",
        "campaigns",
        "responses",
        "response_items",
    ] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "Missing table '{}'", table);
    }
}

#[tokio::test]
async fn test_partial_unique_index_on_responses() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("pulse.db")).await.unwrap();

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type = 'index' AND name = 'idx_responses_campaign_user'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1, "Partial unique index is missing");

    // Foreign keys are enforced, so build the survey -> version -> campaign
    // chain before touching responses
    sqlx::query(
        "INSERT INTO surveys (guid, title, created_at, updated_at)
         VALUES ('s1', 'S', '2025-06-01T00:00:00Z', '2025-06-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO survey_versions (guid, survey_id, version_number, created_at)
         VALUES ('v1', 's1', 1, '2025-06-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO campaigns
             (guid, name, start_date, end_date, survey_version_id, created_at, updated_at)
         VALUES ('c1', 'C', '2025-06-01T00:00:00Z', '2025-07-01T00:00:00Z',
                 'v1', '2025-06-01T00:00:00Z', '2025-06-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();

    // Same (campaign, user) pair twice violates the index
    let insert = "INSERT INTO responses
                      (guid, campaign_id, user_id, started_at, created_at)
                  VALUES (?, 'c1', ?, '2025-06-01T00:00:00Z', '2025-06-01T00:00:00Z')";
    sqlx::query(insert)
        .bind("r1")
        .bind(Some("u1"))
        .execute(&pool)
        .await
        .unwrap();
    let dup = sqlx::query(insert)
        .bind("r2")
        .bind(Some("u1"))
        .execute(&pool)
        .await;
    assert!(dup.is_err(), "Duplicate (campaign, user) insert should fail");

    // NULL user_id rows are exempt: any number of anonymous responses
    for guid in ["a1", "a2"] {
        sqlx::query(insert)
            .bind(guid)
            .bind(None::<String>)
            .execute(&pool)
            .await
            .unwrap();
    }
}
