// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use common::{CreateDeadlinePayload, Deadline};
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::{debug, info};

/// Establishes the database connection pool.
/// If the database does not exist, it creates it (and its parent directory).
/// It also ensures the tables have the correct schema.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if let Some(dir) = database_dir(database_url) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
    }

    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    init_schema(&pool).await?;

    Ok(pool)
}

// Parent directory of a file-backed URL; `None` for in-memory databases.
fn database_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

/// Creates the `deadlines` and `app_state` tables if they are missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // No status column: status is derived from due_date and completed.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deadlines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NULL,
            deadline_type TEXT NOT NULL,
            due_date DATE NOT NULL,
            due_time TEXT NULL,
            priority TEXT NOT NULL,
            court_rule TEXT NULL,
            reminders TEXT NOT NULL DEFAULT '[]',
            completed BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            deleted_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create 'deadlines' table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create 'app_state' table")?;

    info!("'deadlines' and 'app_state' tables are ready.");

    Ok(())
}

/// Raw row shape; enums and the reminder list are stored as text.
#[derive(Debug, sqlx::FromRow)]
struct DeadlineRow {
    id: i64,
    title: String,
    description: Option<String>,
    deadline_type: String,
    due_date: NaiveDate,
    due_time: Option<String>,
    priority: String,
    court_rule: Option<String>,
    reminders: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<DeadlineRow> for Deadline {
    type Error = anyhow::Error;

    fn try_from(row: DeadlineRow) -> Result<Self> {
        let reminders: Vec<i32> = serde_json::from_str(&row.reminders)
            .with_context(|| format!("Corrupt reminders for deadline {}", row.id))?;
        Ok(Deadline {
            id: row.id,
            title: row.title,
            description: row.description,
            deadline_type: row.deadline_type.parse()?,
            date: row.due_date,
            time: row.due_time,
            priority: row.priority.parse()?,
            court_rule: row.court_rule,
            reminders,
            completed: row.completed,
            created_at: row.created_at,
        })
    }
}

const SELECT_DEADLINE: &str = "SELECT id, title, description, deadline_type, due_date, due_time, priority, court_rule, reminders, completed, created_at FROM deadlines";

/// Inserts a new deadline. The payload is expected to be validated already.
pub async fn create_deadline_in_db(
    pool: &SqlitePool,
    payload: CreateDeadlinePayload,
) -> Result<Deadline> {
    let created_at = Utc::now();
    let reminders =
        serde_json::to_string(&payload.reminders).context("Failed to encode reminders")?;

    debug!(
        "Insert values: title={}, type={}, date={}, priority={}, reminders={}, created_at={}",
        payload.title,
        payload.deadline_type,
        payload.date,
        payload.priority,
        reminders,
        created_at
    );

    let id = sqlx::query(
        "INSERT INTO deadlines (title, description, deadline_type, due_date, due_time, priority, court_rule, reminders, completed, created_at, deleted_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, NULL)",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.deadline_type.as_str())
    .bind(payload.date)
    .bind(&payload.time)
    .bind(payload.priority.as_str())
    .bind(&payload.court_rule)
    .bind(&reminders)
    .bind(created_at)
    .execute(pool)
    .await
    .context("Failed to insert deadline into DB")?
    .last_insert_rowid();

    Ok(Deadline {
        id,
        title: payload.title,
        description: payload.description,
        deadline_type: payload.deadline_type,
        date: payload.date,
        time: payload.time,
        priority: payload.priority,
        court_rule: payload.court_rule,
        reminders: payload.reminders,
        completed: false,
        created_at,
    })
}

/// Retrieves every live deadline, earliest date first, then by priority.
pub async fn list_deadlines_from_db(pool: &SqlitePool) -> Result<Vec<Deadline>> {
    let query = format!(
        "{SELECT_DEADLINE} WHERE deleted_at IS NULL ORDER BY due_date ASC, \
         CASE priority WHEN 'critical' THEN 0 WHEN 'high' THEN 1 WHEN 'medium' THEN 2 ELSE 3 END ASC, \
         id ASC"
    );
    let rows = sqlx::query_as::<_, DeadlineRow>(&query)
        .fetch_all(pool)
        .await
        .context("Failed to retrieve deadlines from DB")?;

    rows.into_iter().map(Deadline::try_from).collect()
}

pub async fn get_deadline_from_db(pool: &SqlitePool, deadline_id: i64) -> Result<Option<Deadline>> {
    let query = format!("{SELECT_DEADLINE} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, DeadlineRow>(&query)
        .bind(deadline_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to load deadline with ID: {deadline_id}"))?;

    row.map(Deadline::try_from).transpose()
}

/// Flips the completion flag. Returns the updated deadline, or `None` when
/// no live deadline has this ID.
pub async fn toggle_deadline_in_db(
    pool: &SqlitePool,
    deadline_id: i64,
) -> Result<Option<Deadline>> {
    debug!("Toggling completion for deadline ID: {}", deadline_id);
    let result = sqlx::query(
        "UPDATE deadlines SET completed = NOT completed WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(deadline_id)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to toggle deadline with ID: {deadline_id}"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_deadline_from_db(pool, deadline_id).await
}

/// Soft deletes a deadline by setting its `deleted_at` timestamp.
/// Returns true if a deadline was updated, false if no live deadline with
/// the given ID was found.
pub async fn soft_delete_deadline_in_db(pool: &SqlitePool, deadline_id: i64) -> Result<bool> {
    debug!("Attempting to soft delete deadline with ID: {}", deadline_id);
    let result =
        sqlx::query("UPDATE deadlines SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(deadline_id)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to soft delete deadline with ID: {deadline_id}"))?;

    let rows_affected = result.rows_affected();
    info!(
        "Soft deleted {} rows for deadline ID: {}",
        rows_affected, deadline_id
    );

    Ok(rows_affected > 0)
}

/// Reads an application-state blob stored under `key`.
pub async fn get_state_from_db(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM app_state WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to read state '{key}'"))?;

    raw.map(|text| {
        serde_json::from_str(&text).with_context(|| format!("Corrupt JSON stored under '{key}'"))
    })
    .transpose()
}

/// Stores `value` under `key`, replacing any previous blob.
pub async fn put_state_in_db(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string(value).context("Failed to encode state")?;
    sqlx::query(
        "INSERT INTO app_state (key, value, updated_at) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(&text)
    .bind(Utc::now())
    .execute(pool)
    .await
    .with_context(|| format!("Failed to write state '{key}'"))?;

    debug!("Stored {} bytes under state key '{}'", text.len(), key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{DeadlineType, Priority};
    use serde_json::json;

    /// Helper function to set up an in-memory SQLite database for testing.
    /// This creates a fresh, empty database for each test, ensuring they are isolated.
    async fn setup_test_db() -> Result<SqlitePool> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        init_schema(&pool).await?;
        Ok(pool)
    }

    fn payload(title: &str, date: NaiveDate, priority: Priority) -> CreateDeadlinePayload {
        CreateDeadlinePayload {
            title: title.to_string(),
            description: Some("Test the database".to_string()),
            deadline_type: DeadlineType::Filing,
            date,
            time: Some("5:00 PM".to_string()),
            priority,
            court_rule: Some("FRCP 12(a)".to_string()),
            reminders: vec![7, 3, 3, 1],
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_database_dir() {
        assert_eq!(
            database_dir("sqlite://database/counsel.db"),
            Some(Path::new("database"))
        );
        assert_eq!(database_dir("sqlite::memory:"), None);
        assert_eq!(database_dir("sqlite://counsel.db"), None);
    }

    #[tokio::test]
    async fn test_create_and_get_deadline() {
        let pool = setup_test_db().await.unwrap();
        let created = create_deadline_in_db(&pool, payload("Answer", ymd(2024, 3, 1), Priority::High))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert!(!created.completed);

        let fetched = get_deadline_from_db(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Answer");
        assert_eq!(fetched.deadline_type, DeadlineType::Filing);
        assert_eq!(fetched.priority, Priority::High);
        assert_eq!(fetched.date, ymd(2024, 3, 1));
        assert_eq!(fetched.time.as_deref(), Some("5:00 PM"));
        // Order and duplicates survive storage.
        assert_eq!(fetched.reminders, vec![7, 3, 3, 1]);
    }

    #[tokio::test]
    async fn test_get_missing_deadline() {
        let pool = setup_test_db().await.unwrap();
        assert!(get_deadline_from_db(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_priority() {
        let pool = setup_test_db().await.unwrap();
        for (title, date, priority) in [
            ("Late low", ymd(2024, 5, 2), Priority::Low),
            ("Early medium", ymd(2024, 5, 1), Priority::Medium),
            ("Early critical", ymd(2024, 5, 1), Priority::Critical),
            ("Late high", ymd(2024, 5, 2), Priority::High),
        ] {
            create_deadline_in_db(&pool, payload(title, date, priority))
                .await
                .unwrap();
        }

        let titles: Vec<String> = list_deadlines_from_db(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Early critical", "Early medium", "Late high", "Late low"]
        );
    }

    #[tokio::test]
    async fn test_toggle_deadline() {
        let pool = setup_test_db().await.unwrap();
        let created = create_deadline_in_db(&pool, payload("Serve", ymd(2024, 3, 1), Priority::Low))
            .await
            .unwrap();

        let toggled = toggle_deadline_in_db(&pool, created.id).await.unwrap().unwrap();
        assert!(toggled.completed);
        let toggled = toggle_deadline_in_db(&pool, created.id).await.unwrap().unwrap();
        assert!(!toggled.completed);

        assert!(toggle_deadline_in_db(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_deadline() {
        let pool = setup_test_db().await.unwrap();
        let created = create_deadline_in_db(&pool, payload("Appeal", ymd(2024, 3, 1), Priority::Critical))
            .await
            .unwrap();

        assert!(soft_delete_deadline_in_db(&pool, created.id).await.unwrap());
        assert!(list_deadlines_from_db(&pool).await.unwrap().is_empty());
        assert!(get_deadline_from_db(&pool, created.id).await.unwrap().is_none());
        // A second delete finds nothing live.
        assert!(!soft_delete_deadline_in_db(&pool, created.id).await.unwrap());
        assert!(toggle_deadline_in_db(&pool, created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_state_upsert() {
        let pool = setup_test_db().await.unwrap();
        assert!(get_state_from_db(&pool, "case-info").await.unwrap().is_none());

        put_state_in_db(&pool, "case-info", &json!({"caseNumber": "24-cv-001"}))
            .await
            .unwrap();
        put_state_in_db(&pool, "case-info", &json!({"caseNumber": "24-cv-002"}))
            .await
            .unwrap();

        let value = get_state_from_db(&pool, "case-info").await.unwrap().unwrap();
        assert_eq!(value["caseNumber"], "24-cv-002");
    }
}
