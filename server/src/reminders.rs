// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use common::{Deadline, status};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tokio::time::{self, Duration};
use tracing::{debug, error, info};

use crate::database;

/// Live deadlines with a reminder offset landing on `today`.
pub async fn due_reminders(pool: &SqlitePool, today: NaiveDate) -> Result<Vec<Deadline>> {
    let deadlines = database::list_deadlines_from_db(pool).await?;
    Ok(deadlines
        .into_iter()
        .filter(|d| status::reminder_due(d, today))
        .collect())
}

/// Logs today's reminders once, the first time the sweep runs on a new day.
/// Returns how many reminders were reported, or `None` when today was
/// already swept.
async fn sweep_once(
    pool: &SqlitePool,
    today: NaiveDate,
    last_sweep_date: &Mutex<Option<NaiveDate>>,
) -> Result<Option<usize>> {
    let mut last_date_guard = last_sweep_date.lock().await;

    if last_date_guard.is_some_and(|last| last >= today) {
        debug!(
            "Reminders already swept for {}. Last sweep date: {:?}.",
            today, *last_date_guard
        );
        return Ok(None);
    }

    let due = due_reminders(pool, today).await?;
    for deadline in &due {
        info!(
            "Reminder: '{}' ({}, {}) is due on {}.",
            deadline.title, deadline.deadline_type, deadline.priority, deadline.date
        );
    }
    *last_date_guard = Some(today);
    Ok(Some(due.len()))
}

/// Runs forever, checking every `interval` whether a new day has started.
pub async fn run_reminder_sweep(pool: SqlitePool, interval: Duration) {
    let last_sweep_date = Mutex::new(None);
    let mut ticker = time::interval(interval);

    loop {
        // The first tick completes immediately, so today's reminders are
        // reported at startup.
        ticker.tick().await;

        let today = Utc::now().date_naive();
        match sweep_once(&pool, today, &last_sweep_date).await {
            Ok(Some(count)) => info!("Reported {} reminders for {}.", count, today),
            Ok(None) => {}
            Err(e) => error!("Error during reminder sweep: {:?}", e),
        }
    }
}
