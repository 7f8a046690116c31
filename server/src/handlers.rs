// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::database;
use crate::reminders;
use crate::routes::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use common::{
    BatesConfig, BatesDocument, BatesSummary, CourtRule, CreateDeadlinePayload, DeadlineView,
    UrgencyGroups, ValidationError, bates, calendar, status,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Handler for listing every live deadline, earliest first.
pub async fn list_deadlines(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeadlineView>>, AppError> {
    let now = Utc::now();
    let deadlines = database::list_deadlines_from_db(&state.pool).await?;
    info!("Successfully retrieved {} deadlines.", deadlines.len());
    Ok(Json(
        deadlines
            .into_iter()
            .map(|d| DeadlineView::at(d, now))
            .collect(),
    ))
}

/// Handler for creating a new deadline.
pub async fn create_deadline(
    State(state): State<AppState>,
    Json(payload): Json<CreateDeadlinePayload>,
) -> Result<(StatusCode, Json<DeadlineView>), AppError> {
    debug!("Received request to create deadline: {}", payload.title);
    payload.validate()?;

    let new_deadline = database::create_deadline_in_db(&state.pool, payload).await?;
    info!("Deadline created successfully with ID: {}", new_deadline.id);

    Ok((
        StatusCode::CREATED,
        Json(DeadlineView::at(new_deadline, Utc::now())),
    ))
}

pub async fn get_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<i64>,
) -> Result<Json<DeadlineView>, AppError> {
    match database::get_deadline_from_db(&state.pool, deadline_id).await? {
        Some(deadline) => Ok(Json(DeadlineView::at(deadline, Utc::now()))),
        None => Err(AppError::not_found(deadline_id)),
    }
}

/// Handler for flipping a deadline's completion flag.
pub async fn toggle_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<i64>,
) -> Result<Json<DeadlineView>, AppError> {
    debug!("Toggling completion of deadline {}", deadline_id);
    match database::toggle_deadline_in_db(&state.pool, deadline_id).await? {
        Some(deadline) => {
            info!(
                "Deadline {} marked {}.",
                deadline_id,
                if deadline.completed { "completed" } else { "open" }
            );
            Ok(Json(DeadlineView::at(deadline, Utc::now())))
        }
        None => Err(AppError::not_found(deadline_id)),
    }
}

/// Handler for deleting a deadline by ID.
pub async fn delete_deadline(
    State(state): State<AppState>,
    Path(deadline_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    debug!("Attempting to delete deadline with ID: {}", deadline_id);

    if database::soft_delete_deadline_in_db(&state.pool, deadline_id).await? {
        info!("Deadline with ID {} deleted successfully.", deadline_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(deadline_id))
    }
}

/// Handler returning deadlines bucketed by the 7 day urgency policy.
pub async fn grouped_deadlines(
    State(state): State<AppState>,
) -> Result<Json<UrgencyGroups>, AppError> {
    let deadlines = database::list_deadlines_from_db(&state.pool).await?;
    let groups = status::group_by_urgency(deadlines, Utc::now());
    debug!(
        "Grouped deadlines: {} overdue, {} urgent, {} upcoming, {} completed.",
        groups.overdue.len(),
        groups.urgent.len(),
        groups.upcoming.len(),
        groups.completed.len()
    );
    Ok(Json(groups))
}

/// Handler listing deadlines with a reminder falling today.
pub async fn reminders_today(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeadlineView>>, AppError> {
    let now = Utc::now();
    let due = reminders::due_reminders(&state.pool, now.date_naive()).await?;
    Ok(Json(
        due.into_iter().map(|d| DeadlineView::at(d, now)).collect(),
    ))
}

/// Calculator input. When `rule_id` is set the rule supplies the day count
/// and weekend policy, and `days` / `exclude_weekends` are ignored.
#[derive(Deserialize, Serialize, Debug)]
pub struct CalculateRequest {
    pub start_date: NaiveDate,
    pub days: Option<i64>,
    #[serde(default)]
    pub exclude_weekends: bool,
    #[serde(default)]
    pub exclude_holidays: bool,
    pub rule_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CalculateResponse {
    pub start_date: NaiveDate,
    pub days: u32,
    pub exclude_weekends: bool,
    pub exclude_holidays: bool,
    pub result_date: NaiveDate,
    pub weekday: String,
    // Configured holidays inside the window that were stepped over.
    pub skipped_holidays: Vec<NaiveDate>,
    pub rule: Option<CourtRule>,
}

/// Handler for the deadline calculator.
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, AppError> {
    debug!("Received calculation request: {:?}", request);
    let holidays = state.holidays.as_ref();

    let (days, exclude_weekends, result_date, rule) = match &request.rule_id {
        Some(rule_id) => {
            let rule = CourtRule::find(rule_id)?;
            let result = calendar::calculate_from_rule(
                rule,
                request.start_date,
                request.exclude_holidays,
                holidays,
            );
            (rule.days, rule.business_days_only, result, Some(rule.clone()))
        }
        None => {
            let days = calendar::checked_days(request.days.ok_or(ValidationError::MissingDays)?)?;
            let result = calendar::calculate_deadline(
                request.start_date,
                days,
                request.exclude_weekends,
                request.exclude_holidays,
                holidays,
            );
            (days, request.exclude_weekends, result, None)
        }
    };

    let skipped_holidays = match request.start_date.succ_opt() {
        Some(first) if request.exclude_holidays => holidays.between(first, result_date),
        _ => Vec::new(),
    };

    info!(
        "Calculated {} + {} days (weekends excluded: {}, holidays excluded: {}) = {}",
        request.start_date, days, exclude_weekends, request.exclude_holidays, result_date
    );

    Ok(Json(CalculateResponse {
        start_date: request.start_date,
        days,
        exclude_weekends,
        exclude_holidays: request.exclude_holidays,
        result_date,
        weekday: result_date.weekday().to_string(),
        skipped_holidays,
        rule,
    }))
}

pub async fn list_rules() -> Json<Vec<CourtRule>> {
    Json(CourtRule::all().to_vec())
}

#[derive(Deserialize, Debug)]
pub struct HolidayQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct HolidaysResponse {
    pub jurisdiction: String,
    pub dates: Vec<NaiveDate>,
}

/// Handler listing the configured holiday calendar, optionally filtered to
/// an inclusive date range.
pub async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidayQuery>,
) -> Json<HolidaysResponse> {
    let from = query.from.unwrap_or(NaiveDate::MIN);
    let to = query.to.unwrap_or(NaiveDate::MAX);
    Json(HolidaysResponse {
        jurisdiction: state.jurisdiction.clone(),
        dates: state.holidays.between(from, to),
    })
}

#[derive(Deserialize, Serialize, Debug)]
pub struct BatesRequest {
    #[serde(flatten)]
    pub config: BatesConfig,
    pub documents: Vec<BatesDocument>,
}

/// Handler for numbering an exhibit bundle.
pub async fn allocate_bates(
    Json(request): Json<BatesRequest>,
) -> Result<Json<BatesSummary>, AppError> {
    let summary = bates::allocate(&request.documents, &request.config)?;
    info!(
        "Allocated Bates numbers for {} documents ({} pages).",
        summary.documents.len(),
        summary.total_pages
    );
    Ok(Json(summary))
}

/// Handler reading a UI state blob.
pub async fn get_state(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    match database::get_state_from_db(&state.pool, &key).await? {
        Some(value) => Ok(Json(value)),
        None => Err(AppError::new(
            StatusCode::NOT_FOUND,
            &format!("No state stored under '{}'.", key),
        )),
    }
}

/// Handler writing a UI state blob.
pub async fn put_state(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<StatusCode, AppError> {
    database::put_state_in_db(&state.pool, &key, &value).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Custom Error Handling ---

/// Our custom error type for the application.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    fn not_found(deadline_id: i64) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            &format!("Deadline with ID {} not found.", deadline_id),
        )
    }
}

/// Allows converting an `anyhow::Error` (coming from `database.rs`)
/// into our `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Log the internal error for debugging.
        error!("Internal server error: {:?}", err);
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred.".to_string(),
        }
    }
}

/// Rejected input maps to 400 with the validation message.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        error!("Validation failed: {}", err);
        Self::new(StatusCode::BAD_REQUEST, &err.to_string())
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (
            self.code,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}
