// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::MAX_DAYS;
use crate::error::ValidationError;
use crate::status::{self, DeadlineStatus};

/// Kind of obligation a deadline tracks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineType {
    Filing,
    Hearing,
    Discovery,
    Service,
    Appeal,
    #[default]
    Other,
}

impl DeadlineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineType::Filing => "filing",
            DeadlineType::Hearing => "hearing",
            DeadlineType::Discovery => "discovery",
            DeadlineType::Service => "service",
            DeadlineType::Appeal => "appeal",
            DeadlineType::Other => "other",
        }
    }
}

impl FromStr for DeadlineType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filing" => Ok(DeadlineType::Filing),
            "hearing" => Ok(DeadlineType::Hearing),
            "discovery" => Ok(DeadlineType::Discovery),
            "service" => Ok(DeadlineType::Service),
            "appeal" => Ok(DeadlineType::Appeal),
            "other" => Ok(DeadlineType::Other),
            _ => Err(ValidationError::UnknownVariant {
                kind: "deadline type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-assigned importance. Never derived from the date.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank, lower is more important.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ValidationError::UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored deadline record.
///
/// Status is not stored: it depends on the current time and is computed on
/// every read (see [`DeadlineView`]).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Deadline {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
    // Only the day matters for the engine.
    pub date: NaiveDate,
    // Free text such as "9:30 AM", shown to the user as-is.
    pub time: Option<String>,
    pub priority: Priority,
    pub court_rule: Option<String>,
    // Days before `date` at which to remind; order kept, duplicates allowed.
    pub reminders: Vec<i32>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of a deadline creation request.
///
/// Used both for manual entry and for "add to deadlines" from a
/// calculation result, where `date` is the calculator's output.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateDeadlinePayload {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub deadline_type: DeadlineType,
    pub date: NaiveDate,
    pub time: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub court_rule: Option<String>,
    #[serde(default)]
    pub reminders: Vec<i32>,
}

impl CreateDeadlinePayload {
    /// Checks the fields the store cannot repair on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if let Some(&bad) = self.reminders.iter().find(|r| **r < 0) {
            return Err(ValidationError::NegativeReminder(bad));
        }
        if let Some(&far) = self
            .reminders
            .iter()
            .find(|r| i64::from(**r) > i64::from(MAX_DAYS))
        {
            return Err(ValidationError::ReminderTooFar {
                got: far,
                max: MAX_DAYS,
            });
        }
        Ok(())
    }
}

/// Read model: a deadline plus everything derived from it at `now`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeadlineView {
    #[serde(flatten)]
    pub deadline: Deadline,
    pub status: DeadlineStatus,
    pub days_remaining: i64,
    pub is_urgent: bool,
}

impl DeadlineView {
    pub fn at(deadline: Deadline, now: DateTime<Utc>) -> Self {
        let days_remaining = status::days_remaining(deadline.date, now);
        let status = status::classify(deadline.date, deadline.completed, now);
        let is_urgent = !deadline.completed && status::is_urgent(days_remaining);
        Self {
            deadline,
            status,
            days_remaining,
            is_urgent,
        }
    }
}
