// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

/// Input rejected before it reaches the engine.
///
/// The calculator and classifier themselves never fail; these errors are
/// raised by the payload checks that guard them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty.")]
    EmptyTitle,
    #[error("Day count must be zero or positive, got {0}.")]
    NegativeDays(i64),
    #[error("Day count must not exceed {max}, got {got}.")]
    TooManyDays { got: i64, max: u32 },
    #[error("Either a day count or a court rule is required.")]
    MissingDays,
    #[error("Bates digits must be between 1 and {max}, got {got}.")]
    InvalidDigits { got: u32, max: u32 },
    #[error("Document '{0}' must have at least one page.")]
    EmptyPage(String),
    #[error("Bates numbering starting at {start} overflows after document '{document}'.")]
    BatesOverflow { start: u64, document: String },
    #[error("Reminder offsets must be zero or positive, got {0}.")]
    NegativeReminder(i32),
    #[error("Reminder offsets must not exceed {max} days, got {got}.")]
    ReminderTooFar { got: i32, max: u32 },
    #[error("Unknown court rule '{0}'.")]
    UnknownRule(String),
    #[error("Unknown holiday jurisdiction '{0}'.")]
    UnknownJurisdiction(String),
    #[error("Unknown {kind} '{value}'.")]
    UnknownVariant { kind: &'static str, value: String },
}
