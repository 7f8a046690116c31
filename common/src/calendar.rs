// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Holiday calendars and the business-day aware deadline calculator.
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::rules::CourtRule;

/// Jurisdiction used when configuration does not name one.
pub const DEFAULT_JURISDICTION: &str = "us-federal";

/// Largest day count accepted from callers, about a century.
pub const MAX_DAYS: u32 = 36_500;

/// Converts a caller-supplied signed day count into the calculator's domain.
pub fn checked_days(days: i64) -> Result<u32, ValidationError> {
    if days < 0 {
        return Err(ValidationError::NegativeDays(days));
    }
    match u32::try_from(days) {
        Ok(d) if d <= MAX_DAYS => Ok(d),
        _ => Err(ValidationError::TooManyDays {
            got: days,
            max: MAX_DAYS,
        }),
    }
}

/// An immutable, sorted set of non-working calendar dates.
///
/// Dates carry no time component, so membership is plain calendar-date
/// equality.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct HolidaySet {
    dates: Vec<NaiveDate>,
}

impl From<Vec<NaiveDate>> for HolidaySet {
    fn from(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }
}

impl From<HolidaySet> for Vec<NaiveDate> {
    fn from(set: HolidaySet) -> Self {
        set.dates
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl HolidaySet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up one of the built-in calendars.
    pub fn for_jurisdiction(name: &str) -> Result<&'static HolidaySet, ValidationError> {
        BUILTIN_CALENDARS
            .get(name)
            .ok_or_else(|| ValidationError::UnknownJurisdiction(name.to_string()))
    }

    /// Names of the built-in calendars, sorted.
    pub fn jurisdictions() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = BUILTIN_CALENDARS.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// Holidays in the inclusive range `from..=to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        self.dates
            .iter()
            .copied()
            .filter(|d| *d >= from && *d <= to)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Adds `days` countable days to `start`.
///
/// The date advances one calendar day at a time. A day that is a weekend
/// (when `exclude_weekends`) or a holiday in `holidays` (when
/// `exclude_holidays`) is stepped over without being counted. With both
/// flags off this is plain calendar addition.
///
/// `days == 0` returns `start` unchanged, even when `start` itself is a skip
/// day. The result saturates at `NaiveDate::MAX`.
pub fn calculate_deadline(
    start: NaiveDate,
    days: u32,
    exclude_weekends: bool,
    exclude_holidays: bool,
    holidays: &HolidaySet,
) -> NaiveDate {
    let mut current = start;
    let mut counted = 0;

    while counted < days {
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };

        let skip = (exclude_weekends && is_weekend(current))
            || (exclude_holidays && holidays.contains(current));
        if !skip {
            counted += 1;
        }
    }

    current
}

/// Runs the calculator with the day count and weekend policy a rule prescribes.
pub fn calculate_from_rule(
    rule: &CourtRule,
    start: NaiveDate,
    exclude_holidays: bool,
    holidays: &HolidaySet,
) -> NaiveDate {
    calculate_deadline(
        start,
        rule.days,
        rule.business_days_only,
        exclude_holidays,
        holidays,
    )
}

// Observed dates: a holiday falling on a weekend is listed on the
// weekday it is observed.
const US_FEDERAL_HOLIDAYS: &[(i32, u32, u32)] = &[
    (2024, 1, 1),
    (2024, 1, 15),
    (2024, 2, 19),
    (2024, 5, 27),
    (2024, 6, 19),
    (2024, 7, 4),
    (2024, 9, 2),
    (2024, 10, 14),
    (2024, 11, 11),
    (2024, 11, 28),
    (2024, 12, 25),
    (2025, 1, 1),
    (2025, 1, 20),
    (2025, 2, 17),
    (2025, 5, 26),
    (2025, 6, 19),
    (2025, 7, 4),
    (2025, 9, 1),
    (2025, 10, 13),
    (2025, 11, 11),
    (2025, 11, 27),
    (2025, 12, 25),
    (2026, 1, 1),
    (2026, 1, 19),
    (2026, 2, 16),
    (2026, 5, 25),
    (2026, 6, 19),
    (2026, 7, 3),
    (2026, 9, 7),
    (2026, 10, 12),
    (2026, 11, 11),
    (2026, 11, 26),
    (2026, 12, 25),
];

fn from_table(table: &[(i32, u32, u32)]) -> HolidaySet {
    table
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

lazy_static! {
    static ref BUILTIN_CALENDARS: HashMap<&'static str, HolidaySet> = {
        let mut calendars = HashMap::new();
        calendars.insert("us-federal", from_table(US_FEDERAL_HOLIDAYS));
        calendars.insert("none", HolidaySet::empty());
        calendars
    };
}
