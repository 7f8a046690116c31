// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Derived status of deadlines.
//!
//! Nothing here is ever persisted. Every value is recomputed from the stored
//! date, the completion flag and an explicit `now`.
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Upper bound (inclusive) of the "due soon" status.
pub const DUE_SOON_DAYS: i64 = 3;

/// Upper bound (inclusive) of the "urgent" badge and urgency grouping.
pub const URGENT_DAYS: i64 = 7;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Overdue,
    DueSoon,
    Upcoming,
    Completed,
}

/// Whole days until `date`, rounded up.
///
/// The due instant is midnight UTC at the start of `date`. The difference is
/// taken in milliseconds and divided by a fixed 24 hour day, so a deadline
/// dated tomorrow yields 1 at any time today and one dated today yields 0
/// until midnight.
pub fn days_remaining(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due = date.and_time(NaiveTime::MIN).and_utc();
    let diff_ms = (due - now).num_milliseconds();
    (diff_ms as f64 / MILLIS_PER_DAY).ceil() as i64
}

/// `0 <= days_remaining <= 7`.
pub fn is_urgent(days_remaining: i64) -> bool {
    (0..=URGENT_DAYS).contains(&days_remaining)
}

/// `0 <= days_remaining <= 3`.
pub fn is_due_soon(days_remaining: i64) -> bool {
    (0..=DUE_SOON_DAYS).contains(&days_remaining)
}

pub fn classify(date: NaiveDate, completed: bool, now: DateTime<Utc>) -> DeadlineStatus {
    if completed {
        return DeadlineStatus::Completed;
    }
    let days = days_remaining(date, now);
    if days < 0 {
        DeadlineStatus::Overdue
    } else if is_due_soon(days) {
        DeadlineStatus::DueSoon
    } else {
        DeadlineStatus::Upcoming
    }
}

/// Deadlines partitioned by the 7 day urgency policy.
///
/// Buckets are disjoint and together hold every input deadline. Input order
/// is kept within each bucket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UrgencyGroups {
    pub overdue: Vec<Deadline>,
    pub urgent: Vec<Deadline>,
    pub upcoming: Vec<Deadline>,
    pub completed: Vec<Deadline>,
}

impl UrgencyGroups {
    pub fn len(&self) -> usize {
        self.overdue.len() + self.urgent.len() + self.upcoming.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn group_by_urgency(deadlines: Vec<Deadline>, now: DateTime<Utc>) -> UrgencyGroups {
    let mut groups = UrgencyGroups::default();
    for deadline in deadlines {
        if deadline.completed {
            groups.completed.push(deadline);
            continue;
        }
        let days = days_remaining(deadline.date, now);
        if days < 0 {
            groups.overdue.push(deadline);
        } else if is_urgent(days) {
            groups.urgent.push(deadline);
        } else {
            groups.upcoming.push(deadline);
        }
    }
    groups
}

/// Stable sort by date, earliest first, ties broken by priority.
/// Matches the order the store returns.
pub fn sort_by_date(deadlines: &mut [Deadline]) {
    deadlines.sort_by_key(|d| (d.date, d.priority.rank()));
}

/// True when an open deadline has a reminder offset landing on `today`.
pub fn reminder_due(deadline: &Deadline, today: NaiveDate) -> bool {
    if deadline.completed {
        return false;
    }
    deadline
        .reminders
        .iter()
        .filter(|r| **r >= 0)
        .filter_map(|r| deadline.date.checked_sub_signed(Duration::days(i64::from(*r))))
        .any(|reminder_date| reminder_date == today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::{DeadlineType, Priority};
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deadline(id: i64, date: NaiveDate, completed: bool) -> Deadline {
        Deadline {
            id,
            title: format!("Deadline {id}"),
            description: None,
            deadline_type: DeadlineType::Filing,
            date,
            time: None,
            priority: Priority::Medium,
            court_rule: None,
            reminders: vec![7, 1],
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_days_remaining_uses_ceiling() {
        let date = ymd(2024, 6, 10);
        let now = Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 1).unwrap();
        assert_eq!(days_remaining(date, now), 1);
        let now = Utc.with_ymd_and_hms(2024, 6, 8, 23, 59, 0).unwrap();
        assert_eq!(days_remaining(date, now), 2);
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        assert_eq!(days_remaining(date, now), 0);
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap();
        assert_eq!(days_remaining(date, now), 0);
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 15, 0, 0).unwrap();
        assert_eq!(days_remaining(date, now), -1);
    }

    #[test]
    fn test_classify() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(classify(ymd(2024, 5, 20), true, now), DeadlineStatus::Completed);
        assert_eq!(classify(ymd(2024, 5, 20), false, now), DeadlineStatus::Overdue);
        assert_eq!(classify(ymd(2024, 6, 4), false, now), DeadlineStatus::DueSoon);
        assert_eq!(classify(ymd(2024, 6, 5), false, now), DeadlineStatus::Upcoming);
    }

    #[test]
    fn test_zero_days_remaining_is_due_soon_and_urgent() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        let date = ymd(2024, 6, 10);
        assert_eq!(days_remaining(date, now), 0);
        assert_eq!(classify(date, false, now), DeadlineStatus::DueSoon);
        assert!(is_urgent(0));

        let groups = group_by_urgency(vec![deadline(1, date, false)], now);
        assert_eq!(groups.urgent.len(), 1);
    }

    #[test]
    fn test_thresholds_are_distinct() {
        assert!(is_urgent(5));
        assert!(!is_due_soon(5));
        assert!(!is_urgent(8));
        assert!(!is_urgent(-1));
    }

    #[test]
    fn test_group_by_urgency_partitions_input() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let input = vec![
            deadline(1, ymd(2024, 5, 1), false),
            deadline(2, ymd(2024, 6, 3), false),
            deadline(3, ymd(2024, 6, 8), false),
            deadline(4, ymd(2024, 6, 9), false),
            deadline(5, ymd(2024, 5, 1), true),
            deadline(6, ymd(2024, 7, 1), true),
            deadline(7, ymd(2024, 9, 1), false),
        ];
        let groups = group_by_urgency(input.clone(), now);

        let ids = |v: &Vec<Deadline>| v.iter().map(|d| d.id).collect::<Vec<_>>();
        assert_eq!(ids(&groups.overdue), vec![1]);
        assert_eq!(ids(&groups.urgent), vec![2, 3]);
        assert_eq!(ids(&groups.upcoming), vec![4, 7]);
        assert_eq!(ids(&groups.completed), vec![5, 6]);

        let all: HashSet<i64> = [
            &groups.overdue,
            &groups.urgent,
            &groups.upcoming,
            &groups.completed,
        ]
        .iter()
        .flat_map(|b| b.iter().map(|d| d.id))
        .collect();
        assert_eq!(groups.len(), input.len());
        assert!(!groups.is_empty());
        assert!(group_by_urgency(Vec::new(), now).is_empty());
        assert_eq!(all.len(), input.len());
    }

    #[test]
    fn test_sort_by_date_is_stable() {
        let mut list = vec![
            deadline(1, ymd(2024, 3, 2), false),
            deadline(2, ymd(2024, 3, 1), false),
            deadline(3, ymd(2024, 3, 2), false),
        ];
        sort_by_date(&mut list);
        assert_eq!(list.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2, 1, 3]);

        list[2].priority = Priority::Critical;
        sort_by_date(&mut list);
        assert_eq!(list.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn test_reminder_due() {
        let d = deadline(1, ymd(2024, 6, 15), false);
        assert!(reminder_due(&d, ymd(2024, 6, 8)));
        assert!(reminder_due(&d, ymd(2024, 6, 14)));
        assert!(!reminder_due(&d, ymd(2024, 6, 10)));

        let done = deadline(2, ymd(2024, 6, 15), true);
        assert!(!reminder_due(&done, ymd(2024, 6, 8)));
    }

    #[test]
    fn test_reminder_offset_before_min_date_is_never_due() {
        let mut d = deadline(1, ymd(2024, 6, 15), false);
        d.reminders = vec![i32::MAX, 7];
        assert!(!reminder_due(&d, ymd(2024, 6, 14)));
        assert!(reminder_due(&d, ymd(2024, 6, 8)));

        d.date = NaiveDate::MIN;
        d.reminders = vec![1];
        assert!(!reminder_due(&d, NaiveDate::MIN));
    }
}
