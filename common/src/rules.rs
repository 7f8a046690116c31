// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A reference template used to pre-fill a deadline calculation.
///
/// Rules are static and hold no link to the deadlines derived from them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourtRule {
    pub id: String,
    pub name: String,
    pub rule_citation: String,
    pub days: u32,
    pub business_days_only: bool,
    pub category: String,
    pub start_event_label: String,
}

impl CourtRule {
    fn new(
        id: &str,
        name: &str,
        rule_citation: &str,
        days: u32,
        business_days_only: bool,
        category: &str,
        start_event_label: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rule_citation: rule_citation.to_string(),
            days,
            business_days_only,
            category: category.to_string(),
            start_event_label: start_event_label.to_string(),
        }
    }

    /// The full catalog, in display order.
    pub fn all() -> &'static [CourtRule] {
        &COURT_RULES
    }

    pub fn find(id: &str) -> Result<&'static CourtRule, ValidationError> {
        COURT_RULES
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ValidationError::UnknownRule(id.to_string()))
    }
}

lazy_static! {
    static ref COURT_RULES: Vec<CourtRule> = vec![
        CourtRule::new(
            "answer-complaint",
            "Answer to Complaint",
            "FRCP 12(a)(1)(A)(i)",
            21,
            false,
            "pleadings",
            "Service of summons and complaint",
        ),
        CourtRule::new(
            "answer-after-waiver",
            "Answer after Waiving Service",
            "FRCP 12(a)(1)(A)(ii)",
            60,
            false,
            "pleadings",
            "Request for waiver sent",
        ),
        CourtRule::new(
            "reply-counterclaim",
            "Reply to Counterclaim",
            "FRCP 12(a)(1)(B)",
            21,
            false,
            "pleadings",
            "Service of counterclaim",
        ),
        CourtRule::new(
            "amend-as-of-course",
            "Amend Pleading as a Matter of Course",
            "FRCP 15(a)(1)(A)",
            21,
            false,
            "pleadings",
            "Service of the pleading",
        ),
        CourtRule::new(
            "serve-summons",
            "Serve Summons and Complaint",
            "FRCP 4(m)",
            90,
            false,
            "service",
            "Filing of complaint",
        ),
        CourtRule::new(
            "interrogatory-answers",
            "Answers to Interrogatories",
            "FRCP 33(b)(2)",
            30,
            false,
            "discovery",
            "Service of interrogatories",
        ),
        CourtRule::new(
            "production-responses",
            "Responses to Requests for Production",
            "FRCP 34(b)(2)(A)",
            30,
            false,
            "discovery",
            "Service of requests",
        ),
        CourtRule::new(
            "admission-responses",
            "Responses to Requests for Admission",
            "FRCP 36(a)(3)",
            30,
            false,
            "discovery",
            "Service of requests",
        ),
        CourtRule::new(
            "motion-opposition",
            "Opposition to Motion",
            "Local Rule (typical)",
            14,
            true,
            "motions",
            "Service of the motion",
        ),
        CourtRule::new(
            "magistrate-objections",
            "Objections to Magistrate Judge's Recommendation",
            "FRCP 72(b)(2)",
            14,
            false,
            "motions",
            "Service of recommended disposition",
        ),
        CourtRule::new(
            "new-trial-motion",
            "Motion for New Trial",
            "FRCP 59(b)",
            28,
            false,
            "post-trial",
            "Entry of judgment",
        ),
        CourtRule::new(
            "notice-of-appeal",
            "Notice of Appeal (civil)",
            "FRAP 4(a)(1)(A)",
            30,
            false,
            "appeal",
            "Entry of judgment",
        ),
    ];
}
