// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MAX_DIGITS: u32 = 12;

/// One document of an exhibit bundle, in bundle order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatesDocument {
    pub name: String,
    pub page_count: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatesConfig {
    pub prefix: String,
    pub start_number: u64,
    pub digits: u32,
}

impl Default for BatesConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            start_number: 1,
            digits: 4,
        }
    }
}

/// The inclusive label range stamped on one document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatesRange {
    pub name: String,
    pub page_count: u64,
    pub bates_start: String,
    pub bates_end: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatesSummary {
    pub documents: Vec<BatesRange>,
    pub total_pages: u64,
    // First number the next bundle would use.
    pub next_number: u64,
}

/// `PREFIX-000123`, or just the padded number when the prefix is empty.
/// Numbers wider than `digits` are printed in full.
pub fn format_label(prefix: &str, number: u64, digits: u32) -> String {
    let width = digits as usize;
    if prefix.is_empty() {
        format!("{number:0width$}")
    } else {
        format!("{prefix}-{number:0width$}")
    }
}

/// Assigns consecutive Bates ranges by running one counter through the bundle.
pub fn allocate(
    documents: &[BatesDocument],
    config: &BatesConfig,
) -> Result<BatesSummary, ValidationError> {
    if config.digits == 0 || config.digits > MAX_DIGITS {
        return Err(ValidationError::InvalidDigits {
            got: config.digits,
            max: MAX_DIGITS,
        });
    }
    if let Some(doc) = documents.iter().find(|d| d.page_count == 0) {
        return Err(ValidationError::EmptyPage(doc.name.clone()));
    }

    let mut counter = config.start_number;
    let mut ranges = Vec::with_capacity(documents.len());
    for doc in documents {
        let bates_start = format_label(&config.prefix, counter, config.digits);
        counter = counter
            .checked_add(doc.page_count)
            .ok_or_else(|| ValidationError::BatesOverflow {
                start: config.start_number,
                document: doc.name.clone(),
            })?;
        let bates_end = format_label(&config.prefix, counter - 1, config.digits);
        ranges.push(BatesRange {
            name: doc.name.clone(),
            page_count: doc.page_count,
            bates_start,
            bates_end,
        });
    }

    Ok(BatesSummary {
        documents: ranges,
        total_pages: counter - config.start_number,
        next_number: counter,
    })
}
