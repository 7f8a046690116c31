// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Domain types and the deadline engine shared by the server.
//!
//! Everything in this crate is synchronous and free of I/O: the date
//! calculator, the status classifier and the Bates allocator are plain
//! functions over in-memory values. Persistence and the HTTP surface live in
//! the `server` crate.
pub mod bates;
pub mod calendar;
pub mod deadline;
pub mod error;
pub mod rules;
pub mod status;

pub use bates::{BatesConfig, BatesDocument, BatesRange, BatesSummary};
pub use calendar::{HolidaySet, calculate_deadline, calculate_from_rule};
pub use deadline::{
    CreateDeadlinePayload, Deadline, DeadlineType, DeadlineView, Priority,
};
pub use error::ValidationError;
pub use rules::CourtRule;
pub use status::{DeadlineStatus, UrgencyGroups};
