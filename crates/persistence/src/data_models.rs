// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column encodings shared by queries and mutations.
//!
//! Audit parts are stored as JSON documents. Dates are `YYYY-MM-DD` text so
//! that text comparison matches date order; timestamps are RFC 3339.

use leave_ledger_domain::EmployeeId;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

pub fn day_count_to_db(days: u32) -> Result<i32, PersistenceError> {
    i32::try_from(days)
        .map_err(|_| PersistenceError::SerializationError(format!("Day count {days} too large")))
}

pub fn day_count_from_db(days: i32) -> Result<u32, PersistenceError> {
    u32::try_from(days)
        .map_err(|_| PersistenceError::ReconstructionError(format!("Negative day count {days}")))
}

pub fn date_to_db(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn date_from_db(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|e| PersistenceError::ReconstructionError(format!("Bad date '{value}': {e}")))
}

pub fn timestamp_to_db(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn timestamp_from_db(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Bad timestamp '{value}': {e}"))
    })
}

pub fn employee_id_from_db(value: &str) -> Result<EmployeeId, PersistenceError> {
    EmployeeId::new(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}
