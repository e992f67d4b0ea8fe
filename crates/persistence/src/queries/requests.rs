// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_ledger_domain::{Decision, EmployeeId, LeaveRequest, RequestId, RequestState};

use crate::data_models::{
    date_from_db, day_count_from_db, employee_id_from_db, timestamp_from_db,
};
use crate::diesel_schema::leave_requests;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_requests)]
pub struct LeaveRequestRow {
    pub request_id: i64,
    pub employee_id: String,
    pub entitlement_year: i32,
    pub start_date: String,
    pub end_date: String,
    pub days_requested: i32,
    pub comments: Option<String>,
    pub created_at: String,
    pub state: String,
    pub referente_id: Option<String>,
    pub referente_comment: Option<String>,
    pub referente_decided_at: Option<String>,
    pub rh_id: Option<String>,
    pub rh_comment: Option<String>,
    pub rh_decided_at: Option<String>,
}

fn decision_from_db(
    request_id: i64,
    actor_id: Option<String>,
    comment: Option<String>,
    decided_at: Option<String>,
) -> Result<Option<Decision>, PersistenceError> {
    match (actor_id, decided_at) {
        (None, None) => Ok(None),
        (Some(actor_id), Some(decided_at)) => Ok(Some(Decision {
            actor_id: employee_id_from_db(&actor_id)?,
            comment,
            decided_at: timestamp_from_db(&decided_at)?,
        })),
        _ => Err(PersistenceError::ReconstructionError(format!(
            "Request {request_id} has a partially recorded decision"
        ))),
    }
}

impl LeaveRequestRow {
    fn into_domain(self) -> Result<LeaveRequest, PersistenceError> {
        let state: RequestState = self
            .state
            .parse()
            .map_err(|e: leave_ledger_domain::DomainError| {
                PersistenceError::ReconstructionError(e.to_string())
            })?;
        Ok(LeaveRequest {
            id: RequestId::new(self.request_id),
            employee_id: employee_id_from_db(&self.employee_id)?,
            start_date: date_from_db(&self.start_date)?,
            end_date: date_from_db(&self.end_date)?,
            entitlement_year: self.entitlement_year,
            days_requested: day_count_from_db(self.days_requested)?,
            comments: self.comments,
            created_at: timestamp_from_db(&self.created_at)?,
            state,
            referente_decision: decision_from_db(
                self.request_id,
                self.referente_id,
                self.referente_comment,
                self.referente_decided_at,
            )?,
            rh_decision: decision_from_db(
                self.request_id,
                self.rh_id,
                self.rh_comment,
                self.rh_decided_at,
            )?,
        })
    }
}

/// Reads one request by identifier.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_request(
    conn: &mut SqliteConnection,
    request_id: RequestId,
) -> Result<Option<LeaveRequest>, PersistenceError> {
    leave_requests::table
        .filter(leave_requests::request_id.eq(request_id.value()))
        .select(LeaveRequestRow::as_select())
        .first::<LeaveRequestRow>(conn)
        .optional()?
        .map(LeaveRequestRow::into_domain)
        .transpose()
}

/// Lists the requests filed by `employee_id`, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_requests_for_employee(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
) -> Result<Vec<LeaveRequest>, PersistenceError> {
    leave_requests::table
        .filter(leave_requests::employee_id.eq(employee_id.value()))
        .order(leave_requests::request_id.asc())
        .select(LeaveRequestRow::as_select())
        .load::<LeaveRequestRow>(conn)?
        .into_iter()
        .map(LeaveRequestRow::into_domain)
        .collect()
}
