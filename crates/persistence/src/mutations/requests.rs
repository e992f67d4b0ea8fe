// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_ledger::ApprovalCommit;
use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::{
    AnnualEntitlement, Decision, LeaveRequest, NewLeaveRequest, RequestId, RequestState,
};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{date_to_db, day_count_to_db, timestamp_to_db};
use crate::diesel_schema::leave_requests;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::entitlements::update_if_unchanged;

/// Decision columns: actor, comment, timestamp.
type DecisionColumns = (Option<String>, Option<String>, Option<String>);

fn decision_to_db(decision: Option<&Decision>) -> Result<DecisionColumns, PersistenceError> {
    decision.map_or(Ok((None, None, None)), |d| {
        Ok((
            Some(d.actor_id.value().to_string()),
            d.comment.clone(),
            Some(timestamp_to_db(d.decided_at)?),
        ))
    })
}

/// Stores a new request as `pending_referente` and returns it with its identifier.
///
/// # Errors
///
/// Returns an error if the transaction fails, including when no ledger row
/// exists for the request's employee and year.
pub fn insert_request(
    conn: &mut SqliteConnection,
    request: &NewLeaveRequest,
    event: &AuditEvent,
) -> Result<LeaveRequest, PersistenceError> {
    let request_id: i64 = conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(leave_requests::table)
            .values((
                leave_requests::employee_id.eq(request.employee_id.value()),
                leave_requests::entitlement_year.eq(request.entitlement_year),
                leave_requests::start_date.eq(date_to_db(request.start_date)?),
                leave_requests::end_date.eq(date_to_db(request.end_date)?),
                leave_requests::days_requested.eq(day_count_to_db(request.days_requested)?),
                leave_requests::comments.eq(request.comments.as_deref()),
                leave_requests::created_at.eq(timestamp_to_db(request.created_at)?),
                leave_requests::state.eq(RequestState::PendingReferente.as_str()),
            ))
            .execute(conn)?;
        let request_id: i64 = conn.get_last_insert_rowid()?;

        persist_audit_event(conn, event)?;
        Ok(request_id)
    })?;

    debug!(request_id, employee_id = %request.employee_id, "Stored leave request");
    Ok(request.clone().into_request(RequestId::new(request_id)))
}

/// Writes `updated` over the stored request if its state is still `expected_state`.
///
/// Returns `false` and records nothing if another decision got there first.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn swap_request(
    conn: &mut SqliteConnection,
    expected_state: RequestState,
    updated: &LeaveRequest,
    event: &AuditEvent,
) -> Result<bool, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if update_if_state(conn, expected_state, updated)? == 0 {
            return Ok(false);
        }

        persist_audit_event(conn, event)?;
        Ok(true)
    })
}

/// Applies a final approval and the matching ledger debit in one transaction.
///
/// The request state is read under the write lock before anything changes,
/// so a stale request or a stale ledger row leaves the database untouched.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn approve_and_debit(
    conn: &mut SqliteConnection,
    expected_state: RequestState,
    updated_request: &LeaveRequest,
    request_event: &AuditEvent,
    expected_row: &AnnualEntitlement,
    updated_row: &AnnualEntitlement,
    debit_event: &AuditEvent,
) -> Result<ApprovalCommit, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let stored_state: Option<String> = leave_requests::table
            .filter(leave_requests::request_id.eq(updated_request.id.value()))
            .select(leave_requests::state)
            .first::<String>(conn)
            .optional()?;
        if stored_state.as_deref() != Some(expected_state.as_str()) {
            return Ok(ApprovalCommit::RequestChanged);
        }

        if update_if_unchanged(conn, expected_row, updated_row)? == 0 {
            return Ok(ApprovalCommit::BalanceChanged);
        }

        // The ledger row is already rewritten, so a miss here must roll back.
        if update_if_state(conn, expected_state, updated_request)? == 0 {
            return Err(PersistenceError::Other(format!(
                "Request {} changed while its approval was being written",
                updated_request.id
            )));
        }

        persist_audit_event(conn, request_event)?;
        persist_audit_event(conn, debit_event)?;
        debug!(
            request_id = updated_request.id.value(),
            employee_id = %updated_request.employee_id,
            "Stored approval with debit"
        );
        Ok(ApprovalCommit::Applied)
    })
}

/// Conditional `UPDATE` of one request. Must run inside a transaction.
fn update_if_state(
    conn: &mut SqliteConnection,
    expected_state: RequestState,
    updated: &LeaveRequest,
) -> Result<usize, PersistenceError> {
    let (referente_id, referente_comment, referente_decided_at) =
        decision_to_db(updated.referente_decision.as_ref())?;
    let (rh_id, rh_comment, rh_decided_at) = decision_to_db(updated.rh_decision.as_ref())?;

    let changed: usize = diesel::update(
        leave_requests::table
            .filter(leave_requests::request_id.eq(updated.id.value()))
            .filter(leave_requests::state.eq(expected_state.as_str())),
    )
    .set((
        leave_requests::state.eq(updated.state.as_str()),
        leave_requests::referente_id.eq(&referente_id),
        leave_requests::referente_comment.eq(&referente_comment),
        leave_requests::referente_decided_at.eq(&referente_decided_at),
        leave_requests::rh_id.eq(&rh_id),
        leave_requests::rh_comment.eq(&rh_comment),
        leave_requests::rh_decided_at.eq(&rh_decided_at),
    ))
    .execute(conn)?;
    Ok(changed)
}
