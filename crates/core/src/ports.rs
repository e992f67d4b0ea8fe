// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Interfaces to the collaborators the ledger does not own.
//!
//! `LeaveStore` holds ledger rows, leave requests and the audit trail.
//! Every write that changes state also carries the audit event describing it,
//! and the store must apply both as one indivisible unit.

use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::{
    AnnualEntitlement, Employee, EmployeeId, LeaveRequest, NewLeaveRequest, RequestId,
    RequestState,
};

/// Failure reported by a `LeaveStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store was momentarily locked; the same operation may succeed if repeated.
    Busy(String),
    /// The backing store could not complete the operation.
    Backend(String),
    /// Stored data could not be mapped back into domain types.
    Corrupt(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Busy(msg) => write!(f, "Store busy: {msg}"),
            Self::Backend(msg) => write!(f, "Backend failure: {msg}"),
            Self::Corrupt(msg) => write!(f, "Corrupt stored data: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Outcome of `LeaveStore::approve_and_debit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalCommit {
    /// The request and the ledger row were both written, with both events.
    Applied,
    /// The request had left the expected state. Nothing was written.
    RequestChanged,
    /// The ledger row no longer matched the expected row. Nothing was written.
    BalanceChanged,
}

/// Failure reported by an `EmployeeDirectory` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The directory could not be read.
    Unavailable(String),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Directory unavailable: {msg}"),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Storage for ledger rows, leave requests and audit events.
pub trait LeaveStore: Send + Sync {
    /// Reads the ledger row for `employee_id` in `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_entitlement(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Option<AnnualEntitlement>, StoreError>;

    /// Inserts `entitlement` unless a row for the same employee and year exists.
    ///
    /// Returns `false`, without appending `event`, when the row already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn insert_entitlement_if_absent(
        &self,
        entitlement: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError>;

    /// Replaces `expected` with `updated` if the stored row still equals `expected`.
    ///
    /// Returns `false`, without appending `event`, when the row changed since it was read.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn swap_entitlement(
        &self,
        expected: &AnnualEntitlement,
        updated: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError>;

    /// Persists a new request in its initial state and assigns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn insert_request(
        &self,
        request: &NewLeaveRequest,
        event: &AuditEvent,
    ) -> Result<LeaveRequest, StoreError>;

    /// Reads a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_request(&self, id: RequestId) -> Result<Option<LeaveRequest>, StoreError>;

    /// Replaces the stored request with `updated` if its state is still `expected_state`.
    ///
    /// Returns `false`, without appending `event`, when another decision won.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn swap_request(
        &self,
        expected_state: RequestState,
        updated: &LeaveRequest,
        event: &AuditEvent,
    ) -> Result<bool, StoreError>;

    /// Applies a final approval and its debit as one unit.
    ///
    /// The request is replaced with `updated_request` only if its state is
    /// still `expected_state`, and the ledger row is replaced with
    /// `updated_row` only if it still equals `expected_row`. Either both
    /// writes and both events are applied, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn approve_and_debit(
        &self,
        expected_state: RequestState,
        updated_request: &LeaveRequest,
        request_event: &AuditEvent,
        expected_row: &AnnualEntitlement,
        updated_row: &AnnualEntitlement,
        debit_event: &AuditEvent,
    ) -> Result<ApprovalCommit, StoreError>;

    /// Lists every request filed by `employee_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_requests_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, StoreError>;

    /// Lists the audit events for one employee and year, in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_audit_events(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Vec<AuditEvent>, StoreError>;
}

/// Read-only view of the employee records owned by the surrounding system.
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn get_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, DirectoryError>;

    /// Lists every currently active employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_active_employees(&self) -> Result<Vec<Employee>, DirectoryError>;
}
