// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite persistence for the leave ledger.
//!
//! `Persistence` implements `leave_ledger::LeaveStore` on top of Diesel. It
//! owns one connection behind a mutex; every write runs in an `IMMEDIATE`
//! transaction that also appends the audit event describing it.
//!
//! Compare-and-swap writes are conditional `UPDATE` statements whose `WHERE`
//! clause repeats the expected values, so a lost race shows up as zero rows
//! changed rather than as an error. A lock held by another process surfaces
//! as `StoreError::Busy`, which the ledger retries.
//!
//! ## Schema
//!
//! - `annual_entitlements` keyed by `(employee_id, year)`
//! - `leave_requests` referencing the ledger row of their year
//! - `audit_events`, append-only
//!
//! Migrations are embedded and applied on open.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use leave_ledger::{ApprovalCommit, LeaveStore, StoreError};
use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::{
    AnnualEntitlement, EmployeeId, LeaveRequest, NewLeaveRequest, RequestId, RequestState,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Source of unique names for shared-cache in-memory databases.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// SQLite-backed `LeaveStore`.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a store over a fresh in-memory database.
    ///
    /// Each call gets its own database, isolated from every other instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_ledger_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens, or creates, a database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database cannot
    /// be opened or migrated.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    {
        let mut guard: MutexGuard<'_, SqliteConnection> = self.conn.lock().map_err(|_| {
            StoreError::Backend(String::from("Connection lock poisoned by a panicked writer"))
        })?;
        f(&mut *guard).map_err(StoreError::from)
    }
}

impl LeaveStore for Persistence {
    fn find_entitlement(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Option<AnnualEntitlement>, StoreError> {
        self.with_conn(|conn| queries::entitlements::find_entitlement(conn, employee_id, year))
    }

    fn insert_entitlement_if_absent(
        &self,
        entitlement: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            mutations::entitlements::insert_entitlement_if_absent(conn, entitlement, event)
        })
    }

    fn swap_entitlement(
        &self,
        expected: &AnnualEntitlement,
        updated: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        self.with_conn(|conn| mutations::entitlements::swap_entitlement(conn, expected, updated, event))
    }

    fn insert_request(
        &self,
        request: &NewLeaveRequest,
        event: &AuditEvent,
    ) -> Result<LeaveRequest, StoreError> {
        self.with_conn(|conn| mutations::requests::insert_request(conn, request, event))
    }

    fn find_request(&self, id: RequestId) -> Result<Option<LeaveRequest>, StoreError> {
        self.with_conn(|conn| queries::requests::find_request(conn, id))
    }

    fn swap_request(
        &self,
        expected_state: RequestState,
        updated: &LeaveRequest,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        self.with_conn(|conn| mutations::requests::swap_request(conn, expected_state, updated, event))
    }

    fn approve_and_debit(
        &self,
        expected_state: RequestState,
        updated_request: &LeaveRequest,
        request_event: &AuditEvent,
        expected_row: &AnnualEntitlement,
        updated_row: &AnnualEntitlement,
        debit_event: &AuditEvent,
    ) -> Result<ApprovalCommit, StoreError> {
        self.with_conn(|conn| {
            mutations::requests::approve_and_debit(
                conn,
                expected_state,
                updated_request,
                request_event,
                expected_row,
                updated_row,
                debit_event,
            )
        })
    }

    fn list_requests_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        self.with_conn(|conn| queries::requests::list_requests_for_employee(conn, employee_id))
    }

    fn list_audit_events(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Vec<AuditEvent>, StoreError> {
        self.with_conn(|conn| queries::audit::list_audit_events(conn, employee_id, year))
    }
}
