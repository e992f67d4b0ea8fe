// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process adapters for the store and directory ports.

use crate::ports::{ApprovalCommit, DirectoryError, EmployeeDirectory, LeaveStore, StoreError};
use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::{
    AnnualEntitlement, Employee, EmployeeId, LeaveRequest, NewLeaveRequest, RequestId,
    RequestState,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    entitlements: HashMap<(EmployeeId, i32), AnnualEntitlement>,
    requests: BTreeMap<i64, LeaveRequest>,
    audit_events: Vec<AuditEvent>,
    last_request_id: i64,
}

impl MemoryState {
    fn append_event(&mut self, event: &AuditEvent) {
        let event_id: i64 = i64::try_from(self.audit_events.len())
            .unwrap_or(i64::MAX)
            .saturating_add(1);
        self.audit_events.push(event.clone().with_event_id(event_id));
    }
}

/// A `LeaveStore` kept entirely in memory.
///
/// All operations serialise through one mutex, so each compare-and-swap is
/// trivially atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend(String::from("in-memory store lock poisoned")))
    }
}

impl LeaveStore for InMemoryStore {
    fn find_entitlement(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Option<AnnualEntitlement>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .entitlements
            .get(&(employee_id.clone(), year))
            .cloned())
    }

    fn insert_entitlement_if_absent(
        &self,
        entitlement: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let key = (entitlement.employee_id.clone(), entitlement.year);
        if state.entitlements.contains_key(&key) {
            return Ok(false);
        }
        state.entitlements.insert(key, entitlement.clone());
        state.append_event(event);
        Ok(true)
    }

    fn swap_entitlement(
        &self,
        expected: &AnnualEntitlement,
        updated: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let key = (expected.employee_id.clone(), expected.year);
        match state.entitlements.get_mut(&key) {
            Some(current) if current == expected => {
                *current = updated.clone();
            }
            _ => return Ok(false),
        }
        state.append_event(event);
        Ok(true)
    }

    fn insert_request(
        &self,
        request: &NewLeaveRequest,
        event: &AuditEvent,
    ) -> Result<LeaveRequest, StoreError> {
        let mut state = self.lock()?;
        state.last_request_id += 1;
        let id: RequestId = RequestId::new(state.last_request_id);
        let stored: LeaveRequest = request.clone().into_request(id);
        state.requests.insert(id.value(), stored.clone());
        state.append_event(event);
        Ok(stored)
    }

    fn find_request(&self, id: RequestId) -> Result<Option<LeaveRequest>, StoreError> {
        let state = self.lock()?;
        Ok(state.requests.get(&id.value()).cloned())
    }

    fn swap_request(
        &self,
        expected_state: RequestState,
        updated: &LeaveRequest,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        match state.requests.get_mut(&updated.id.value()) {
            Some(current) if current.state == expected_state => {
                *current = updated.clone();
            }
            _ => return Ok(false),
        }
        state.append_event(event);
        Ok(true)
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
        let mut state = self.lock()?;
        let request_matches: bool = state
            .requests
            .get(&updated_request.id.value())
            .is_some_and(|current| current.state == expected_state);
        if !request_matches {
            return Ok(ApprovalCommit::RequestChanged);
        }
        let key = (expected_row.employee_id.clone(), expected_row.year);
        if state.entitlements.get(&key) != Some(expected_row) {
            return Ok(ApprovalCommit::BalanceChanged);
        }

        state
            .requests
            .insert(updated_request.id.value(), updated_request.clone());
        state.entitlements.insert(key, updated_row.clone());
        state.append_event(request_event);
        state.append_event(debit_event);
        Ok(ApprovalCommit::Applied)
    }

    fn list_requests_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .requests
            .values()
            .filter(|r| &r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn list_audit_events(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Vec<AuditEvent>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .audit_events
            .iter()
            .filter(|e| &e.employee_id == employee_id && e.year == year)
            .cloned()
            .collect())
    }
}

/// A fixed employee directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    employees: BTreeMap<EmployeeId, Employee>,
}

impl InMemoryDirectory {
    /// Creates a directory holding `employees`. Later duplicates replace earlier ones.
    #[must_use]
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: employees
                .into_iter()
                .map(|employee| (employee.id.clone(), employee))
                .collect(),
        }
    }

    /// Returns the number of employees, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if the directory holds no employees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn get_employee(&self, id: &EmployeeId) -> Result<Option<Employee>, DirectoryError> {
        Ok(self.employees.get(id).cloned())
    }

    fn list_active_employees(&self) -> Result<Vec<Employee>, DirectoryError> {
        Ok(self
            .employees
            .values()
            .filter(|employee| employee.active)
            .cloned()
            .collect())
    }
}
