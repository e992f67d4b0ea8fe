// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApprovalCommit, CoreError, DirectoryError, EmployeeDirectory, InMemoryDirectory,
    InMemoryStore, LeaveStore, PolicyConfig, RolloverSettings, RolloverSummary, StoreError,
    run_annual_rollover,
};
use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::{
    AnnualEntitlement, DomainError, Employee, EmployeeId, LeaveRequest, NewLeaveRequest,
    RequestId, RequestState, Role,
};
use time::macros::date;

use super::helpers::{
    create_test_actor, create_test_employees, create_test_service, create_test_service_with, id,
    seed_balance,
};

struct UnavailableDirectory;

impl EmployeeDirectory for UnavailableDirectory {
    fn get_employee(&self, _id: &EmployeeId) -> Result<Option<Employee>, DirectoryError> {
        Err(DirectoryError::Unavailable(String::from("connection refused")))
    }

    fn list_active_employees(&self) -> Result<Vec<Employee>, DirectoryError> {
        Err(DirectoryError::Unavailable(String::from("connection refused")))
    }
}

/// Panics whenever the ledger row of one employee is read.
struct PanickingStore {
    inner: InMemoryStore,
    panics_for: EmployeeId,
}

impl LeaveStore for PanickingStore {
    fn find_entitlement(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Option<AnnualEntitlement>, StoreError> {
        assert_ne!(employee_id, &self.panics_for, "row for {employee_id} is unreadable");
        self.inner.find_entitlement(employee_id, year)
    }

    fn insert_entitlement_if_absent(
        &self,
        entitlement: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        self.inner.insert_entitlement_if_absent(entitlement, event)
    }

    fn swap_entitlement(
        &self,
        expected: &AnnualEntitlement,
        updated: &AnnualEntitlement,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        self.inner.swap_entitlement(expected, updated, event)
    }

    fn insert_request(
        &self,
        request: &NewLeaveRequest,
        event: &AuditEvent,
    ) -> Result<LeaveRequest, StoreError> {
        self.inner.insert_request(request, event)
    }

    fn find_request(&self, id: RequestId) -> Result<Option<LeaveRequest>, StoreError> {
        self.inner.find_request(id)
    }

    fn swap_request(
        &self,
        expected_state: RequestState,
        updated: &LeaveRequest,
        event: &AuditEvent,
    ) -> Result<bool, StoreError> {
        self.inner.swap_request(expected_state, updated, event)
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
        self.inner.approve_and_debit(
            expected_state,
            updated_request,
            request_event,
            expected_row,
            updated_row,
            debit_event,
        )
    }

    fn list_requests_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        self.inner.list_requests_for_employee(employee_id)
    }

    fn list_audit_events(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Vec<AuditEvent>, StoreError> {
        self.inner.list_audit_events(employee_id, year)
    }
}

fn days_corresponding(store: &InMemoryStore, employee: &str, year: i32) -> u32 {
    store
        .find_entitlement(&id(employee), year)
        .unwrap()
        .unwrap()
        .days_corresponding
}

#[test]
fn test_rollover_opens_every_active_employee() {
    let service = create_test_service();

    let summary: RolloverSummary = service.run_annual_rollover(2026).unwrap();

    assert_eq!(summary.processed, 6);
    assert_eq!(summary.skipped, 0);
    assert!(summary.errors.is_empty());
    assert!(
        service
            .store()
            .find_entitlement(&id("X-1"), 2026)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_rollover_uses_seniority_bands() {
    let service = create_test_service();
    service.run_annual_rollover(2026).unwrap();
    let store = service.store();

    assert_eq!(days_corresponding(store, "E-100", 2026), 14);
    assert_eq!(days_corresponding(store, "A-1", 2026), 21);
    assert_eq!(days_corresponding(store, "R-1", 2026), 28);
    assert_eq!(days_corresponding(store, "H-1", 2026), 28);
    assert_eq!(days_corresponding(store, "E-200", 2026), 35);
}

#[test]
fn test_rollover_carries_unused_days() {
    let service = create_test_service();
    seed_balance(&service, "E-100", 2025, 14, 2);
    service
        .grant_additional_days(&id("E-100"), 2025, 1, "Bonus", &id("H-1"))
        .unwrap();
    crate::CarryoverLedger::new(service.store(), &service.config().ledger)
        .debit(
            &id("E-100"),
            2025,
            10,
            &create_test_actor(),
            &super::helpers::create_test_cause(),
        )
        .unwrap();

    service.run_annual_rollover(2026).unwrap();

    let opened = service.get_balance(&id("E-100"), 2026).unwrap();
    assert_eq!(opened.days_carried_over, 7);
    assert_eq!(opened.days_not_taken_previous_year, 0);
    assert_eq!(opened.days_additional, 0);
    assert_eq!(opened.days_taken, 0);
    assert_eq!(opened.available_days(), 21);
}

#[test]
fn test_rollover_without_previous_year_carries_nothing() {
    let service = create_test_service();

    service.run_annual_rollover(2026).unwrap();

    assert_eq!(
        service
            .get_balance(&id("E-100"), 2026)
            .unwrap()
            .days_carried_over,
        0
    );
}

#[test]
fn test_rollover_never_overwrites_existing_rows() {
    let service = create_test_service();
    seed_balance(&service, "E-100", 2026, 99, 0);

    let summary = service.run_annual_rollover(2026).unwrap();

    assert_eq!(summary.processed, 5);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        service
            .get_balance(&id("E-100"), 2026)
            .unwrap()
            .days_corresponding,
        99
    );
}

#[test]
fn test_rollover_reports_not_yet_employed_without_aborting() {
    let mut employees = create_test_employees();
    employees.push(Employee::new(
        id("N-1"),
        date!(2027 - 02 - 01),
        true,
        Role::Employee,
        Some(id("R-1")),
    ));
    let store = InMemoryStore::new();
    let directory = InMemoryDirectory::new(employees);

    let summary =
        run_annual_rollover(&store, &directory, &PolicyConfig::default(), 2026).unwrap();

    assert_eq!(summary.processed, 6);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].employee_id, id("N-1"));
    assert!(summary.errors[0].reason.contains("no entitlement for 2026"));
    assert!(store.find_entitlement(&id("N-1"), 2026).unwrap().is_none());
}

#[test]
fn test_employee_hired_during_the_year_gets_an_entitlement() {
    let employees = vec![Employee::new(
        id("N-2"),
        date!(2026 - 12 - 31),
        true,
        Role::Employee,
        None,
    )];
    let store = InMemoryStore::new();
    let directory = InMemoryDirectory::new(employees);

    let summary =
        run_annual_rollover(&store, &directory, &PolicyConfig::default(), 2026).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(days_corresponding(&store, "N-2", 2026), 14);
}

#[test]
fn test_parallel_rollover_matches_sequential() {
    let config = PolicyConfig {
        rollover: RolloverSettings { workers: 4 },
        ..PolicyConfig::default()
    };
    let parallel = create_test_service_with(config);
    let sequential = create_test_service();

    let parallel_summary = parallel.run_annual_rollover(2026).unwrap();
    let sequential_summary = sequential.run_annual_rollover(2026).unwrap();

    assert_eq!(parallel_summary.processed, sequential_summary.processed);
    assert_eq!(parallel_summary.skipped, sequential_summary.skipped);
    for employee in ["E-100", "E-200", "R-1", "R-2", "H-1", "A-1"] {
        assert_eq!(
            parallel.get_balance(&id(employee), 2026).unwrap(),
            sequential.get_balance(&id(employee), 2026).unwrap()
        );
    }
}

#[test]
fn test_more_workers_than_employees() {
    let config = PolicyConfig {
        rollover: RolloverSettings { workers: 64 },
        ..PolicyConfig::default()
    };
    let service = create_test_service_with(config);

    let summary = service.run_annual_rollover(2026).unwrap();

    assert_eq!(summary.processed, 6);
}

#[test]
fn test_rollover_rejects_out_of_range_year() {
    let service = create_test_service();

    let result = service.run_annual_rollover(1800);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidYear(1800)))
    );
}

#[test]
fn test_unreadable_directory_aborts_rollover() {
    let store = InMemoryStore::new();

    let result = run_annual_rollover(
        &store,
        &UnavailableDirectory,
        &PolicyConfig::default(),
        2026,
    );

    assert!(matches!(result, Err(CoreError::Directory(_))));
}

#[test]
fn test_rollover_records_system_actor() {
    let service = create_test_service();
    service.run_annual_rollover(2026).unwrap();

    let events = service.audit_trail(&id("E-100"), 2026).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action.name, "OpenYear");
    assert_eq!(events[0].actor.actor_type, "system");
    assert_eq!(events[0].cause.id, "rollover-2026");
}

#[test]
fn test_panic_for_one_employee_keeps_the_rest_of_its_chunk() {
    for workers in [1, 2] {
        let store = PanickingStore {
            inner: InMemoryStore::new(),
            panics_for: id("R-1"),
        };
        let directory = InMemoryDirectory::new(create_test_employees());
        let config = PolicyConfig {
            rollover: RolloverSettings { workers },
            ..PolicyConfig::default()
        };

        let summary = run_annual_rollover(&store, &directory, &config, 2026).unwrap();

        assert_eq!(summary.processed, 5, "workers={workers}");
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].employee_id, id("R-1"));
        assert!(summary.errors[0].reason.contains("panicked"));
        for employee in ["A-1", "E-100", "E-200", "H-1", "R-2"] {
            assert!(
                store.inner.find_entitlement(&id(employee), 2026).unwrap().is_some(),
                "{employee} with workers={workers}"
            );
        }
    }
}
