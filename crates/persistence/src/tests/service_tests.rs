// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The approval workflow running on SQLite.

use leave_ledger::{CoreError, InMemoryDirectory, LeaveService, PolicyConfig};
use leave_ledger_domain::{Employee, RequestState, Role};
use std::sync::Barrier;
use time::macros::date;

use super::id;
use crate::Persistence;

type SqliteService = LeaveService<Persistence, InMemoryDirectory>;

fn create_sqlite_service() -> SqliteService {
    let employees = vec![
        Employee::new(
            id("E-100"),
            date!(2023 - 03 - 01),
            true,
            Role::Employee,
            Some(id("R-1")),
        ),
        Employee::new(id("R-1"), date!(2015 - 01 - 10), true, Role::Referente, None),
        Employee::new(id("H-1"), date!(2010 - 06 - 01), true, Role::Rh, None),
        Employee::new(id("H-2"), date!(2011 - 06 - 01), true, Role::Rh, None),
    ];
    LeaveService::new(
        Persistence::new_in_memory().unwrap(),
        InMemoryDirectory::new(employees),
        PolicyConfig::default(),
    )
}

#[test]
fn test_full_approval_debits_the_ledger() {
    let service = create_sqlite_service();
    let summary = service.run_annual_rollover(2026).unwrap();
    assert_eq!(summary.processed, 4);

    let created = service
        .create_leave_request(
            &id("E-100"),
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 13),
            None,
        )
        .unwrap();
    service
        .decide_as_referente(created.request_id, &id("R-1"), true, None)
        .unwrap();
    let approved = service
        .decide_as_rh(
            created.request_id,
            &id("H-1"),
            true,
            Some(String::from("OK")),
        )
        .unwrap();

    assert_eq!(approved.state, RequestState::Approved);
    let balance = service.get_balance(&id("E-100"), 2026).unwrap();
    assert_eq!(balance.days_taken, 10);
    assert_eq!(balance.available_days(), 4);

    let actions: Vec<String> = service
        .audit_trail(&id("E-100"), 2026)
        .unwrap()
        .into_iter()
        .map(|e| e.action.name)
        .collect();
    assert_eq!(
        actions,
        vec![
            "OpenYear",
            "FileLeaveRequest",
            "ApproveAsReferente",
            "ApproveAsRh",
            "DebitDays"
        ]
    );
}

#[test]
fn test_rollover_twice_opens_each_row_once() {
    let service = create_sqlite_service();

    let first = service.run_annual_rollover(2026).unwrap();
    let second = service.run_annual_rollover(2026).unwrap();

    assert_eq!(first.processed, 4);
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 4);
    assert_eq!(service.audit_trail(&id("E-100"), 2026).unwrap().len(), 1);
}

#[test]
fn test_concurrent_rh_approvals_debit_once() {
    let service = create_sqlite_service();
    service.run_annual_rollover(2026).unwrap();
    let created = service
        .create_leave_request(
            &id("E-100"),
            date!(2026 - 03 - 02),
            date!(2026 - 03 - 13),
            None,
        )
        .unwrap();
    service
        .decide_as_referente(created.request_id, &id("R-1"), true, None)
        .unwrap();

    let barrier = Barrier::new(2);
    let results: Vec<Result<_, CoreError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["H-1", "H-2"]
            .into_iter()
            .map(|rh| {
                let service = &service;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service.decide_as_rh(created.request_id, &id(rh), true, None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(CoreError::InvalidTransition { .. })))
    );
    assert_eq!(
        service.get_balance(&id("E-100"), 2026).unwrap().days_taken,
        10
    );
}
