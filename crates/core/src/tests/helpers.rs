// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CarryoverLedger, InMemoryDirectory, InMemoryStore, LeaveService, PolicyConfig};
use leave_ledger_audit::{Actor, Cause};
use leave_ledger_domain::{AnnualEntitlement, Employee, EmployeeId, Role};
use time::macros::date;

pub type TestService = LeaveService<InMemoryStore, InMemoryDirectory>;

pub fn id(value: &str) -> EmployeeId {
    EmployeeId::new(value).unwrap()
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("H-1"), String::from("rh"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-1"), String::from("Test fixture"))
}

/// Two teams: E-100 reports to R-1, E-200 reports to R-2. H-1 is RH, A-1 admin.
pub fn create_test_employees() -> Vec<Employee> {
    vec![
        Employee::new(
            id("E-100"),
            date!(2023 - 03 - 01),
            true,
            Role::Employee,
            Some(id("R-1")),
        ),
        Employee::new(
            id("E-200"),
            date!(2004 - 09 - 15),
            true,
            Role::Employee,
            Some(id("R-2")),
        ),
        Employee::new(id("R-1"), date!(2015 - 01 - 10), true, Role::Referente, None),
        Employee::new(id("R-2"), date!(2012 - 05 - 20), true, Role::Referente, None),
        Employee::new(id("H-1"), date!(2010 - 06 - 01), true, Role::Rh, None),
        Employee::new(id("A-1"), date!(2018 - 02 - 01), true, Role::Admin, None),
        Employee::new(
            id("X-1"),
            date!(2001 - 01 - 01),
            false,
            Role::Employee,
            Some(id("R-1")),
        ),
    ]
}

pub fn create_test_service() -> TestService {
    create_test_service_with(PolicyConfig::default())
}

pub fn create_test_service_with(config: PolicyConfig) -> TestService {
    LeaveService::new(
        InMemoryStore::new(),
        InMemoryDirectory::new(create_test_employees()),
        config,
    )
}

/// Stores an opening balance row directly, bypassing the rollover.
pub fn seed_balance(
    service: &TestService,
    employee: &str,
    year: i32,
    days_corresponding: u32,
    days_carried_over: u32,
) -> AnnualEntitlement {
    let entitlement: AnnualEntitlement =
        AnnualEntitlement::opening(id(employee), year, days_corresponding, days_carried_over);
    let ledger = CarryoverLedger::new(service.store(), &service.config().ledger);
    assert!(
        ledger
            .insert_if_absent(&entitlement, &create_test_actor(), &create_test_cause())
            .unwrap()
    );
    entitlement
}
