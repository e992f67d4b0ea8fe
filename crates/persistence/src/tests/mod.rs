// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod backend_tests;
mod service_tests;

use leave_ledger::LeaveStore;
use leave_ledger_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leave_ledger_domain::{AnnualEntitlement, EmployeeId, NewLeaveRequest};
use time::OffsetDateTime;
use time::macros::{date, datetime};

use crate::Persistence;

pub fn id(value: &str) -> EmployeeId {
    EmployeeId::new(value).unwrap()
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("H-1"), String::from("rh"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_event(employee: &str, year: i32, action: &str) -> AuditEvent {
    AuditEvent::new(
        create_test_actor(),
        create_test_cause(),
        Action::new(action.to_string(), None),
        StateSnapshot::new(String::from("before")),
        StateSnapshot::new(String::from("after")),
        id(employee),
        year,
    )
}

pub fn create_test_entitlement(employee: &str, year: i32) -> AnnualEntitlement {
    AnnualEntitlement::opening(id(employee), year, 14, 3)
}

/// Monday 2 March through Friday 13 March 2026.
pub fn create_test_new_request(employee: &str) -> NewLeaveRequest {
    NewLeaveRequest {
        employee_id: id(employee),
        start_date: date!(2026 - 03 - 02),
        end_date: date!(2026 - 03 - 13),
        entitlement_year: 2026,
        days_requested: 10,
        comments: Some(String::from("Family trip")),
        created_at: fixed_timestamp(),
    }
}

pub fn fixed_timestamp() -> OffsetDateTime {
    datetime!(2026-01-15 09:30:12.123456 UTC)
}

/// A fresh database with the 2026 row for `employee` already opened.
pub fn create_seeded_persistence(employee: &str) -> Persistence {
    let persistence = Persistence::new_in_memory().unwrap();
    assert!(
        persistence
            .insert_entitlement_if_absent(
                &create_test_entitlement(employee, 2026),
                &create_test_event(employee, 2026, "OpenYear"),
            )
            .unwrap()
    );
    persistence
}
