// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger::LeaveStore;
use leave_ledger_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

use super::{create_seeded_persistence, create_test_entitlement, create_test_event, id};

#[test]
fn test_audit_event_fields_survive_storage() {
    let persistence = create_seeded_persistence("E-100");
    let current = create_test_entitlement("E-100", 2026);
    let event = AuditEvent::new(
        Actor::system("annual-rollover"),
        Cause::new(
            String::from("grant-E-100-2026"),
            String::from("Overtime \"compensation\""),
        ),
        Action::new(
            String::from("GrantAdditionalDays"),
            Some(String::from("days=2")),
        ),
        StateSnapshot::new(String::from("taken=0")),
        StateSnapshot::new(String::from("additional=2")),
        id("E-100"),
        2026,
    );

    persistence
        .swap_entitlement(&current, &current.with_grant(2).unwrap(), &event)
        .unwrap();

    let stored = persistence.list_audit_events(&id("E-100"), 2026).unwrap();
    let last = stored.last().unwrap();
    assert!(last.event_id.is_some());
    assert_eq!(last.actor, event.actor);
    assert_eq!(last.cause, event.cause);
    assert_eq!(last.action, event.action);
    assert_eq!(last.before, event.before);
    assert_eq!(last.after, event.after);
    assert_eq!(last.recorded_at, event.recorded_at);
}

#[test]
fn test_audit_events_are_returned_in_append_order() {
    let persistence = create_seeded_persistence("E-100");
    let mut current = create_test_entitlement("E-100", 2026);
    for days in 1..=3 {
        let updated = current.with_debit(days).unwrap();
        persistence
            .swap_entitlement(
                &current,
                &updated,
                &create_test_event("E-100", 2026, &format!("Debit{days}")),
            )
            .unwrap();
        current = updated;
    }

    let events = persistence.list_audit_events(&id("E-100"), 2026).unwrap();
    let names: Vec<&str> = events.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(names, vec!["OpenYear", "Debit1", "Debit2", "Debit3"]);

    let ids: Vec<i64> = events.iter().map(|e| e.event_id.unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_audit_events_are_scoped_by_employee_and_year() {
    let persistence = create_seeded_persistence("E-100");
    persistence
        .insert_entitlement_if_absent(
            &create_test_entitlement("E-100", 2027),
            &create_test_event("E-100", 2027, "OpenYear"),
        )
        .unwrap();
    persistence
        .insert_entitlement_if_absent(
            &create_test_entitlement("E-200", 2026),
            &create_test_event("E-200", 2026, "OpenYear"),
        )
        .unwrap();

    for (employee, year) in [("E-100", 2026), ("E-100", 2027), ("E-200", 2026)] {
        let events = persistence.list_audit_events(&id(employee), year).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].employee_id, id(employee));
        assert_eq!(events[0].year, year);
    }
    assert!(
        persistence
            .list_audit_events(&id("E-200"), 2027)
            .unwrap()
            .is_empty()
    );
}
