// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger::{LeaveStore, StoreError};

use super::{
    create_test_entitlement, create_test_event, create_test_new_request, id,
};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let db1 = Persistence::new_in_memory().unwrap();
    let db2 = Persistence::new_in_memory().unwrap();

    db1.insert_entitlement_if_absent(
        &create_test_entitlement("E-100", 2026),
        &create_test_event("E-100", 2026, "OpenYear"),
    )
    .unwrap();

    assert!(db1.find_entitlement(&id("E-100"), 2026).unwrap().is_some());
    assert!(db2.find_entitlement(&id("E-100"), 2026).unwrap().is_none());
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "leave_ledger_reopen_{}_{}.db",
        std::process::id(),
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    ));

    {
        let persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .insert_entitlement_if_absent(
                &create_test_entitlement("E-100", 2026),
                &create_test_event("E-100", 2026, "OpenYear"),
            )
            .unwrap();
    }

    let reopened = Persistence::new_with_file(&path).unwrap();
    let row = reopened.find_entitlement(&id("E-100"), 2026).unwrap();
    assert_eq!(row, Some(create_test_entitlement("E-100", 2026)));
    assert_eq!(
        reopened.list_audit_events(&id("E-100"), 2026).unwrap().len(),
        1
    );

    drop(reopened);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

#[test]
fn test_request_without_ledger_row_is_refused() {
    let persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.insert_request(
        &create_test_new_request("E-100"),
        &create_test_event("E-100", 2026, "FileLeaveRequest"),
    );

    assert!(matches!(result, Err(StoreError::Backend(_))));
    assert!(
        persistence
            .list_requests_for_employee(&id("E-100"))
            .unwrap()
            .is_empty()
    );
    assert!(
        persistence
            .list_audit_events(&id("E-100"), 2026)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_lock_errors_map_to_busy() {
    let err = PersistenceError::Busy(String::from("database is locked"));
    assert_eq!(
        StoreError::from(err),
        StoreError::Busy(String::from("database is locked"))
    );
}

#[test]
fn test_unreadable_rows_map_to_corrupt() {
    let err = PersistenceError::ReconstructionError(String::from("Negative day count -1"));
    assert!(matches!(StoreError::from(err), StoreError::Corrupt(_)));
}
