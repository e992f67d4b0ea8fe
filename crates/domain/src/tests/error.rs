// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApprovalStage, DomainError, RequestState, RuleViolation, Verdict};
use time::macros::date;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidRange {
        start: date!(2026 - 03 - 10),
        end: date!(2026 - 03 - 09),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid range: end date 2026-03-09 is before start date 2026-03-10"
    );

    let err: DomainError = DomainError::InsufficientBalance {
        requested: 12,
        available: 5,
    };
    assert_eq!(
        format!("{err}"),
        "Insufficient balance: 12 days requested, 5 available"
    );

    let err: DomainError = DomainError::InvalidCredit {
        requested: 4,
        taken: 2,
    };
    assert_eq!(
        format!("{err}"),
        "Cannot restore 4 days: only 2 days have been taken"
    );

    let err: DomainError = DomainError::InvalidYear(1800);
    assert_eq!(format!("{err}"), "Invalid year: 1800");

    let err: DomainError = DomainError::InvalidRole(String::from("boss"));
    assert_eq!(format!("{err}"), "Invalid role: boss");

    let err: DomainError = DomainError::NotYetEmployed {
        hire_date: date!(2027 - 02 - 01),
        year: 2026,
    };
    assert_eq!(
        format!("{err}"),
        "Employee hired on 2027-02-01 has no entitlement for 2026"
    );
}

#[test]
fn test_invalid_transition_display() {
    let err: DomainError = DomainError::InvalidTransition {
        from: RequestState::Approved,
        stage: ApprovalStage::Rh,
        verdict: Verdict::Approve,
        reason: String::from("request is already closed"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot approve as rh while request is approved: request is already closed"
    );
}

#[test]
fn test_rule_violations_display_lists_every_rule() {
    let err: DomainError = DomainError::RuleViolations(vec![
        RuleViolation::MinimumBlockNotMet {
            requested: 8,
            minimum: 10,
        },
        RuleViolation::InsufficientBalance {
            requested: 8,
            available: 5,
        },
    ]);
    assert_eq!(
        format!("{err}"),
        "Leave request violates 2 rule(s); 8 business days requested; leave must be taken in blocks of at least 10; 8 days requested but only 5 available"
    );
}
