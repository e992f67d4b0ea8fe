// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request validation against labor-law rules and the current balance.
//!
//! Hard rules block creation and are always reported together. Soft rules
//! produce human-readable warnings and never block creation.

use crate::calendar::{
    count_business_days, filing_deadline, is_monday, last_day_of_year, ranges_overlap,
};
use crate::error::DomainError;
use crate::request_state::RequestState;
use crate::types::{AnnualEntitlement, Employee, EmployeeId, LeaveRequest, RequestId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

/// A hard rule violated by a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleViolation {
    #[error(
        "{requested} business days requested; leave must be taken in blocks of at least {minimum}"
    )]
    MinimumBlockNotMet { requested: u32, minimum: u32 },

    #[error("overlaps approved leave from {start} to {end}")]
    OverlappingRequest {
        request_id: RequestId,
        start: Date,
        end: Date,
    },

    #[error("start date {start} is after the filing deadline {deadline}")]
    FilingDeadlineExceeded { start: Date, deadline: Date },

    #[error("{requested} days requested but only {available} available")]
    InsufficientBalance { requested: u32, available: u32 },

    #[error("employee {employee_id} is not active")]
    EmployeeInactive { employee_id: EmployeeId },
}

/// Tunable parameters of the leave rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Minimum business days in a single request.
    pub minimum_block_days: u32,
    /// Month of the filing deadline, 1-based.
    pub filing_deadline_month: u8,
    /// Day of month of the filing deadline.
    pub filing_deadline_day: u8,
    /// Whether starting after the deadline blocks the request.
    pub filing_deadline_is_hard: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            minimum_block_days: 10,
            filing_deadline_month: 5,
            filing_deadline_day: 31,
            filing_deadline_is_hard: false,
        }
    }
}

/// Everything the validator needs to judge one request.
#[derive(Debug, Clone, Copy)]
pub struct LeaveApplication<'a> {
    /// The requesting employee.
    pub employee: &'a Employee,
    /// First day of leave.
    pub start_date: Date,
    /// Last day of leave, inclusive.
    pub end_date: Date,
    /// The employee's balance for the entitlement year.
    pub balance: &'a AnnualEntitlement,
    /// Requests the employee already filed.
    pub existing_requests: &'a [LeaveRequest],
}

/// A request that passed every hard rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRequest {
    /// Business days in the range.
    pub days_requested: u32,
    /// Ledger year the request will be debited from.
    pub entitlement_year: i32,
    /// Advisory messages for the requester.
    pub warnings: Vec<String>,
}

/// Returns the ledger year a request starting on `start_date` is charged to.
#[must_use]
pub fn entitlement_year(start_date: Date) -> i32 {
    start_date.year()
}

/// Validates a leave request.
///
/// Every hard rule is evaluated, so a failure lists all violations at once.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if the end date precedes the start
/// date, `DomainError::InvalidDate` if the policy deadline is not a real
/// date, and `DomainError::RuleViolations` with the complete list of
/// violated hard rules otherwise.
pub fn validate_leave_request(
    policy: &ValidationPolicy,
    application: &LeaveApplication<'_>,
) -> Result<ValidatedRequest, DomainError> {
    let start: Date = application.start_date;
    let end: Date = application.end_date;
    let days_requested: u32 = count_business_days(start, end)?;
    let year: i32 = entitlement_year(start);
    let deadline: Date = filing_deadline(
        year,
        policy.filing_deadline_month,
        policy.filing_deadline_day,
    )?;

    let mut violations: Vec<RuleViolation> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if !application.employee.active {
        violations.push(RuleViolation::EmployeeInactive {
            employee_id: application.employee.id.clone(),
        });
    }

    if days_requested < policy.minimum_block_days {
        violations.push(RuleViolation::MinimumBlockNotMet {
            requested: days_requested,
            minimum: policy.minimum_block_days,
        });
    }

    let own_requests = application
        .existing_requests
        .iter()
        .filter(|r| r.employee_id == application.employee.id);

    let mut pending_days: u32 = 0;
    for existing in own_requests {
        if existing.state.is_pending() {
            pending_days = pending_days.saturating_add(existing.days_requested);
        }
        if !ranges_overlap(start, end, existing.start_date, existing.end_date) {
            continue;
        }
        match existing.state {
            RequestState::Approved => violations.push(RuleViolation::OverlappingRequest {
                request_id: existing.id,
                start: existing.start_date,
                end: existing.end_date,
            }),
            RequestState::PendingReferente | RequestState::PendingRh => warnings.push(format!(
                "Overlaps pending request {} from {} to {}",
                existing.id, existing.start_date, existing.end_date
            )),
            RequestState::RejectedByReferente | RequestState::RejectedByRh => {}
        }
    }

    if start > deadline {
        if policy.filing_deadline_is_hard {
            violations.push(RuleViolation::FilingDeadlineExceeded { start, deadline });
        } else {
            warnings.push(format!(
                "Start date {start} is after the recommended filing deadline {deadline}"
            ));
        }
    }

    let available: u32 = application.balance.available_days();
    if days_requested > available {
        violations.push(RuleViolation::InsufficientBalance {
            requested: days_requested,
            available,
        });
    } else if pending_days > 0 && days_requested.saturating_add(pending_days) > available {
        warnings.push(format!(
            "{pending_days} days are already pending approval; approving all of them would exceed the {available} days available"
        ));
    }

    if !is_monday(start) {
        warnings.push(format!(
            "Start date {start} is a {}; leave should start on a Monday",
            start.weekday()
        ));
    }

    if end > last_day_of_year(year)? {
        warnings.push(format!(
            "Leave continues past the end of {year}; all {days_requested} days are charged to {year}"
        ));
    }

    if !violations.is_empty() {
        return Err(DomainError::RuleViolations(violations));
    }

    Ok(ValidatedRequest {
        days_requested,
        entitlement_year: year,
        warnings,
    })
}
