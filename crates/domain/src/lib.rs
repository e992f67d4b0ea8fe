// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod calendar;
mod entitlement;
mod error;
mod request_state;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{
    MAX_YEAR, MIN_YEAR, calendar_days, count_business_days, filing_deadline, first_day_of_year,
    is_business_day, is_monday, last_day_of_year, parse_date, ranges_overlap, weekend_days,
};
pub use entitlement::{
    SeniorityBand, base_days_for_seniority, base_days_for_year, years_of_service,
};
pub use error::DomainError;
pub use request_state::{ApprovalStage, RequestState, Verdict};
pub use types::{
    AnnualEntitlement, Decision, Employee, EmployeeId, LeaveRequest, NewLeaveRequest, RequestId,
    Role,
};
pub use validation::{
    LeaveApplication, RuleViolation, ValidatedRequest, ValidationPolicy, entitlement_year,
    validate_leave_request,
};
