// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::request_state::RequestState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Identifier of an employee in the external employee directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId {
    value: String,
}

impl EmployeeId {
    /// Creates a new `EmployeeId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmployeeId` if the identifier is empty.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidEmployeeId(String::from(
                "Employee id cannot be empty",
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Organisational role of an employee, as seen by the leave workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular employee; may only file requests.
    Employee,
    /// Team lead; first-line approver for the employees of their team.
    Referente,
    /// Human resources; final approver and ledger administrator.
    Rh,
    /// System administrator; may administer the ledger.
    Admin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Referente => "referente",
            Self::Rh => "rh",
            Self::Admin => "admin",
        }
    }

    /// Returns true if the role may adjust ledger balances directly.
    #[must_use]
    pub const fn administers_ledger(&self) -> bool {
        matches!(self, Self::Rh | Self::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "referente" => Ok(Self::Referente),
            "rh" => Ok(Self::Rh),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee record as provided by the employee directory.
///
/// The ledger never writes employees; it only reads these attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The employee's identifier.
    pub id: EmployeeId,
    /// First day of employment; seniority is counted from here.
    pub hire_date: Date,
    /// Whether the employee is currently employed.
    pub active: bool,
    /// The employee's role.
    pub role: Role,
    /// The referente assigned to the employee's team, if any.
    pub team_referente_id: Option<EmployeeId>,
}

impl Employee {
    /// Creates a new `Employee`.
    #[must_use]
    pub const fn new(
        id: EmployeeId,
        hire_date: Date,
        active: bool,
        role: Role,
        team_referente_id: Option<EmployeeId>,
    ) -> Self {
        Self {
            id,
            hire_date,
            active,
            role,
            team_referente_id,
        }
    }
}

/// The leave balance of one employee for one calendar year.
///
/// Invariant: `days_taken <= total_days()`. All mutating helpers return a
/// new value and refuse to break the invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualEntitlement {
    /// The employee this balance belongs to.
    pub employee_id: EmployeeId,
    /// The calendar year.
    pub year: i32,
    /// Base days from the seniority band.
    pub days_corresponding: u32,
    /// Unused days rolled forward from the previous year.
    pub days_carried_over: u32,
    /// Days not taken in the previous year pending a carry decision.
    pub days_not_taken_previous_year: u32,
    /// Bonus days granted manually.
    pub days_additional: u32,
    /// Days consumed by approved requests.
    pub days_taken: u32,
}

impl AnnualEntitlement {
    /// Creates an untouched entitlement for the start of a year.
    #[must_use]
    pub const fn opening(
        employee_id: EmployeeId,
        year: i32,
        days_corresponding: u32,
        days_carried_over: u32,
    ) -> Self {
        Self {
            employee_id,
            year,
            days_corresponding,
            days_carried_over,
            days_not_taken_previous_year: 0,
            days_additional: 0,
            days_taken: 0,
        }
    }

    /// Returns every day credited to the year, before consumption.
    #[must_use]
    pub const fn total_days(&self) -> u32 {
        self.days_corresponding
            .saturating_add(self.days_carried_over)
            .saturating_add(self.days_not_taken_previous_year)
            .saturating_add(self.days_additional)
    }

    /// Returns the days still available to request.
    #[must_use]
    pub const fn available_days(&self) -> u32 {
        self.total_days().saturating_sub(self.days_taken)
    }

    /// Returns a copy with `days` more consumed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientBalance` if fewer than `days` remain.
    pub fn with_debit(&self, days: u32) -> Result<Self, DomainError> {
        let available: u32 = self.available_days();
        if days > available {
            return Err(DomainError::InsufficientBalance {
                requested: days,
                available,
            });
        }
        Ok(Self {
            days_taken: self.days_taken + days,
            ..self.clone()
        })
    }

    /// Returns a copy with `days` of consumption reversed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCredit` if `days` exceeds the days taken.
    pub fn with_reversal(&self, days: u32) -> Result<Self, DomainError> {
        if days > self.days_taken {
            return Err(DomainError::InvalidCredit {
                requested: days,
                taken: self.days_taken,
            });
        }
        Ok(Self {
            days_taken: self.days_taken - days,
            ..self.clone()
        })
    }

    /// Returns a copy with `days` of bonus granted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DayCountOverflow` if the total would overflow.
    pub fn with_grant(&self, days: u32) -> Result<Self, DomainError> {
        let days_additional: u32 =
            self.days_additional
                .checked_add(days)
                .ok_or_else(|| DomainError::DayCountOverflow {
                    operation: format!("granting {days} additional days"),
                })?;
        Ok(Self {
            days_additional,
            ..self.clone()
        })
    }
}

/// Identifier of a persisted leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(i64);

impl RequestId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded approval decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Who decided.
    pub actor_id: EmployeeId,
    /// Free-form comment left with the decision.
    pub comment: Option<String>,
    /// When the decision was recorded.
    pub decided_at: OffsetDateTime,
}

/// A leave request that has passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// First day of leave.
    pub start_date: Date,
    /// Last day of leave, inclusive.
    pub end_date: Date,
    /// Ledger year the request is debited from.
    pub entitlement_year: i32,
    /// Business days in the range, fixed at creation.
    pub days_requested: u32,
    /// Employee comments.
    pub comments: Option<String>,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
}

impl NewLeaveRequest {
    /// Attaches a store-assigned identifier, producing a request in its initial state.
    #[must_use]
    pub fn into_request(self, id: RequestId) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id: self.employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            entitlement_year: self.entitlement_year,
            days_requested: self.days_requested,
            comments: self.comments,
            created_at: self.created_at,
            state: RequestState::PendingReferente,
            referente_decision: None,
            rh_decision: None,
        }
    }
}

/// A stored leave request.
///
/// Once `state` is terminal the record is never modified again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Store-assigned identifier.
    pub id: RequestId,
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// First day of leave.
    pub start_date: Date,
    /// Last day of leave, inclusive.
    pub end_date: Date,
    /// Ledger year the request is debited from.
    pub entitlement_year: i32,
    /// Business days in the range, fixed at creation.
    pub days_requested: u32,
    /// Employee comments.
    pub comments: Option<String>,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Current workflow state.
    pub state: RequestState,
    /// First-stage decision, set when the referente acts.
    pub referente_decision: Option<Decision>,
    /// Final decision, set when RH acts.
    pub rh_decision: Option<Decision>,
}
