// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ports::{DirectoryError, StoreError};
use leave_ledger_domain::{
    ApprovalStage, DomainError, EmployeeId, RequestId, RequestState, RuleViolation, Verdict,
};

/// A record that was looked up and not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// No employee with this identifier in the directory.
    Employee(EmployeeId),
    /// No ledger row for this employee and year.
    Entitlement { employee_id: EmployeeId, year: i32 },
    /// No leave request with this identifier.
    Request(RequestId),
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Employee(id) => write!(f, "employee {id}"),
            Self::Entitlement { employee_id, year } => {
                write!(f, "entitlement for employee {employee_id} in {year}")
            }
            Self::Request(id) => write!(f, "leave request {id}"),
        }
    }
}

/// Errors returned by ledger, workflow and rollover operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The leave request broke one or more hard rules. Always the complete list.
    Validation(Vec<RuleViolation>),
    /// A debit asked for more days than remain.
    InsufficientBalance { requested: u32, available: u32 },
    /// A workflow decision is not allowed from the request's current state or
    /// by this actor.
    InvalidTransition {
        request_id: RequestId,
        from: RequestState,
        stage: ApprovalStage,
        verdict: Verdict,
        reason: String,
    },
    /// A referenced record does not exist.
    NotFound(Missing),
    /// A ledger row already exists for this employee and year.
    AlreadyExists { employee_id: EmployeeId, year: i32 },
    /// The actor may not perform an administrative operation.
    Unauthorized {
        actor_id: EmployeeId,
        operation: String,
    },
    /// A ledger update kept losing compare-and-swap races.
    LedgerContention {
        employee_id: EmployeeId,
        year: i32,
        attempts: u32,
    },
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The policy configuration is unusable.
    InvalidConfig(String),
    /// The leave store failed.
    Store(StoreError),
    /// The employee directory failed.
    Directory(DirectoryError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(violations) => {
                write!(f, "Leave request rejected:")?;
                for violation in violations {
                    write!(f, " {violation};")?;
                }
                Ok(())
            }
            Self::InsufficientBalance {
                requested,
                available,
            } => write!(
                f,
                "Insufficient balance: {requested} days requested, {available} available"
            ),
            Self::InvalidTransition {
                request_id,
                from,
                stage,
                verdict,
                reason,
            } => write!(
                f,
                "Cannot {verdict} request {request_id} as {stage} while it is {from}: {reason}"
            ),
            Self::NotFound(missing) => write!(f, "Not found: {missing}"),
            Self::AlreadyExists { employee_id, year } => write!(
                f,
                "Entitlement for employee {employee_id} in {year} already exists"
            ),
            Self::Unauthorized {
                actor_id,
                operation,
            } => write!(f, "Employee {actor_id} is not allowed to {operation}"),
            Self::LedgerContention {
                employee_id,
                year,
                attempts,
            } => write!(
                f,
                "Ledger for employee {employee_id} in {year} is busy: gave up after {attempts} attempts"
            ),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid policy configuration: {msg}"),
            Self::Store(err) => write!(f, "Leave store error: {err}"),
            Self::Directory(err) => write!(f, "Employee directory error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Directory(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::RuleViolations(violations) => Self::Validation(violations),
            DomainError::InsufficientBalance {
                requested,
                available,
            } => Self::InsufficientBalance {
                requested,
                available,
            },
            other => Self::DomainViolation(other),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<DirectoryError> for CoreError {
    fn from(err: DirectoryError) -> Self {
        Self::Directory(err)
    }
}
