// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::request_state::{ApprovalStage, RequestState, Verdict};
use crate::validation::RuleViolation;
use time::Date;

/// Errors that can occur while evaluating leave rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date string or date component is malformed.
    InvalidDate {
        /// The offending input.
        input: String,
        /// Why it could not be turned into a date.
        reason: String,
    },
    /// A date range ends before it starts.
    InvalidRange {
        /// The range start.
        start: Date,
        /// The range end.
        end: Date,
    },
    /// A calendar year outside the supported window.
    InvalidYear(i32),
    /// Employee identifier is empty or invalid.
    InvalidEmployeeId(String),
    /// Role name is not recognised.
    InvalidRole(String),
    /// Request state name is not recognised.
    InvalidRequestState(String),
    /// A debit exceeds the days still available.
    InsufficientBalance {
        /// Days the caller asked for.
        requested: u32,
        /// Days left on the entitlement.
        available: u32,
    },
    /// A debit reversal exceeds the days already taken.
    InvalidCredit {
        /// Days the caller asked to restore.
        requested: u32,
        /// Days currently recorded as taken.
        taken: u32,
    },
    /// Day arithmetic overflowed.
    DayCountOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The request cannot move as asked from its current state.
    InvalidTransition {
        /// The state the request was in.
        from: RequestState,
        /// The approval stage that acted.
        stage: ApprovalStage,
        /// The verdict that was attempted.
        verdict: Verdict,
        /// Human-readable reason.
        reason: String,
    },
    /// One or more hard leave rules were violated.
    RuleViolations(Vec<RuleViolation>),
    /// The employee starts after the target year ends.
    NotYetEmployed {
        /// The employee's hire date.
        hire_date: Date,
        /// The year an entitlement was requested for.
        year: i32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { input, reason } => {
                write!(f, "Invalid date '{input}': {reason}")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "Invalid range: end date {end} is before start date {start}")
            }
            Self::InvalidYear(year) => write!(f, "Invalid year: {year}"),
            Self::InvalidEmployeeId(msg) => write!(f, "Invalid employee id: {msg}"),
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidRequestState(state) => write!(f, "Invalid request state: {state}"),
            Self::InsufficientBalance {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient balance: {requested} days requested, {available} available"
                )
            }
            Self::InvalidCredit { requested, taken } => {
                write!(
                    f,
                    "Cannot restore {requested} days: only {taken} days have been taken"
                )
            }
            Self::DayCountOverflow { operation } => {
                write!(f, "Day count overflow while {operation}")
            }
            Self::InvalidTransition {
                from,
                stage,
                verdict,
                reason,
            } => {
                write!(
                    f,
                    "Cannot {verdict} as {stage} while request is {from}: {reason}"
                )
            }
            Self::RuleViolations(violations) => {
                write!(f, "Leave request violates {} rule(s)", violations.len())?;
                for violation in violations {
                    write!(f, "; {violation}")?;
                }
                Ok(())
            }
            Self::NotYetEmployed { hire_date, year } => {
                write!(
                    f,
                    "Employee hired on {hire_date} has no entitlement for {year}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
