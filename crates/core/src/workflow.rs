// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filing and deciding leave requests.
//!
//! A request is decided first by the employee's team referente and then by
//! RH. Each decision is a compare-and-swap on the request's state, so when two
//! approvers race exactly one wins. The RH approval and its debit are written
//! together, so a request is never `Approved` without its days being taken.

use crate::config::PolicyConfig;
use crate::error::{CoreError, Missing};
use crate::ledger::CarryoverLedger;
use crate::ports::{EmployeeDirectory, LeaveStore};
use leave_ledger_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leave_ledger_domain::{
    AnnualEntitlement, ApprovalStage, Decision, DomainError, Employee, EmployeeId,
    LeaveApplication, LeaveRequest, NewLeaveRequest, RequestId, RequestState, Role,
    ValidatedRequest, Verdict, entitlement_year, validate_leave_request,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

/// Outcome of a successfully filed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRequest {
    /// Identifier assigned by the store.
    pub request_id: RequestId,
    /// Business days the request will consume.
    pub days_requested: u32,
    /// Advisory messages for the requester.
    pub warnings: Vec<String>,
}

fn request_snapshot(request: &LeaveRequest) -> StateSnapshot {
    StateSnapshot::new(format!(
        "request={},state={},start={},end={},days={}",
        request.id, request.state, request.start_date, request.end_date, request.days_requested
    ))
}

const fn action_name(stage: ApprovalStage, verdict: Verdict) -> &'static str {
    match (stage, verdict) {
        (ApprovalStage::Referente, Verdict::Approve) => "ApproveAsReferente",
        (ApprovalStage::Referente, Verdict::Reject) => "RejectAsReferente",
        (ApprovalStage::Rh, Verdict::Approve) => "ApproveAsRh",
        (ApprovalStage::Rh, Verdict::Reject) => "RejectAsRh",
    }
}

/// The approval state machine over a store and a directory.
pub struct ApprovalWorkflow<'a, S: LeaveStore + ?Sized, D: EmployeeDirectory + ?Sized> {
    store: &'a S,
    directory: &'a D,
    config: &'a PolicyConfig,
}

impl<'a, S: LeaveStore + ?Sized, D: EmployeeDirectory + ?Sized> ApprovalWorkflow<'a, S, D> {
    /// Creates a workflow over the given collaborators.
    #[must_use]
    pub const fn new(store: &'a S, directory: &'a D, config: &'a PolicyConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    fn employee(&self, id: &EmployeeId) -> Result<Employee, CoreError> {
        self.directory
            .get_employee(id)?
            .ok_or_else(|| CoreError::NotFound(Missing::Employee(id.clone())))
    }

    /// Returns a stored request.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no request has this identifier.
    pub fn get_request(&self, id: RequestId) -> Result<LeaveRequest, CoreError> {
        self.store
            .find_request(id)?
            .ok_or(CoreError::NotFound(Missing::Request(id)))
    }

    /// Validates and files a new leave request in `PendingReferente`.
    ///
    /// Nothing is stored when a hard rule fails.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` with every violated rule,
    /// `CoreError::DomainViolation` for a reversed range, or
    /// `CoreError::NotFound` for an unknown employee or an unopened year.
    pub fn create_request(
        &self,
        employee_id: &EmployeeId,
        start_date: Date,
        end_date: Date,
        comments: Option<String>,
    ) -> Result<CreatedRequest, CoreError> {
        if end_date < start_date {
            return Err(DomainError::InvalidRange {
                start: start_date,
                end: end_date,
            }
            .into());
        }
        let employee: Employee = self.employee(employee_id)?;
        let year: i32 = entitlement_year(start_date);
        let balance: AnnualEntitlement = self
            .store
            .find_entitlement(employee_id, year)?
            .ok_or_else(|| {
                CoreError::NotFound(Missing::Entitlement {
                    employee_id: employee_id.clone(),
                    year,
                })
            })?;
        let existing: Vec<LeaveRequest> = self.store.list_requests_for_employee(employee_id)?;

        let validated: ValidatedRequest = validate_leave_request(
            &self.config.validation,
            &LeaveApplication {
                employee: &employee,
                start_date,
                end_date,
                balance: &balance,
                existing_requests: &existing,
            },
        )?;

        let new_request: NewLeaveRequest = NewLeaveRequest {
            employee_id: employee_id.clone(),
            start_date,
            end_date,
            entitlement_year: validated.entitlement_year,
            days_requested: validated.days_requested,
            comments,
            created_at: OffsetDateTime::now_utc(),
        };
        let event: AuditEvent = AuditEvent::new(
            Actor::employee(employee_id, employee.role),
            Cause::new(
                format!("leave-{employee_id}-{start_date}"),
                String::from("Leave request filed"),
            ),
            Action::new(
                String::from("FileLeaveRequest"),
                Some(format!("days={}", validated.days_requested)),
            ),
            StateSnapshot::absent(),
            StateSnapshot::new(format!(
                "state={},start={start_date},end={end_date},days={}",
                RequestState::PendingReferente,
                validated.days_requested
            )),
            employee_id.clone(),
            validated.entitlement_year,
        );
        let stored: LeaveRequest = self.store.insert_request(&new_request, &event)?;

        info!(
            "Filed leave request {} for employee {}: {} days from {} to {}",
            stored.id, employee_id, stored.days_requested, start_date, end_date
        );

        Ok(CreatedRequest {
            request_id: stored.id,
            days_requested: stored.days_requested,
            warnings: validated.warnings,
        })
    }

    /// Records a referente or RH decision on a request.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` when the request is not awaiting
    /// `stage`, when the actor may not decide at `stage`, or when a concurrent
    /// decision won. On the final approval, debit failures are returned as-is
    /// and the request stays in `PendingRh`.
    pub fn decide(
        &self,
        request_id: RequestId,
        actor_id: &EmployeeId,
        stage: ApprovalStage,
        approve: bool,
        comment: Option<String>,
    ) -> Result<LeaveRequest, CoreError> {
        let verdict: Verdict = Verdict::from_approval(approve);
        let request: LeaveRequest = self.get_request(request_id)?;
        let actor: Employee = self.employee(actor_id)?;

        let invalid = |from: RequestState, reason: String| {
            warn!(
                "Rejected {} on request {} by {}: {}",
                action_name(stage, verdict),
                request_id,
                actor_id,
                reason
            );
            CoreError::InvalidTransition {
                request_id,
                from,
                stage,
                verdict,
                reason,
            }
        };

        let next: RequestState = match request.state.next(stage, verdict) {
            Ok(next) => next,
            Err(DomainError::InvalidTransition { from, reason, .. }) => {
                return Err(invalid(from, reason));
            }
            Err(other) => return Err(other.into()),
        };

        if let Err(reason) = self.authorize(&request, &actor, stage) {
            return Err(invalid(request.state, reason));
        }

        let decision: Decision = Decision {
            actor_id: actor_id.clone(),
            comment,
            decided_at: OffsetDateTime::now_utc(),
        };
        let mut updated: LeaveRequest = request.clone();
        updated.state = next;
        match stage {
            ApprovalStage::Referente => updated.referente_decision = Some(decision),
            ApprovalStage::Rh => updated.rh_decision = Some(decision),
        }

        let audit_actor: Actor = Actor::employee(actor_id, actor.role);
        let cause: Cause = Cause::new(
            format!("request-{request_id}"),
            format!("{stage} decision on leave request"),
        );
        let event: AuditEvent = AuditEvent::new(
            audit_actor.clone(),
            cause.clone(),
            Action::new(String::from(action_name(stage, verdict)), None),
            request_snapshot(&request),
            request_snapshot(&updated),
            request.employee_id.clone(),
            request.entitlement_year,
        );

        let committed: bool = if next == RequestState::Approved {
            let ledger: CarryoverLedger<'_, S> =
                CarryoverLedger::new(self.store, &self.config.ledger);
            ledger
                .debit_on_approval(request.state, &updated, &event, &audit_actor, &cause)?
                .is_some()
        } else {
            self.store.swap_request(request.state, &updated, &event)?
        };

        if !committed {
            let current: RequestState = self.get_request(request_id)?.state;
            return Err(invalid(
                current,
                String::from("request was decided concurrently"),
            ));
        }

        info!(
            "Request {} moved from {} to {} by {}",
            request_id, request.state, next, actor_id
        );
        Ok(updated)
    }

    fn authorize(
        &self,
        request: &LeaveRequest,
        actor: &Employee,
        stage: ApprovalStage,
    ) -> Result<(), String> {
        if !actor.active {
            return Err(String::from("actor is not an active employee"));
        }
        match stage {
            ApprovalStage::Referente => {
                let employee: Option<Employee> = self
                    .directory
                    .get_employee(&request.employee_id)
                    .map_err(|e| e.to_string())?;
                let assigned: Option<EmployeeId> =
                    employee.and_then(|employee| employee.team_referente_id);
                if assigned.as_ref() == Some(&actor.id) {
                    Ok(())
                } else {
                    Err(String::from(
                        "actor is not the team referente of the requesting employee",
                    ))
                }
            }
            ApprovalStage::Rh => {
                if actor.role == Role::Rh {
                    Ok(())
                } else {
                    Err(String::from("actor does not hold the RH role"))
                }
            }
        }
    }
}
