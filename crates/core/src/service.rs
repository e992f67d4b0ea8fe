// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::PolicyConfig;
use crate::error::{CoreError, Missing};
use crate::ledger::CarryoverLedger;
use crate::ports::{EmployeeDirectory, LeaveStore};
use crate::rollover::{RolloverSummary, opening_entitlement, run_annual_rollover};
use crate::workflow::{ApprovalWorkflow, CreatedRequest};
use leave_ledger_audit::{Actor, AuditEvent, Cause};
use leave_ledger_domain::{
    AnnualEntitlement, ApprovalStage, Employee, EmployeeId, LeaveRequest, RequestId,
    first_day_of_year,
};
use time::Date;
use tracing::debug;

/// The operations the surrounding HR system calls.
///
/// Owns its store and directory; share it between threads by reference.
#[derive(Debug)]
pub struct LeaveService<S: LeaveStore, D: EmployeeDirectory> {
    store: S,
    directory: D,
    config: PolicyConfig,
}

impl<S: LeaveStore, D: EmployeeDirectory> LeaveService<S, D> {
    /// Creates a service.
    #[must_use]
    pub const fn new(store: S, directory: D, config: PolicyConfig) -> Self {
        Self {
            store,
            directory,
            config,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    fn ledger(&self) -> CarryoverLedger<'_, S> {
        CarryoverLedger::new(&self.store, &self.config.ledger)
    }

    fn workflow(&self) -> ApprovalWorkflow<'_, S, D> {
        ApprovalWorkflow::new(&self.store, &self.directory, &self.config)
    }

    fn employee(&self, id: &EmployeeId) -> Result<Employee, CoreError> {
        self.directory
            .get_employee(id)?
            .ok_or_else(|| CoreError::NotFound(Missing::Employee(id.clone())))
    }

    /// Resolves an actor allowed to adjust balances directly.
    fn ledger_admin(&self, actor_id: &EmployeeId, operation: &str) -> Result<Actor, CoreError> {
        let actor: Employee = self.employee(actor_id)?;
        if !actor.active || !actor.role.administers_ledger() {
            return Err(CoreError::Unauthorized {
                actor_id: actor_id.clone(),
                operation: operation.to_string(),
            });
        }
        Ok(Actor::employee(actor_id, actor.role))
    }

    /// Validates and files a leave request.
    ///
    /// # Errors
    ///
    /// See [`ApprovalWorkflow::create_request`].
    pub fn create_leave_request(
        &self,
        employee_id: &EmployeeId,
        start_date: Date,
        end_date: Date,
        comments: Option<String>,
    ) -> Result<CreatedRequest, CoreError> {
        self.workflow()
            .create_request(employee_id, start_date, end_date, comments)
    }

    /// Records the team referente's decision.
    ///
    /// # Errors
    ///
    /// See [`ApprovalWorkflow::decide`].
    pub fn decide_as_referente(
        &self,
        request_id: RequestId,
        actor_id: &EmployeeId,
        approve: bool,
        comment: Option<String>,
    ) -> Result<LeaveRequest, CoreError> {
        self.workflow()
            .decide(request_id, actor_id, ApprovalStage::Referente, approve, comment)
    }

    /// Records RH's final decision, debiting the ledger on approval.
    ///
    /// # Errors
    ///
    /// See [`ApprovalWorkflow::decide`].
    pub fn decide_as_rh(
        &self,
        request_id: RequestId,
        actor_id: &EmployeeId,
        approve: bool,
        comment: Option<String>,
    ) -> Result<LeaveRequest, CoreError> {
        self.workflow()
            .decide(request_id, actor_id, ApprovalStage::Rh, approve, comment)
    }

    /// Returns one employee's balance for `year`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the year was never opened.
    pub fn get_balance(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<AnnualEntitlement, CoreError> {
        self.ledger().get_balance(employee_id, year)
    }

    /// Grants bonus days. The actor must hold the RH or admin role.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` for any other actor, plus the ledger errors.
    pub fn grant_additional_days(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        days: u32,
        reason: &str,
        actor_id: &EmployeeId,
    ) -> Result<AnnualEntitlement, CoreError> {
        let actor: Actor = self.ledger_admin(actor_id, "grant additional days")?;
        self.ledger()
            .grant_additional(employee_id, year, days, &actor, reason)
    }

    /// Returns previously taken days to the balance. The actor must hold the
    /// RH or admin role.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Unauthorized` for any other actor, plus the ledger errors.
    pub fn reverse_debit(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        days: u32,
        reason: &str,
        actor_id: &EmployeeId,
    ) -> Result<AnnualEntitlement, CoreError> {
        let actor: Actor = self.ledger_admin(actor_id, "reverse taken days")?;
        self.ledger()
            .reverse_debit(employee_id, year, days, &actor, reason)
    }

    /// Opens `year` for one employee ahead of the batch rollover, seeded the
    /// same way the rollover would seed it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AlreadyExists` if the row exists,
    /// `CoreError::Unauthorized` for a non-admin actor, or
    /// `CoreError::DomainViolation` if `year` is out of range or the employee
    /// starts after it.
    pub fn open_year(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        actor_id: &EmployeeId,
    ) -> Result<AnnualEntitlement, CoreError> {
        let actor: Actor = self.ledger_admin(actor_id, "open an entitlement year")?;
        first_day_of_year(year)?;
        let employee: Employee = self.employee(employee_id)?;
        let previous: Option<AnnualEntitlement> =
            self.store.find_entitlement(employee_id, year - 1)?;
        let entitlement: AnnualEntitlement =
            opening_entitlement(&employee, year, previous.as_ref())?;
        let cause: Cause = Cause::new(
            format!("open-{employee_id}-{year}"),
            format!("Opened {year} ahead of the annual rollover"),
        );
        self.ledger().open_year(&entitlement, &actor, &cause)
    }

    /// Opens `year` for every active employee.
    ///
    /// # Errors
    ///
    /// See [`run_annual_rollover`].
    pub fn run_annual_rollover(&self, year: i32) -> Result<RolloverSummary, CoreError> {
        run_annual_rollover(&self.store, &self.directory, &self.config, year)
    }

    /// Returns one request.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown identifier.
    pub fn get_request(&self, request_id: RequestId) -> Result<LeaveRequest, CoreError> {
        self.workflow().get_request(request_id)
    }

    /// Lists every request an employee has filed, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn list_requests(&self, employee_id: &EmployeeId) -> Result<Vec<LeaveRequest>, CoreError> {
        debug!("Listing requests for employee {}", employee_id);
        Ok(self.store.list_requests_for_employee(employee_id)?)
    }

    /// Returns the audit trail of one employee's year.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn audit_trail(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        debug!("Reading audit trail for employee {} in {}", employee_id, year);
        Ok(self.store.list_audit_events(employee_id, year)?)
    }
}
