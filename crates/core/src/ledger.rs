// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The carryover ledger: one balance row per employee per year.
//!
//! Every mutation reads the row, derives the new row, and asks the store to
//! swap it in only if nobody changed it meanwhile. A lost race or a busy store
//! re-reads and tries again, up to `max_update_attempts` times. Any other
//! store failure is returned immediately. Each successful mutation
//! is recorded with exactly one audit event, written by the store in the same
//! unit as the row.

use crate::config::LedgerSettings;
use crate::error::{CoreError, Missing};
use crate::ports::{ApprovalCommit, LeaveStore, StoreError};
use leave_ledger_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leave_ledger_domain::{
    AnnualEntitlement, DomainError, EmployeeId, LeaveRequest, RequestState,
};
use tracing::{debug, info, warn};

/// Renders a ledger row for audit snapshots.
pub(crate) fn snapshot(entitlement: &AnnualEntitlement) -> StateSnapshot {
    StateSnapshot::new(format!(
        "corresponding={},carried_over={},not_taken_previous_year={},additional={},taken={}",
        entitlement.days_corresponding,
        entitlement.days_carried_over,
        entitlement.days_not_taken_previous_year,
        entitlement.days_additional,
        entitlement.days_taken
    ))
}

/// Balance operations over a `LeaveStore`.
#[derive(Debug)]
pub struct CarryoverLedger<'a, S: LeaveStore + ?Sized> {
    store: &'a S,
    max_attempts: u32,
}

impl<'a, S: LeaveStore + ?Sized> CarryoverLedger<'a, S> {
    /// Creates a ledger over `store`.
    #[must_use]
    pub fn new(store: &'a S, settings: &LedgerSettings) -> Self {
        Self {
            store,
            max_attempts: settings.max_update_attempts.max(1),
        }
    }

    /// Returns the balance row for `employee_id` in `year`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if no row exists, or a store error.
    pub fn get_balance(
        &self,
        employee_id: &EmployeeId,
        year: i32,
    ) -> Result<AnnualEntitlement, CoreError> {
        debug!("Reading balance for employee {} in {}", employee_id, year);
        self.store
            .find_entitlement(employee_id, year)?
            .ok_or_else(|| {
                CoreError::NotFound(Missing::Entitlement {
                    employee_id: employee_id.clone(),
                    year,
                })
            })
    }

    /// Consumes `days` from the balance.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InsufficientBalance` if fewer than `days` remain,
    /// `CoreError::NotFound` if the row is missing, or
    /// `CoreError::LedgerContention` if the row stayed busy.
    pub fn debit(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        days: u32,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<AnnualEntitlement, CoreError> {
        let updated: AnnualEntitlement = self.mutate(
            employee_id,
            year,
            &Action::new(String::from("DebitDays"), Some(format!("days={days}"))),
            actor,
            cause,
            |current| current.with_debit(days),
        )?;
        info!(
            "Debited {} days from employee {} for {} ({} left)",
            days,
            employee_id,
            year,
            updated.available_days()
        );
        Ok(updated)
    }

    /// Moves `approved` out of `expected_state` and debits its days in one store write.
    ///
    /// Returns `Ok(None)` when the request left `expected_state` before the
    /// write; nothing is stored in that case. When the balance cannot cover
    /// the request nothing is stored either, and the request keeps its state.
    ///
    /// # Errors
    ///
    /// Same as `debit`.
    pub fn debit_on_approval(
        &self,
        expected_state: RequestState,
        approved: &LeaveRequest,
        approval_event: &AuditEvent,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<Option<AnnualEntitlement>, CoreError> {
        let employee_id: &EmployeeId = &approved.employee_id;
        let year: i32 = approved.entitlement_year;
        let days: u32 = approved.days_requested;

        for attempt in 1..=self.max_attempts {
            let current: AnnualEntitlement = self.get_balance(employee_id, year)?;
            let updated: AnnualEntitlement = current.with_debit(days)?;
            let debit_event: AuditEvent = AuditEvent::new(
                actor.clone(),
                cause.clone(),
                Action::new(String::from("DebitDays"), Some(format!("days={days}"))),
                snapshot(&current),
                snapshot(&updated),
                employee_id.clone(),
                year,
            );
            match self.store.approve_and_debit(
                expected_state,
                approved,
                approval_event,
                &current,
                &updated,
                &debit_event,
            ) {
                Ok(ApprovalCommit::Applied) => {
                    info!(
                        "Debited {} days from employee {} for {} on approval of request {} ({} left)",
                        days,
                        employee_id,
                        year,
                        approved.id,
                        updated.available_days()
                    );
                    return Ok(Some(updated));
                }
                Ok(ApprovalCommit::RequestChanged) => return Ok(None),
                Ok(ApprovalCommit::BalanceChanged) => warn!(
                    "Balance for employee {} in {} changed concurrently (attempt {} of {})",
                    employee_id, year, attempt, self.max_attempts
                ),
                Err(StoreError::Busy(msg)) => warn!(
                    "Store busy approving request {} (attempt {} of {}): {}",
                    approved.id, attempt, self.max_attempts, msg
                ),
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::LedgerContention {
            employee_id: employee_id.clone(),
            year,
            attempts: self.max_attempts,
        })
    }

    /// Gives back `days` previously consumed, for example after a cancelled absence.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DomainViolation` with `DomainError::InvalidCredit`
    /// if `days` exceeds the days taken, plus the errors of `debit`.
    pub fn reverse_debit(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        days: u32,
        actor: &Actor,
        reason: &str,
    ) -> Result<AnnualEntitlement, CoreError> {
        let cause: Cause = Cause::new(format!("reverse-{employee_id}-{year}"), reason.to_string());
        let updated: AnnualEntitlement = self.mutate(
            employee_id,
            year,
            &Action::new(String::from("ReverseDebit"), Some(format!("days={days}"))),
            actor,
            &cause,
            |current| current.with_reversal(days),
        )?;
        info!(
            "Reversed {} taken days for employee {} in {}",
            days, employee_id, year
        );
        Ok(updated)
    }

    /// Grants `days` of bonus leave.
    ///
    /// # Errors
    ///
    /// Same as `debit`, except a grant cannot run out of balance.
    pub fn grant_additional(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        days: u32,
        actor: &Actor,
        reason: &str,
    ) -> Result<AnnualEntitlement, CoreError> {
        let cause: Cause = Cause::new(format!("grant-{employee_id}-{year}"), reason.to_string());
        let updated: AnnualEntitlement = self.mutate(
            employee_id,
            year,
            &Action::new(
                String::from("GrantAdditionalDays"),
                Some(format!("days={days}")),
            ),
            actor,
            &cause,
            |current| current.with_grant(days),
        )?;
        info!(
            "Granted {} additional days to employee {} for {}",
            days, employee_id, year
        );
        Ok(updated)
    }

    /// Inserts a new balance row unless one already exists.
    ///
    /// Returns `false` if a row for the same employee and year is present;
    /// the existing row is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub fn insert_if_absent(
        &self,
        entitlement: &AnnualEntitlement,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<bool, CoreError> {
        let event: AuditEvent = AuditEvent::new(
            actor.clone(),
            cause.clone(),
            Action::new(
                String::from("OpenYear"),
                Some(format!(
                    "corresponding={} carried_over={}",
                    entitlement.days_corresponding, entitlement.days_carried_over
                )),
            ),
            StateSnapshot::absent(),
            snapshot(entitlement),
            entitlement.employee_id.clone(),
            entitlement.year,
        );
        let inserted: bool = self
            .store
            .insert_entitlement_if_absent(entitlement, &event)?;
        if inserted {
            debug!(
                "Opened {} for employee {}",
                entitlement.year, entitlement.employee_id
            );
        }
        Ok(inserted)
    }

    /// Creates a balance row on demand.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::AlreadyExists` if the row is already present, or a
    /// store error.
    pub fn open_year(
        &self,
        entitlement: &AnnualEntitlement,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<AnnualEntitlement, CoreError> {
        if !self.insert_if_absent(entitlement, actor, cause)? {
            return Err(CoreError::AlreadyExists {
                employee_id: entitlement.employee_id.clone(),
                year: entitlement.year,
            });
        }
        info!(
            "Opened {} for employee {} with {} days",
            entitlement.year,
            entitlement.employee_id,
            entitlement.total_days()
        );
        Ok(entitlement.clone())
    }

    fn mutate<F>(
        &self,
        employee_id: &EmployeeId,
        year: i32,
        action: &Action,
        actor: &Actor,
        cause: &Cause,
        change: F,
    ) -> Result<AnnualEntitlement, CoreError>
    where
        F: Fn(&AnnualEntitlement) -> Result<AnnualEntitlement, DomainError>,
    {
        for attempt in 1..=self.max_attempts {
            let current: AnnualEntitlement = self.get_balance(employee_id, year)?;
            let updated: AnnualEntitlement = change(&current)?;
            let event: AuditEvent = AuditEvent::new(
                actor.clone(),
                cause.clone(),
                action.clone(),
                snapshot(&current),
                snapshot(&updated),
                employee_id.clone(),
                year,
            );
            match self.store.swap_entitlement(&current, &updated, &event) {
                Ok(true) => return Ok(updated),
                Ok(false) => warn!(
                    "Balance for employee {} in {} changed concurrently (attempt {} of {})",
                    employee_id, year, attempt, self.max_attempts
                ),
                Err(StoreError::Busy(msg)) => warn!(
                    "Store busy updating employee {} in {} (attempt {} of {}): {}",
                    employee_id, year, attempt, self.max_attempts, msg
                ),
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::LedgerContention {
            employee_id: employee_id.clone(),
            year,
            attempts: self.max_attempts,
        })
    }
}
