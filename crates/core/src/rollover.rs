// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening a new entitlement year for every active employee.
//!
//! The rollover is idempotent: employees who already have a row for the
//! target year are skipped, and rows are only ever inserted if absent, so a
//! rerun or a concurrent admin `open_year` never overwrites a balance.

use crate::config::PolicyConfig;
use crate::error::CoreError;
use crate::ledger::CarryoverLedger;
use crate::ports::{EmployeeDirectory, LeaveStore};
use leave_ledger_audit::{Actor, Cause};
use leave_ledger_domain::{
    AnnualEntitlement, DomainError, Employee, EmployeeId, base_days_for_year, first_day_of_year,
    last_day_of_year,
};
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, error, info, warn};

/// One employee the rollover could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverFailure {
    pub employee_id: EmployeeId,
    pub reason: String,
}

/// Result of a rollover batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverSummary {
    /// Rows created.
    pub processed: usize,
    /// Employees that already had a row.
    pub skipped: usize,
    /// Per-employee failures; these never abort the batch.
    pub errors: Vec<RolloverFailure>,
}

enum Outcome {
    Opened,
    Skipped,
}

/// Computes the opening balance of `employee` for `year` from the previous year's row.
///
/// # Errors
///
/// Returns `DomainError::NotYetEmployed` if the employee starts after `year`.
pub fn opening_entitlement(
    employee: &Employee,
    year: i32,
    previous: Option<&AnnualEntitlement>,
) -> Result<AnnualEntitlement, CoreError> {
    if employee.hire_date > last_day_of_year(year)? {
        return Err(DomainError::NotYetEmployed {
            hire_date: employee.hire_date,
            year,
        }
        .into());
    }
    let days_corresponding: u32 = base_days_for_year(employee.hire_date, year)?;
    let days_carried_over: u32 = previous.map_or(0, AnnualEntitlement::available_days);
    Ok(AnnualEntitlement::opening(
        employee.id.clone(),
        year,
        days_corresponding,
        days_carried_over,
    ))
}

fn roll_employee<S: LeaveStore + ?Sized>(
    store: &S,
    ledger: &CarryoverLedger<'_, S>,
    employee: &Employee,
    year: i32,
    actor: &Actor,
    cause: &Cause,
) -> Result<Outcome, CoreError> {
    if store.find_entitlement(&employee.id, year)?.is_some() {
        return Ok(Outcome::Skipped);
    }
    let previous: Option<AnnualEntitlement> = store.find_entitlement(&employee.id, year - 1)?;
    let entitlement: AnnualEntitlement = opening_entitlement(employee, year, previous.as_ref())?;

    if ledger.insert_if_absent(&entitlement, actor, cause)? {
        Ok(Outcome::Opened)
    } else {
        Ok(Outcome::Skipped)
    }
}

fn roll_chunk<S: LeaveStore + ?Sized>(
    store: &S,
    config: &PolicyConfig,
    employees: &[Employee],
    year: i32,
) -> RolloverSummary {
    let ledger: CarryoverLedger<'_, S> = CarryoverLedger::new(store, &config.ledger);
    let actor: Actor = Actor::system("annual-rollover");
    let cause: Cause = Cause::new(
        format!("rollover-{year}"),
        format!("Annual rollover into {year}"),
    );

    let mut summary: RolloverSummary = RolloverSummary::default();
    for employee in employees {
        // A panic is contained to the employee being processed; rows already
        // opened in this chunk stay counted.
        match catch_unwind(AssertUnwindSafe(|| {
            roll_employee(store, &ledger, employee, year, &actor, &cause)
        })) {
            Ok(Ok(Outcome::Opened)) => summary.processed += 1,
            Ok(Ok(Outcome::Skipped)) => {
                debug!("Employee {} already has a row for {}", employee.id, year);
                summary.skipped += 1;
            }
            Ok(Err(e)) => {
                warn!("Rollover into {} failed for employee {}: {}", year, employee.id, e);
                summary.errors.push(RolloverFailure {
                    employee_id: employee.id.clone(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                error!("Rollover into {} panicked for employee {}", year, employee.id);
                summary.errors.push(RolloverFailure {
                    employee_id: employee.id.clone(),
                    reason: String::from("rollover panicked while opening this employee"),
                });
            }
        }
    }
    summary
}

/// Opens `year` for every active employee that does not have a row yet.
///
/// Employees are split across `config.rollover.workers` threads.
///
/// # Errors
///
/// Returns an error only if `year` is out of range or the directory cannot
/// be listed. Per-employee failures are reported in the summary.
pub fn run_annual_rollover<S, D>(
    store: &S,
    directory: &D,
    config: &PolicyConfig,
    year: i32,
) -> Result<RolloverSummary, CoreError>
where
    S: LeaveStore + ?Sized,
    D: EmployeeDirectory + ?Sized,
{
    first_day_of_year(year)?;
    let employees: Vec<Employee> = directory.list_active_employees()?;
    let workers: usize = config.rollover.workers.clamp(1, employees.len().max(1));
    info!(
        "Rolling {} active employees into {} with {} worker(s)",
        employees.len(),
        year,
        workers
    );

    let summary: RolloverSummary = if workers == 1 {
        roll_chunk(store, config, &employees, year)
    } else {
        let chunk_size: usize = employees.len().div_ceil(workers);
        std::thread::scope(|scope| {
            let handles: Vec<_> = employees
                .chunks(chunk_size)
                .map(|chunk| (chunk, scope.spawn(move || roll_chunk(store, config, chunk, year))))
                .collect();

            let mut total: RolloverSummary = RolloverSummary::default();
            for (chunk, handle) in handles {
                match handle.join() {
                    Ok(part) => {
                        total.processed += part.processed;
                        total.skipped += part.skipped;
                        total.errors.extend(part.errors);
                    }
                    Err(_) => {
                        error!("Rollover worker for {} employees panicked", chunk.len());
                        total.errors.extend(chunk.iter().map(|employee| RolloverFailure {
                            employee_id: employee.id.clone(),
                            reason: String::from(
                                "rollover worker panicked; this employee may already be opened",
                            ),
                        }));
                    }
                }
            }
            total
        })
    };

    info!(
        "Rollover into {} finished: {} opened, {} skipped, {} failed",
        year,
        summary.processed,
        summary.skipped,
        summary.errors.len()
    );
    Ok(summary)
}
