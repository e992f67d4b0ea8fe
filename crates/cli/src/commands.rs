// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use color_eyre::Result;
use color_eyre::eyre::Context;
use leave_ledger::{InMemoryDirectory, LeaveService, PolicyConfig, RolloverSummary};
use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::{AnnualEntitlement, LeaveRequest};
use leave_ledger_persistence::Persistence;
use serde::Serialize;
use tracing::{info, warn};

use crate::directory::load_directory;
use crate::error::CliError;
use crate::{Adjustment, Args, Command, DecisionArgs, RequestCommand};

type CliService = LeaveService<Persistence, InMemoryDirectory>;

/// A balance row with its derived totals.
#[derive(Debug, Serialize)]
struct BalanceView<'a> {
    #[serde(flatten)]
    entitlement: &'a AnnualEntitlement,
    total_days: u32,
    available_days: u32,
}

impl<'a> From<&'a AnnualEntitlement> for BalanceView<'a> {
    fn from(entitlement: &'a AnnualEntitlement) -> Self {
        Self {
            entitlement,
            total_days: entitlement.total_days(),
            available_days: entitlement.available_days(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_service(args: &Args) -> Result<CliService, CliError> {
    let config: PolicyConfig = match &args.policy {
        Some(path) => PolicyConfig::load(path)?,
        None => PolicyConfig::default(),
    };
    let directory: InMemoryDirectory = load_directory(&args.employees)?;
    let store: Persistence = if let Some(path) = &args.database {
        info!("Using file-based database at: {}", path.display());
        Persistence::new_with_file(path)?
    } else {
        warn!("Using in-memory database; nothing will be kept after exit");
        Persistence::new_in_memory()?
    };
    Ok(LeaveService::new(store, directory, config))
}

/// Runs the selected command and prints its result.
///
/// # Errors
///
/// Returns an error if setup fails or the ledger refuses the operation.
pub fn run(args: &Args) -> Result<()> {
    let service: CliService = open_service(args).wrap_err("Failed to open the ledger")?;

    match &args.command {
        Command::Rollover { year } => {
            let summary: RolloverSummary = service.run_annual_rollover(*year)?;
            for failure in &summary.errors {
                warn!(
                    "Employee {} was not opened: {}",
                    failure.employee_id, failure.reason
                );
            }
            print_json(&summary)
        }
        Command::Balance { employee, year } => {
            let balance: AnnualEntitlement = service.get_balance(employee, *year)?;
            print_json(&BalanceView::from(&balance))
        }
        Command::Grant(Adjustment {
            employee,
            year,
            days,
            reason,
            actor,
        }) => {
            let balance = service.grant_additional_days(employee, *year, *days, reason, actor)?;
            print_json(&BalanceView::from(&balance))
        }
        Command::Reverse(Adjustment {
            employee,
            year,
            days,
            reason,
            actor,
        }) => {
            let balance = service.reverse_debit(employee, *year, *days, reason, actor)?;
            print_json(&BalanceView::from(&balance))
        }
        Command::OpenYear {
            employee,
            year,
            actor,
        } => {
            let balance = service.open_year(employee, *year, actor)?;
            print_json(&BalanceView::from(&balance))
        }
        Command::Request(request_command) => run_request(&service, request_command),
        Command::Audit { employee, year } => {
            let events: Vec<AuditEvent> = service.audit_trail(employee, *year)?;
            print_json(&events)
        }
    }
}

fn run_request(service: &CliService, command: &RequestCommand) -> Result<()> {
    match command {
        RequestCommand::Create {
            employee,
            start,
            end,
            comments,
        } => {
            let created = service.create_leave_request(employee, *start, *end, comments.clone())?;
            for warning in &created.warnings {
                warn!("Request {} filed with warning: {}", created.request_id, warning);
            }
            print_json(&created)
        }
        RequestCommand::Referente(decision) => {
            let DecisionArgs {
                request,
                actor,
                reject,
                comment,
            } = decision;
            let updated: LeaveRequest =
                service.decide_as_referente(*request, actor, !reject, comment.clone())?;
            print_json(&updated)
        }
        RequestCommand::Rh(decision) => {
            let DecisionArgs {
                request,
                actor,
                reject,
                comment,
            } = decision;
            let updated: LeaveRequest =
                service.decide_as_rh(*request, actor, !reject, comment.clone())?;
            print_json(&updated)
        }
        RequestCommand::Show { request } => print_json(&service.get_request(*request)?),
        RequestCommand::List { employee } => print_json(&service.list_requests(employee)?),
    }
}
