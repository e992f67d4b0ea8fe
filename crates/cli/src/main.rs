// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator command line for the leave ledger.
//!
//! Employees come from a CSV export of the HR directory; balances, requests
//! and the audit trail live in a SQLite file. Results are printed as JSON.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;
mod directory;
mod error;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use leave_ledger_domain::{EmployeeId, RequestId, parse_date};
use std::path::PathBuf;
use time::Date;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match commands::run(&args) {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Vacation entitlement ledger and approval workflow.
#[derive(Debug, Parser)]
#[command(name = "leave-ledger", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an in-memory database.
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// CSV export of the employee directory.
    #[arg(short, long, global = true, default_value = "employees.csv")]
    pub employees: PathBuf,

    /// Policy file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Open the given year for every active employee
    Rollover {
        #[arg(long)]
        year: i32,
    },

    /// Show an employee's balance
    Balance {
        #[arg(long, value_parser = employee_id_arg)]
        employee: EmployeeId,
        #[arg(long)]
        year: i32,
    },

    /// Grant bonus days
    Grant(Adjustment),

    /// Give back days previously taken
    Reverse(Adjustment),

    /// Open a single employee's year on demand
    OpenYear {
        #[arg(long, value_parser = employee_id_arg)]
        employee: EmployeeId,
        #[arg(long)]
        year: i32,
        /// The RH or admin performing the operation
        #[arg(long, value_parser = employee_id_arg)]
        actor: EmployeeId,
    },

    /// File, decide and inspect leave requests
    #[command(subcommand)]
    Request(RequestCommand),

    /// Print the audit trail of one employee's year
    Audit {
        #[arg(long, value_parser = employee_id_arg)]
        employee: EmployeeId,
        #[arg(long)]
        year: i32,
    },
}

/// A manual balance adjustment.
#[derive(Clone, Debug, ClapArgs)]
pub struct Adjustment {
    #[arg(long, value_parser = employee_id_arg)]
    pub employee: EmployeeId,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub days: u32,
    #[arg(long)]
    pub reason: String,
    /// The RH or admin performing the adjustment
    #[arg(long, value_parser = employee_id_arg)]
    pub actor: EmployeeId,
}

#[derive(Clone, Debug, Subcommand)]
pub enum RequestCommand {
    /// File a new request
    Create {
        #[arg(long, value_parser = employee_id_arg)]
        employee: EmployeeId,
        /// First day of leave (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        start: Date,
        /// Last day of leave, inclusive (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        end: Date,
        #[arg(long)]
        comments: Option<String>,
    },

    /// Record the team referente's decision
    Referente(DecisionArgs),

    /// Record RH's final decision
    Rh(DecisionArgs),

    /// Show one request
    Show {
        #[arg(value_parser = request_id_arg)]
        request: RequestId,
    },

    /// List an employee's requests, oldest first
    List {
        #[arg(long, value_parser = employee_id_arg)]
        employee: EmployeeId,
    },
}

#[derive(Clone, Debug, ClapArgs)]
pub struct DecisionArgs {
    #[arg(value_parser = request_id_arg)]
    pub request: RequestId,
    #[arg(long, value_parser = employee_id_arg)]
    pub actor: EmployeeId,
    /// Reject instead of approving
    #[arg(long)]
    pub reject: bool,
    #[arg(long)]
    pub comment: Option<String>,
}

fn employee_id_arg(value: &str) -> Result<EmployeeId, String> {
    EmployeeId::new(value).map_err(|e| e.to_string())
}

fn date_arg(value: &str) -> Result<Date, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn request_id_arg(value: &str) -> Result<RequestId, String> {
    value
        .parse::<i64>()
        .map(RequestId::new)
        .map_err(|e| format!("Invalid request id '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::date;

    #[test]
    fn test_parses_request_create() {
        let args = Args::try_parse_from([
            "leave-ledger",
            "--database",
            "ledger.db",
            "request",
            "create",
            "--employee",
            "E-100",
            "--start",
            "2026-03-02",
            "--end",
            "2026-03-13",
        ])
        .unwrap();

        assert_eq!(args.database, Some(PathBuf::from("ledger.db")));
        assert_eq!(args.employees, PathBuf::from("employees.csv"));
        match args.command {
            Command::Request(RequestCommand::Create {
                employee,
                start,
                end,
                comments,
            }) => {
                assert_eq!(employee, EmployeeId::new("E-100").unwrap());
                assert_eq!(start, date!(2026 - 03 - 02));
                assert_eq!(end, date!(2026 - 03 - 13));
                assert_eq!(comments, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parses_rejection() {
        let args = Args::try_parse_from([
            "leave-ledger",
            "request",
            "rh",
            "7",
            "--actor",
            "H-1",
            "--reject",
            "--comment",
            "Peak season",
        ])
        .unwrap();

        match args.command {
            Command::Request(RequestCommand::Rh(decision)) => {
                assert_eq!(decision.request, RequestId::new(7));
                assert!(decision.reject);
                assert_eq!(decision.comment.as_deref(), Some("Peak season"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_malformed_date() {
        let result = Args::try_parse_from([
            "leave-ledger",
            "request",
            "create",
            "--employee",
            "E-100",
            "--start",
            "2026-02-30",
            "--end",
            "2026-03-13",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_blank_employee_id() {
        let result = Args::try_parse_from([
            "leave-ledger",
            "balance",
            "--employee",
            " ",
            "--year",
            "2026",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "leave-ledger",
            "rollover",
            "--year",
            "2027",
            "--employees",
            "staff.csv",
        ])
        .unwrap();

        assert_eq!(args.employees, PathBuf::from("staff.csv"));
        assert!(matches!(args.command, Command::Rollover { year: 2027 }));
    }
}
