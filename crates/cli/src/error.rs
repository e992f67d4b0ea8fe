// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_ledger::CoreError;
use leave_ledger_persistence::PersistenceError;
use thiserror::Error;

/// Errors raised by the command line before or around a ledger operation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The employee file could not be read or parsed as CSV.
    #[error("Failed to read employee file {path}: {source}")]
    EmployeeFile {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// An employee row holds an unusable value.
    #[error("Employee row {row}: {reason}")]
    InvalidEmployeeRow { row: usize, reason: String },

    /// The same employee id appears on two rows.
    #[error("Employee {0} appears more than once in the employee file")]
    DuplicateEmployee(String),

    /// The ledger refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database could not be opened.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
