// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod error;
mod ledger;
mod memory;
mod ports;
mod rollover;
mod service;
mod workflow;

#[cfg(test)]
mod tests;

pub use config::{LedgerSettings, PolicyConfig, RolloverSettings};
pub use error::{CoreError, Missing};
pub use ledger::CarryoverLedger;
pub use memory::{InMemoryDirectory, InMemoryStore};
pub use ports::{ApprovalCommit, DirectoryError, EmployeeDirectory, LeaveStore, StoreError};
pub use rollover::{RolloverFailure, RolloverSummary, opening_entitlement, run_annual_rollover};
pub use service::LeaveService;
pub use workflow::{ApprovalWorkflow, CreatedRequest};
