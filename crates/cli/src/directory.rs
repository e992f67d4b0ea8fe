// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee directory loaded from a CSV export.
//!
//! Expected headers: `id`, `hire_date`, `active`, `role`, and optionally
//! `team_referente_id`. Header names are matched exactly; values are trimmed.

use leave_ledger::InMemoryDirectory;
use leave_ledger_domain::{DomainError, Employee, EmployeeId, Role, parse_date};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct EmployeeRecord {
    id: String,
    hire_date: String,
    active: String,
    role: String,
    #[serde(default)]
    team_referente_id: Option<String>,
}

fn parse_active(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_record(row: usize, record: EmployeeRecord) -> Result<Employee, CliError> {
    let invalid = |reason: String| CliError::InvalidEmployeeRow { row, reason };

    let id: EmployeeId = EmployeeId::new(&record.id).map_err(|e| invalid(e.to_string()))?;
    let hire_date = parse_date(&record.hire_date).map_err(|e| invalid(e.to_string()))?;
    let active: bool = parse_active(&record.active)
        .ok_or_else(|| invalid(format!("active: expected true or false, got '{}'", record.active)))?;
    let role: Role = record.role.parse().map_err(|e: DomainError| invalid(e.to_string()))?;
    let team_referente_id: Option<EmployeeId> = record
        .team_referente_id
        .filter(|s| !s.trim().is_empty())
        .map(|s| EmployeeId::new(&s))
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;

    Ok(Employee::new(id, hire_date, active, role, team_referente_id))
}

/// Parses employee rows from CSV text.
///
/// Row numbers in errors count data rows from 1, excluding the header.
///
/// # Errors
///
/// Returns an error on malformed CSV, an unusable value or a duplicate id.
pub fn read_employees<R: Read>(origin: &str, input: R) -> Result<Vec<Employee>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut employees: Vec<Employee> = Vec::new();
    let mut seen: HashSet<EmployeeId> = HashSet::new();

    for (idx, result) in reader.deserialize::<EmployeeRecord>().enumerate() {
        let record: EmployeeRecord = result.map_err(|source| CliError::EmployeeFile {
            path: origin.to_string(),
            source,
        })?;
        let employee: Employee = parse_record(idx + 1, record)?;
        if !seen.insert(employee.id.clone()) {
            return Err(CliError::DuplicateEmployee(employee.id.to_string()));
        }
        employees.push(employee);
    }

    Ok(employees)
}

/// Loads the employee directory from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row is rejected.
pub fn load_directory(path: &Path) -> Result<InMemoryDirectory, CliError> {
    let origin: String = path.display().to_string();
    let file: File = File::open(path).map_err(|e| CliError::EmployeeFile {
        path: origin.clone(),
        source: csv::Error::from(e),
    })?;
    let employees: Vec<Employee> = read_employees(&origin, file)?;
    info!("Loaded {} employees from {}", employees.len(), origin);
    Ok(InMemoryDirectory::new(employees))
}
