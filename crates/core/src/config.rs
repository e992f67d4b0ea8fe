// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use leave_ledger_domain::{ValidationPolicy, filing_deadline};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Year used to check that the configured filing deadline exists every year.
const NON_LEAP_YEAR: i32 = 2001;

/// Ledger tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerSettings {
    /// How many times a mutation is attempted before giving up on a busy row.
    pub max_update_attempts: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            max_update_attempts: 3,
        }
    }
}

/// Annual rollover tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RolloverSettings {
    /// Number of worker threads employees are partitioned across.
    pub workers: usize,
}

impl Default for RolloverSettings {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Every tunable of the leave ledger. Absent sections and fields take their defaults.
///
/// ```toml
/// [validation]
/// minimum_block_days = 10
/// filing_deadline_month = 5
/// filing_deadline_day = 31
/// filing_deadline_is_hard = false
///
/// [ledger]
/// max_update_attempts = 3
///
/// [rollover]
/// workers = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub validation: ValidationPolicy,
    pub ledger: LedgerSettings,
    pub rollover: RolloverSettings,
}

impl PolicyConfig {
    /// Parses and checks a TOML policy document.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the document is malformed or
    /// any value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let config: Self =
            toml::from_str(text).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Reads a TOML policy file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text: String = std::fs::read_to_string(path).map_err(|e| {
            CoreError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` naming the first bad value.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.ledger.max_update_attempts == 0 {
            return Err(CoreError::InvalidConfig(String::from(
                "ledger.max_update_attempts must be at least 1",
            )));
        }
        if self.rollover.workers == 0 {
            return Err(CoreError::InvalidConfig(String::from(
                "rollover.workers must be at least 1",
            )));
        }
        if self.validation.minimum_block_days == 0 {
            return Err(CoreError::InvalidConfig(String::from(
                "validation.minimum_block_days must be at least 1",
            )));
        }
        filing_deadline(
            NON_LEAP_YEAR,
            self.validation.filing_deadline_month,
            self.validation.filing_deadline_day,
        )
        .map_err(|e| CoreError::InvalidConfig(format!("filing deadline: {e}")))?;
        Ok(())
    }
}
