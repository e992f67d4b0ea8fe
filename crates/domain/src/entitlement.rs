// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Base vacation entitlement from seniority.
//!
//! Days owed for a calendar year depend only on complete years of service,
//! counted on anniversaries, as of January 1 of that year.

use crate::calendar::first_day_of_year;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;

/// Seniority band that determines the base days owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeniorityBand {
    /// Less than 5 years of service.
    UnderFive,
    /// At least 5 and less than 10 years.
    FiveToTen,
    /// At least 10 and less than 20 years.
    TenToTwenty,
    /// 20 years or more.
    TwentyPlus,
}

impl SeniorityBand {
    /// Classifies complete years of service into a band.
    #[must_use]
    pub const fn for_years(years_of_service: u16) -> Self {
        if years_of_service < 5 {
            Self::UnderFive
        } else if years_of_service < 10 {
            Self::FiveToTen
        } else if years_of_service < 20 {
            Self::TenToTwenty
        } else {
            Self::TwentyPlus
        }
    }

    /// Returns the base days owed for this band.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::UnderFive => 14,
            Self::FiveToTen => 21,
            Self::TenToTwenty => 28,
            Self::TwentyPlus => 35,
        }
    }
}

/// Calculates complete years of service between the hire date and a given date.
///
/// A year is counted only once its calendar anniversary has been reached.
/// Returns 0 when `as_of` precedes the hire date.
#[must_use]
pub fn years_of_service(hire_date: Date, as_of: Date) -> u16 {
    if as_of < hire_date {
        return 0;
    }

    let years_diff: i32 = as_of.year() - hire_date.year();

    let anniversary_reached: bool = (u8::from(as_of.month()), as_of.day())
        >= (u8::from(hire_date.month()), hire_date.day());

    let complete: i32 = if anniversary_reached {
        years_diff
    } else {
        years_diff - 1
    };

    u16::try_from(complete.max(0)).unwrap_or(u16::MAX)
}

/// Returns the base days owed for the seniority reached by `as_of`.
///
/// Callers evaluating a calendar year pass January 1 of that year.
#[must_use]
pub fn base_days_for_seniority(hire_date: Date, as_of: Date) -> u32 {
    SeniorityBand::for_years(years_of_service(hire_date, as_of)).days()
}

/// Returns the base days owed for a calendar year, evaluated at January 1.
///
/// # Errors
///
/// Returns `DomainError::InvalidYear` if the year is outside the supported window.
pub fn base_days_for_year(hire_date: Date, year: i32) -> Result<u32, DomainError> {
    Ok(base_days_for_seniority(hire_date, first_day_of_year(year)?))
}
